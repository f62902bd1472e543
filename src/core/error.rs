use thiserror::Error;

/// Errors that can occur while building batches or producing export files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AchError {
    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// A monetary amount cannot be expressed in whole cents.
    #[error("amount error: {0}")]
    Amount(String),

    /// A value cannot be encoded into a fixed-width record field.
    #[error("field error in {record}.{field}: {message}")]
    Field {
        /// Record name (e.g. "entry_detail").
        record: &'static str,
        /// Field name within the record layout.
        field: &'static str,
        /// What was wrong with the value.
        message: String,
    },

    /// A record layout was used with a field it does not define.
    #[error("layout error: {0}")]
    Layout(String),

    /// A NACHA file could not be read back.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// CSV or JSON serialization error.
    #[error("export error: {0}")]
    Export(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "entries[0].routing_number").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Rule identifier if applicable (e.g. "ACH-ROUTING").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

/// Join a list of validation errors into one message, `; `-separated.
pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_rule() {
        let e = ValidationError::with_rule("entries[0].routing_number", "bad checksum", "ACH-ROUTING");
        assert_eq!(
            e.to_string(),
            "[ACH-ROUTING] entries[0].routing_number: bad checksum"
        );
    }

    #[test]
    fn display_without_rule() {
        let e = ValidationError::new("id", "must not be empty");
        assert_eq!(e.to_string(), "id: must not be empty");
    }

    #[test]
    fn field_error_names_record_and_field() {
        let e = AchError::Field {
            record: "entry_detail",
            field: "amount",
            message: "too wide".into(),
        };
        assert_eq!(e.to_string(), "field error in entry_detail.amount: too wide");
    }
}
