use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One disbursement run (a payroll cycle, a bonus run, a refund batch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Upstream batch identifier.
    pub id: String,
    /// Disbursement type or display name (e.g. "Regular Payroll").
    pub name: String,
    /// Scheduled settlement date; becomes the effective entry date.
    pub scheduled_date: NaiveDate,
    /// Processing status as reported by the scheduler.
    pub status: BatchStatus,
    /// Declared batch total in currency units.
    pub total_amount: Decimal,
    /// Payment instructions in file order.
    pub entries: Vec<Entry>,
}

/// Lifecycle status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Created, not yet scheduled.
    #[default]
    Pending,
    /// Scheduled for a future settlement date.
    Scheduled,
    /// File generated and handed to the bank.
    Processing,
    /// Settled.
    Completed,
    /// Rejected by the bank or by validation.
    Failed,
    /// Withdrawn before processing.
    Cancelled,
}

impl BatchStatus {
    /// Lowercase status name, as used in JSON exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// One payment instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Debit pulls money from the payee, credit pays the payee.
    pub transaction_type: TransactionType,
    /// 9-digit ABA routing number of the receiving bank.
    pub routing_number: String,
    /// Receiving account number, 4–17 alphanumeric characters.
    pub account_number: String,
    /// Amount in currency units, never negative.
    pub amount: Decimal,
    /// Payee (employee) identifier.
    pub payee_id: String,
    /// Payee (employee) name.
    pub payee_name: String,
    /// Free-text description.
    pub description: String,
    /// Requested effective date.
    pub effective_date: NaiveDate,
}

/// Direction of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    /// Lowercase name, as used in CSV and JSON exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Parse from the lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }
}

/// Originator metadata used in the batch header and batch control records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Company name as it should appear on statements (16 chars in NACHA).
    pub name: String,
    /// Company identification, usually "1" followed by the EIN (10 chars).
    pub identifier: String,
    /// Company discretionary data (20 chars), optional.
    pub discretionary_data: Option<String>,
}

impl CompanyInfo {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            discretionary_data: None,
        }
    }

    pub fn discretionary_data(mut self, data: impl Into<String>) -> Self {
        self.discretionary_data = Some(data.into());
        self
    }
}

impl Batch {
    /// Entries with the given direction, in file order.
    pub fn entries_of(&self, kind: TransactionType) -> impl Iterator<Item = &Entry> {
        self.entries
            .iter()
            .filter(move |e| e.transaction_type == kind)
    }

    /// Sum of entry amounts, regardless of direction. `None` if the sum
    /// does not fit a `Decimal`.
    pub fn entry_sum(&self) -> Option<Decimal> {
        self.entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(kind: TransactionType, amount: Decimal) -> Entry {
        Entry {
            transaction_type: kind,
            routing_number: "021000021".into(),
            account_number: "12345678".into(),
            amount,
            payee_id: "E1".into(),
            payee_name: "Jane Roe".into(),
            description: String::new(),
            effective_date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
        }
    }

    #[test]
    fn entries_of_filters_by_direction() {
        let batch = Batch {
            id: "b1".into(),
            name: "Payroll".into(),
            scheduled_date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            status: BatchStatus::Scheduled,
            total_amount: dec!(150),
            entries: vec![
                entry(TransactionType::Debit, dec!(100)),
                entry(TransactionType::Credit, dec!(50)),
            ],
        };
        assert_eq!(batch.entries_of(TransactionType::Debit).count(), 1);
        assert_eq!(batch.entries_of(TransactionType::Credit).count(), 1);
        assert_eq!(batch.entry_sum(), Some(dec!(150)));
    }

    #[test]
    fn transaction_type_names() {
        assert_eq!(TransactionType::Debit.as_str(), "debit");
        assert_eq!(TransactionType::from_name("credit"), Some(TransactionType::Credit));
        assert_eq!(TransactionType::from_name("Credit"), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&BatchStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        assert_eq!(BatchStatus::default().as_str(), "pending");
    }
}
