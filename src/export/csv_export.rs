//! CSV export of entries.
//!
//! One header row, then one row per entry with every field quoted.
//! Rows are separated by `\n` without a trailing newline.

use crate::core::{AchError, Entry};

/// Header row of [`to_csv`].
pub const CSV_HEADER: &str = "Transaction Type,Routing Number,Account Number,Amount,Employee ID,Employee Name,Description,Effective Date";

/// Export entries as CSV.
///
/// Values are written as stored: the amount keeps its decimal scale and the
/// effective date is `YYYY-MM-DD`. Embedded double quotes are doubled.
///
/// The output has `entries + 1` lines only when no field contains a line
/// break. A quoted field may carry `\n`, so count records with a CSV
/// reader rather than by splitting lines.
pub fn to_csv(entries: &[Entry]) -> Result<String, AchError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for entry in entries {
        let amount = entry.amount.to_string();
        let date = entry.effective_date.format("%Y-%m-%d").to_string();
        writer
            .write_record([
                entry.transaction_type.as_str(),
                entry.routing_number.as_str(),
                entry.account_number.as_str(),
                amount.as_str(),
                entry.payee_id.as_str(),
                entry.payee_name.as_str(),
                entry.description.as_str(),
                date.as_str(),
            ])
            .map_err(|e| AchError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AchError::Export(e.to_string()))?;
    let rows = String::from_utf8(bytes).map_err(|e| AchError::Export(e.to_string()))?;

    let mut out = String::with_capacity(CSV_HEADER.len() + rows.len() + 1);
    out.push_str(CSV_HEADER);
    if !rows.is_empty() {
        out.push('\n');
        out.push_str(rows.strip_suffix('\n').unwrap_or(&rows));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntryBuilder;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn payday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    #[test]
    fn header_only_for_no_entries() {
        assert_eq!(to_csv(&[]).unwrap(), CSV_HEADER);
    }

    #[test]
    fn row_is_fully_quoted() {
        let entry = EntryBuilder::credit("021000021", "000123456789", dec!(1500.00), payday())
            .payee("EMP-001", "Jane Roe")
            .description("June payroll")
            .build();
        let csv = to_csv(&[entry]).unwrap();
        let rows: Vec<_> = csv.split('\n').collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            r#""credit","021000021","000123456789","1500.00","EMP-001","Jane Roe","June payroll","2024-06-14""#
        );
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let entry = EntryBuilder::debit("021000021", "1234", dec!(5), payday())
            .payee("E2", "Robert \"Bob\" Smith")
            .description("a, b")
            .build();
        let csv = to_csv(&[entry]).unwrap();
        assert!(csv.contains(r#""Robert ""Bob"" Smith","a, b""#));
    }

    #[test]
    fn line_break_stays_inside_quoted_field() {
        let entry = EntryBuilder::credit("021000021", "1234", dec!(5), payday())
            .payee("E3", "Pat")
            .description("first\nsecond")
            .build();
        let out = to_csv(&[entry]).unwrap();
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("\"first\nsecond\""));

        let mut reader = csv::ReaderBuilder::new().from_reader(out.as_bytes());
        assert_eq!(reader.records().count(), 1);
    }
}
