use super::amount::Cents;
use super::error::ValidationError;
use super::routing::validate_routing_number;
use super::types::*;

/// Validate a receiving account number: 4 to 17 ASCII letters or digits.
///
/// ```
/// use achfile::core::validate_account_number;
///
/// assert!(validate_account_number("AB12"));
/// assert!(!validate_account_number("AB"));
/// assert!(!validate_account_number("123456789012345678"));
/// ```
pub fn validate_account_number(account: &str) -> bool {
    (4..=17).contains(&account.len()) && account.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Validate a single entry. `index` is used for the field path.
/// Returns all validation errors found (not just the first).
pub fn validate_entry(entry: &Entry, index: usize) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let prefix = format!("entries[{index}]");

    if !validate_routing_number(&entry.routing_number) {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.routing_number"),
            format!(
                "'{}' is not a valid 9-digit ABA routing number",
                entry.routing_number
            ),
            "ACH-ROUTING",
        ));
    }

    if !validate_account_number(&entry.account_number) {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.account_number"),
            "account number must be 4-17 letters or digits",
            "ACH-ACCOUNT",
        ));
    }

    if entry.amount.is_sign_negative() && !entry.amount.is_zero() {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.amount"),
            format!(
                "amount {} is negative; use the transaction type for direction",
                entry.amount
            ),
            "ACH-AMOUNT",
        ));
    } else if let Err(e) = Cents::from_decimal(entry.amount) {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.amount"),
            e.to_string(),
            "ACH-AMOUNT",
        ));
    }

    if entry.payee_name.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.payee_name"),
            "payee name must not be empty",
            "ACH-PAYEE",
        ));
    }

    errors
}

/// Validate a batch and every entry in it.
/// Returns all validation errors found (not just the first).
pub fn validate_batch(batch: &Batch) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if batch.id.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "id",
            "batch id must not be empty",
            "ACH-BATCH",
        ));
    }

    for (i, entry) in batch.entries.iter().enumerate() {
        errors.extend(validate_entry(entry, i));
    }

    match batch.entry_sum() {
        Some(expected) if batch.total_amount != expected => {
            errors.push(ValidationError::with_rule(
                "total_amount",
                format!(
                    "declared total {} does not match sum of entries {}",
                    batch.total_amount, expected
                ),
                "ACH-TOTAL",
            ));
        }
        Some(_) => {}
        None => errors.push(ValidationError::with_rule(
            "total_amount",
            "sum of entries overflows",
            "ACH-TOTAL",
        )),
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    fn test_entry() -> Entry {
        Entry {
            transaction_type: TransactionType::Credit,
            routing_number: "021000021".into(),
            account_number: "000123456789".into(),
            amount: dec!(1500.00),
            payee_id: "EMP-001".into(),
            payee_name: "Jane Roe".into(),
            description: "June payroll".into(),
            effective_date: test_date(),
        }
    }

    fn test_batch(entries: Vec<Entry>) -> Batch {
        let total = entries.iter().map(|e| e.amount).sum();
        Batch {
            id: "batch-1".into(),
            name: "Regular Payroll".into(),
            scheduled_date: test_date(),
            status: BatchStatus::Scheduled,
            total_amount: total,
            entries,
        }
    }

    #[test]
    fn account_number_bounds() {
        assert!(validate_account_number("AB12"));
        assert!(validate_account_number("12345678901234567"));
        assert!(!validate_account_number("AB"));
        assert!(!validate_account_number("123456789012345678"));
        assert!(!validate_account_number("1234-5678"));
        assert!(!validate_account_number("1234 5678"));
        assert!(!validate_account_number(""));
    }

    #[test]
    fn account_number_rejects_non_ascii() {
        assert!(!validate_account_number("12345é"));
    }

    #[test]
    fn valid_entry() {
        assert!(validate_entry(&test_entry(), 0).is_empty());
    }

    #[test]
    fn entry_collects_all_errors() {
        let mut e = test_entry();
        e.routing_number = "123456789".into();
        e.account_number = "X".into();
        e.amount = dec!(-5);
        e.payee_name = "  ".into();
        let errors = validate_entry(&e, 3);
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0].field, "entries[3].routing_number");
        assert_eq!(errors[0].rule.as_deref(), Some("ACH-ROUTING"));
        assert!(errors.iter().any(|e| e.field == "entries[3].account_number"));
        assert!(errors.iter().any(|e| e.field == "entries[3].amount"));
        assert!(errors.iter().any(|e| e.field == "entries[3].payee_name"));
    }

    #[test]
    fn sub_cent_amount_flagged() {
        let mut e = test_entry();
        e.amount = dec!(10.005);
        let errors = validate_entry(&e, 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule.as_deref(), Some("ACH-AMOUNT"));
    }

    #[test]
    fn valid_batch() {
        let batch = test_batch(vec![test_entry(), test_entry()]);
        assert!(validate_batch(&batch).is_empty());
    }

    #[test]
    fn empty_batch_is_valid() {
        let batch = test_batch(Vec::new());
        assert!(validate_batch(&batch).is_empty());
    }

    #[test]
    fn total_mismatch_detected() {
        let mut batch = test_batch(vec![test_entry()]);
        batch.total_amount = dec!(1.00);
        let errors = validate_batch(&batch);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "total_amount");
    }

    #[test]
    fn total_compares_numerically() {
        let mut batch = test_batch(vec![test_entry()]);
        batch.total_amount = dec!(1500);
        assert!(validate_batch(&batch).is_empty());
    }

    #[test]
    fn max_amount_is_reported_not_fatal() {
        let mut entry = test_entry();
        entry.amount = rust_decimal::Decimal::MAX;
        let errors = validate_entry(&entry, 0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule.as_deref(), Some("ACH-AMOUNT"));
    }

    #[test]
    fn overflowing_sum_is_reported() {
        let mut entry = test_entry();
        entry.amount = rust_decimal::Decimal::from_i128_with_scale(7 * 10i128.pow(26), 0);
        let mut batch = test_batch(vec![entry.clone()]);
        batch.entries = vec![entry; 200];
        let errors = validate_batch(&batch);
        assert_eq!(errors.len(), 201);
        let last = &errors[200];
        assert_eq!(last.field, "total_amount");
        assert_eq!(last.rule.as_deref(), Some("ACH-TOTAL"));
        assert!(last.message.contains("overflows"));
    }
}
