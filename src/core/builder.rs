use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::{AchError, join_errors};
use super::types::*;
use super::validation;

/// Builder for constructing validated batches.
///
/// ```
/// use achfile::core::*;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let payday = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
/// let batch = BatchBuilder::new("batch-2024-06-14", payday)
///     .name("Regular Payroll")
///     .add_entry(EntryBuilder::credit("021000021", "000123456789", dec!(1500), payday)
///         .payee("EMP-001", "Jane Roe")
///         .build())
///     .build()
///     .unwrap();
///
/// assert_eq!(batch.total_amount, dec!(1500));
/// ```
pub struct BatchBuilder {
    id: String,
    name: String,
    scheduled_date: NaiveDate,
    status: BatchStatus,
    total_amount: Option<Decimal>,
    entries: Vec<Entry>,
}

impl BatchBuilder {
    pub fn new(id: impl Into<String>, scheduled_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            scheduled_date,
            status: BatchStatus::Pending,
            total_amount: None,
            entries: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn status(mut self, status: BatchStatus) -> Self {
        self.status = status;
        self
    }

    /// Declare the batch total. When omitted, the sum of entry amounts is used.
    pub fn total_amount(mut self, total: Decimal) -> Self {
        self.total_amount = Some(total);
        self
    }

    pub fn add_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(mut self, entries: impl IntoIterator<Item = Entry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Build the batch and run validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<Batch, AchError> {
        // Trace numbers carry a 7-digit sequence
        if self.entries.len() > 9_999_999 {
            return Err(AchError::Builder(
                "a batch cannot have more than 9,999,999 entries".into(),
            ));
        }

        let batch = self.assemble();

        let errors = validation::validate_batch(&batch);
        if !errors.is_empty() {
            return Err(AchError::Validation(join_errors(&errors)));
        }

        Ok(batch)
    }

    /// Build without validation, e.g. for data imported from elsewhere.
    pub fn build_unchecked(self) -> Batch {
        self.assemble()
    }

    fn assemble(self) -> Batch {
        // An overflowing sum saturates; validate_batch reports it
        let total_amount = self.total_amount.unwrap_or_else(|| {
            self.entries
                .iter()
                .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount))
                .unwrap_or(Decimal::MAX)
        });
        Batch {
            id: self.id,
            name: self.name,
            scheduled_date: self.scheduled_date,
            status: self.status,
            total_amount,
            entries: self.entries,
        }
    }
}

/// Builder for [`Entry`].
pub struct EntryBuilder {
    transaction_type: TransactionType,
    routing_number: String,
    account_number: String,
    amount: Decimal,
    payee_id: String,
    payee_name: String,
    description: String,
    effective_date: NaiveDate,
}

impl EntryBuilder {
    pub fn new(
        transaction_type: TransactionType,
        routing_number: impl Into<String>,
        account_number: impl Into<String>,
        amount: Decimal,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            transaction_type,
            routing_number: routing_number.into(),
            account_number: account_number.into(),
            amount,
            payee_id: String::new(),
            payee_name: String::new(),
            description: String::new(),
            effective_date,
        }
    }

    /// A deposit into the payee's account.
    pub fn credit(
        routing_number: impl Into<String>,
        account_number: impl Into<String>,
        amount: Decimal,
        effective_date: NaiveDate,
    ) -> Self {
        Self::new(
            TransactionType::Credit,
            routing_number,
            account_number,
            amount,
            effective_date,
        )
    }

    /// A withdrawal from the payee's account.
    pub fn debit(
        routing_number: impl Into<String>,
        account_number: impl Into<String>,
        amount: Decimal,
        effective_date: NaiveDate,
    ) -> Self {
        Self::new(
            TransactionType::Debit,
            routing_number,
            account_number,
            amount,
            effective_date,
        )
    }

    pub fn payee(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.payee_id = id.into();
        self.payee_name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn build(self) -> Entry {
        Entry {
            transaction_type: self.transaction_type,
            routing_number: self.routing_number,
            account_number: self.account_number,
            amount: self.amount,
            payee_id: self.payee_id,
            payee_name: self.payee_name,
            description: self.description,
            effective_date: self.effective_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    fn entry(amount: Decimal) -> Entry {
        EntryBuilder::credit("021000021", "123456789", amount, payday())
            .payee("E1", "Jane Roe")
            .build()
    }

    #[test]
    fn total_defaults_to_sum() {
        let batch = BatchBuilder::new("b", payday())
            .add_entry(entry(dec!(10.50)))
            .add_entry(entry(dec!(4.50)))
            .build()
            .unwrap();
        assert_eq!(batch.total_amount, dec!(15.00));
        assert_eq!(batch.status, BatchStatus::Pending);
    }

    #[test]
    fn declared_total_mismatch_fails() {
        let err = BatchBuilder::new("b", payday())
            .add_entry(entry(dec!(10)))
            .total_amount(dec!(11))
            .build()
            .unwrap_err();
        assert!(matches!(err, AchError::Validation(ref m) if m.contains("ACH-TOTAL")));
    }

    #[test]
    fn unchecked_skips_validation() {
        let batch = BatchBuilder::new("", payday())
            .add_entry(
                EntryBuilder::debit("123456789", "X", dec!(-1), payday()).build(),
            )
            .build_unchecked();
        assert_eq!(batch.entries.len(), 1);
        assert_eq!(batch.total_amount, dec!(-1));
    }

    #[test]
    fn debit_shorthand_sets_direction() {
        let e = EntryBuilder::debit("021000021", "1234", dec!(1), payday())
            .description("Advance repayment")
            .build();
        assert_eq!(e.transaction_type, TransactionType::Debit);
        assert_eq!(e.description, "Advance repayment");
    }

    #[test]
    fn overflowing_total_fails_validation() {
        let huge = Decimal::from_i128_with_scale(7 * 10i128.pow(26), 0);
        let result = BatchBuilder::new("b", payday())
            .entries(vec![entry(huge); 200])
            .build();
        assert!(matches!(result, Err(AchError::Validation(ref m)) if m.contains("sum of entries overflows")));

        let batch = BatchBuilder::new("b", payday())
            .entries(vec![entry(huge); 200])
            .build_unchecked();
        assert_eq!(batch.total_amount, Decimal::MAX);
    }
}
