//! JSON export of a batch summary and its entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{AchError, Batch, BatchStatus, TransactionType};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchDocument<'a> {
    batch: BatchSummary<'a>,
    entries: Vec<EntryView<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchSummary<'a> {
    id: &'a str,
    name: &'a str,
    effective_date: NaiveDate,
    status: BatchStatus,
    total_amount: Decimal,
    entry_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryView<'a> {
    transaction_type: TransactionType,
    routing_number: &'a str,
    account_number: &'a str,
    amount: Decimal,
    employee_id: &'a str,
    employee_name: &'a str,
    description: &'a str,
    effective_date: NaiveDate,
}

/// Export a batch as pretty-printed JSON (2-space indent).
///
/// Amounts are written as decimal strings so that no precision is lost.
pub fn to_json(batch: &Batch) -> Result<String, AchError> {
    let doc = BatchDocument {
        batch: BatchSummary {
            id: &batch.id,
            name: &batch.name,
            effective_date: batch.scheduled_date,
            status: batch.status,
            total_amount: batch.total_amount,
            entry_count: batch.entries.len(),
        },
        entries: batch
            .entries
            .iter()
            .map(|e| EntryView {
                transaction_type: e.transaction_type,
                routing_number: &e.routing_number,
                account_number: &e.account_number,
                amount: e.amount,
                employee_id: &e.payee_id,
                employee_name: &e.payee_name,
                description: &e.description,
                effective_date: e.effective_date,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&doc).map_err(|e| AchError::Export(e.to_string()))
}
