//! NACHA file generation.

use chrono::{NaiveDateTime, Timelike};
use log::debug;
use serde::{Deserialize, Serialize};

use super::layout::{BLOCKING_FACTOR, filler_record};
use super::records::*;
use crate::core::{
    AchError, Batch, Cents, CompanyInfo, TransactionType, ValidationError, generate_trace_number,
    join_errors,
};

/// Origination settings for NACHA export.
///
/// Everything the file header and batch header need beyond the batch
/// itself is passed in here; nothing is read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NachaConfig {
    /// Routing number of the bank receiving the file (9 digits).
    pub immediate_destination: String,
    /// Routing number (9 digits) or 10-character identifier of the sender.
    pub immediate_origin: String,
    /// Name of the receiving bank, max 23 chars.
    pub destination_name: String,
    /// Name of the sender, max 23 chars.
    pub origin_name: String,
    /// First 8 digits of the originating bank's routing number.
    pub originating_dfi: String,
    /// Distinguishes files created on the same day (A-Z, 0-9).
    pub file_id_modifier: char,
    /// Free-form reference code, max 8 chars.
    pub reference_code: String,
    /// Priority code, always 1 in practice.
    pub priority_code: u8,
    /// Service class code of the batch.
    pub service_class: ServiceClassCode,
    /// Standard Entry Class code.
    pub sec_code: String,
    /// Company entry description shown on statements, max 10 chars.
    pub entry_description: String,
    /// Batch number within the file.
    pub batch_number: u32,
}

impl Default for NachaConfig {
    fn default() -> Self {
        Self {
            immediate_destination: String::new(),
            immediate_origin: String::new(),
            destination_name: String::new(),
            origin_name: String::new(),
            originating_dfi: String::new(),
            file_id_modifier: 'A',
            reference_code: String::new(),
            priority_code: 1,
            service_class: ServiceClassCode::CreditsOnly,
            sec_code: "PPD".into(),
            entry_description: "PAYROLL".into(),
            batch_number: 1,
        }
    }
}

impl NachaConfig {
    /// Check the configuration. Returns all problems found.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !is_digits(&self.immediate_destination, 9) {
            errors.push(ValidationError::with_rule(
                "immediate_destination",
                "must be a 9-digit routing number",
                "ACH-CONFIG",
            ));
        }
        let origin_ok = is_digits(&self.immediate_origin, 9)
            || (self.immediate_origin.len() == 10
                && self.immediate_origin.bytes().all(|b| b.is_ascii_alphanumeric()));
        if !origin_ok {
            errors.push(ValidationError::with_rule(
                "immediate_origin",
                "must be a 9-digit routing number or a 10-character identifier",
                "ACH-CONFIG",
            ));
        }
        if !is_digits(&self.originating_dfi, 8) {
            errors.push(ValidationError::with_rule(
                "originating_dfi",
                "must be the first 8 digits of the originating routing number",
                "ACH-CONFIG",
            ));
        }
        if !self.file_id_modifier.is_ascii_uppercase() && !self.file_id_modifier.is_ascii_digit() {
            errors.push(ValidationError::with_rule(
                "file_id_modifier",
                "must be A-Z or 0-9",
                "ACH-CONFIG",
            ));
        }
        if self.priority_code > 99 {
            errors.push(ValidationError::with_rule(
                "priority_code",
                "must fit in 2 digits",
                "ACH-CONFIG",
            ));
        }
        if self.sec_code.len() != 3 || !self.sec_code.bytes().all(|b| b.is_ascii_uppercase()) {
            errors.push(ValidationError::with_rule(
                "sec_code",
                "must be a 3-letter Standard Entry Class code",
                "ACH-CONFIG",
            ));
        }
        if self.entry_description.trim().is_empty() {
            errors.push(ValidationError::with_rule(
                "entry_description",
                "must not be empty",
                "ACH-CONFIG",
            ));
        }
        if self.batch_number == 0 || self.batch_number > 9_999_999 {
            errors.push(ValidationError::with_rule(
                "batch_number",
                "must be between 1 and 9999999",
                "ACH-CONFIG",
            ));
        }

        errors
    }
}

/// Builder for [`NachaConfig`].
///
/// # Example
///
/// ```
/// use achfile::nacha::NachaConfigBuilder;
///
/// let config = NachaConfigBuilder::new("091000019", "091000019", "09100001")
///     .destination_name("WELLS FARGO")
///     .origin_name("ACME CORP")
///     .build();
/// assert!(config.validate().is_empty());
/// ```
pub struct NachaConfigBuilder {
    config: NachaConfig,
}

impl NachaConfigBuilder {
    /// Create a new builder with the required routing identifiers.
    pub fn new(
        immediate_destination: impl Into<String>,
        immediate_origin: impl Into<String>,
        originating_dfi: impl Into<String>,
    ) -> Self {
        Self {
            config: NachaConfig {
                immediate_destination: immediate_destination.into(),
                immediate_origin: immediate_origin.into(),
                originating_dfi: originating_dfi.into(),
                ..Default::default()
            },
        }
    }

    /// Set the receiving bank's name (max 23 chars).
    pub fn destination_name(mut self, name: impl Into<String>) -> Self {
        self.config.destination_name = name.into();
        self
    }

    /// Set the sender's name (max 23 chars).
    pub fn origin_name(mut self, name: impl Into<String>) -> Self {
        self.config.origin_name = name.into();
        self
    }

    /// Set the file ID modifier (A-Z, 0-9).
    pub fn file_id_modifier(mut self, modifier: char) -> Self {
        self.config.file_id_modifier = modifier;
        self
    }

    /// Set the reference code (max 8 chars).
    pub fn reference_code(mut self, code: impl Into<String>) -> Self {
        self.config.reference_code = code.into();
        self
    }

    pub fn priority_code(mut self, code: u8) -> Self {
        self.config.priority_code = code;
        self
    }

    pub fn service_class(mut self, class: ServiceClassCode) -> Self {
        self.config.service_class = class;
        self
    }

    pub fn sec_code(mut self, code: impl Into<String>) -> Self {
        self.config.sec_code = code.into();
        self
    }

    /// Set the company entry description (max 10 chars).
    pub fn entry_description(mut self, desc: impl Into<String>) -> Self {
        self.config.entry_description = desc.into();
        self
    }

    pub fn batch_number(mut self, number: u32) -> Self {
        self.config.batch_number = number;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> NachaConfig {
        self.config
    }
}

/// Generate a NACHA file for one batch, stamped with the local time.
///
/// See [`to_nacha_at`].
pub fn to_nacha(
    batch: &Batch,
    company: &CompanyInfo,
    config: &NachaConfig,
) -> Result<String, AchError> {
    to_nacha_at(batch, company, config, chrono::Local::now().naive_local())
}

/// Generate a NACHA file for one batch with a fixed creation timestamp.
///
/// Returns the records joined with CRLF, padded with filler records to a
/// multiple of ten lines. Entries are written in the order given.
/// Routing and account numbers are not checksum-validated here; run
/// [`crate::core::validate_batch`] first. A routing number that is not
/// nine digits, or an amount that is negative or has sub-cent precision,
/// is rejected.
pub fn to_nacha_at(
    batch: &Batch,
    company: &CompanyInfo,
    config: &NachaConfig,
    created: NaiveDateTime,
) -> Result<String, AchError> {
    let problems = config.validate();
    if !problems.is_empty() {
        return Err(AchError::Builder(format!(
            "invalid NACHA config: {}",
            join_errors(&problems)
        )));
    }
    if batch.entries.len() > 9_999_999 {
        return Err(AchError::Builder(
            "a batch cannot have more than 9,999,999 entries".into(),
        ));
    }

    let mut records = Vec::with_capacity(batch.entries.len() + BLOCKING_FACTOR);

    records.push(
        FileHeader {
            priority_code: config.priority_code,
            immediate_destination: config.immediate_destination.clone(),
            immediate_origin: config.immediate_origin.clone(),
            creation_date: created.date(),
            creation_time: created
                .time()
                .with_second(0)
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(created.time()),
            file_id_modifier: config.file_id_modifier,
            destination_name: config.destination_name.clone(),
            origin_name: config.origin_name.clone(),
            reference_code: config.reference_code.clone(),
        }
        .encode()?,
    );

    records.push(
        BatchHeader {
            service_class: config.service_class,
            company_name: company.name.clone(),
            company_discretionary_data: company.discretionary_data.clone().unwrap_or_default(),
            company_identification: company.identifier.clone(),
            sec_code: config.sec_code.clone(),
            entry_description: config.entry_description.clone(),
            descriptive_date: String::new(),
            effective_entry_date: batch.scheduled_date,
            originator_status_code: '1',
            originating_dfi: config.originating_dfi.clone(),
            batch_number: config.batch_number,
        }
        .encode()?,
    );

    let mut total_debit = Cents::ZERO;
    let mut total_credit = Cents::ZERO;
    let mut dfis = Vec::with_capacity(batch.entries.len());

    for (i, entry) in batch.entries.iter().enumerate() {
        let (receiving_dfi, check_digit) = split_routing(&entry.routing_number)?;
        let amount = Cents::from_decimal(entry.amount)?;
        let total = match entry.transaction_type {
            TransactionType::Debit => &mut total_debit,
            TransactionType::Credit => &mut total_credit,
        };
        *total = total
            .checked_add(amount)
            .ok_or_else(|| AchError::Amount("batch total overflows".into()))?;
        dfis.push(receiving_dfi);

        // Bounded by the entry count check above
        let sequence = (i + 1) as u32;
        records.push(
            EntryDetail {
                transaction_code: TransactionCode::for_type(entry.transaction_type),
                receiving_dfi: receiving_dfi.to_string(),
                check_digit,
                account_number: entry.account_number.clone(),
                amount,
                individual_id: entry.payee_id.clone(),
                individual_name: entry.payee_name.clone(),
                discretionary_data: String::new(),
                addenda_indicator: 0,
                trace_number: generate_trace_number(&config.originating_dfi, sequence),
            }
            .encode()?,
        );
    }

    let hash = entry_hash(dfis.iter().copied()).ok_or_else(|| AchError::Field {
        record: "batch_control",
        field: "entry_hash",
        message: "receiving DFIs are not numeric".into(),
    })?;
    let entry_count = batch.entries.len() as u32;

    records.push(
        BatchControl {
            service_class: config.service_class,
            entry_count,
            entry_hash: hash,
            total_debit,
            total_credit,
            company_identification: company.identifier.clone(),
            originating_dfi: config.originating_dfi.clone(),
            batch_number: config.batch_number,
        }
        .encode()?,
    );

    // File header, batch header, batch control, file control
    let block_count = (batch.entries.len() + 4).div_ceil(BLOCKING_FACTOR) as u32;
    records.push(
        FileControl {
            batch_count: 1,
            block_count,
            entry_count,
            entry_hash: hash,
            total_debit,
            total_credit,
        }
        .encode()?,
    );

    while records.len() % BLOCKING_FACTOR != 0 {
        records.push(filler_record());
    }

    debug!(
        "NACHA file for batch {}: {} entries, debit {}, credit {}, {} records",
        batch.id,
        entry_count,
        total_debit,
        total_credit,
        records.len()
    );

    Ok(records.join("\r\n"))
}

/// Split a 9-digit routing number into receiving DFI and check digit.
fn split_routing(routing: &str) -> Result<(&str, u8), AchError> {
    if !is_digits(routing, 9) {
        return Err(AchError::Field {
            record: "entry_detail",
            field: "receiving_dfi",
            message: format!("routing number '{routing}' is not 9 digits"),
        });
    }
    let check = routing.as_bytes()[8] - b'0';
    Ok((&routing[..8], check))
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}
