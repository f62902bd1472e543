//! Typed NACHA records.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::layout::*;
use crate::core::{AchError, Cents, TransactionType};

/// NACHA service class code of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ServiceClassCode {
    /// 200: debits and credits.
    Mixed,
    /// 220: credits only.
    #[default]
    CreditsOnly,
    /// 225: debits only.
    DebitsOnly,
}

impl ServiceClassCode {
    pub fn code(&self) -> u16 {
        match self {
            Self::Mixed => 200,
            Self::CreditsOnly => 220,
            Self::DebitsOnly => 225,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(Self::Mixed),
            220 => Some(Self::CreditsOnly),
            225 => Some(Self::DebitsOnly),
            _ => None,
        }
    }
}

/// Entry detail transaction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionCode {
    /// 22: deposit to checking.
    CheckingCredit,
    /// 23: prenote for a checking credit.
    CheckingCreditPrenote,
    /// 27: withdrawal from checking.
    CheckingDebit,
    /// 28: prenote for a checking debit.
    CheckingDebitPrenote,
    /// 32: deposit to savings.
    SavingsCredit,
    /// 33: prenote for a savings credit.
    SavingsCreditPrenote,
    /// 37: withdrawal from savings.
    SavingsDebit,
    /// 38: prenote for a savings debit.
    SavingsDebitPrenote,
}

impl TransactionCode {
    /// Checking-account code for an entry direction: credit 22, debit 27.
    pub fn for_type(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Credit => Self::CheckingCredit,
            TransactionType::Debit => Self::CheckingDebit,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::CheckingCredit => 22,
            Self::CheckingCreditPrenote => 23,
            Self::CheckingDebit => 27,
            Self::CheckingDebitPrenote => 28,
            Self::SavingsCredit => 32,
            Self::SavingsCreditPrenote => 33,
            Self::SavingsDebit => 37,
            Self::SavingsDebitPrenote => 38,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            22 => Some(Self::CheckingCredit),
            23 => Some(Self::CheckingCreditPrenote),
            27 => Some(Self::CheckingDebit),
            28 => Some(Self::CheckingDebitPrenote),
            32 => Some(Self::SavingsCredit),
            33 => Some(Self::SavingsCreditPrenote),
            37 => Some(Self::SavingsDebit),
            38 => Some(Self::SavingsDebitPrenote),
            _ => None,
        }
    }

    /// Direction of the money movement.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::CheckingDebit
            | Self::CheckingDebitPrenote
            | Self::SavingsDebit
            | Self::SavingsDebitPrenote => TransactionType::Debit,
            _ => TransactionType::Credit,
        }
    }
}

/// File header record (type 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub priority_code: u8,
    /// Routing number of the receiving point (9 digits).
    pub immediate_destination: String,
    /// Routing number or 10-character identifier of the sender.
    pub immediate_origin: String,
    pub creation_date: NaiveDate,
    /// Creation time, minute precision.
    pub creation_time: NaiveTime,
    pub file_id_modifier: char,
    pub destination_name: String,
    pub origin_name: String,
    pub reference_code: String,
}

impl FileHeader {
    pub fn encode(&self) -> Result<String, AchError> {
        let mut w = RecordWriter::new(&FILE_HEADER);
        w.number("priority_code", u64::from(self.priority_code))?
            .text("immediate_destination", &routing_field(&self.immediate_destination))?
            .text("immediate_origin", &routing_field(&self.immediate_origin))?
            .digits("creation_date", &self.creation_date.format("%y%m%d").to_string())?
            .digits("creation_time", &self.creation_time.format("%H%M").to_string())?
            .text("file_id_modifier", &self.file_id_modifier.to_string())?
            .digits("record_size", "094")?
            .number("blocking_factor", BLOCKING_FACTOR as u64)?
            .digits("format_code", "1")?
            .text("destination_name", &self.destination_name)?
            .text("origin_name", &self.origin_name)?
            .text("reference_code", &self.reference_code)?;
        w.finish()
    }

    pub fn decode(line: &str, line_no: usize) -> Result<Self, AchError> {
        let r = RecordReader::new(&FILE_HEADER, line, line_no)?;
        if r.raw("record_size")? != "094" {
            return Err(r.error(format!("unsupported record size '{}'", r.raw("record_size")?)));
        }
        if r.number("blocking_factor")? != BLOCKING_FACTOR as u64 {
            return Err(r.error(format!(
                "unsupported blocking factor '{}'",
                r.raw("blocking_factor")?
            )));
        }
        Ok(Self {
            priority_code: small_number(&r, "priority_code")?,
            immediate_destination: r.text("immediate_destination")?.to_string(),
            immediate_origin: r.text("immediate_origin")?.to_string(),
            creation_date: date_field(&r, "creation_date")?,
            creation_time: NaiveTime::parse_from_str(r.raw("creation_time")?, "%H%M")
                .map_err(|e| r.error(format!("creation_time: {e}")))?,
            file_id_modifier: r.raw("file_id_modifier")?.chars().next().unwrap_or(' '),
            destination_name: r.text("destination_name")?.to_string(),
            origin_name: r.text("origin_name")?.to_string(),
            reference_code: r.text("reference_code")?.to_string(),
        })
    }
}

/// Batch header record (type 5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchHeader {
    pub service_class: ServiceClassCode,
    pub company_name: String,
    pub company_discretionary_data: String,
    pub company_identification: String,
    /// Standard Entry Class code, e.g. "PPD".
    pub sec_code: String,
    pub entry_description: String,
    pub descriptive_date: String,
    pub effective_entry_date: NaiveDate,
    pub originator_status_code: char,
    /// First 8 digits of the originating bank's routing number.
    pub originating_dfi: String,
    pub batch_number: u32,
}

impl BatchHeader {
    pub fn encode(&self) -> Result<String, AchError> {
        let mut w = RecordWriter::new(&BATCH_HEADER);
        w.number("service_class_code", u64::from(self.service_class.code()))?
            .text("company_name", &self.company_name)?
            .text("company_discretionary_data", &self.company_discretionary_data)?
            .text("company_identification", &self.company_identification)?
            .text("sec_code", &self.sec_code)?
            .text("entry_description", &self.entry_description)?
            .text("descriptive_date", &self.descriptive_date)?
            .digits(
                "effective_entry_date",
                &self.effective_entry_date.format("%y%m%d").to_string(),
            )?
            .text(
                "originator_status_code",
                &self.originator_status_code.to_string(),
            )?
            .digits("originating_dfi", &self.originating_dfi)?
            .number("batch_number", u64::from(self.batch_number))?;
        w.finish()
    }

    pub fn decode(line: &str, line_no: usize) -> Result<Self, AchError> {
        let r = RecordReader::new(&BATCH_HEADER, line, line_no)?;
        Ok(Self {
            service_class: service_class_field(&r)?,
            company_name: r.text("company_name")?.to_string(),
            company_discretionary_data: r.text("company_discretionary_data")?.to_string(),
            company_identification: r.text("company_identification")?.to_string(),
            sec_code: r.text("sec_code")?.to_string(),
            entry_description: r.text("entry_description")?.to_string(),
            descriptive_date: r.text("descriptive_date")?.to_string(),
            effective_entry_date: date_field(&r, "effective_entry_date")?,
            originator_status_code: r
                .raw("originator_status_code")?
                .chars()
                .next()
                .unwrap_or(' '),
            originating_dfi: r.raw("originating_dfi")?.to_string(),
            batch_number: small_number(&r, "batch_number")?,
        })
    }
}

/// Entry detail record (type 6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetail {
    pub transaction_code: TransactionCode,
    /// First 8 digits of the receiving bank's routing number.
    pub receiving_dfi: String,
    /// 9th digit of the receiving bank's routing number.
    pub check_digit: u8,
    pub account_number: String,
    pub amount: Cents,
    pub individual_id: String,
    pub individual_name: String,
    pub discretionary_data: String,
    pub addenda_indicator: u8,
    pub trace_number: String,
}

impl EntryDetail {
    pub fn encode(&self) -> Result<String, AchError> {
        let mut w = RecordWriter::new(&ENTRY_DETAIL);
        w.number("transaction_code", u64::from(self.transaction_code.code()))?
            .digits("receiving_dfi", &self.receiving_dfi)?
            .number("check_digit", u64::from(self.check_digit))?
            .text("account_number", &self.account_number)?
            .number("amount", self.amount.get())?
            .text("individual_id", &self.individual_id)?
            .text("individual_name", &self.individual_name)?
            .text("discretionary_data", &self.discretionary_data)?
            .number("addenda_indicator", u64::from(self.addenda_indicator))?
            .digits("trace_number", &self.trace_number)?;
        w.finish()
    }

    pub fn decode(line: &str, line_no: usize) -> Result<Self, AchError> {
        let r = RecordReader::new(&ENTRY_DETAIL, line, line_no)?;
        let code: u8 = small_number(&r, "transaction_code")?;
        let transaction_code = TransactionCode::from_code(code)
            .ok_or_else(|| r.error(format!("unsupported transaction code {code:02}")))?;
        let addenda_indicator: u8 = small_number(&r, "addenda_indicator")?;
        if addenda_indicator != 0 {
            return Err(r.error("addenda records are not supported"));
        }
        Ok(Self {
            transaction_code,
            receiving_dfi: digits_field(&r, "receiving_dfi")?,
            check_digit: small_number(&r, "check_digit")?,
            account_number: r.text("account_number")?.to_string(),
            amount: Cents::new(r.number("amount")?),
            individual_id: r.text("individual_id")?.to_string(),
            individual_name: r.text("individual_name")?.to_string(),
            discretionary_data: r.text("discretionary_data")?.to_string(),
            addenda_indicator,
            trace_number: digits_field(&r, "trace_number")?,
        })
    }

    /// Full 9-digit routing number.
    pub fn routing_number(&self) -> String {
        format!("{}{}", self.receiving_dfi, self.check_digit)
    }
}

/// Batch control record (type 8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchControl {
    pub service_class: ServiceClassCode,
    pub entry_count: u32,
    pub entry_hash: u64,
    pub total_debit: Cents,
    pub total_credit: Cents,
    pub company_identification: String,
    pub originating_dfi: String,
    pub batch_number: u32,
}

impl BatchControl {
    pub fn encode(&self) -> Result<String, AchError> {
        let mut w = RecordWriter::new(&BATCH_CONTROL);
        w.number("service_class_code", u64::from(self.service_class.code()))?
            .number("entry_count", u64::from(self.entry_count))?
            .number("entry_hash", self.entry_hash)?
            .number("total_debit", self.total_debit.get())?
            .number("total_credit", self.total_credit.get())?
            .text("company_identification", &self.company_identification)?
            .digits("originating_dfi", &self.originating_dfi)?
            .number("batch_number", u64::from(self.batch_number))?;
        w.finish()
    }

    pub fn decode(line: &str, line_no: usize) -> Result<Self, AchError> {
        let r = RecordReader::new(&BATCH_CONTROL, line, line_no)?;
        Ok(Self {
            service_class: service_class_field(&r)?,
            entry_count: small_number(&r, "entry_count")?,
            entry_hash: r.number("entry_hash")?,
            total_debit: Cents::new(r.number("total_debit")?),
            total_credit: Cents::new(r.number("total_credit")?),
            company_identification: r.text("company_identification")?.to_string(),
            originating_dfi: digits_field(&r, "originating_dfi")?,
            batch_number: small_number(&r, "batch_number")?,
        })
    }
}

/// File control record (type 9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileControl {
    pub batch_count: u32,
    pub block_count: u32,
    pub entry_count: u32,
    pub entry_hash: u64,
    pub total_debit: Cents,
    pub total_credit: Cents,
}

impl FileControl {
    pub fn encode(&self) -> Result<String, AchError> {
        let mut w = RecordWriter::new(&FILE_CONTROL);
        w.number("batch_count", u64::from(self.batch_count))?
            .number("block_count", u64::from(self.block_count))?
            .number("entry_count", u64::from(self.entry_count))?
            .number("entry_hash", self.entry_hash)?
            .number("total_debit", self.total_debit.get())?
            .number("total_credit", self.total_credit.get())?;
        w.finish()
    }

    pub fn decode(line: &str, line_no: usize) -> Result<Self, AchError> {
        let r = RecordReader::new(&FILE_CONTROL, line, line_no)?;
        Ok(Self {
            batch_count: small_number(&r, "batch_count")?,
            block_count: small_number(&r, "block_count")?,
            entry_count: small_number(&r, "entry_count")?,
            entry_hash: r.number("entry_hash")?,
            total_debit: Cents::new(r.number("total_debit")?),
            total_credit: Cents::new(r.number("total_credit")?),
        })
    }
}

/// Entry hash: the sum of the 8-digit receiving DFI numbers, keeping the
/// rightmost 10 digits.
///
/// Returns `None` if a DFI is not 1 to 8 ASCII digits.
pub fn entry_hash<'a>(receiving_dfis: impl IntoIterator<Item = &'a str>) -> Option<u64> {
    let mut sum: u64 = 0;
    for dfi in receiving_dfis {
        if dfi.is_empty() || dfi.len() > 8 || !dfi.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // At most 99_999_999 per step, reduced each time, so no overflow
        sum = (sum + dfi.parse::<u64>().ok()?) % 10_000_000_000;
    }
    Some(sum)
}

/// Routing numbers sit right-justified in a 10-character field, behind a blank.
fn routing_field(value: &str) -> String {
    if value.len() == 9 {
        format!(" {value}")
    } else {
        value.to_string()
    }
}

fn date_field(r: &RecordReader<'_>, name: &str) -> Result<NaiveDate, AchError> {
    let raw = r.raw(name)?;
    NaiveDate::parse_from_str(raw, "%y%m%d").map_err(|e| r.error(format!("{name} '{raw}': {e}")))
}

fn digits_field(r: &RecordReader<'_>, name: &str) -> Result<String, AchError> {
    let raw = r.raw(name)?;
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(r.error(format!("{name} '{raw}' is not numeric")));
    }
    Ok(raw.to_string())
}

fn small_number<T: TryFrom<u64>>(r: &RecordReader<'_>, name: &str) -> Result<T, AchError> {
    let n = r.number(name)?;
    T::try_from(n).map_err(|_| r.error(format!("{name} {n} is out of range")))
}

fn service_class_field(r: &RecordReader<'_>) -> Result<ServiceClassCode, AchError> {
    let code: u16 = small_number(r, "service_class_code")?;
    ServiceClassCode::from_code(code)
        .ok_or_else(|| r.error(format!("unsupported service class code {code}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> EntryDetail {
        EntryDetail {
            transaction_code: TransactionCode::CheckingCredit,
            receiving_dfi: "02100002".into(),
            check_digit: 1,
            account_number: "000123456789".into(),
            amount: Cents::new(150000),
            individual_id: "EMP-001".into(),
            individual_name: "Jane Roe".into(),
            discretionary_data: String::new(),
            addenda_indicator: 0,
            trace_number: "091000010000001".into(),
        }
    }

    #[test]
    fn entry_detail_columns() {
        let rec = sample_entry().encode().unwrap();
        assert_eq!(rec.len(), RECORD_LEN);
        assert_eq!(&rec[0..1], "6");
        assert_eq!(&rec[1..3], "22");
        assert_eq!(&rec[3..11], "02100002");
        assert_eq!(&rec[11..12], "1");
        assert_eq!(&rec[12..29], "000123456789     ");
        assert_eq!(&rec[29..39], "0000150000");
        assert_eq!(&rec[39..54], "EMP-001        ");
        assert_eq!(&rec[54..76], "Jane Roe              ");
        assert_eq!(&rec[76..78], "  ");
        assert_eq!(&rec[78..79], "0");
        assert_eq!(&rec[79..94], "091000010000001");
    }

    #[test]
    fn entry_detail_decodes() {
        let original = sample_entry();
        let decoded = EntryDetail::decode(&original.encode().unwrap(), 3).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.routing_number(), "021000021");
    }

    #[test]
    fn addenda_rejected_on_read() {
        let mut rec = sample_entry().encode().unwrap();
        rec.replace_range(78..79, "1");
        assert!(matches!(
            EntryDetail::decode(&rec, 4),
            Err(AchError::Parse { line: 4, .. })
        ));
    }

    #[test]
    fn unknown_transaction_code_rejected() {
        let mut rec = sample_entry().encode().unwrap();
        rec.replace_range(1..3, "99");
        assert!(EntryDetail::decode(&rec, 1).is_err());
    }

    #[test]
    fn batch_header_columns() {
        let header = BatchHeader {
            service_class: ServiceClassCode::CreditsOnly,
            company_name: "Acme Payroll Services Inc".into(),
            company_discretionary_data: String::new(),
            company_identification: "1234567890".into(),
            sec_code: "PPD".into(),
            entry_description: "PAYROLL".into(),
            descriptive_date: String::new(),
            effective_entry_date: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
            originator_status_code: '1',
            originating_dfi: "09100001".into(),
            batch_number: 1,
        };
        let rec = header.encode().unwrap();
        assert_eq!(rec.len(), RECORD_LEN);
        assert_eq!(&rec[0..4], "5220");
        assert_eq!(&rec[4..20], "Acme Payroll Ser");
        assert_eq!(&rec[40..50], "1234567890");
        assert_eq!(&rec[50..53], "PPD");
        assert_eq!(&rec[53..63], "PAYROLL   ");
        assert_eq!(&rec[69..75], "240614");
        assert_eq!(&rec[78..79], "1");
        assert_eq!(&rec[79..87], "09100001");
        assert_eq!(&rec[87..94], "0000001");

        let decoded = BatchHeader::decode(&rec, 2).unwrap();
        assert_eq!(decoded.company_name, "Acme Payroll Ser");
        assert_eq!(decoded.effective_entry_date, header.effective_entry_date);
    }

    #[test]
    fn file_header_columns() {
        let header = FileHeader {
            priority_code: 1,
            immediate_destination: "091000019".into(),
            immediate_origin: "1234567890".into(),
            creation_date: NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            creation_time: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            file_id_modifier: 'A',
            destination_name: "WELLS FARGO".into(),
            origin_name: "ACME CORP".into(),
            reference_code: String::new(),
        };
        let rec = header.encode().unwrap();
        assert_eq!(rec.len(), RECORD_LEN);
        assert_eq!(&rec[0..3], "101");
        assert_eq!(&rec[3..13], " 091000019");
        assert_eq!(&rec[13..23], "1234567890");
        assert_eq!(&rec[23..33], "2406120905");
        assert_eq!(&rec[33..40], "A094101");
        assert_eq!(&rec[40..63], "WELLS FARGO            ");

        let decoded = FileHeader::decode(&rec, 1).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn entry_hash_keeps_rightmost_ten_digits() {
        assert_eq!(entry_hash(["02100002", "09100001"]), Some(11200003));
        let many = vec!["99999999"; 200];
        // 200 * 99_999_999 = 19_999_999_800 -> 9_999_999_800
        assert_eq!(entry_hash(many), Some(9_999_999_800));
        assert_eq!(entry_hash(Vec::<&str>::new()), Some(0));
    }

    #[test]
    fn entry_hash_rejects_non_digits() {
        assert_eq!(entry_hash(["02100002", "0210A002"]), None);
        assert_eq!(entry_hash(["021000021"]), None);
        assert_eq!(entry_hash([""]), None);
    }

    #[test]
    fn transaction_code_directions() {
        assert_eq!(TransactionCode::for_type(TransactionType::Credit).code(), 22);
        assert_eq!(TransactionCode::for_type(TransactionType::Debit).code(), 27);
        assert_eq!(
            TransactionCode::from_code(37).unwrap().transaction_type(),
            TransactionType::Debit
        );
        assert_eq!(
            TransactionCode::from_code(33).unwrap().transaction_type(),
            TransactionType::Credit
        );
        assert_eq!(TransactionCode::from_code(21), None);
    }
}
