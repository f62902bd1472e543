//! Reading NACHA files back into typed records.

use log::debug;

use super::layout::{BLOCKING_FACTOR, is_filler};
use super::records::*;
use crate::core::{AchError, Cents, TransactionType, ValidationError};

/// One batch of a parsed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NachaBatch {
    pub header: BatchHeader,
    pub entries: Vec<EntryDetail>,
    pub control: BatchControl,
}

/// A parsed NACHA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NachaFile {
    pub header: FileHeader,
    pub batches: Vec<NachaBatch>,
    pub control: FileControl,
    /// Number of block-filling records after the file control.
    pub filler_count: usize,
}

/// Parse a NACHA file.
///
/// Accepts CRLF or LF line endings. The structure must be one file header,
/// any number of batches (header, entries, control), one file control, and
/// then only filler records. Field contents are decoded but control totals
/// are not checked; call [`NachaFile::verify`] for that.
pub fn parse_nacha(input: &str) -> Result<NachaFile, AchError> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line));

    let (line_no, line) = lines.next().ok_or_else(|| AchError::Parse {
        line: 1,
        message: "file is empty".into(),
    })?;
    let header = FileHeader::decode(line, line_no)?;

    let mut batches = Vec::new();
    let control = loop {
        let Some((line_no, line)) = lines.next() else {
            return Err(AchError::Parse {
                line: last_line(input) + 1,
                message: "missing file control record".into(),
            });
        };
        match line.as_bytes().first() {
            Some(b'5') => {
                let batch_header = BatchHeader::decode(line, line_no)?;
                let mut entries = Vec::new();
                let batch_control = loop {
                    let Some((line_no, line)) = lines.next() else {
                        return Err(AchError::Parse {
                            line: last_line(input) + 1,
                            message: format!(
                                "batch {} has no batch control record",
                                batch_header.batch_number
                            ),
                        });
                    };
                    match line.as_bytes().first() {
                        Some(b'6') => entries.push(EntryDetail::decode(line, line_no)?),
                        Some(b'7') => {
                            return Err(AchError::Parse {
                                line: line_no,
                                message: "addenda records are not supported".into(),
                            });
                        }
                        Some(b'8') => break BatchControl::decode(line, line_no)?,
                        _ => {
                            return Err(AchError::Parse {
                                line: line_no,
                                message: "expected entry detail or batch control record".into(),
                            });
                        }
                    }
                };
                batches.push(NachaBatch {
                    header: batch_header,
                    entries,
                    control: batch_control,
                });
            }
            Some(b'9') => break FileControl::decode(line, line_no)?,
            _ => {
                return Err(AchError::Parse {
                    line: line_no,
                    message: "expected batch header or file control record".into(),
                });
            }
        }
    };

    let mut filler_count = 0;
    for (line_no, line) in lines {
        if !is_filler(line) {
            return Err(AchError::Parse {
                line: line_no,
                message: "only filler records may follow the file control record".into(),
            });
        }
        filler_count += 1;
    }

    debug!(
        "parsed NACHA file: {} batches, {} entries, {} filler records",
        batches.len(),
        batches.iter().map(|b| b.entries.len()).sum::<usize>(),
        filler_count
    );

    Ok(NachaFile {
        header,
        batches,
        control,
        filler_count,
    })
}

fn last_line(input: &str) -> usize {
    input.lines().count()
}

impl NachaFile {
    /// All entry records across batches, in file order.
    pub fn entries(&self) -> impl Iterator<Item = &EntryDetail> {
        self.batches.iter().flat_map(|b| b.entries.iter())
    }

    /// Number of records including fillers.
    pub fn record_count(&self) -> usize {
        self.record_count_without_filler() + self.filler_count
    }

    fn record_count_without_filler(&self) -> usize {
        2 + self
            .batches
            .iter()
            .map(|b| 2 + b.entries.len())
            .sum::<usize>()
    }

    /// Recompute counts, hashes, and totals and compare them with the
    /// control records. Returns all mismatches found.
    pub fn verify(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (i, batch) in self.batches.iter().enumerate() {
            let prefix = format!("batches[{i}]");
            let totals = Totals::of(&batch.entries);
            let control = &batch.control;

            if control.entry_count as usize != batch.entries.len() {
                errors.push(mismatch(
                    format!("{prefix}.control.entry_count"),
                    control.entry_count,
                    batch.entries.len(),
                    "ACH-COUNT",
                ));
            }
            if Some(control.entry_hash) != totals.hash {
                errors.push(mismatch(
                    format!("{prefix}.control.entry_hash"),
                    control.entry_hash,
                    totals.hash_text(),
                    "ACH-HASH",
                ));
            }
            if control.total_debit != totals.debit {
                errors.push(mismatch(
                    format!("{prefix}.control.total_debit"),
                    control.total_debit,
                    totals.debit,
                    "ACH-TOTAL",
                ));
            }
            if control.total_credit != totals.credit {
                errors.push(mismatch(
                    format!("{prefix}.control.total_credit"),
                    control.total_credit,
                    totals.credit,
                    "ACH-TOTAL",
                ));
            }
            if control.service_class != batch.header.service_class {
                errors.push(ValidationError::with_rule(
                    format!("{prefix}.control.service_class"),
                    "does not match the batch header",
                    "ACH-BATCH",
                ));
            }
            if control.batch_number != batch.header.batch_number {
                errors.push(ValidationError::with_rule(
                    format!("{prefix}.control.batch_number"),
                    "does not match the batch header",
                    "ACH-BATCH",
                ));
            }
            if control.originating_dfi != batch.header.originating_dfi {
                errors.push(ValidationError::with_rule(
                    format!("{prefix}.control.originating_dfi"),
                    "does not match the batch header",
                    "ACH-BATCH",
                ));
            }
        }

        let all: Vec<EntryDetail> = self.entries().cloned().collect();
        let totals = Totals::of(&all);
        let control = &self.control;

        if control.batch_count as usize != self.batches.len() {
            errors.push(mismatch(
                "control.batch_count",
                control.batch_count,
                self.batches.len(),
                "ACH-COUNT",
            ));
        }
        if control.entry_count as usize != all.len() {
            errors.push(mismatch(
                "control.entry_count",
                control.entry_count,
                all.len(),
                "ACH-COUNT",
            ));
        }
        if Some(control.entry_hash) != totals.hash {
            errors.push(mismatch(
                "control.entry_hash",
                control.entry_hash,
                totals.hash_text(),
                "ACH-HASH",
            ));
        }
        if control.total_debit != totals.debit {
            errors.push(mismatch(
                "control.total_debit",
                control.total_debit,
                totals.debit,
                "ACH-TOTAL",
            ));
        }
        if control.total_credit != totals.credit {
            errors.push(mismatch(
                "control.total_credit",
                control.total_credit,
                totals.credit,
                "ACH-TOTAL",
            ));
        }

        let expected_blocks = self.record_count_without_filler().div_ceil(BLOCKING_FACTOR);
        if control.block_count as usize != expected_blocks {
            errors.push(mismatch(
                "control.block_count",
                control.block_count,
                expected_blocks,
                "ACH-BLOCK",
            ));
        }
        if self.filler_count >= BLOCKING_FACTOR {
            errors.push(ValidationError::with_rule(
                "filler",
                format!(
                    "{} filler records make up at least one whole block",
                    self.filler_count
                ),
                "ACH-BLOCK",
            ));
        }
        if self.record_count() % BLOCKING_FACTOR != 0 {
            errors.push(ValidationError::with_rule(
                "filler",
                format!(
                    "{} records is not a multiple of {BLOCKING_FACTOR}",
                    self.record_count()
                ),
                "ACH-BLOCK",
            ));
        }

        errors
    }
}

struct Totals {
    /// `None` when a receiving DFI is not numeric.
    hash: Option<u64>,
    debit: Cents,
    credit: Cents,
}

impl Totals {
    fn hash_text(&self) -> String {
        self.hash
            .map_or_else(|| "no valid hash".to_string(), |h| h.to_string())
    }

    fn of(entries: &[EntryDetail]) -> Self {
        let mut debit = Cents::ZERO;
        let mut credit = Cents::ZERO;
        for e in entries {
            match e.transaction_code.transaction_type() {
                TransactionType::Debit => debit = debit + e.amount,
                TransactionType::Credit => credit = credit + e.amount,
            }
        }
        Self {
            hash: entry_hash(entries.iter().map(|e| e.receiving_dfi.as_str())),
            debit,
            credit,
        }
    }
}

fn mismatch(
    field: impl Into<String>,
    declared: impl std::fmt::Display,
    computed: impl std::fmt::Display,
    rule: &str,
) -> ValidationError {
    ValidationError::with_rule(
        field,
        format!("declared {declared}, computed {computed}"),
        rule,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(matches!(
            parse_nacha(""),
            Err(AchError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn garbage_first_line() {
        assert!(parse_nacha("hello\r\n").is_err());
    }

    #[test]
    fn short_record_reports_line() {
        let err = parse_nacha(&"1".repeat(50)).unwrap_err();
        assert!(matches!(err, AchError::Parse { line: 1, .. }));
    }
}
