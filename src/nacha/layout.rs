//! Declarative fixed-width record layouts.
//!
//! Every NACHA record is 94 characters wide. A [`RecordLayout`] lists its
//! fields in order with 1-based start column, width, and kind; the tables
//! below are checked at compile time to be contiguous and exactly 94 wide.
//! [`RecordWriter`] and [`RecordReader`] encode and decode a record
//! strictly through its layout, so a value can never shift a column.

use log::warn;

use crate::core::AchError;

/// Width of every NACHA record.
pub const RECORD_LEN: usize = 94;

/// Records per block.
pub const BLOCKING_FACTOR: usize = 10;

/// How a field is justified and filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Left-justified, space-filled. Overlong values are truncated.
    Alphanumeric,
    /// Right-justified, zero-filled, digits only. Overlong values are rejected.
    Numeric,
}

/// One column range of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    /// 1-based start column, as printed in the NACHA rules.
    pub start: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl Field {
    const fn new(name: &'static str, start: usize, width: usize, kind: FieldKind) -> Self {
        Self {
            name,
            start,
            width,
            kind,
        }
    }

    /// Zero-based byte range within the record.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start - 1..self.start - 1 + self.width
    }
}

/// The ordered field table of one record type.
#[derive(Debug)]
pub struct RecordLayout {
    /// Record name used in errors and log messages.
    pub name: &'static str,
    /// Record type code in column 1.
    pub record_type: char,
    pub fields: &'static [Field],
}

impl RecordLayout {
    /// True if the fields start at column 1, leave no gaps, and end at column 94.
    pub const fn is_well_formed(&self) -> bool {
        let mut pos = 1;
        let mut i = 0;
        while i < self.fields.len() {
            let f = &self.fields[i];
            if f.start != pos || f.width == 0 {
                return false;
            }
            pos += f.width;
            i += 1;
        }
        pos == RECORD_LEN + 1
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Result<(usize, &'static Field), AchError> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.name == name)
            .ok_or_else(|| {
                AchError::Layout(format!("record {} has no field '{name}'", self.name))
            })
    }
}

use FieldKind::{Alphanumeric as A, Numeric as N};

pub const FILE_HEADER: RecordLayout = RecordLayout {
    name: "file_header",
    record_type: '1',
    fields: &[
        Field::new("record_type", 1, 1, N),
        Field::new("priority_code", 2, 2, N),
        Field::new("immediate_destination", 4, 10, A),
        Field::new("immediate_origin", 14, 10, A),
        Field::new("creation_date", 24, 6, N),
        Field::new("creation_time", 30, 4, N),
        Field::new("file_id_modifier", 34, 1, A),
        Field::new("record_size", 35, 3, N),
        Field::new("blocking_factor", 38, 2, N),
        Field::new("format_code", 40, 1, N),
        Field::new("destination_name", 41, 23, A),
        Field::new("origin_name", 64, 23, A),
        Field::new("reference_code", 87, 8, A),
    ],
};

pub const BATCH_HEADER: RecordLayout = RecordLayout {
    name: "batch_header",
    record_type: '5',
    fields: &[
        Field::new("record_type", 1, 1, N),
        Field::new("service_class_code", 2, 3, N),
        Field::new("company_name", 5, 16, A),
        Field::new("company_discretionary_data", 21, 20, A),
        Field::new("company_identification", 41, 10, A),
        Field::new("sec_code", 51, 3, A),
        Field::new("entry_description", 54, 10, A),
        Field::new("descriptive_date", 64, 6, A),
        Field::new("effective_entry_date", 70, 6, N),
        Field::new("settlement_date", 76, 3, A),
        Field::new("originator_status_code", 79, 1, A),
        Field::new("originating_dfi", 80, 8, N),
        Field::new("batch_number", 88, 7, N),
    ],
};

pub const ENTRY_DETAIL: RecordLayout = RecordLayout {
    name: "entry_detail",
    record_type: '6',
    fields: &[
        Field::new("record_type", 1, 1, N),
        Field::new("transaction_code", 2, 2, N),
        Field::new("receiving_dfi", 4, 8, N),
        Field::new("check_digit", 12, 1, N),
        Field::new("account_number", 13, 17, A),
        Field::new("amount", 30, 10, N),
        Field::new("individual_id", 40, 15, A),
        Field::new("individual_name", 55, 22, A),
        Field::new("discretionary_data", 77, 2, A),
        Field::new("addenda_indicator", 79, 1, N),
        Field::new("trace_number", 80, 15, N),
    ],
};

pub const BATCH_CONTROL: RecordLayout = RecordLayout {
    name: "batch_control",
    record_type: '8',
    fields: &[
        Field::new("record_type", 1, 1, N),
        Field::new("service_class_code", 2, 3, N),
        Field::new("entry_count", 5, 6, N),
        Field::new("entry_hash", 11, 10, N),
        Field::new("total_debit", 21, 12, N),
        Field::new("total_credit", 33, 12, N),
        Field::new("company_identification", 45, 10, A),
        Field::new("message_authentication_code", 55, 19, A),
        Field::new("reserved", 74, 6, A),
        Field::new("originating_dfi", 80, 8, N),
        Field::new("batch_number", 88, 7, N),
    ],
};

pub const FILE_CONTROL: RecordLayout = RecordLayout {
    name: "file_control",
    record_type: '9',
    fields: &[
        Field::new("record_type", 1, 1, N),
        Field::new("batch_count", 2, 6, N),
        Field::new("block_count", 8, 6, N),
        Field::new("entry_count", 14, 8, N),
        Field::new("entry_hash", 22, 10, N),
        Field::new("total_debit", 32, 12, N),
        Field::new("total_credit", 44, 12, N),
        Field::new("reserved", 56, 39, A),
    ],
};

const _: () = assert!(FILE_HEADER.is_well_formed());
const _: () = assert!(BATCH_HEADER.is_well_formed());
const _: () = assert!(ENTRY_DETAIL.is_well_formed());
const _: () = assert!(BATCH_CONTROL.is_well_formed());
const _: () = assert!(FILE_CONTROL.is_well_formed());

/// A block-filling record: 94 nines.
pub fn filler_record() -> String {
    "9".repeat(RECORD_LEN)
}

/// True if `line` is a block-filling record.
pub fn is_filler(line: &str) -> bool {
    line.len() == RECORD_LEN && line.bytes().all(|b| b == b'9')
}

/// Encodes one record through its layout.
///
/// Unset alphanumeric fields are left blank; unset numeric fields other
/// than the record type are an error. The record type is filled in
/// automatically.
pub struct RecordWriter {
    layout: &'static RecordLayout,
    values: Vec<Option<String>>,
}

impl RecordWriter {
    pub fn new(layout: &'static RecordLayout) -> Self {
        let mut values = vec![None; layout.fields.len()];
        values[0] = Some(layout.record_type.to_string());
        Self { layout, values }
    }

    /// Set an alphanumeric field. Overlong values are truncated with a warning,
    /// and non-ASCII or control characters are replaced by a space.
    pub fn text(&mut self, name: &str, value: &str) -> Result<&mut Self, AchError> {
        let (idx, field) = self.layout.field(name)?;
        if field.kind != FieldKind::Alphanumeric {
            return Err(AchError::Layout(format!(
                "{}.{} is numeric; use number() or digits()",
                self.layout.name, field.name
            )));
        }

        let mut cleaned: String = value
            .chars()
            .map(|c| {
                if c.is_ascii() && !c.is_ascii_control() {
                    c
                } else {
                    ' '
                }
            })
            .collect();
        if cleaned != value {
            warn!(
                "{}.{}: replaced non-ASCII or control characters in '{}'",
                self.layout.name, field.name, value
            );
        }

        if cleaned.len() > field.width {
            warn!(
                "{}.{}: '{}' exceeds {} characters, truncated",
                self.layout.name,
                field.name,
                cleaned,
                field.width
            );
            cleaned.truncate(field.width);
        }

        self.values[idx] = Some(format!("{:<width$}", cleaned, width = field.width));
        Ok(self)
    }

    /// Set a numeric field from an integer. Values wider than the field are rejected.
    pub fn number(&mut self, name: &str, value: u64) -> Result<&mut Self, AchError> {
        self.digits(name, &value.to_string())
    }

    /// Set a numeric field from a digit string, zero-filled on the left.
    pub fn digits(&mut self, name: &str, value: &str) -> Result<&mut Self, AchError> {
        let (idx, field) = self.layout.field(name)?;
        if field.kind != FieldKind::Numeric {
            return Err(AchError::Layout(format!(
                "{}.{} is alphanumeric; use text()",
                self.layout.name, field.name
            )));
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AchError::Field {
                record: self.layout.name,
                field: field.name,
                message: format!("'{value}' is not numeric"),
            });
        }
        if value.len() > field.width {
            return Err(AchError::Field {
                record: self.layout.name,
                field: field.name,
                message: format!("'{value}' does not fit in {} digits", field.width),
            });
        }
        self.values[idx] = Some(format!("{:0>width$}", value, width = field.width));
        Ok(self)
    }

    /// Assemble the 94-character record.
    pub fn finish(self) -> Result<String, AchError> {
        let mut out = String::with_capacity(RECORD_LEN);
        for (field, value) in self.layout.fields.iter().zip(self.values) {
            match (value, field.kind) {
                (Some(v), _) => out.push_str(&v),
                (None, FieldKind::Alphanumeric) => {
                    out.extend(std::iter::repeat_n(' ', field.width))
                }
                (None, FieldKind::Numeric) => {
                    return Err(AchError::Layout(format!(
                        "{}.{} was never set",
                        self.layout.name, field.name
                    )));
                }
            }
        }
        debug_assert_eq!(out.len(), RECORD_LEN);
        Ok(out)
    }
}

/// Decodes fields of one record through its layout.
pub struct RecordReader<'a> {
    layout: &'static RecordLayout,
    line: &'a str,
    line_no: usize,
}

impl<'a> RecordReader<'a> {
    /// Check the record's width, character set, and type code.
    pub fn new(
        layout: &'static RecordLayout,
        line: &'a str,
        line_no: usize,
    ) -> Result<Self, AchError> {
        if !line.is_ascii() {
            return Err(AchError::Parse {
                line: line_no,
                message: "record contains non-ASCII characters".into(),
            });
        }
        if line.len() != RECORD_LEN {
            return Err(AchError::Parse {
                line: line_no,
                message: format!("record is {} characters, expected {RECORD_LEN}", line.len()),
            });
        }
        if !line.starts_with(layout.record_type) {
            return Err(AchError::Parse {
                line: line_no,
                message: format!(
                    "expected {} (type {}), found type '{}'",
                    layout.name,
                    layout.record_type,
                    &line[..1]
                ),
            });
        }
        Ok(Self {
            layout,
            line,
            line_no,
        })
    }

    /// Raw field contents, including padding.
    pub fn raw(&self, name: &str) -> Result<&'a str, AchError> {
        let (_, field) = self.layout.field(name)?;
        // `new` checked the line is ASCII and 94 bytes long
        Ok(&self.line[field.range()])
    }

    /// Field contents with surrounding blanks removed.
    pub fn text(&self, name: &str) -> Result<&'a str, AchError> {
        Ok(self.raw(name)?.trim())
    }

    /// Numeric field contents as an integer.
    pub fn number(&self, name: &str) -> Result<u64, AchError> {
        let raw = self.raw(name)?;
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.error(format!("{}.{name} '{raw}' is not numeric", self.layout.name)));
        }
        raw.parse::<u64>()
            .map_err(|e| self.error(format!("{}.{name}: {e}", self.layout.name)))
    }

    pub fn error(&self, message: impl Into<String>) -> AchError {
        AchError::Parse {
            line: self.line_no,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_layouts_are_well_formed() {
        for layout in [
            &FILE_HEADER,
            &BATCH_HEADER,
            &ENTRY_DETAIL,
            &BATCH_CONTROL,
            &FILE_CONTROL,
        ] {
            assert!(layout.is_well_formed(), "{} is malformed", layout.name);
            let total: usize = layout.fields.iter().map(|f| f.width).sum();
            assert_eq!(total, RECORD_LEN);
        }
    }

    #[test]
    fn gap_is_not_well_formed() {
        const BROKEN: RecordLayout = RecordLayout {
            name: "broken",
            record_type: 'x',
            fields: &[
                Field::new("a", 1, 10, FieldKind::Numeric),
                Field::new("b", 12, 83, FieldKind::Alphanumeric),
            ],
        };
        assert!(!BROKEN.is_well_formed());
    }

    #[test]
    fn writer_pads_and_justifies() {
        let mut w = RecordWriter::new(&FILE_CONTROL);
        w.number("batch_count", 1)
            .unwrap()
            .number("block_count", 1)
            .unwrap()
            .number("entry_count", 2)
            .unwrap()
            .number("entry_hash", 4200000)
            .unwrap()
            .number("total_debit", 10000)
            .unwrap()
            .number("total_credit", 5000)
            .unwrap();
        let rec = w.finish().unwrap();
        assert_eq!(rec.len(), RECORD_LEN);
        assert!(rec.starts_with("9000001000001000000020004200000000000010000000000005000"));
        assert!(rec.ends_with(&" ".repeat(39)));
    }

    #[test]
    fn text_truncates() {
        let mut w = RecordWriter::new(&ENTRY_DETAIL);
        w.text("individual_name", "Maximilian Alexander Johnson-Smith")
            .unwrap();
        let v = w.values[ENTRY_DETAIL.field("individual_name").unwrap().0]
            .clone()
            .unwrap();
        assert_eq!(v, "Maximilian Alexander J");
    }

    #[test]
    fn text_replaces_non_ascii() {
        let mut w = RecordWriter::new(&ENTRY_DETAIL);
        w.text("individual_name", "José Müller").unwrap();
        let v = w.values[ENTRY_DETAIL.field("individual_name").unwrap().0]
            .clone()
            .unwrap();
        assert_eq!(v.len(), 22);
        assert!(v.starts_with("Jos  M ller"));
    }

    #[test]
    fn numeric_overflow_rejected() {
        let mut w = RecordWriter::new(&ENTRY_DETAIL);
        let err = w.number("amount", 12_345_678_901).err().unwrap();
        assert!(matches!(
            err,
            AchError::Field {
                record: "entry_detail",
                field: "amount",
                ..
            }
        ));
    }

    #[test]
    fn non_digits_rejected() {
        let mut w = RecordWriter::new(&ENTRY_DETAIL);
        assert!(w.digits("receiving_dfi", "0210A002").is_err());
    }

    #[test]
    fn wrong_kind_is_layout_error() {
        let mut w = RecordWriter::new(&ENTRY_DETAIL);
        assert!(matches!(w.text("amount", "1"), Err(AchError::Layout(_))));
        assert!(matches!(w.number("account_number", 1), Err(AchError::Layout(_))));
        assert!(matches!(w.text("nope", "1"), Err(AchError::Layout(_))));
    }

    #[test]
    fn unset_numeric_is_error() {
        let w = RecordWriter::new(&FILE_CONTROL);
        assert!(matches!(w.finish(), Err(AchError::Layout(_))));
    }

    #[test]
    fn reader_checks_width_and_type() {
        let line = format!("9{}", "0".repeat(54)) + &" ".repeat(39);
        assert!(RecordReader::new(&FILE_CONTROL, &line, 1).is_ok());
        assert!(RecordReader::new(&FILE_CONTROL, &line[..93], 1).is_err());
        assert!(RecordReader::new(&BATCH_CONTROL, &line, 7).is_err());
    }

    #[test]
    fn reader_extracts_fields() {
        let line = format!(
            "{}{}{}",
            "9000001000001000000020004200000000000010000000000005000",
            "",
            " ".repeat(39)
        );
        let r = RecordReader::new(&FILE_CONTROL, &line, 1).unwrap();
        assert_eq!(r.number("batch_count").unwrap(), 1);
        assert_eq!(r.number("entry_count").unwrap(), 2);
        assert_eq!(r.number("entry_hash").unwrap(), 4_200_000);
        assert_eq!(r.number("total_debit").unwrap(), 10_000);
        assert_eq!(r.number("total_credit").unwrap(), 5_000);
        assert_eq!(r.text("reserved").unwrap(), "");
        assert!(r.number("reserved").is_err());
    }

    #[test]
    fn filler_detection() {
        assert!(is_filler(&filler_record()));
        assert!(!is_filler(&"9".repeat(93)));
    }
}
