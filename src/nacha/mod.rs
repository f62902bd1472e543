//! NACHA ACH file export and import.
//!
//! Generates the fixed-width, 94-column flat file banks accept for ACH
//! origination: file header, one PPD batch of entry details, batch and
//! file control records, and filler records up to a multiple of ten
//! lines. Files can be read back and their control totals verified.
//!
//! # Example
//!
//! ```ignore
//! use achfile::nacha::*;
//!
//! let config = NachaConfigBuilder::new("091000019", "091000019", "09100001")
//!     .destination_name("WELLS FARGO")
//!     .origin_name("ACME CORP")
//!     .build();
//!
//! let file = to_nacha(&batch, &company, &config)?;
//! assert!(parse_nacha(&file)?.verify().is_empty());
//! ```

mod file;
pub mod layout;
mod parse;
mod records;

pub use file::{NachaConfig, NachaConfigBuilder, to_nacha, to_nacha_at};
pub use parse::{NachaBatch, NachaFile, parse_nacha};
pub use records::{
    BatchControl, BatchHeader, EntryDetail, FileControl, FileHeader, ServiceClassCode,
    TransactionCode, entry_hash,
};
