//! Flat export variants of a batch: CSV rows and a JSON document.
//!
//! These exports are for review and reconciliation, not for bank
//! submission; see [`crate::nacha`] for the ACH file itself.

#[cfg(feature = "csv")]
mod csv_export;
#[cfg(feature = "json")]
mod json_export;

#[cfg(feature = "csv")]
pub use csv_export::{CSV_HEADER, to_csv};
#[cfg(feature = "json")]
pub use json_export::to_json;
