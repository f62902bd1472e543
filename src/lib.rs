//! # achfile
//!
//! Payroll disbursement exports: NACHA ACH flat files, CSV and JSON
//! review exports, and ABA routing / account number validation.
//!
//! All monetary values use [`rust_decimal::Decimal`] and are converted
//! exactly to cents before they reach a fixed-width field. No floating
//! point is involved.
//!
//! ## Quick Start
//!
//! ```rust
//! use achfile::core::*;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let payday = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
//! let batch = BatchBuilder::new("batch-2024-06-14", payday)
//!     .name("Regular Payroll")
//!     .add_entry(EntryBuilder::credit("021000021", "000123456789", dec!(1500), payday)
//!         .payee("EMP-001", "Jane Roe")
//!         .build())
//!     .add_entry(EntryBuilder::credit("011000138", "987654321", dec!(2250.75), payday)
//!         .payee("EMP-002", "John Doe")
//!         .build())
//!     .build()
//!     .unwrap();
//!
//! assert!(validate_batch(&batch).is_empty());
//! assert_eq!(batch.total_amount, dec!(3750.75));
//! assert_eq!(generate_trace_number("09100001", 2), "091000010000002");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Batch types, builders, cents, routing/account validation |
//! | `nacha` | NACHA ACH file generation and parsing |
//! | `csv` | CSV export of entries |
//! | `json` | JSON export of a batch |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "nacha")]
pub mod nacha;

#[cfg(any(feature = "csv", feature = "json"))]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
