//! Core batch types, amounts, validators, and trace numbers.
//!
//! This module provides the data model shared by every export format:
//! batches of payroll entries, originator metadata, exact cent amounts,
//! and the ABA routing / account number validators.

mod amount;
mod builder;
mod error;
mod routing;
mod types;
mod validation;

pub use amount::Cents;
pub use builder::*;
pub use error::*;
pub use routing::*;
pub use types::*;
pub use validation::*;
