//! Core document types, builders, validation, and numbering.
//!
//! This module provides the transport types for Turkish e-documents
//! (invoices, dispatch notes, producer receipts), the fluent builders that
//! assemble them, and the client-side checks the platform would otherwise
//! reject a submission for.

mod builder;
mod dispatch;
mod error;
pub mod identifiers;
mod numbering;
mod receipt;
mod types;
pub mod units;
mod validation;

pub use builder::*;
pub use dispatch::*;
pub use error::*;
pub use identifiers::{
    ANONYMOUS_TCKN, IdentifierError, TaxId, format_iban, validate_iban, validate_tax_id,
    validate_tckn, validate_vkn,
};
pub use numbering::*;
pub use receipt::*;
pub use types::*;
pub use units::is_known_unit_code;
pub use validation::*;
