//! # ets
//!
//! Client SDK for the ETS Turkish e-invoicing platform: typed documents for
//! e-Fatura, e-Arşiv, e-İrsaliye and e-Müstahsil, client-side validation of
//! Turkish tax identifiers and IBANs, and an async REST client.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Documents are identified by their ETTN (a v4 [`uuid::Uuid`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ets::core::*;
//! use rust_decimal_macros::dec;
//!
//! let invoice = InvoiceBuilder::new(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
//!     .seller(PartyBuilder::new("ACME Yazılım A.Ş.", "1234567890", AddressBuilder::new("İstanbul").build())
//!         .tax_office("Kadıköy").build())
//!     .buyer(PartyBuilder::new("Müşteri Ltd. Şti.", "9876543217", AddressBuilder::new("Ankara").build()).build())
//!     .add_line(LineItemBuilder::new("1", "Danışmanlık", dec!(10), "HUR", dec!(150))
//!         .vat_rate(dec!(20)).build())
//!     .build()
//!     .unwrap();
//!
//! assert!(validate_invoice(&invoice).is_empty());
//! assert_eq!(invoice.totals.unwrap().payable, dec!(1800.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document types, builders, VKN/TCKN/IBAN validation, numbering |
//! | `client` | Async REST client, caching/logging decorators, bulk sending |
//! | `webhook` | Webhook signature verification and event parsing |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "webhook")]
pub mod webhook;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
