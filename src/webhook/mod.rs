//! Verification and parsing of ETS webhook notifications.
//!
//! The platform signs each delivery with HMAC-SHA256 over
//! `"{timestamp}.{body}"` using the shared webhook secret. Receivers should
//! verify the signature against the raw body before parsing it:
//!
//! ```
//! use ets::webhook::{WebhookVerifier, sign};
//!
//! let body = r#"{"eventId":"evt_1","eventType":"invoice.status_changed","documentKind":"invoice","documentUuid":"3f2504e0-4f89-41d3-9a0c-0305e82c3301","status":"ACCEPTED","occurredAt":"2024-03-01T10:00:00Z"}"#;
//! let now = chrono::Utc::now().timestamp();
//! let signature = sign(b"whsec", Some(now), body.as_bytes()).unwrap();
//!
//! let verifier = WebhookVerifier::new("whsec");
//! let event = verifier.verify_and_parse(body.as_bytes(), &signature, Some(now)).unwrap();
//! assert!(event.status.unwrap().is_final());
//! ```

mod error;
mod events;
mod signature;

pub use error::WebhookError;
pub use events::{WebhookEvent, WebhookEventType, parse_event};
pub use signature::{DEFAULT_TOLERANCE, WebhookVerifier, sign};
