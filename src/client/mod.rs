//! Async REST client for the ETS platform.
//!
//! [`EtsClient`] talks HTTP; [`CachingClient`] and [`LoggingClient`] wrap any
//! [`EtsApi`] implementation to add cross-cutting behaviour; [`BulkSender`]
//! fans a list of documents out over an [`EtsApi`] with bounded concurrency.
//!
//! # Example
//!
//! ```ignore
//! use ets::client::*;
//!
//! let config = ClientConfig::from_env()?;
//! let client = LoggingClient::new(CachingClient::new(EtsClient::new(config)?));
//!
//! let user = client.check_user("1234567890").await?;
//! if user.is_e_invoice_user {
//!     let result = client.send_invoice(&invoice).await?;
//!     println!("queued as {}", result.uuid);
//! }
//! ```

mod api;
mod bulk;
mod cache;
mod config;
mod error;
mod http;
mod logging;
mod models;

pub use api::EtsApi;
pub use bulk::{BulkItem, BulkOptions, BulkReport, BulkSender};
pub use cache::{CacheConfig, CacheStats, CachingClient};
pub use config::{ClientConfig, Credentials, RetryPolicy};
pub use error::ClientError;
pub use http::EtsClient;
pub use logging::LoggingClient;
pub use models::*;
