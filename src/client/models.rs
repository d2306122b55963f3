//! Request and response bodies of the ETS REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ClientError;
use crate::core::DocumentStatus;

/// Envelope wrapping every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the platform accepted the request.
    pub success: bool,
    /// Top-level message.
    #[serde(default)]
    pub message: Option<String>,
    /// Individual error entries.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Payload on success.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn failure(self, status: Option<u16>) -> ClientError {
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.errors.first().cloned())
            .unwrap_or_else(|| "request was not successful".into());
        ClientError::Api {
            status,
            message,
            errors: self.errors,
        }
    }

    /// Unwrap the payload, turning `success: false` or a missing payload into an error.
    pub fn into_result(self) -> Result<T, ClientError> {
        if !self.success {
            return Err(self.failure(None));
        }
        self.data
            .ok_or_else(|| ClientError::Decode("response has no data".into()))
    }

    /// Accept a successful response that carries no payload.
    pub fn into_ack(self) -> Result<Acknowledgement, ClientError> {
        if !self.success {
            return Err(self.failure(None));
        }
        Ok(Acknowledgement {
            message: self.message,
        })
    }

    /// Convert a failed response received with a non-2xx status.
    pub(crate) fn into_error(self, status: u16) -> ClientError {
        self.failure(Some(status))
    }
}

/// Successful response without a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: Option<String>,
}

/// Result of submitting a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    /// ETTN of the accepted document.
    pub uuid: Uuid,
    /// Document number assigned by the platform.
    pub number: Option<String>,
    /// Initial processing status.
    pub status: DocumentStatus,
}

/// Status lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub uuid: Uuid,
    pub number: Option<String>,
    pub status: DocumentStatus,
    /// Platform status description (often the GİB response text).
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Cancellation request for an e-Arşiv invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub reason: String,
}

/// Buyer response to a TICARIFATURA invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseKind {
    Accept,
    Reject,
}

/// Application response (accept/reject) sent for a received invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub response: ResponseKind,
    /// Required by the platform when rejecting.
    pub note: Option<String>,
}

impl InvoiceResponse {
    pub fn accept() -> Self {
        Self {
            response: ResponseKind::Accept,
            note: None,
        }
    }

    pub fn reject(note: impl Into<String>) -> Self {
        Self {
            response: ResponseKind::Reject,
            note: Some(note.into()),
        }
    }
}

/// Rendering format for a document download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Html,
    Xml,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Xml => "xml",
        }
    }
}

/// Rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    pub uuid: Uuid,
    pub format: DocumentFormat,
    /// Base64-encoded file content.
    pub content: String,
    pub file_name: Option<String>,
}

/// e-Fatura registration of a taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub tax_id: String,
    /// Registered title.
    pub title: Option<String>,
    /// Whether invoices to this taxpayer go through e-Fatura (otherwise e-Arşiv).
    pub is_e_invoice_user: bool,
    /// Whether the taxpayer receives e-İrsaliye.
    #[serde(default)]
    pub is_e_dispatch_user: bool,
    /// Registered mailbox aliases.
    #[serde(default)]
    pub aliases: Vec<String>,
    pub registered_at: Option<DateTime<Utc>>,
}
