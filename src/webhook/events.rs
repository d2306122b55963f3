use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::WebhookError;
use crate::core::{DocumentKind, DocumentStatus};

/// Notification types pushed by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    /// A new incoming invoice arrived in the mailbox.
    #[serde(rename = "invoice.received")]
    InvoiceReceived,
    #[serde(rename = "invoice.status_changed")]
    InvoiceStatusChanged,
    /// The buyer accepted or rejected a commercial invoice.
    #[serde(rename = "invoice.response_received")]
    InvoiceResponseReceived,
    #[serde(rename = "dispatch.received")]
    DispatchReceived,
    #[serde(rename = "dispatch.status_changed")]
    DispatchStatusChanged,
    #[serde(rename = "producer_receipt.status_changed")]
    ProducerReceiptStatusChanged,
    /// Event types added after this crate was released.
    #[serde(other)]
    Unknown,
}

/// A webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Unique id of the delivery; use it to drop duplicates.
    pub event_id: String,
    pub event_type: WebhookEventType,
    pub document_kind: DocumentKind,
    pub document_uuid: Uuid,
    /// Status after the change, for `*.status_changed` events.
    pub status: Option<DocumentStatus>,
    pub occurred_at: DateTime<Utc>,
    pub message: Option<String>,
}

/// Parse a webhook body. Call only after the signature has been verified.
pub fn parse_event(body: &[u8]) -> Result<WebhookEvent, WebhookError> {
    let event: WebhookEvent =
        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;
    if event.event_id.trim().is_empty() {
        return Err(WebhookError::InvalidPayload("eventId is empty".into()));
    }
    Ok(event)
}
