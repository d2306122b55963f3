use std::time::Instant;

use async_trait::async_trait;
use uuid::Uuid;

use super::api::EtsApi;
use super::error::ClientError;
use super::models::{
    Acknowledgement, DocumentContent, DocumentFormat, InvoiceResponse, SendResult, StatusInfo,
    UserInfo,
};
use crate::core::{Dispatch, Invoice, ProducerReceipt};

/// [`EtsApi`] decorator that emits one `tracing` event per call.
///
/// Successful calls are logged at `INFO`, failures at `WARN` (retryable) or
/// `ERROR`. Each event carries `operation`, `document` and `elapsed_ms`.
/// Credentials and document bodies are never logged.
pub struct LoggingClient<C> {
    inner: C,
}

impl<C: EtsApi> LoggingClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

fn record<T>(operation: &'static str, document: &str, started: Instant, result: &Result<T, ClientError>) {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(_) => tracing::info!(operation, document, elapsed_ms, outcome = "ok", "ETS call completed"),
        Err(e) if e.is_retryable() => tracing::warn!(
            operation,
            document,
            elapsed_ms,
            outcome = "error",
            status = e.status(),
            error = %e,
            "ETS call failed"
        ),
        Err(e) => tracing::error!(
            operation,
            document,
            elapsed_ms,
            outcome = "error",
            status = e.status(),
            error = %e,
            "ETS call failed"
        ),
    }
}

macro_rules! logged {
    ($operation:literal, $document:expr, $call:expr) => {{
        let started = Instant::now();
        let result = $call.await;
        record($operation, &$document.to_string(), started, &result);
        result
    }};
}

#[async_trait]
impl<C: EtsApi> EtsApi for LoggingClient<C> {
    async fn send_invoice(&self, invoice: &Invoice) -> Result<SendResult, ClientError> {
        logged!("send_invoice", invoice.uuid, self.inner.send_invoice(invoice))
    }

    async fn save_invoice_draft(&self, invoice: &Invoice) -> Result<SendResult, ClientError> {
        logged!(
            "save_invoice_draft",
            invoice.uuid,
            self.inner.save_invoice_draft(invoice)
        )
    }

    async fn get_invoice_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        logged!("get_invoice_status", uuid, self.inner.get_invoice_status(uuid))
    }

    async fn cancel_invoice(
        &self,
        uuid: Uuid,
        reason: &str,
    ) -> Result<Acknowledgement, ClientError> {
        logged!("cancel_invoice", uuid, self.inner.cancel_invoice(uuid, reason))
    }

    async fn respond_to_invoice(
        &self,
        uuid: Uuid,
        response: &InvoiceResponse,
    ) -> Result<Acknowledgement, ClientError> {
        logged!(
            "respond_to_invoice",
            uuid,
            self.inner.respond_to_invoice(uuid, response)
        )
    }

    async fn get_invoice_document(
        &self,
        uuid: Uuid,
        format: DocumentFormat,
    ) -> Result<DocumentContent, ClientError> {
        logged!(
            "get_invoice_document",
            uuid,
            self.inner.get_invoice_document(uuid, format)
        )
    }

    async fn check_user(&self, tax_id: &str) -> Result<UserInfo, ClientError> {
        logged!("check_user", tax_id, self.inner.check_user(tax_id))
    }

    async fn send_dispatch(&self, dispatch: &Dispatch) -> Result<SendResult, ClientError> {
        logged!("send_dispatch", dispatch.uuid, self.inner.send_dispatch(dispatch))
    }

    async fn get_dispatch_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        logged!("get_dispatch_status", uuid, self.inner.get_dispatch_status(uuid))
    }

    async fn send_producer_receipt(
        &self,
        receipt: &ProducerReceipt,
    ) -> Result<SendResult, ClientError> {
        logged!(
            "send_producer_receipt",
            receipt.uuid,
            self.inner.send_producer_receipt(receipt)
        )
    }

    async fn get_producer_receipt_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        logged!(
            "get_producer_receipt_status",
            uuid,
            self.inner.get_producer_receipt_status(uuid)
        )
    }
}
