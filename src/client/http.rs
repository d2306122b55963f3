//! HTTP implementation of [`EtsApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::api::EtsApi;
use super::config::ClientConfig;
use super::error::ClientError;
use super::models::{
    Acknowledgement, ApiResponse, CancelRequest, DocumentContent, DocumentFormat, InvoiceResponse,
    ResponseKind, SendResult, StatusInfo, UserInfo,
};
use crate::core::{
    Dispatch, DocumentKind, Invoice, ProducerReceipt, ValidationError, validate_dispatch, validate_invoice,
    validate_producer_receipt, validate_tax_id,
};

const HEADER_API_KEY: &str = "X-Api-Key";
const HEADER_API_SECRET: &str = "X-Api-Secret";
const HEADER_CUSTOMER_ID: &str = "X-Customer-Id";
const HEADER_SOFTWARE_ID: &str = "X-Software-Id";

/// REST client for the ETS platform.
///
/// Every request carries the four credential headers. Documents are validated
/// locally before they are sent, so obviously broken submissions fail with
/// [`ClientError::Validation`] without a round trip.
#[derive(Debug, Clone)]
pub struct EtsClient {
    http: reqwest::Client,
    config: ClientConfig,
}

/// A failed attempt, with the server's requested back-off if it sent one.
struct Failure {
    error: ClientError,
    retry_after: Option<Duration>,
}

impl From<ClientError> for Failure {
    fn from(error: ClientError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

impl EtsClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ClientError> {
        self.execute(Method::GET, path, None).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| ClientError::Encode(e.to_string()))?;
        self.execute(Method::POST, path, Some(bytes)).await
    }

    /// Run a request, retrying transient failures according to the retry policy.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse<T>, ClientError> {
        let url = format!("{}{}", self.config.base_url, path);
        let policy = self.config.retry;
        let mut attempt = 0;

        loop {
            tracing::debug!(%method, %url, attempt = attempt + 1, "sending request");
            match self.attempt(method.clone(), &url, body.clone()).await {
                Ok(response) => return Ok(response),
                Err(failure)
                    if failure.error.is_retryable() && attempt + 1 < policy.max_attempts =>
                {
                    let delay = failure
                        .retry_after
                        .map(|d| d.min(policy.max_delay))
                        .unwrap_or_else(|| policy.delay_for(attempt));
                    tracing::warn!(
                        %method,
                        %url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure.error,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse<T>, Failure> {
        let creds = &self.config.credentials;
        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(HEADER_API_KEY, &creds.api_key)
            .header(HEADER_API_SECRET, &creds.api_secret)
            .header(HEADER_CUSTOMER_ID, &creds.customer_id)
            .header(HEADER_SOFTWARE_ID, &creds.software_id);
        if let Some(bytes) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let response = request.send().await.map_err(ClientError::from)?;
        let status = response.status();
        let retry_after = retry_after(response.headers());
        let text = response.text().await.map_err(ClientError::from)?;
        tracing::debug!(status = status.as_u16(), bytes = text.len(), "response received");

        if status.is_success() {
            return serde_json::from_str(&text)
                .map_err(|e| Failure::from(ClientError::Decode(e.to_string())));
        }
        Err(Failure {
            error: error_from_body(status, text),
            retry_after,
        })
    }
}

/// Prefer the platform's error envelope; fall back to the raw body.
fn error_from_body(status: StatusCode, body: String) -> ClientError {
    match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
        Ok(envelope) if !envelope.success => envelope.into_error(status.as_u16()),
        _ => ClientError::Http {
            status: status.as_u16(),
            body,
        },
    }
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn ensure_valid(errors: Vec<ValidationError>) -> Result<(), ClientError> {
    if errors.is_empty() {
        return Ok(());
    }
    let msg = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    Err(ClientError::Validation(msg))
}

fn status_path(kind: DocumentKind, uuid: Uuid) -> String {
    format!("/{}/{uuid}/status", kind.path())
}

#[async_trait]
impl EtsApi for EtsClient {
    async fn send_invoice(&self, invoice: &Invoice) -> Result<SendResult, ClientError> {
        ensure_valid(validate_invoice(invoice))?;
        self.post("/invoices", invoice).await?.into_result()
    }

    async fn save_invoice_draft(&self, invoice: &Invoice) -> Result<SendResult, ClientError> {
        self.post("/invoices/drafts", invoice).await?.into_result()
    }

    async fn get_invoice_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        self.get(&status_path(DocumentKind::Invoice, uuid))
            .await?
            .into_result()
    }

    async fn cancel_invoice(
        &self,
        uuid: Uuid,
        reason: &str,
    ) -> Result<Acknowledgement, ClientError> {
        if reason.trim().is_empty() {
            return Err(ClientError::Validation(
                "cancellation reason must not be empty".into(),
            ));
        }
        let body = CancelRequest {
            reason: reason.to_string(),
        };
        self.post::<_, serde_json::Value>(&format!("/invoices/{uuid}/cancel"), &body)
            .await?
            .into_ack()
    }

    async fn respond_to_invoice(
        &self,
        uuid: Uuid,
        response: &InvoiceResponse,
    ) -> Result<Acknowledgement, ClientError> {
        if response.response == ResponseKind::Reject
            && response.note.as_deref().is_none_or(|n| n.trim().is_empty())
        {
            return Err(ClientError::Validation(
                "a rejection must include a note".into(),
            ));
        }
        self.post::<_, serde_json::Value>(&format!("/invoices/{uuid}/response"), response)
            .await?
            .into_ack()
    }

    async fn get_invoice_document(
        &self,
        uuid: Uuid,
        format: DocumentFormat,
    ) -> Result<DocumentContent, ClientError> {
        self.get(&format!(
            "/invoices/{uuid}/document?format={}",
            format.as_str()
        ))
        .await?
        .into_result()
    }

    async fn check_user(&self, tax_id: &str) -> Result<UserInfo, ClientError> {
        let tax_id = validate_tax_id(tax_id).map_err(|e| ClientError::Validation(e.to_string()))?;
        self.get(&format!("/users/{}", tax_id.as_str()))
            .await?
            .into_result()
    }

    async fn send_dispatch(&self, dispatch: &Dispatch) -> Result<SendResult, ClientError> {
        ensure_valid(validate_dispatch(dispatch))?;
        self.post("/dispatches", dispatch).await?.into_result()
    }

    async fn get_dispatch_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        self.get(&status_path(DocumentKind::Dispatch, uuid))
            .await?
            .into_result()
    }

    async fn send_producer_receipt(
        &self,
        receipt: &ProducerReceipt,
    ) -> Result<SendResult, ClientError> {
        ensure_valid(validate_producer_receipt(receipt))?;
        self.post("/producer-receipts", receipt).await?.into_result()
    }

    async fn get_producer_receipt_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        self.get(&status_path(DocumentKind::ProducerReceipt, uuid))
            .await?
            .into_result()
    }
}
