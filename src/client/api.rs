use async_trait::async_trait;
use uuid::Uuid;

use super::error::ClientError;
use super::models::{
    Acknowledgement, DocumentContent, DocumentFormat, InvoiceResponse, SendResult, StatusInfo,
    UserInfo,
};
use crate::core::{Dispatch, Invoice, ProducerReceipt};

/// Operations offered by the ETS platform.
///
/// [`EtsClient`](super::EtsClient) implements this over HTTP. The decorators
/// ([`CachingClient`](super::CachingClient), [`LoggingClient`](super::LoggingClient))
/// implement it by delegating to an inner implementation, so they can be
/// stacked in any order.
#[async_trait]
pub trait EtsApi: Send + Sync {
    /// Submit an invoice (e-Fatura or e-Arşiv, depending on its profile).
    async fn send_invoice(&self, invoice: &Invoice) -> Result<SendResult, ClientError>;

    /// Store an invoice as a draft without sending it to GİB.
    async fn save_invoice_draft(&self, invoice: &Invoice) -> Result<SendResult, ClientError>;

    async fn get_invoice_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError>;

    /// Cancel an e-Arşiv invoice.
    async fn cancel_invoice(&self, uuid: Uuid, reason: &str)
    -> Result<Acknowledgement, ClientError>;

    /// Accept or reject a received commercial invoice.
    async fn respond_to_invoice(
        &self,
        uuid: Uuid,
        response: &InvoiceResponse,
    ) -> Result<Acknowledgement, ClientError>;

    /// Download the rendered invoice.
    async fn get_invoice_document(
        &self,
        uuid: Uuid,
        format: DocumentFormat,
    ) -> Result<DocumentContent, ClientError>;

    /// Look up whether a taxpayer is registered for e-Fatura.
    async fn check_user(&self, tax_id: &str) -> Result<UserInfo, ClientError>;

    async fn send_dispatch(&self, dispatch: &Dispatch) -> Result<SendResult, ClientError>;

    async fn get_dispatch_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError>;

    async fn send_producer_receipt(
        &self,
        receipt: &ProducerReceipt,
    ) -> Result<SendResult, ClientError>;

    async fn get_producer_receipt_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError>;
}

#[async_trait]
impl<T: EtsApi + ?Sized> EtsApi for std::sync::Arc<T> {
    async fn send_invoice(&self, invoice: &Invoice) -> Result<SendResult, ClientError> {
        (**self).send_invoice(invoice).await
    }

    async fn save_invoice_draft(&self, invoice: &Invoice) -> Result<SendResult, ClientError> {
        (**self).save_invoice_draft(invoice).await
    }

    async fn get_invoice_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        (**self).get_invoice_status(uuid).await
    }

    async fn cancel_invoice(
        &self,
        uuid: Uuid,
        reason: &str,
    ) -> Result<Acknowledgement, ClientError> {
        (**self).cancel_invoice(uuid, reason).await
    }

    async fn respond_to_invoice(
        &self,
        uuid: Uuid,
        response: &InvoiceResponse,
    ) -> Result<Acknowledgement, ClientError> {
        (**self).respond_to_invoice(uuid, response).await
    }

    async fn get_invoice_document(
        &self,
        uuid: Uuid,
        format: DocumentFormat,
    ) -> Result<DocumentContent, ClientError> {
        (**self).get_invoice_document(uuid, format).await
    }

    async fn check_user(&self, tax_id: &str) -> Result<UserInfo, ClientError> {
        (**self).check_user(tax_id).await
    }

    async fn send_dispatch(&self, dispatch: &Dispatch) -> Result<SendResult, ClientError> {
        (**self).send_dispatch(dispatch).await
    }

    async fn get_dispatch_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        (**self).get_dispatch_status(uuid).await
    }

    async fn send_producer_receipt(
        &self,
        receipt: &ProducerReceipt,
    ) -> Result<SendResult, ClientError> {
        (**self).send_producer_receipt(receipt).await
    }

    async fn get_producer_receipt_status(&self, uuid: Uuid) -> Result<StatusInfo, ClientError> {
        (**self).get_producer_receipt_status(uuid).await
    }
}
