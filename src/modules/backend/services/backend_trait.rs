use async_trait::async_trait;

use crate::core::TransportError;
use crate::modules::backend::models::{
    InvoiceDraftDto, InvoiceDto, PublishInvoiceDto, RefundDto, RefundRequestDto, SplitPaymentDto,
};

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Remote billing system the console drives
///
/// All amounts cross this boundary as integer minor units. Implementations
/// report every failure as a `TransportError` and never retry.
#[async_trait]
pub trait BillingBackend: Send + Sync {
    /// Create a draft (or, with `finish`, create and publish it)
    async fn create_invoice(&self, request: &InvoiceDraftDto) -> TransportResult<InvoiceDto>;

    /// Overwrite an existing draft; `request.invoice_id` is set
    async fn save_invoice(&self, request: &InvoiceDraftDto) -> TransportResult<InvoiceDto>;

    /// Issue the payment link
    async fn publish_invoice(&self, request: &PublishInvoiceDto) -> TransportResult<()>;

    async fn revoke_invoice(&self, invoice_id: &str) -> TransportResult<()>;

    async fn delete_invoice(&self, invoice_id: &str) -> TransportResult<()>;

    async fn refund(&self, request: &RefundRequestDto) -> TransportResult<RefundDto>;

    async fn get_split_payments(&self, invoice_id: &str) -> TransportResult<Vec<SplitPaymentDto>>;

    async fn send_invoice_email(&self, invoice_id: &str) -> TransportResult<()>;

    async fn get_invoice(&self, invoice_id: &str) -> TransportResult<InvoiceDto>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
