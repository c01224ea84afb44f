use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use super::backend_trait::{BillingBackend, TransportResult};
use crate::config::BackendConfig;
use crate::core::TransportError;
use crate::modules::backend::models::{
    Envelope, InvoiceDraftDto, InvoiceDto, InvoiceIdDto, PublishInvoiceDto, RefundDto,
    RefundRequestDto, SplitPaymentDto,
};

/// Billing backend reached over its JSON REST API
pub struct HttpBillingBackend {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpBillingBackend {
    pub fn new(config: &BackendConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/merchant/invoice/{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> TransportResult<Option<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "POST billing backend");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Billing backend unreachable");
                TransportError::from(e)
            })?;

        Self::decode(&url, response).await
    }

    async fn get<T>(&self, path: &str, invoice_id: &str) -> TransportResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, invoice_id, "GET billing backend");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("invoiceId", invoice_id)])
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "Billing backend unreachable");
                TransportError::from(e)
            })?;

        Self::decode(&url, response).await
    }

    /// Unwrap the `{code, message, data}` envelope
    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> TransportResult<Option<T>> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .map(|envelope| envelope.message)
                .unwrap_or(body);
            error!(url, status = status.as_u16(), message = %message, "Billing backend error status");
            return Err(TransportError::backend(i64::from(status.as_u16()), message));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if envelope.code != 0 {
            error!(url, code = envelope.code, message = %envelope.message, "Billing backend rejected request");
            return Err(TransportError::backend(envelope.code, envelope.message));
        }

        Ok(envelope.data)
    }

    fn required<T>(path: &str, data: Option<T>) -> TransportResult<T> {
        data.ok_or_else(|| TransportError::other(format!("Backend returned no data for {}", path)))
    }
}

#[async_trait]
impl BillingBackend for HttpBillingBackend {
    async fn create_invoice(&self, request: &InvoiceDraftDto) -> TransportResult<InvoiceDto> {
        let data = self.post("new", request).await?;
        Self::required("new", data)
    }

    async fn save_invoice(&self, request: &InvoiceDraftDto) -> TransportResult<InvoiceDto> {
        let data = self.post("edit", request).await?;
        Self::required("edit", data)
    }

    async fn publish_invoice(&self, request: &PublishInvoiceDto) -> TransportResult<()> {
        self.post::<_, serde_json::Value>("finish", request).await?;
        Ok(())
    }

    async fn revoke_invoice(&self, invoice_id: &str) -> TransportResult<()> {
        let body = InvoiceIdDto {
            invoice_id: invoice_id.to_string(),
        };
        self.post::<_, serde_json::Value>("cancel", &body).await?;
        Ok(())
    }

    async fn delete_invoice(&self, invoice_id: &str) -> TransportResult<()> {
        let body = InvoiceIdDto {
            invoice_id: invoice_id.to_string(),
        };
        self.post::<_, serde_json::Value>("delete", &body).await?;
        Ok(())
    }

    async fn refund(&self, request: &RefundRequestDto) -> TransportResult<RefundDto> {
        let data = self.post("refund", request).await?;
        Self::required("refund", data)
    }

    async fn get_split_payments(&self, invoice_id: &str) -> TransportResult<Vec<SplitPaymentDto>> {
        let data = self.get("split_payments", invoice_id).await?;
        Ok(data.unwrap_or_default())
    }

    async fn send_invoice_email(&self, invoice_id: &str) -> TransportResult<()> {
        let body = InvoiceIdDto {
            invoice_id: invoice_id.to_string(),
        };
        self.post::<_, serde_json::Value>("send_email", &body).await?;
        Ok(())
    }

    async fn get_invoice(&self, invoice_id: &str) -> TransportResult<InvoiceDto> {
        let data = self.get("detail", invoice_id).await?;
        Self::required("detail", data)
    }

    fn name(&self) -> &str {
        "http"
    }
}
