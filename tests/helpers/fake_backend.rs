use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use billing_console::core::{MinorUnits, TransportError};
use billing_console::modules::backend::models::{
    InvoiceDraftDto, InvoiceDto, InvoiceMetadataDto, PublishInvoiceDto, RefundDto,
    RefundRequestDto, SplitPaymentDto,
};
use billing_console::modules::backend::{BillingBackend, TransportResult};

#[derive(Default)]
struct State {
    invoices: HashMap<String, InvoiceDto>,
    split_payments: HashMap<String, Vec<SplitPaymentDto>>,
    calls: Vec<String>,
    fail_next: Option<(i64, String)>,
    refund_status: Option<i32>,
    refund_requests: Vec<RefundRequestDto>,
    next_id: u32,
}

/// In-memory billing backend
///
/// Behaves like the real backend for the happy path: ids are assigned on
/// create, totals are summed from the submitted lines, publish issues a
/// payment link and refunds attach a refund record to the invoice.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoice(self, invoice: InvoiceDto) -> Self {
        self.state
            .lock()
            .unwrap()
            .invoices
            .insert(invoice.invoice_id.clone(), invoice);
        self
    }

    pub fn with_split_payments(self, invoice_id: &str, payments: Vec<SplitPaymentDto>) -> Self {
        self.state
            .lock()
            .unwrap()
            .split_payments
            .insert(invoice_id.to_string(), payments);
        self
    }

    /// Status code the next refunds come back with (default: awaiting refund)
    pub fn with_refund_status(self, status: i32) -> Self {
        self.state.lock().unwrap().refund_status = Some(status);
        self
    }

    /// Make the next backend call fail with a rejection
    pub fn fail_next(&self, code: i64, message: &str) {
        self.state.lock().unwrap().fail_next = Some((code, message.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn refund_requests(&self) -> Vec<RefundRequestDto> {
        self.state.lock().unwrap().refund_requests.clone()
    }

    pub fn stored(&self, invoice_id: &str) -> Option<InvoiceDto> {
        self.state.lock().unwrap().invoices.get(invoice_id).cloned()
    }

    /// Simulate a backend-driven status change (payment confirmed, expired ...)
    pub fn set_status(&self, invoice_id: &str, status: i32) {
        if let Some(invoice) = self.state.lock().unwrap().invoices.get_mut(invoice_id) {
            invoice.status = status;
        }
    }

    fn begin(&self, call: &str) -> TransportResult<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        match state.fail_next.take() {
            Some((code, message)) => Err(TransportError::backend(code, message)),
            None => Ok(state),
        }
    }

    fn materialize(id: String, request: &InvoiceDraftDto, status: i32) -> InvoiceDto {
        let subtotal: i64 = request
            .lines
            .iter()
            .map(|l| l.amount_excluding_tax.value())
            .sum();
        let tax: i64 = request.lines.iter().map(|l| l.tax.value()).sum();

        InvoiceDto {
            invoice_id: id.clone(),
            status,
            currency: request.currency.clone(),
            tax_percentage: request.tax_percentage,
            lines: request.lines.clone(),
            subscription_id: None,
            user_id: request.user_id,
            name: request.name.clone(),
            subtotal_excluding_tax: MinorUnits::new(subtotal),
            tax_amount: MinorUnits::new(tax),
            total_amount: MinorUnits::new(subtotal + tax),
            discount_amount: MinorUnits::new(0),
            promo_credit_discount_amount: MinorUnits::new(0),
            refund: None,
            metadata: InvoiceMetadataDto::default(),
            link: (status == 2).then(|| format!("https://pay.example.com/{}", id)),
            updated_at: Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
        }
    }

    fn not_found(invoice_id: &str) -> TransportError {
        TransportError::backend(404, format!("invoice {} not found", invoice_id))
    }
}

#[async_trait]
impl BillingBackend for FakeBackend {
    async fn create_invoice(&self, request: &InvoiceDraftDto) -> TransportResult<InvoiceDto> {
        let mut state = self.begin("create_invoice")?;
        state.next_id += 1;
        let id = format!("inv_{}", state.next_id);
        let status = if request.finish { 2 } else { 1 };
        let invoice = Self::materialize(id.clone(), request, status);
        state.invoices.insert(id, invoice.clone());
        Ok(invoice)
    }

    async fn save_invoice(&self, request: &InvoiceDraftDto) -> TransportResult<InvoiceDto> {
        let mut state = self.begin("save_invoice")?;
        let id = request.invoice_id.clone().unwrap_or_default();
        if !state.invoices.contains_key(&id) {
            return Err(Self::not_found(&id));
        }
        let invoice = Self::materialize(id.clone(), request, 1);
        state.invoices.insert(id, invoice.clone());
        Ok(invoice)
    }

    async fn publish_invoice(&self, request: &PublishInvoiceDto) -> TransportResult<()> {
        let mut state = self.begin("publish_invoice")?;
        let invoice = state
            .invoices
            .get_mut(&request.invoice_id)
            .ok_or_else(|| Self::not_found(&request.invoice_id))?;
        invoice.status = 2;
        invoice.link = Some(format!("https://pay.example.com/{}", request.invoice_id));
        Ok(())
    }

    async fn revoke_invoice(&self, invoice_id: &str) -> TransportResult<()> {
        let mut state = self.begin("revoke_invoice")?;
        let invoice = state
            .invoices
            .get_mut(invoice_id)
            .ok_or_else(|| Self::not_found(invoice_id))?;
        invoice.status = 1;
        invoice.link = None;
        Ok(())
    }

    async fn delete_invoice(&self, invoice_id: &str) -> TransportResult<()> {
        let mut state = self.begin("delete_invoice")?;
        state
            .invoices
            .remove(invoice_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(invoice_id))
    }

    async fn refund(&self, request: &RefundRequestDto) -> TransportResult<RefundDto> {
        let mut state = self.begin("refund")?;
        state.refund_requests.push(request.clone());
        let status = state.refund_status.unwrap_or(2);
        let invoice = state
            .invoices
            .get_mut(&request.invoice_id)
            .ok_or_else(|| Self::not_found(&request.invoice_id))?;

        let refund = RefundDto {
            refund_id: Some(format!("rf_{}", request.invoice_id)),
            refund_amount: request.refund_amount,
            currency: invoice.currency.clone(),
            refund_comment: request.reason.clone(),
            status,
            payment_id: request.payment_id.clone(),
            gateway_id: 1,
            refund_time: Utc.timestamp_opt(1_700_100_000, 0).unwrap(),
        };
        invoice.status = status;
        invoice.refund = Some(refund.clone());
        Ok(refund)
    }

    async fn get_split_payments(&self, invoice_id: &str) -> TransportResult<Vec<SplitPaymentDto>> {
        let state = self.begin("get_split_payments")?;
        Ok(state.split_payments.get(invoice_id).cloned().unwrap_or_default())
    }

    async fn send_invoice_email(&self, invoice_id: &str) -> TransportResult<()> {
        let state = self.begin("send_invoice_email")?;
        if state.invoices.contains_key(invoice_id) {
            Ok(())
        } else {
            Err(Self::not_found(invoice_id))
        }
    }

    async fn get_invoice(&self, invoice_id: &str) -> TransportResult<InvoiceDto> {
        let state = self.begin("get_invoice")?;
        state
            .invoices
            .get(invoice_id)
            .cloned()
            .ok_or_else(|| Self::not_found(invoice_id))
    }

    fn name(&self) -> &str {
        "fake"
    }
}
