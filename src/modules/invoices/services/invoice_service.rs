use std::sync::Arc;

use tracing::{error, info};

use crate::core::{CurrencyRegistry, EngineError, PolicyError, Result, TransportError};
use crate::modules::backend::models::PublishInvoiceDto;
use crate::modules::backend::{BillingBackend, WireMapper};
use crate::modules::invoices::models::{Invoice, InvoiceAction, InvoiceEvent};
use crate::modules::invoices::services::invoice_editor::InvoiceEditor;
use crate::modules::invoices::services::line_item_calculator::LineItemCalculator;
use crate::modules::invoices::services::permissions::guard;
use crate::modules::invoices::services::state_machine::InvoiceStateMachine;

/// How the published invoice is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOptions {
    /// Backend payment-method code
    pub pay_method: i32,
    pub days_until_due: u32,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            pay_method: 1,
            days_until_due: 30,
        }
    }
}

/// Invoice lifecycle operations against the billing backend
///
/// Each operation checks the permission matrix and validates input before
/// any network call, then applies the backend's answer in one step. When the
/// backend call fails the invoice passed in is left exactly as it was.
pub struct InvoiceService {
    backend: Arc<dyn BillingBackend>,
    registry: Arc<CurrencyRegistry>,
}

impl InvoiceService {
    pub fn new(backend: Arc<dyn BillingBackend>, registry: Arc<CurrencyRegistry>) -> Self {
        Self { backend, registry }
    }

    pub fn registry(&self) -> &CurrencyRegistry {
        &self.registry
    }

    /// Start editing a draft
    pub fn editor<'a>(&'a self, invoice: &'a mut Invoice) -> Result<InvoiceEditor<'a>> {
        InvoiceEditor::open(invoice, &self.registry)
    }

    /// Create a locally composed draft on the backend
    ///
    /// With `finish` the backend publishes it in the same call.
    pub async fn create(&self, invoice: &mut Invoice, finish: bool) -> Result<()> {
        guard(invoice, InvoiceAction::Create)?;
        if invoice.invoice_id().is_some() {
            return Err(PolicyError::PermissionDenied(InvoiceAction::Create).into());
        }
        self.validate_submission(invoice)?;

        let mapper = WireMapper::new(&self.registry);
        let request = mapper.draft_request(invoice, finish)?;
        let dto = self
            .backend
            .create_invoice(&request)
            .await
            .map_err(|e| transport_failure("create", None, e))?;
        let created = mapper.invoice(&dto)?;

        info!(
            invoice_id = %dto.invoice_id,
            total = %created.total_amount(),
            currency = %created.currency(),
            finish,
            "Invoice created"
        );

        *invoice = created;
        Ok(())
    }

    pub async fn save(&self, invoice: &mut Invoice) -> Result<()> {
        guard(invoice, InvoiceAction::Save)?;
        let invoice_id = invoice.require_id()?.to_string();
        self.validate_submission(invoice)?;

        let mapper = WireMapper::new(&self.registry);
        let request = mapper.draft_request(invoice, false)?;
        let dto = self
            .backend
            .save_invoice(&request)
            .await
            .map_err(|e| transport_failure("save", Some(invoice_id.as_str()), e))?;
        let saved = mapper.invoice(&dto)?;

        info!(
            invoice_id = %invoice_id,
            total = %saved.total_amount(),
            lines = saved.lines().len(),
            "Invoice saved"
        );

        *invoice = saved;
        Ok(())
    }

    /// Send the draft to the customer; the backend issues the payment link
    pub async fn publish(&self, invoice: &mut Invoice, options: PublishOptions) -> Result<()> {
        guard(invoice, InvoiceAction::Publish)?;
        let invoice_id = invoice.require_id()?.to_string();
        self.validate_submission(invoice)?;
        let next = InvoiceStateMachine::next(invoice.kind(), InvoiceEvent::Publish)?;

        let request = PublishInvoiceDto {
            invoice_id: invoice_id.clone(),
            pay_method: options.pay_method,
            days_until_due: options.days_until_due,
        };
        self.backend
            .publish_invoice(&request)
            .await
            .map_err(|e| transport_failure("publish", Some(invoice_id.as_str()), e))?;

        info!(invoice_id = %invoice_id, days_until_due = options.days_until_due, "Invoice published");
        invoice.kind = next;
        Ok(())
    }

    /// Pull a published invoice back to draft
    pub async fn revoke(&self, invoice: &mut Invoice) -> Result<()> {
        guard(invoice, InvoiceAction::Revoke)?;
        let invoice_id = invoice.require_id()?.to_string();
        let next = InvoiceStateMachine::next(invoice.kind(), InvoiceEvent::Revoke)?;

        self.backend
            .revoke_invoice(&invoice_id)
            .await
            .map_err(|e| transport_failure("revoke", Some(invoice_id.as_str()), e))?;

        info!(invoice_id = %invoice_id, "Invoice revoked");
        invoice.kind = next;
        invoice.payment_link = None;
        Ok(())
    }

    /// Delete a draft; the local copy is kept as a cancelled tombstone
    ///
    /// A draft that was never created is tombstoned without a backend call.
    pub async fn delete(&self, invoice: &mut Invoice) -> Result<()> {
        guard(invoice, InvoiceAction::Delete)?;
        let next = InvoiceStateMachine::next(invoice.kind(), InvoiceEvent::Delete)?;

        if let Some(invoice_id) = invoice.invoice_id().map(str::to_string) {
            self.backend
                .delete_invoice(&invoice_id)
                .await
                .map_err(|e| transport_failure("delete", Some(invoice_id.as_str()), e))?;
            info!(invoice_id = %invoice_id, "Invoice deleted");
        }

        invoice.kind = next;
        Ok(())
    }

    pub async fn send_email(&self, invoice: &Invoice) -> Result<()> {
        guard(invoice, InvoiceAction::SendEmail)?;
        let invoice_id = invoice.require_id()?;

        self.backend
            .send_invoice_email(invoice_id)
            .await
            .map_err(|e| transport_failure("send_email", Some(invoice_id), e))?;

        info!(invoice_id = %invoice_id, "Invoice email sent");
        Ok(())
    }

    pub async fn fetch(&self, invoice_id: &str) -> Result<Invoice> {
        let dto = self
            .backend
            .get_invoice(invoice_id)
            .await
            .map_err(|e| transport_failure("fetch", Some(invoice_id), e))?;
        WireMapper::new(&self.registry).invoice(&dto)
    }

    /// Replace the local copy with the backend's current state
    ///
    /// This is how backend-driven transitions (payment confirmed or expired,
    /// refund settled) become visible.
    pub async fn refresh(&self, invoice: &mut Invoice) -> Result<()> {
        let invoice_id = invoice.require_id()?.to_string();
        let fresh = self.fetch(&invoice_id).await?;

        if fresh.kind() != invoice.kind() {
            info!(
                invoice_id = %invoice_id,
                from = %invoice.kind(),
                to = %fresh.kind(),
                "Observed invoice state change"
            );
        }

        *invoice = fresh;
        Ok(())
    }

    fn validate_submission(&self, invoice: &Invoice) -> Result<()> {
        LineItemCalculator::validate(invoice.lines(), invoice.tax_percentage())?;

        let currency = self.registry.get(invoice.currency())?;
        for line in invoice.lines() {
            currency
                .validate_precision(line.unit_amount_excluding_tax().amount())
                .map_err(EngineError::invalid_amount)?;
            if let Some(discount) = line.discount_amount() {
                currency
                    .validate_precision(discount.amount())
                    .map_err(EngineError::invalid_amount)?;
            }
        }

        Ok(())
    }
}

pub(crate) fn transport_failure(
    operation: &'static str,
    invoice_id: Option<&str>,
    cause: TransportError,
) -> EngineError {
    error!(
        operation,
        invoice_id = invoice_id.unwrap_or("<new>"),
        error = %cause,
        "Billing backend call failed"
    );
    EngineError::Transport(cause)
}
