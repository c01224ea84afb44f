use std::sync::Arc;

use tracing::info;

use crate::core::{CurrencyRegistry, Result};
use crate::modules::backend::{BillingBackend, WireMapper};
use crate::modules::invoices::models::{Invoice, InvoiceEvent};
use crate::modules::invoices::services::invoice_service::transport_failure;
use crate::modules::invoices::services::line_item_calculator::LineItemCalculator;
use crate::modules::invoices::services::state_machine::InvoiceStateMachine;
use crate::modules::refunds::models::{CreditNote, RefundRequest, SplitPayment};
use crate::modules::refunds::services::refund_planner::RefundPlanner;

/// Refunds paid invoices and turns them into credit notes
pub struct RefundService {
    backend: Arc<dyn BillingBackend>,
    registry: Arc<CurrencyRegistry>,
}

impl RefundService {
    pub fn new(backend: Arc<dyn BillingBackend>, registry: Arc<CurrencyRegistry>) -> Self {
        Self { backend, registry }
    }

    /// Every payment recorded against a split-paid invoice
    pub async fn split_payments(&self, invoice: &Invoice) -> Result<Vec<SplitPayment>> {
        let invoice_id = invoice.require_id()?;
        let dtos = self
            .backend
            .get_split_payments(invoice_id)
            .await
            .map_err(|e| transport_failure("split_payments", Some(invoice_id), e))?;

        let mapper = WireMapper::new(&self.registry);
        dtos.iter().map(|dto| mapper.split_payment(dto)).collect()
    }

    /// Payments a refund may be booked against, for a payment picker
    ///
    /// Empty for invoices paid in one go.
    pub async fn refundable_payments(&self, invoice: &Invoice) -> Result<Vec<SplitPayment>> {
        if !invoice.metadata().has_split_payment {
            return Ok(Vec::new());
        }

        let payments = self.split_payments(invoice).await?;
        Ok(payments.into_iter().filter(SplitPayment::is_refundable).collect())
    }

    /// Refund `invoice` and return its credit-note view
    ///
    /// On success the invoice carries the refund and sits on the refund path;
    /// a second call fails because the invoice is no longer refundable. On
    /// any failure the invoice is unchanged.
    pub async fn refund(&self, invoice: &mut Invoice, request: RefundRequest) -> Result<CreditNote> {
        let currency = self.registry.get(invoice.currency())?;
        RefundPlanner::precheck(invoice, &request, currency)?;
        let invoice_id = invoice.require_id()?.to_string();

        let split_payments = if invoice.metadata().has_split_payment {
            self.split_payments(invoice).await?
        } else {
            Vec::new()
        };
        let plan = RefundPlanner::plan(invoice, &request, &split_payments, currency)?;
        let totals = LineItemCalculator::totals(invoice.lines(), invoice.tax_percentage())?;

        let mut next = InvoiceStateMachine::next(invoice.kind(), InvoiceEvent::RefundRequested)?;

        let mapper = WireMapper::new(&self.registry);
        let dto = mapper.refund_request(&invoice_id, &plan, invoice.currency())?;
        let response = self
            .backend
            .refund(&dto)
            .await
            .map_err(|e| transport_failure("refund", Some(invoice_id.as_str()), e))?;
        let refund = mapper.refund(&response)?;

        // The backend may settle synchronously
        if let Some(outcome) = InvoiceStateMachine::refund_outcome(refund.status) {
            next = InvoiceStateMachine::next(next, outcome)?;
        }

        info!(
            invoice_id = %invoice_id,
            amount = %plan.amount,
            max_refundable = %plan.max_refundable,
            currency = %invoice.currency(),
            payment_id = plan.payment_id.as_deref().unwrap_or("-"),
            state = %next,
            "Refund issued"
        );

        invoice.refund = Some(refund.clone());
        invoice.kind = next;
        Ok(CreditNote::mirror(invoice, refund, &totals, currency))
    }
}
