use serde::Serialize;

use crate::core::{CurrencyDescriptor, EngineError, Money, PolicyError, Result, ValidationError};
use crate::modules::invoices::models::{Invoice, InvoiceAction};
use crate::modules::invoices::services::permissions::guard;
use crate::modules::refunds::models::{RefundRequest, SplitPayment, MAX_REFUND_REASON_LEN};

/// A refund that passed every local check and can be sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundPlan {
    pub amount: Money,
    /// Trimmed reason
    pub reason: String,
    /// Payment to refund against, set only for split-paid invoices
    pub payment_id: Option<String>,
    pub max_refundable: Money,
}

/// Validates refund requests
///
/// Checks run in a fixed order and stop at the first failure: permission,
/// reason, amount, then the refundable ceiling.
pub struct RefundPlanner;

impl RefundPlanner {
    /// Checks that need no backend data
    pub fn precheck(
        invoice: &Invoice,
        request: &RefundRequest,
        currency: &CurrencyDescriptor,
    ) -> Result<()> {
        guard(invoice, InvoiceAction::Refund)?;

        let reason = request.reason.trim();
        let reason_len = reason.chars().count();
        if reason_len == 0 || reason_len > MAX_REFUND_REASON_LEN {
            return Err(ValidationError::InvalidRefundReason(format!(
                "reason must be between 1 and {} characters, got {}",
                MAX_REFUND_REASON_LEN, reason_len
            ))
            .into());
        }

        if !request.amount.is_positive() {
            return Err(EngineError::invalid_amount(format!(
                "refund amount must be positive, got {}",
                request.amount
            )));
        }

        currency
            .validate_precision(request.amount.amount())
            .map_err(EngineError::invalid_amount)?;

        Ok(())
    }

    /// Full validation; `split_payments` is ignored unless the invoice is split-paid
    pub fn plan(
        invoice: &Invoice,
        request: &RefundRequest,
        split_payments: &[SplitPayment],
        currency: &CurrencyDescriptor,
    ) -> Result<RefundPlan> {
        Self::precheck(invoice, request, currency)?;

        let (max_refundable, payment_id) = if invoice.metadata().has_split_payment {
            let payment = Self::select_payment(split_payments, request.payment_id.as_deref())?;
            (payment.total_amount, Some(payment.payment_id.clone()))
        } else {
            (invoice.total_amount(), None)
        };

        if request.amount > max_refundable {
            return Err(PolicyError::AmountExceedsRefundable(max_refundable).into());
        }

        Ok(RefundPlan {
            amount: request.amount,
            reason: request.reason.trim().to_string(),
            payment_id,
            max_refundable,
        })
    }

    /// Pick the settled payment a refund is booked against
    pub fn select_payment<'p>(
        split_payments: &'p [SplitPayment],
        selected: Option<&str>,
    ) -> std::result::Result<&'p SplitPayment, PolicyError> {
        let mut refundable = split_payments.iter().filter(|p| p.is_refundable());

        match selected {
            Some(id) => refundable
                .find(|p| p.payment_id == id)
                .ok_or_else(|| PolicyError::PaymentNotRefundable(id.to_string())),
            None => match (refundable.next(), refundable.next()) {
                (Some(only), None) => Ok(only),
                (Some(_), Some(_)) => Err(PolicyError::PaymentSelectionRequired),
                (None, _) => Err(PolicyError::NoRefundablePayment),
            },
        }
    }
}
