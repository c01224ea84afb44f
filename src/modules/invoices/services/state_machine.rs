use crate::core::PolicyError;
use crate::modules::invoices::models::{DocumentKind, InvoiceEvent, InvoiceStatus, RefundStatus};

/// Legal lifecycle transitions
///
/// ```text
/// Draft --publish--> AwaitingPayment --confirmed--> Paid --refund--> AwaitingRefund
///   ^                  |        |                                   |   |   |
///   +-----revoke-------+        +--expired--> Failed    settled/failed/cancelled
/// Draft --delete--> Cancelled
/// ```
pub struct InvoiceStateMachine;

impl InvoiceStateMachine {
    pub fn next(
        from: DocumentKind,
        event: InvoiceEvent,
    ) -> std::result::Result<DocumentKind, PolicyError> {
        use DocumentKind::{CreditNote, Invoice};

        let to = match (from, event) {
            (Invoice(InvoiceStatus::Draft), InvoiceEvent::Publish) => {
                Invoice(InvoiceStatus::AwaitingPayment)
            }
            (Invoice(InvoiceStatus::AwaitingPayment), InvoiceEvent::Revoke) => {
                Invoice(InvoiceStatus::Draft)
            }
            (Invoice(InvoiceStatus::Draft), InvoiceEvent::Delete) => Invoice(InvoiceStatus::Cancelled),
            (Invoice(InvoiceStatus::AwaitingPayment), InvoiceEvent::PaymentConfirmed) => {
                Invoice(InvoiceStatus::Paid)
            }
            (Invoice(InvoiceStatus::AwaitingPayment), InvoiceEvent::PaymentExpired) => {
                Invoice(InvoiceStatus::Failed)
            }
            (Invoice(InvoiceStatus::Paid), InvoiceEvent::RefundRequested) => {
                CreditNote(RefundStatus::AwaitingRefund)
            }
            (CreditNote(RefundStatus::AwaitingRefund), InvoiceEvent::RefundSettled) => {
                CreditNote(RefundStatus::Refunded)
            }
            (CreditNote(RefundStatus::AwaitingRefund), InvoiceEvent::RefundFailed) => {
                CreditNote(RefundStatus::Failed)
            }
            (CreditNote(RefundStatus::AwaitingRefund), InvoiceEvent::RefundCancelled) => {
                CreditNote(RefundStatus::Cancelled)
            }
            _ => return Err(PolicyError::InvalidTransition { from, event }),
        };

        Ok(to)
    }

    pub fn can_apply(from: DocumentKind, event: InvoiceEvent) -> bool {
        Self::next(from, event).is_ok()
    }

    /// Event that settles an awaiting refund into `status`, if any
    pub fn refund_outcome(status: RefundStatus) -> Option<InvoiceEvent> {
        match status {
            RefundStatus::AwaitingRefund => None,
            RefundStatus::Refunded => Some(InvoiceEvent::RefundSettled),
            RefundStatus::Failed => Some(InvoiceEvent::RefundFailed),
            RefundStatus::Cancelled => Some(InvoiceEvent::RefundCancelled),
        }
    }
}
