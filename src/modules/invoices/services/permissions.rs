// Permission matrix.
//
// Pure function of the document kind; the split-payment flag is accepted so
// callers pass the full wire state, but no row of the matrix depends on it.

use serde::Serialize;
use tracing::warn;

use crate::core::{EngineError, PolicyError, Result};
use crate::modules::invoices::models::{
    DocumentKind, Invoice, InvoiceAction, InvoiceStatus, RefundStatus,
};

/// Actions currently legal on a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InvoicePermissions {
    pub editable: bool,
    pub savable: bool,
    pub creatable: bool,
    pub publishable: bool,
    pub revokable: bool,
    pub deletable: bool,
    pub refundable: bool,
    pub downloadable: bool,
    pub sendable: bool,
}

impl InvoicePermissions {
    pub fn allows(&self, action: InvoiceAction) -> bool {
        match action {
            InvoiceAction::Edit => self.editable,
            InvoiceAction::Save => self.savable,
            InvoiceAction::Create => self.creatable,
            InvoiceAction::Publish => self.publishable,
            InvoiceAction::Revoke => self.revokable,
            InvoiceAction::Delete => self.deletable,
            InvoiceAction::Refund => self.refundable,
            InvoiceAction::Download => self.downloadable,
            InvoiceAction::SendEmail => self.sendable,
        }
    }

    pub fn ensure(&self, action: InvoiceAction) -> std::result::Result<(), PolicyError> {
        if self.allows(action) {
            Ok(())
        } else {
            Err(PolicyError::PermissionDenied(action))
        }
    }

    pub fn allowed_actions(&self) -> Vec<InvoiceAction> {
        InvoiceAction::ALL
            .into_iter()
            .filter(|action| self.allows(*action))
            .collect()
    }
}

/// Matrix lookup for a decoded document kind
pub fn permissions_for(kind: DocumentKind, _has_split_payment: bool) -> InvoicePermissions {
    match kind {
        DocumentKind::Invoice(InvoiceStatus::Draft) => InvoicePermissions {
            editable: true,
            savable: true,
            creatable: true,
            publishable: true,
            deletable: true,
            ..Default::default()
        },
        DocumentKind::Invoice(InvoiceStatus::AwaitingPayment) => InvoicePermissions {
            revokable: true,
            sendable: true,
            ..Default::default()
        },
        DocumentKind::Invoice(InvoiceStatus::Paid) => InvoicePermissions {
            refundable: true,
            downloadable: true,
            sendable: true,
            ..Default::default()
        },
        DocumentKind::CreditNote(RefundStatus::AwaitingRefund | RefundStatus::Refunded) => {
            InvoicePermissions {
                downloadable: true,
                ..Default::default()
            }
        }
        DocumentKind::Invoice(InvoiceStatus::Failed | InvoiceStatus::Cancelled)
        | DocumentKind::CreditNote(RefundStatus::Failed | RefundStatus::Cancelled) => {
            InvoicePermissions::default()
        }
    }
}

/// Matrix lookup straight from the backend's status code and flags
pub fn resolve(status: i32, has_refund: bool, has_split_payment: bool) -> Result<InvoicePermissions> {
    let kind = DocumentKind::from_wire(status, has_refund)?;
    Ok(permissions_for(kind, has_split_payment))
}

/// Fails with `PermissionDenied` unless `action` is legal on `invoice` right now
pub(crate) fn guard(invoice: &Invoice, action: InvoiceAction) -> Result<()> {
    invoice.permissions().ensure(action).map_err(|e| {
        warn!(
            invoice_id = invoice.invoice_id().unwrap_or("<new>"),
            kind = %invoice.kind(),
            action = %action,
            "Action rejected by permission matrix"
        );
        EngineError::from(e)
    })
}
