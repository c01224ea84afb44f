// Lifecycle vocabulary shared by the state machine, the permission resolver
// and the wire mapper.
//
// The backend reuses status codes 2 and 3 for both "awaiting payment / paid"
// and "awaiting refund / refunded", telling them apart only by whether a
// refund record is attached. `DocumentKind` decodes that pair once at the
// boundary so nothing downstream can confuse the two paths.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{EngineError, Result};

/// Payment path of a regular invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Composed by an operator, still editable
    Draft,
    /// Published, payment link issued
    AwaitingPayment,
    /// Settled by the payment gateway
    Paid,
    /// Payment not completed in time
    Failed,
    /// Revoked or deleted
    Cancelled,
}

impl InvoiceStatus {
    pub fn code(&self) -> i32 {
        match self {
            InvoiceStatus::Draft => 1,
            InvoiceStatus::AwaitingPayment => 2,
            InvoiceStatus::Paid => 3,
            InvoiceStatus::Failed => 4,
            InvoiceStatus::Cancelled => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(InvoiceStatus::Draft),
            2 => Some(InvoiceStatus::AwaitingPayment),
            3 => Some(InvoiceStatus::Paid),
            4 => Some(InvoiceStatus::Failed),
            5 => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }
}

/// Refund path of a credit note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    AwaitingRefund,
    Refunded,
    Failed,
    Cancelled,
}

impl RefundStatus {
    pub fn code(&self) -> i32 {
        match self {
            RefundStatus::AwaitingRefund => 2,
            RefundStatus::Refunded => 3,
            RefundStatus::Failed => 4,
            RefundStatus::Cancelled => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            2 => Some(RefundStatus::AwaitingRefund),
            3 => Some(RefundStatus::Refunded),
            4 => Some(RefundStatus::Failed),
            5 => Some(RefundStatus::Cancelled),
            _ => None,
        }
    }
}

/// What a billing document is and where it sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice(InvoiceStatus),
    CreditNote(RefundStatus),
}

impl DocumentKind {
    /// Decode the backend's overloaded `(status, refund attached)` pair
    pub fn from_wire(status: i32, has_refund: bool) -> Result<Self> {
        let kind = if has_refund {
            RefundStatus::from_code(status).map(DocumentKind::CreditNote)
        } else {
            InvoiceStatus::from_code(status).map(DocumentKind::Invoice)
        };

        kind.ok_or_else(|| {
            tracing::error!(status, has_refund, "Undecodable invoice status from backend");
            EngineError::UnknownInvoiceState { status, has_refund }
        })
    }

    /// Numeric status code as the backend stores it
    pub fn wire_code(&self) -> i32 {
        match self {
            DocumentKind::Invoice(status) => status.code(),
            DocumentKind::CreditNote(status) => status.code(),
        }
    }

    pub fn is_credit_note(&self) -> bool {
        matches!(self, DocumentKind::CreditNote(_))
    }

    /// No transition leaves this state
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            DocumentKind::Invoice(InvoiceStatus::Failed)
                | DocumentKind::Invoice(InvoiceStatus::Cancelled)
                | DocumentKind::CreditNote(RefundStatus::Refunded)
                | DocumentKind::CreditNote(RefundStatus::Failed)
                | DocumentKind::CreditNote(RefundStatus::Cancelled)
        )
    }
}

impl Default for DocumentKind {
    fn default() -> Self {
        DocumentKind::Invoice(InvoiceStatus::Draft)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Invoice(status) => write!(f, "invoice/{:?}", status),
            DocumentKind::CreditNote(status) => write!(f, "credit_note/{:?}", status),
        }
    }
}

/// Something that moves a document to another state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceEvent {
    Publish,
    Revoke,
    Delete,
    /// Backend-driven: gateway or admin override settled the payment
    PaymentConfirmed,
    /// Backend-driven: payment window elapsed
    PaymentExpired,
    RefundRequested,
    RefundSettled,
    RefundFailed,
    RefundCancelled,
}

/// Operator actions gated by the permission matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceAction {
    Edit,
    Save,
    Create,
    Publish,
    Revoke,
    Delete,
    Refund,
    Download,
    SendEmail,
}

impl InvoiceAction {
    pub const ALL: [InvoiceAction; 9] = [
        InvoiceAction::Edit,
        InvoiceAction::Save,
        InvoiceAction::Create,
        InvoiceAction::Publish,
        InvoiceAction::Revoke,
        InvoiceAction::Delete,
        InvoiceAction::Refund,
        InvoiceAction::Download,
        InvoiceAction::SendEmail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceAction::Edit => "edit",
            InvoiceAction::Save => "save",
            InvoiceAction::Create => "create",
            InvoiceAction::Publish => "publish",
            InvoiceAction::Revoke => "revoke",
            InvoiceAction::Delete => "delete",
            InvoiceAction::Refund => "refund",
            InvoiceAction::Download => "download",
            InvoiceAction::SendEmail => "send_email",
        }
    }
}

impl fmt::Display for InvoiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
