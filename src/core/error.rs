use crate::core::money::Money;
use crate::modules::invoices::models::{DocumentKind, InvoiceAction, InvoiceEvent};

/// Engine-wide Result type
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main engine error type
///
/// Validation and policy errors are raised before any backend call and carry
/// user-facing messages. Transport errors leave local state untouched.
/// `UnknownCurrency` and `UnknownInvoiceState` indicate bad reference data.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Local, pre-submission input errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// State-machine guard violations
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Backend or network failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Currency code missing from the registry
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Status code that cannot be decoded for the given refund flag
    #[error("Unknown invoice state: status {status} (refund attached: {has_refund})")]
    UnknownInvoiceState { status: i32, has_refund: bool },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Input validation failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    #[error("Line item not found: {0}")]
    LineNotFound(String),

    #[error("Invalid tax percentage: {0}")]
    InvalidTaxPercentage(String),

    #[error("Invalid refund reason: {0}")]
    InvalidRefundReason(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invoice has not been created yet")]
    NotCreated,
}

/// Business rule violations resolved before any backend call
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Action '{0}' is not permitted in the current invoice state")]
    PermissionDenied(InvoiceAction),

    #[error("Cannot apply '{event:?}' to a document in state {from:?}")]
    InvalidTransition {
        from: DocumentKind,
        event: InvoiceEvent,
    },

    #[error("Invoice was paid in several installments, select the payment to refund")]
    PaymentSelectionRequired,

    #[error("Payment {0} is not a settled payment of this invoice")]
    PaymentNotRefundable(String),

    #[error("Invoice has no settled payment to refund")]
    NoRefundablePayment,

    #[error("Refund amount exceeds the refundable maximum of {0}")]
    AmountExceedsRefundable(Money),
}

/// Opaque backend failure, surfaced verbatim to the caller
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// Request could not be sent or the connection failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with an error status or envelope code
    #[error("Backend rejected request ({code}): {message}")]
    Backend { code: i64, message: String },

    /// Response body could not be decoded
    #[error("Malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Anything else reported by a non-HTTP backend
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    pub fn invalid_line_item(reason: impl Into<String>) -> Self {
        EngineError::Validation(ValidationError::InvalidLineItem(reason.into()))
    }

    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        EngineError::Validation(ValidationError::InvalidAmount(reason.into()))
    }

    pub fn permission_denied(action: InvoiceAction) -> Self {
        EngineError::Policy(PolicyError::PermissionDenied(action))
    }

    pub fn unknown_currency(code: impl Into<String>) -> Self {
        EngineError::UnknownCurrency(code.into())
    }

    /// Errors whose message can be shown to the operator as-is
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_) | EngineError::Policy(_) | EngineError::Transport(_)
        )
    }

    /// Errors that point at bad reference data rather than user input
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownCurrency(_) | EngineError::UnknownInvoiceState { .. }
        )
    }
}

impl TransportError {
    pub fn backend(code: i64, message: impl Into<String>) -> Self {
        TransportError::Backend {
            code,
            message: message.into(),
        }
    }

    pub fn other(cause: impl Into<String>) -> Self {
        TransportError::Other(cause.into())
    }
}
