use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{CurrencyCode, Money};
use crate::modules::invoices::models::RefundStatus;

/// Longest refund comment the backend stores
pub const MAX_REFUND_REASON_LEN: usize = 64;

/// A refund issued against an invoice
///
/// Created together with the invoice's move onto the refund path and never
/// changed locally afterwards; status updates arrive through a refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    pub refund_id: Option<String>,
    pub refund_amount: Money,
    pub currency: CurrencyCode,
    pub refund_comment: String,
    pub status: RefundStatus,
    /// Split payment the refund was booked against
    pub payment_id: Option<String>,
    pub gateway_id: i64,
    pub refund_time: DateTime<Utc>,
}

/// What an operator asks for when refunding
#[derive(Debug, Clone, PartialEq)]
pub struct RefundRequest {
    pub amount: Money,
    pub reason: String,
    pub payment_id: Option<String>,
}

impl RefundRequest {
    pub fn new(amount: Money, reason: impl Into<String>) -> Self {
        Self {
            amount,
            reason: reason.into(),
            payment_id: None,
        }
    }

    pub fn against_payment(mut self, payment_id: impl Into<String>) -> Self {
        self.payment_id = Some(payment_id.into());
        self
    }
}
