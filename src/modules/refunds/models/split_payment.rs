use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{CurrencyCode, Money};

/// Settlement state of one installment of a split-paid invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPaymentStatus {
    Pending,
    Success,
    Failure,
    Cancel,
}

impl SplitPaymentStatus {
    pub fn code(&self) -> i32 {
        match self {
            SplitPaymentStatus::Pending => 1,
            SplitPaymentStatus::Success => 2,
            SplitPaymentStatus::Failure => 3,
            SplitPaymentStatus::Cancel => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(SplitPaymentStatus::Pending),
            2 => Some(SplitPaymentStatus::Success),
            3 => Some(SplitPaymentStatus::Failure),
            4 => Some(SplitPaymentStatus::Cancel),
            _ => None,
        }
    }
}

/// One transaction that paid part of an invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPayment {
    pub payment_id: String,
    pub gateway_name: String,
    pub total_amount: Money,
    pub currency: CurrencyCode,
    pub status: SplitPaymentStatus,
    pub create_time: DateTime<Utc>,
}

impl SplitPayment {
    /// Only settled payments can be refunded
    pub fn is_refundable(&self) -> bool {
        self.status == SplitPaymentStatus::Success
    }
}
