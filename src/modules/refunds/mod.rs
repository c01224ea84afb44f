// Refunds and credit notes

pub mod models;
pub mod services;

pub use models::{
    CreditNote, Refund, RefundRequest, SplitPayment, SplitPaymentStatus, MAX_REFUND_REASON_LEN,
};
pub use services::{RefundPlan, RefundPlanner, RefundService};
