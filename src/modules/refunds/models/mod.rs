mod credit_note;
mod refund;
mod split_payment;

pub use credit_note::CreditNote;
pub use refund::{Refund, RefundRequest, MAX_REFUND_REASON_LEN};
pub use split_payment::{SplitPayment, SplitPaymentStatus};
