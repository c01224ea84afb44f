mod invoice;
mod lifecycle;
mod line_item;

pub use invoice::{Invoice, InvoiceMetadata};
pub use lifecycle::{DocumentKind, InvoiceAction, InvoiceEvent, InvoiceStatus, RefundStatus};
pub use line_item::{InvoiceLineItem, LineUpdate, MAX_DESCRIPTION_LEN};
