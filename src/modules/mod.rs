pub mod backend;
pub mod invoices;
pub mod refunds;
