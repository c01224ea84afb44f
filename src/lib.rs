//! Billing Console Library
//!
//! Monetary computation and lifecycle engine for the billing console:
//! minor-unit normalization, line-item totals, the invoice state machine and
//! permission matrix, and the refund / credit-note workflow.

pub mod cli;
pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::backend;
pub use modules::invoices;
pub use modules::refunds;
