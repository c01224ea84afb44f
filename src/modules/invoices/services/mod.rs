pub mod invoice_editor;
pub mod invoice_service;
pub mod line_item_calculator;
pub mod permissions;
pub mod state_machine;

pub use invoice_editor::InvoiceEditor;
pub use invoice_service::{InvoiceService, PublishOptions};
pub use line_item_calculator::{LineItemCalculator, LineTotals};
pub use permissions::{permissions_for, resolve, InvoicePermissions};
pub use state_machine::InvoiceStateMachine;
