// Invoices module

pub mod models;
pub mod services;

pub use models::{
    DocumentKind, Invoice, InvoiceAction, InvoiceEvent, InvoiceLineItem, InvoiceMetadata,
    InvoiceStatus, LineUpdate, RefundStatus,
};
pub use services::{
    permissions_for, resolve, InvoiceEditor, InvoicePermissions, InvoiceService,
    InvoiceStateMachine, LineItemCalculator, LineTotals, PublishOptions,
};
