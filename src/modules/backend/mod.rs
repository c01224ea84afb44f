// Billing backend adapter

pub mod models;
pub mod services;

pub use services::{BillingBackend, HttpBillingBackend, TransportResult, WireMapper};
