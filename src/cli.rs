//! Admin command line: argument definitions and command execution.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::core::{CurrencyRegistry, Money};
use crate::modules::backend::BillingBackend;
use crate::modules::invoices::{resolve, DocumentKind, InvoiceService, PublishOptions};
use crate::modules::refunds::{RefundRequest, RefundService};

#[derive(Parser, Debug)]
#[command(name = "billing-console")]
#[command(version)]
#[command(about = "Inspect and drive invoices on the billing backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Print the permission matrix row for a wire status (offline)
    Permissions {
        /// Backend status code (1-5)
        status: i32,

        /// A refund record is attached
        #[arg(long)]
        has_refund: bool,

        /// The invoice was paid in several installments
        #[arg(long)]
        split_payment: bool,
    },

    /// Show an invoice with its current permissions
    Show { invoice_id: String },

    /// Publish a draft and issue its payment link
    Publish {
        invoice_id: String,

        /// Backend payment-method code
        #[arg(long, default_value_t = 1)]
        pay_method: i32,

        #[arg(long, default_value_t = 30)]
        days_until_due: u32,
    },

    /// Pull a published invoice back to draft
    Revoke { invoice_id: String },

    /// Delete a draft
    Delete { invoice_id: String },

    /// Email the invoice to the customer
    SendEmail { invoice_id: String },

    /// List the payments of a split-paid invoice
    SplitPayments { invoice_id: String },

    /// Refund a paid invoice
    Refund {
        invoice_id: String,

        /// Display amount, e.g. 12.50
        #[arg(long)]
        amount: Decimal,

        /// Reason shown on the credit note (1-64 characters)
        #[arg(long)]
        reason: String,

        /// Split payment to refund against
        #[arg(long)]
        payment_id: Option<String>,
    },
}

impl Commands {
    /// Runs without a backend connection
    pub fn is_offline(&self) -> bool {
        matches!(self, Commands::Permissions { .. })
    }
}

/// Offline matrix lookup
pub fn permissions_report(status: i32, has_refund: bool, split_payment: bool) -> Result<Value> {
    let kind = DocumentKind::from_wire(status, has_refund)?;
    let permissions = resolve(status, has_refund, split_payment)?;

    Ok(json!({
        "kind": kind,
        "permissions": permissions,
        "allowedActions": permissions.allowed_actions(),
    }))
}

/// Services behind the online commands
pub struct Console {
    invoices: InvoiceService,
    refunds: RefundService,
}

impl Console {
    pub fn new(backend: Arc<dyn BillingBackend>, registry: Arc<CurrencyRegistry>) -> Self {
        Self {
            invoices: InvoiceService::new(backend.clone(), registry.clone()),
            refunds: RefundService::new(backend, registry),
        }
    }

    /// Run one command and return its JSON report
    pub async fn execute(&self, command: Commands) -> Result<Value> {
        match command {
            Commands::Permissions {
                status,
                has_refund,
                split_payment,
            } => permissions_report(status, has_refund, split_payment),

            Commands::Show { invoice_id } => {
                let invoice = self.invoices.fetch(&invoice_id).await?;
                Ok(json!({ "invoice": invoice, "permissions": invoice.permissions() }))
            }

            Commands::Publish {
                invoice_id,
                pay_method,
                days_until_due,
            } => {
                let mut invoice = self.invoices.fetch(&invoice_id).await?;
                let options = PublishOptions {
                    pay_method,
                    days_until_due,
                };
                self.invoices.publish(&mut invoice, options).await?;
                self.invoices
                    .refresh(&mut invoice)
                    .await
                    .context("published, but the refreshed invoice could not be loaded")?;
                Ok(json!({ "invoice": invoice }))
            }

            Commands::Revoke { invoice_id } => {
                let mut invoice = self.invoices.fetch(&invoice_id).await?;
                self.invoices.revoke(&mut invoice).await?;
                Ok(json!({ "invoice": invoice }))
            }

            Commands::Delete { invoice_id } => {
                let mut invoice = self.invoices.fetch(&invoice_id).await?;
                self.invoices.delete(&mut invoice).await?;
                Ok(json!({ "invoiceId": invoice_id, "kind": invoice.kind() }))
            }

            Commands::SendEmail { invoice_id } => {
                let invoice = self.invoices.fetch(&invoice_id).await?;
                self.invoices.send_email(&invoice).await?;
                Ok(json!({ "invoiceId": invoice_id, "sent": true }))
            }

            Commands::SplitPayments { invoice_id } => {
                let invoice = self.invoices.fetch(&invoice_id).await?;
                let payments = self.refunds.split_payments(&invoice).await?;
                let refundable: Vec<&str> = payments
                    .iter()
                    .filter(|p| p.is_refundable())
                    .map(|p| p.payment_id.as_str())
                    .collect();
                Ok(json!({ "payments": payments, "refundable": refundable }))
            }

            Commands::Refund {
                invoice_id,
                amount,
                reason,
                payment_id,
            } => {
                let mut invoice = self.invoices.fetch(&invoice_id).await?;
                let mut request = RefundRequest::new(Money::new(amount), reason);
                if let Some(payment_id) = payment_id {
                    request = request.against_payment(payment_id);
                }
                let credit_note = self.refunds.refund(&mut invoice, request).await?;
                Ok(json!({ "creditNote": credit_note }))
            }
        }
    }
}
