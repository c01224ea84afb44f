use rust_decimal::Decimal;
use serde::Serialize;

use super::refund::Refund;
use crate::core::{CurrencyCode, CurrencyDescriptor, Money};
use crate::modules::invoices::models::{DocumentKind, Invoice, InvoiceLineItem};
use crate::modules::invoices::services::line_item_calculator::LineTotals;
use crate::modules::invoices::services::permissions::{permissions_for, InvoicePermissions};

/// Read-only mirror of a refunded invoice
///
/// Carries the original lines unchanged. The totals are recomputed from those
/// lines and negated: a credit note is money owed by the merchant, so a
/// refunded 100.00 invoice renders as -100.00. There are no setters; a newer
/// state is obtained by refreshing the invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditNote {
    invoice_id: Option<String>,
    kind: DocumentKind,
    currency: CurrencyCode,
    tax_percentage: Decimal,
    lines: Vec<InvoiceLineItem>,
    subtotal_excluding_tax: Money,
    tax_amount: Money,
    total_amount: Money,
    refund: Refund,
}

impl CreditNote {
    /// Build the mirror of `invoice`, which must already carry `refund`
    ///
    /// `totals` are the calculator totals of the invoice's lines.
    pub(crate) fn mirror(
        invoice: &Invoice,
        refund: Refund,
        totals: &LineTotals,
        currency: &CurrencyDescriptor,
    ) -> Self {
        let credit = |m: Money| Money::zero() - Money::new(currency.round(m.amount()));

        Self {
            invoice_id: invoice.invoice_id().map(str::to_string),
            kind: invoice.kind(),
            currency: invoice.currency().clone(),
            tax_percentage: invoice.tax_percentage(),
            lines: invoice.lines().to_vec(),
            subtotal_excluding_tax: credit(totals.subtotal),
            tax_amount: credit(totals.vat),
            total_amount: credit(totals.total),
            refund,
        }
    }

    pub fn invoice_id(&self) -> Option<&str> {
        self.invoice_id.as_deref()
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn tax_percentage(&self) -> Decimal {
        self.tax_percentage
    }

    pub fn lines(&self) -> &[InvoiceLineItem] {
        &self.lines
    }

    pub fn subtotal_excluding_tax(&self) -> Money {
        self.subtotal_excluding_tax
    }

    pub fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn refund(&self) -> &Refund {
        &self.refund
    }

    pub fn permissions(&self) -> InvoicePermissions {
        permissions_for(self.kind, false)
    }
}
