// An invoice, or the credit note it turned into after a refund.
//
// Monetary fields are display amounts; the wire mapper is the only code that
// builds an invoice from backend data. Drafts composed locally start from
// `Invoice::draft` and are changed through `InvoiceEditor`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::lifecycle::{DocumentKind, InvoiceStatus};
use super::line_item::InvoiceLineItem;
use crate::core::{CurrencyCode, CurrencyDescriptor, Money, ValidationError};
use crate::modules::invoices::services::line_item_calculator::LineTotals;
use crate::modules::invoices::services::permissions::{permissions_for, InvoicePermissions};
use crate::modules::refunds::models::Refund;

/// Flags the backend attaches to an invoice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceMetadata {
    /// Paid across more than one settled transaction
    pub has_split_payment: bool,
}

/// Represents a billing document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Backend id, `None` until the draft is first created
    pub(crate) invoice_id: Option<String>,

    pub(crate) kind: DocumentKind,

    pub(crate) name: Option<String>,

    pub(crate) user_id: Option<i64>,

    pub(crate) subscription_id: Option<String>,

    pub(crate) currency: CurrencyCode,

    /// Percentage, `19` means 19 %
    pub(crate) tax_percentage: Decimal,

    pub(crate) lines: Vec<InvoiceLineItem>,

    pub(crate) subtotal_excluding_tax: Money,

    pub(crate) tax_amount: Money,

    /// subtotal - discount - promo credit + tax
    pub(crate) total_amount: Money,

    pub(crate) discount_amount: Money,

    pub(crate) promo_credit_discount_amount: Money,

    pub(crate) refund: Option<Refund>,

    pub(crate) metadata: InvoiceMetadata,

    /// Hosted payment page, issued on publish
    pub(crate) payment_link: Option<String>,

    /// Backend modification time, used by hosts for optimistic concurrency
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

impl Invoice {
    /// Empty draft for an operator to compose
    pub fn draft(
        user_id: i64,
        currency: CurrencyCode,
        tax_percentage: Decimal,
        name: Option<String>,
    ) -> Self {
        Self {
            invoice_id: None,
            kind: DocumentKind::Invoice(InvoiceStatus::Draft),
            name,
            user_id: Some(user_id),
            subscription_id: None,
            currency,
            tax_percentage,
            lines: Vec::new(),
            subtotal_excluding_tax: Money::zero(),
            tax_amount: Money::zero(),
            total_amount: Money::zero(),
            discount_amount: Money::zero(),
            promo_credit_discount_amount: Money::zero(),
            refund: None,
            metadata: InvoiceMetadata::default(),
            payment_link: None,
            updated_at: None,
        }
    }

    pub fn invoice_id(&self) -> Option<&str> {
        self.invoice_id.as_deref()
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription_id.as_deref()
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

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn promo_credit_discount_amount(&self) -> Money {
        self.promo_credit_discount_amount
    }

    pub fn refund(&self) -> Option<&Refund> {
        self.refund.as_ref()
    }

    pub fn has_refund(&self) -> bool {
        self.refund.is_some()
    }

    pub fn metadata(&self) -> InvoiceMetadata {
        self.metadata
    }

    pub fn payment_link(&self) -> Option<&str> {
        self.payment_link.as_deref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Actions currently allowed on this document
    pub fn permissions(&self) -> InvoicePermissions {
        permissions_for(self.kind, self.metadata.has_split_payment)
    }

    /// Id for backend calls; drafts that were never created have none
    pub(crate) fn require_id(&self) -> crate::core::Result<&str> {
        self.invoice_id()
            .ok_or(crate::core::EngineError::Validation(ValidationError::NotCreated))
    }

    /// Store freshly calculated line totals
    ///
    /// Each term is rounded to the currency's minor-unit precision before the
    /// total is formed, so no rounding error accumulates across the sum.
    pub(crate) fn apply_totals(&mut self, totals: &LineTotals, currency: &CurrencyDescriptor) {
        let round = |m: Money| Money::new(currency.round(m.amount()));

        self.subtotal_excluding_tax = round(totals.subtotal);
        self.tax_amount = round(totals.vat);
        self.total_amount = self.subtotal_excluding_tax
            - round(self.discount_amount)
            - round(self.promo_credit_discount_amount)
            + self.tax_amount;
    }
}
