// A single billed line of an invoice.
//
// The derived amounts (`amount_excluding_tax`, `tax`) are only ever written
// by the line-item calculator, so they stay consistent with quantity, unit
// amount and tax percentage after every mutation.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::core::{CurrencyCode, Money, ValidationError};

/// Longest description the backend accepts
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Represents a single line item in an invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    pub(crate) id: String,

    /// Description of the plan, add-on or service
    pub(crate) description: String,

    pub(crate) quantity: i64,

    /// Price per unit before tax
    pub(crate) unit_amount_excluding_tax: Money,

    /// quantity × unit amount, rounded to two places
    pub(crate) amount_excluding_tax: Money,

    /// Tax on `amount_excluding_tax` at `tax_percentage`
    pub(crate) tax: Money,

    /// Invoice-level tax percentage this line was last computed with
    pub(crate) tax_percentage: Decimal,

    pub(crate) currency: CurrencyCode,

    pub(crate) discount_amount: Option<Money>,

    /// Price before any proration or discount, as reported by the backend
    pub(crate) origin_amount: Option<Money>,
}

/// One field change on a line
#[derive(Debug, Clone, PartialEq)]
pub enum LineUpdate {
    Description(String),
    Quantity(i64),
    UnitAmountExcludingTax(Money),
    DiscountAmount(Option<Money>),
    OriginAmount(Option<Money>),
}

impl InvoiceLineItem {
    /// Zero-valued line with quantity 1 and a fresh id, derived fields unset
    pub(crate) fn placeholder(currency: CurrencyCode, tax_percentage: Decimal) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: String::new(),
            quantity: 1,
            unit_amount_excluding_tax: Money::zero(),
            amount_excluding_tax: Money::zero(),
            tax: Money::zero(),
            tax_percentage,
            currency,
            discount_amount: None,
            origin_amount: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_amount_excluding_tax(&self) -> Money {
        self.unit_amount_excluding_tax
    }

    pub fn amount_excluding_tax(&self) -> Money {
        self.amount_excluding_tax
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn tax_percentage(&self) -> Decimal {
        self.tax_percentage
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn discount_amount(&self) -> Option<Money> {
        self.discount_amount
    }

    pub fn origin_amount(&self) -> Option<Money> {
        self.origin_amount
    }

    /// Writes a user-editable field; derived amounts are the caller's job
    pub(crate) fn set(&mut self, update: LineUpdate) {
        match update {
            LineUpdate::Description(description) => self.description = description,
            LineUpdate::Quantity(quantity) => self.quantity = quantity,
            LineUpdate::UnitAmountExcludingTax(amount) => self.unit_amount_excluding_tax = amount,
            LineUpdate::DiscountAmount(amount) => self.discount_amount = amount,
            LineUpdate::OriginAmount(amount) => self.origin_amount = amount,
        }
    }

    /// Submission rules for one line
    pub fn validate(&self) -> Result<(), ValidationError> {
        let label = if self.description.trim().is_empty() {
            self.id.as_str()
        } else {
            self.description.as_str()
        };

        if self.description.trim().is_empty() {
            return Err(ValidationError::InvalidLineItem(format!(
                "line {}: description cannot be empty",
                label
            )));
        }

        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::InvalidLineItem(format!(
                "line {}: description cannot exceed {} characters",
                label, MAX_DESCRIPTION_LEN
            )));
        }

        if self.quantity <= 0 {
            return Err(ValidationError::InvalidLineItem(format!(
                "line {}: quantity must be a positive integer, got {}",
                label, self.quantity
            )));
        }

        if !self.unit_amount_excluding_tax.is_positive() {
            return Err(ValidationError::InvalidLineItem(format!(
                "line {}: unit amount must be positive, got {}",
                label, self.unit_amount_excluding_tax
            )));
        }

        Ok(())
    }
}
