use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{CurrencyCode, Money, ValidationError};
use crate::modules::invoices::models::{InvoiceLineItem, LineUpdate};

/// Invoice-level amounts derived from a set of lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineTotals {
    pub subtotal: Money,
    pub vat: Money,
    pub total: Money,
}

/// Derives line and invoice amounts
///
/// Every operation is pure: it takes the current lines and returns new ones.
/// All rounding is half away from zero to two places, carried out on integer
/// hundredths so the sum of rounded lines never drifts.
pub struct LineItemCalculator;

impl LineItemCalculator {
    /// Append a zero-valued placeholder line (quantity 1, fresh id)
    pub fn add_line(
        items: &[InvoiceLineItem],
        currency: &CurrencyCode,
        tax_percentage: Decimal,
    ) -> Vec<InvoiceLineItem> {
        let mut lines = items.to_vec();
        lines.push(InvoiceLineItem::placeholder(currency.clone(), tax_percentage));
        lines
    }

    pub fn remove_line(
        items: &[InvoiceLineItem],
        line_id: &str,
    ) -> Result<Vec<InvoiceLineItem>, ValidationError> {
        if !items.iter().any(|line| line.id() == line_id) {
            return Err(ValidationError::LineNotFound(line_id.to_string()));
        }

        Ok(items
            .iter()
            .filter(|line| line.id() != line_id)
            .cloned()
            .collect())
    }

    /// Apply one field change and recompute that line's derived amounts
    pub fn update_line(
        items: &[InvoiceLineItem],
        line_id: &str,
        update: LineUpdate,
        tax_percentage: Decimal,
    ) -> Result<Vec<InvoiceLineItem>, ValidationError> {
        let mut lines = items.to_vec();
        let line = lines
            .iter_mut()
            .find(|line| line.id() == line_id)
            .ok_or_else(|| ValidationError::LineNotFound(line_id.to_string()))?;

        line.set(update);
        Self::recompute_line(line, tax_percentage)?;

        Ok(lines)
    }

    /// Recompute every line after the invoice tax percentage changed
    pub fn recompute_all_tax(
        items: &[InvoiceLineItem],
        tax_percentage: Decimal,
    ) -> Result<Vec<InvoiceLineItem>, ValidationError> {
        let mut lines = items.to_vec();
        for line in lines.iter_mut() {
            Self::recompute_line(line, tax_percentage)?;
        }
        Ok(lines)
    }

    /// Leaves `line` untouched when its amounts are out of range
    pub fn recompute_line(
        line: &mut InvoiceLineItem,
        tax_percentage: Decimal,
    ) -> Result<(), ValidationError> {
        let amount = Self::line_amount(line.quantity(), line.unit_amount_excluding_tax())?;
        let tax = Self::vat(amount, tax_percentage)?;

        line.amount_excluding_tax = amount;
        line.tax = tax;
        line.tax_percentage = tax_percentage;
        Ok(())
    }

    /// `round(quantity * unit_amount, 2)`
    pub fn line_amount(quantity: i64, unit_amount: Money) -> Result<Money, ValidationError> {
        unit_amount
            .amount()
            .checked_mul(Decimal::from(quantity))
            .and_then(|raw| Money::new(raw).to_hundredths())
            .map(Money::from_hundredths)
            .ok_or_else(|| out_of_range(format!("{} x {}", quantity, unit_amount)))
    }

    /// Sum of per-line rounded amounts, recomputed from quantity and unit price
    pub fn subtotal(items: &[InvoiceLineItem]) -> Result<Money, ValidationError> {
        let mut hundredths = 0i64;
        for line in items {
            let amount = Self::line_amount(line.quantity(), line.unit_amount_excluding_tax())?;
            hundredths = amount
                .to_hundredths()
                .and_then(|h| hundredths.checked_add(h))
                .ok_or_else(|| out_of_range("subtotal".to_string()))?;
        }
        Ok(Money::from_hundredths(hundredths))
    }

    /// `round(subtotal * tax_percentage / 100, 2)`
    pub fn vat(subtotal: Money, tax_percentage: Decimal) -> Result<Money, ValidationError> {
        subtotal
            .amount()
            .checked_mul(tax_percentage)
            .and_then(|raw| raw.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|raw| Money::new(raw).to_hundredths())
            .map(Money::from_hundredths)
            .ok_or_else(|| out_of_range(format!("{}% of {}", tax_percentage, subtotal)))
    }

    /// `round(subtotal + vat, 2)`
    pub fn total(subtotal: Money, vat: Money) -> Result<Money, ValidationError> {
        subtotal
            .to_hundredths()
            .zip(vat.to_hundredths())
            .and_then(|(s, v)| s.checked_add(v))
            .map(Money::from_hundredths)
            .ok_or_else(|| out_of_range(format!("{} + {}", subtotal, vat)))
    }

    pub fn totals(
        items: &[InvoiceLineItem],
        tax_percentage: Decimal,
    ) -> Result<LineTotals, ValidationError> {
        let subtotal = Self::subtotal(items)?;
        let vat = Self::vat(subtotal, tax_percentage)?;
        Ok(LineTotals {
            subtotal,
            vat,
            total: Self::total(subtotal, vat)?,
        })
    }

    /// Submission rules: at least one line, every line valid, tax not negative,
    /// totals within range
    pub fn validate(items: &[InvoiceLineItem], tax_percentage: Decimal) -> Result<(), ValidationError> {
        if tax_percentage < Decimal::ZERO {
            return Err(ValidationError::InvalidTaxPercentage(format!(
                "tax percentage cannot be negative, got {}",
                tax_percentage
            )));
        }

        if items.is_empty() {
            return Err(ValidationError::InvalidLineItem(
                "invoice must have at least one line item".to_string(),
            ));
        }

        items.iter().try_for_each(InvoiceLineItem::validate)?;
        Self::totals(items, tax_percentage).map(|_| ())
    }
}

fn out_of_range(what: String) -> ValidationError {
    ValidationError::InvalidAmount(format!("{} exceeds the supported amount range", what))
}
