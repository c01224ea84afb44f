use rust_decimal::Decimal;

use crate::core::{CurrencyDescriptor, CurrencyRegistry, Result, ValidationError};
use crate::modules::invoices::models::{Invoice, InvoiceAction, InvoiceLineItem, LineUpdate};
use crate::modules::invoices::services::line_item_calculator::{LineItemCalculator, LineTotals};
use crate::modules::invoices::services::permissions::guard;

/// Mutable session over an editable invoice
///
/// Opening the editor checks the `edit` permission once. Every change runs
/// through the line-item calculator and refreshes the invoice totals, so the
/// invoice never holds stale derived amounts.
pub struct InvoiceEditor<'a> {
    invoice: &'a mut Invoice,
    currency: &'a CurrencyDescriptor,
}

impl<'a> InvoiceEditor<'a> {
    pub fn open(invoice: &'a mut Invoice, registry: &'a CurrencyRegistry) -> Result<Self> {
        guard(invoice, InvoiceAction::Edit)?;
        let currency = registry.get(&invoice.currency)?;
        Ok(Self { invoice, currency })
    }

    /// Append a placeholder line, returning its id
    pub fn add_line(&mut self) -> Result<String> {
        let lines = LineItemCalculator::add_line(
            &self.invoice.lines,
            &self.invoice.currency,
            self.invoice.tax_percentage,
        );
        let id = lines
            .last()
            .map(|line| line.id().to_string())
            .unwrap_or_default();
        self.replace_lines(lines)?;
        Ok(id)
    }

    pub fn remove_line(&mut self, line_id: &str) -> Result<()> {
        let lines = LineItemCalculator::remove_line(&self.invoice.lines, line_id)?;
        self.replace_lines(lines)
    }

    pub fn update_line(&mut self, line_id: &str, update: LineUpdate) -> Result<()> {
        let lines = LineItemCalculator::update_line(
            &self.invoice.lines,
            line_id,
            update,
            self.invoice.tax_percentage,
        )?;
        self.replace_lines(lines)
    }

    pub fn set_tax_percentage(&mut self, tax_percentage: Decimal) -> Result<()> {
        if tax_percentage < Decimal::ZERO {
            return Err(ValidationError::InvalidTaxPercentage(format!(
                "tax percentage cannot be negative, got {}",
                tax_percentage
            ))
            .into());
        }

        let lines = LineItemCalculator::recompute_all_tax(&self.invoice.lines, tax_percentage)?;
        let totals = LineItemCalculator::totals(&lines, tax_percentage)?;
        self.invoice.tax_percentage = tax_percentage;
        self.store(lines, &totals);
        Ok(())
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.invoice.name = name;
    }

    pub fn invoice(&self) -> &Invoice {
        self.invoice
    }

    /// The invoice is only written once the new totals are known
    fn replace_lines(&mut self, lines: Vec<InvoiceLineItem>) -> Result<()> {
        let totals = LineItemCalculator::totals(&lines, self.invoice.tax_percentage)?;
        self.store(lines, &totals);
        Ok(())
    }

    fn store(&mut self, lines: Vec<InvoiceLineItem>, totals: &LineTotals) {
        self.invoice.lines = lines;
        self.invoice.apply_totals(totals, self.currency);
    }
}
