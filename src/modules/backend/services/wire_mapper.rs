use uuid::Uuid;

use crate::core::{CurrencyCode, CurrencyRegistry, EngineError, MoneyNormalizer, Result};
use crate::modules::backend::models::{
    InvoiceDraftDto, InvoiceDto, LineItemDto, RefundDto, RefundRequestDto, SplitPaymentDto,
};
use crate::modules::invoices::models::{
    DocumentKind, Invoice, InvoiceLineItem, InvoiceMetadata, RefundStatus,
};
use crate::modules::refunds::models::{Refund, SplitPayment, SplitPaymentStatus};
use crate::modules::refunds::services::refund_planner::RefundPlan;

/// Translates between wire shapes and the domain model
///
/// Every monetary field passes through the normalizer exactly once in each
/// direction: `MinorUnits` in wire shapes, `Money` in domain types.
#[derive(Debug, Clone, Copy)]
pub struct WireMapper<'a> {
    normalizer: MoneyNormalizer<'a>,
}

impl<'a> WireMapper<'a> {
    pub fn new(registry: &'a CurrencyRegistry) -> Self {
        Self {
            normalizer: MoneyNormalizer::new(registry),
        }
    }

    pub fn invoice(&self, dto: &InvoiceDto) -> Result<Invoice> {
        let currency = CurrencyCode::new(&dto.currency);
        let n = &self.normalizer;

        let refund = dto.refund.as_ref().map(|r| self.refund(r)).transpose()?;
        let kind = DocumentKind::from_wire(dto.status, refund.is_some())?;

        let lines = dto
            .lines
            .iter()
            .map(|line| self.line_item(line, &currency))
            .collect::<Result<Vec<_>>>()?;

        Ok(Invoice {
            invoice_id: Some(dto.invoice_id.clone()),
            kind,
            name: dto.name.clone(),
            user_id: dto.user_id,
            subscription_id: dto.subscription_id.clone(),
            tax_percentage: dto.tax_percentage,
            lines,
            subtotal_excluding_tax: n.to_display(dto.subtotal_excluding_tax, &currency)?,
            tax_amount: n.to_display(dto.tax_amount, &currency)?,
            total_amount: n.to_display(dto.total_amount, &currency)?,
            discount_amount: n.to_display(dto.discount_amount, &currency)?,
            promo_credit_discount_amount: n.to_display(dto.promo_credit_discount_amount, &currency)?,
            refund,
            metadata: InvoiceMetadata {
                has_split_payment: dto.metadata.has_split_payment,
            },
            payment_link: dto.link.clone(),
            updated_at: dto.updated_at,
            currency,
        })
    }

    /// Lines inherit the invoice currency when the backend leaves theirs blank
    pub fn line_item(&self, dto: &LineItemDto, invoice_currency: &CurrencyCode) -> Result<InvoiceLineItem> {
        let currency = if dto.currency.trim().is_empty() {
            invoice_currency.clone()
        } else {
            CurrencyCode::new(&dto.currency)
        };
        let n = &self.normalizer;

        Ok(InvoiceLineItem {
            id: dto.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
            description: dto.description.clone(),
            quantity: dto.quantity,
            unit_amount_excluding_tax: n.to_display(dto.unit_amount_excluding_tax, &currency)?,
            amount_excluding_tax: n.to_display(dto.amount_excluding_tax, &currency)?,
            tax: n.to_display(dto.tax, &currency)?,
            tax_percentage: dto.tax_percentage,
            discount_amount: n.to_display_opt(dto.discount_amount, &currency)?,
            origin_amount: n.to_display_opt(dto.origin_amount, &currency)?,
            currency,
        })
    }

    pub fn refund(&self, dto: &RefundDto) -> Result<Refund> {
        let currency = CurrencyCode::new(&dto.currency);
        let status = RefundStatus::from_code(dto.status).ok_or_else(|| {
            tracing::error!(status = dto.status, "Undecodable refund status from backend");
            EngineError::UnknownInvoiceState {
                status: dto.status,
                has_refund: true,
            }
        })?;

        Ok(Refund {
            refund_id: dto.refund_id.clone(),
            refund_amount: self.normalizer.to_display(dto.refund_amount, &currency)?,
            currency,
            refund_comment: dto.refund_comment.clone(),
            status,
            payment_id: dto.payment_id.clone(),
            gateway_id: dto.gateway_id,
            refund_time: dto.refund_time,
        })
    }

    /// Payments with an unknown status are kept as `Pending` so they are never refunded
    pub fn split_payment(&self, dto: &SplitPaymentDto) -> Result<SplitPayment> {
        let currency = CurrencyCode::new(&dto.currency);
        let status = SplitPaymentStatus::from_code(dto.status).unwrap_or_else(|| {
            tracing::warn!(
                payment_id = %dto.payment_id,
                status = dto.status,
                "Unknown split payment status, treating as pending"
            );
            SplitPaymentStatus::Pending
        });

        Ok(SplitPayment {
            payment_id: dto.payment_id.clone(),
            gateway_name: dto.gateway_name.clone(),
            total_amount: self.normalizer.to_display(dto.total_amount, &currency)?,
            currency,
            status,
            create_time: dto.create_time,
        })
    }

    pub fn line_item_dto(&self, line: &InvoiceLineItem) -> Result<LineItemDto> {
        let n = &self.normalizer;
        let currency = line.currency();

        Ok(LineItemDto {
            id: Some(line.id().to_string()),
            description: line.description().to_string(),
            quantity: line.quantity(),
            unit_amount_excluding_tax: n.to_minor_units(line.unit_amount_excluding_tax(), currency)?,
            amount_excluding_tax: n.to_minor_units(line.amount_excluding_tax(), currency)?,
            tax: n.to_minor_units(line.tax(), currency)?,
            tax_percentage: line.tax_percentage(),
            currency: currency.to_string(),
            discount_amount: n.to_minor_units_opt(line.discount_amount(), currency)?,
            origin_amount: n.to_minor_units_opt(line.origin_amount(), currency)?,
        })
    }

    /// Body for create (`invoice_id` unset) or save
    pub fn draft_request(&self, invoice: &Invoice, finish: bool) -> Result<InvoiceDraftDto> {
        let lines = invoice
            .lines()
            .iter()
            .map(|line| self.line_item_dto(line))
            .collect::<Result<Vec<_>>>()?;

        Ok(InvoiceDraftDto {
            invoice_id: invoice.invoice_id().map(str::to_string),
            user_id: invoice.user_id(),
            tax_percentage: invoice.tax_percentage(),
            currency: invoice.currency().to_string(),
            name: invoice.name().map(str::to_string),
            lines,
            finish,
        })
    }

    pub fn refund_request(
        &self,
        invoice_id: &str,
        plan: &RefundPlan,
        currency: &CurrencyCode,
    ) -> Result<RefundRequestDto> {
        Ok(RefundRequestDto {
            invoice_id: invoice_id.to_string(),
            payment_id: plan.payment_id.clone(),
            refund_amount: self.normalizer.to_minor_units(plan.amount, currency)?,
            reason: plan.reason.clone(),
        })
    }
}
