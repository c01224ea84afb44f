// Wire shapes exchanged with the billing backend.
//
// Amounts are integer minor units, statuses are numeric codes and times are
// Unix seconds. Nothing here is used outside the backend module except
// through `WireMapper`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::MinorUnits;

/// Response envelope wrapping every backend reply
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    pub quantity: i64,
    pub unit_amount_excluding_tax: MinorUnits,
    #[serde(default)]
    pub amount_excluding_tax: MinorUnits,
    #[serde(default)]
    pub tax: MinorUnits,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision")]
    pub tax_percentage: Decimal,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<MinorUnits>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_amount: Option<MinorUnits>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceMetadataDto {
    #[serde(default)]
    pub has_split_payment: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundDto {
    #[serde(default)]
    pub refund_id: Option<String>,
    pub refund_amount: MinorUnits,
    pub currency: String,
    #[serde(default)]
    pub refund_comment: String,
    pub status: i32,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub gateway_id: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub refund_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub invoice_id: String,
    pub status: i32,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tax_percentage: Decimal,
    #[serde(default)]
    pub lines: Vec<LineItemDto>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    pub subtotal_excluding_tax: MinorUnits,
    pub tax_amount: MinorUnits,
    pub total_amount: MinorUnits,
    #[serde(default)]
    pub discount_amount: MinorUnits,
    #[serde(default)]
    pub promo_credit_discount_amount: MinorUnits,
    #[serde(default)]
    pub refund: Option<RefundDto>,
    #[serde(default)]
    pub metadata: InvoiceMetadataDto,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPaymentDto {
    pub payment_id: String,
    #[serde(default)]
    pub gateway_name: String,
    pub total_amount: MinorUnits,
    pub currency: String,
    pub status: i32,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub create_time: DateTime<Utc>,
}

/// Body of create and save calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraftDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tax_percentage: Decimal,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lines: Vec<LineItemDto>,
    /// Publish right after creating
    #[serde(default)]
    pub finish: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishInvoiceDto {
    pub invoice_id: String,
    pub pay_method: i32,
    pub days_until_due: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequestDto {
    pub invoice_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub refund_amount: MinorUnits,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceIdDto {
    pub invoice_id: String,
}
