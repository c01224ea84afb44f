pub mod wire;

pub use wire::{
    Envelope, InvoiceDraftDto, InvoiceDto, InvoiceIdDto, InvoiceMetadataDto, LineItemDto,
    PublishInvoiceDto, RefundDto, RefundRequestDto, SplitPaymentDto,
};
