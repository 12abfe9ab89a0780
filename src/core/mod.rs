//! Core module containing the record types, accessor traits and errors

pub mod error;
pub mod extractors;
pub mod model;
pub mod payment;
pub mod service;

pub use error::{ApiError, StoreError};
pub use model::{
    Company, CompanyInvoice, CompanySummary, Invoice, InvoiceDetail, InvoiceSummary,
    PaymentState,
};
pub use payment::resolve_paid_date;
pub use service::{CompanyService, InvoiceService, StoreResult};
