//! Entities module - contains the business entities and their routes

pub mod company;
pub mod invoice;

pub use company::CompanyDescriptor;
pub use invoice::InvoiceDescriptor;
