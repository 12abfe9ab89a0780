//! Invoice entity module

pub mod descriptor;
pub mod handlers;

pub use descriptor::InvoiceDescriptor;
pub use handlers::*;
