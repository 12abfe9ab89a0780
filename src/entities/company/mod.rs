//! Company entity module

pub mod descriptor;
pub mod handlers;

pub use descriptor::CompanyDescriptor;
pub use handlers::*;
