//! # biztime
//!
//! A REST service managing companies and the invoices billed to them.
//!
//! ## Features
//!
//! - **CRUD routes** for `/companies` and `/invoices`, each response wrapped
//!   in a single-key JSON envelope (`{company: …}`, `{invoices: […]}`)
//! - **Payment tracking**: `paid_date` is stamped when an invoice becomes
//!   paid and cleared when it becomes unpaid
//! - **Referential checks**: an invoice for an unknown company is rejected
//!   with `400`, a duplicate company with `409`
//! - **Pluggable storage**: an in-memory store, or PostgreSQL via sqlx
//!   (feature `postgres`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use biztime::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryStore::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ApiError, Company, CompanyInvoice, CompanyService, CompanySummary, Invoice,
        InvoiceDetail, InvoiceService, InvoiceSummary, StoreError, StoreResult,
        resolve_paid_date,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{Backend, DatabaseConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
