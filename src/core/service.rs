//! Record accessor traits for companies and invoices
//!
//! Each method maps to a single statement against the store. Absence of the
//! requested row is reported as `Ok(None)` / `Ok(false)`, never as an error.

use crate::core::error::StoreError;
use crate::core::model::{
    Company, CompanyInvoice, CompanySummary, Invoice, InvoiceDetail, InvoiceSummary,
    PaymentState,
};
use crate::core::payment::resolve_paid_date;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type StoreResult<T> = Result<T, StoreError>;

/// Accessors for the `companies` table
#[async_trait]
pub trait CompanyService: Send + Sync {
    /// List all companies as `{code, name}`
    async fn list_companies(&self) -> StoreResult<Vec<CompanySummary>>;

    /// Get a company by code
    async fn get_company(&self, code: &str) -> StoreResult<Option<Company>>;

    /// Insert a company; fails with `DuplicateKey` if code or name is taken
    async fn create_company(&self, company: Company) -> StoreResult<Company>;

    /// Replace name and description of an existing company
    async fn update_company(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> StoreResult<Option<Company>>;

    /// Delete a company (and, by cascade, its invoices)
    ///
    /// Returns `false` if no company had that code.
    async fn delete_company(&self, code: &str) -> StoreResult<bool>;
}

/// Accessors for the `invoices` table
#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// List all invoices as `{id, comp_code}`
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceSummary>>;

    /// Get an invoice joined with its company
    async fn get_invoice_with_company(&self, id: i32) -> StoreResult<Option<InvoiceDetail>>;

    /// Insert an unpaid invoice; fails with `ReferenceViolation` if
    /// `comp_code` names no company
    async fn create_invoice(&self, comp_code: &str, amt: f64) -> StoreResult<Invoice>;

    /// Read the current payment state of an invoice
    async fn payment_state(&self, id: i32) -> StoreResult<Option<PaymentState>>;

    /// Write amount and payment state of an existing invoice
    ///
    /// Low-level half of [`update_invoice`](Self::update_invoice). Fails with
    /// `Backend` when `paid_date.is_some() != paid`; callers get a consistent
    /// `paid_date` from [`resolve_paid_date`].
    async fn write_invoice(
        &self,
        id: i32,
        amt: f64,
        paid: bool,
        paid_date: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<Invoice>>;

    /// Delete an invoice; returns `false` if it did not exist
    async fn delete_invoice(&self, id: i32) -> StoreResult<bool>;

    /// List the invoices of one company
    ///
    /// Returns `None` if the company does not exist, and an empty list if it
    /// has no invoices.
    async fn list_company_invoices(
        &self,
        comp_code: &str,
    ) -> StoreResult<Option<Vec<CompanyInvoice>>>;

    /// Update amount and paid flag, recomputing `paid_date`.
    ///
    /// Reads the prior payment state and then writes. Two concurrent updates
    /// of the same invoice may interleave between the read and the write.
    async fn update_invoice(&self, id: i32, amt: f64, paid: bool) -> StoreResult<Option<Invoice>> {
        let Some(prior) = self.payment_state(id).await? else {
            return Ok(None);
        };

        let paid_date = resolve_paid_date(prior.paid, prior.paid_date, paid, Utc::now());
        self.write_invoice(id, amt, paid, paid_date).await
    }
}
