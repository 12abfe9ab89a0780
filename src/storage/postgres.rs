//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresStore`, implementing both [`CompanyService`] and
//! [`InvoiceService`] over a `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! biztime = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! `companies (code, name, description)` and `invoices (id, comp_code, amt,
//! paid, add_date, paid_date)`, with `invoices.comp_code` referencing
//! `companies.code` and cascading on delete. [`ensure_schema`] creates both.

use crate::core::error::StoreError;
use crate::core::model::{
    Company, CompanyInvoice, CompanySummary, Invoice, InvoiceDetail, InvoiceSummary,
    PaymentState,
};
use crate::core::service::{CompanyService, InvoiceService, StoreResult};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgPoolOptions;

/// Unique constraint on `companies.name`
const COMPANY_NAME_CONSTRAINT: &str = "companies_name_key";

const INVOICE_COLUMNS: &str = "id, comp_code, amt, paid, add_date, paid_date";

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

/// Apply the required tables (idempotent).
///
/// Safe to call on every startup. Existing tables are left untouched.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS companies (
            code TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            CONSTRAINT companies_name_key UNIQUE (name)
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create companies table: {}", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id SERIAL PRIMARY KEY,
            comp_code TEXT NOT NULL REFERENCES companies (code) ON DELETE CASCADE,
            amt DOUBLE PRECISION NOT NULL,
            paid BOOLEAN NOT NULL DEFAULT FALSE,
            add_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            paid_date TIMESTAMPTZ,
            CONSTRAINT invoices_paid_date_check CHECK ((paid_date IS NOT NULL) = paid)
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| anyhow!("Failed to create invoices table: {}", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Map a sqlx error onto the store taxonomy.
///
/// Unique and foreign-key violations become `DuplicateKey` and
/// `ReferenceViolation` for `entity_type`/`key`; anything else is a backend
/// fault.
fn classify(err: sqlx::Error, operation: &str, entity_type: &str, key: &str) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        match db_err.kind() {
            ErrorKind::UniqueViolation => return StoreError::duplicate(entity_type, key),
            ErrorKind::ForeignKeyViolation => {
                return StoreError::missing_reference(entity_type, key);
            }
            _ => {}
        }
    }
    StoreError::Backend(anyhow!("Failed to {}: {}", operation, err))
}

/// Which company key a unique violation was about
fn company_conflict_key<'a>(err: &sqlx::Error, code: &'a str, name: &'a str) -> &'a str {
    match err.as_database_error().and_then(|e| e.constraint()) {
        Some(COMPANY_NAME_CONSTRAINT) => name,
        _ => code,
    }
}

fn backend(operation: &str, err: sqlx::Error) -> StoreError {
    StoreError::Backend(anyhow!("Failed to {}: {}", operation, err))
}

// ---------------------------------------------------------------------------
// Joined rows
// ---------------------------------------------------------------------------

/// Row of `invoices JOIN companies`
#[derive(sqlx::FromRow)]
struct InvoiceCompanyRow {
    id: i32,
    amt: f64,
    paid: bool,
    add_date: DateTime<Utc>,
    paid_date: Option<DateTime<Utc>>,
    code: String,
    name: String,
    description: String,
}

impl From<InvoiceCompanyRow> for InvoiceDetail {
    fn from(row: InvoiceCompanyRow) -> Self {
        InvoiceDetail {
            id: row.id,
            amt: row.amt,
            paid: row.paid,
            add_date: row.add_date,
            paid_date: row.paid_date,
            company: Company {
                code: row.code,
                name: row.name,
                description: row.description,
            },
        }
    }
}

/// Row of `companies LEFT JOIN invoices`; invoice columns are null for a
/// company without invoices
#[derive(sqlx::FromRow)]
struct CompanyInvoiceRow {
    id: Option<i32>,
    amt: Option<f64>,
    paid: Option<bool>,
    add_date: Option<DateTime<Utc>>,
    paid_date: Option<DateTime<Utc>>,
}

impl CompanyInvoiceRow {
    fn into_invoice(self) -> Option<CompanyInvoice> {
        Some(CompanyInvoice {
            id: self.id?,
            amt: self.amt?,
            paid: self.paid?,
            add_date: self.add_date?,
            paid_date: self.paid_date,
        })
    }
}

// ---------------------------------------------------------------------------
// PostgresStore
// ---------------------------------------------------------------------------

/// Company and invoice storage backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use biztime::storage::PostgresStore;
///
/// let store = PostgresStore::connect("postgres:///biztime", 5).await?;
/// biztime::storage::postgres::ensure_schema(store.pool()).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| anyhow!("Failed to connect to PostgreSQL: {}", e))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CompanyService for PostgresStore {
    async fn list_companies(&self) -> StoreResult<Vec<CompanySummary>> {
        sqlx::query_as::<_, CompanySummary>("SELECT code, name FROM companies ORDER BY code")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| backend("list companies", e))
    }

    async fn get_company(&self, code: &str) -> StoreResult<Option<Company>> {
        sqlx::query_as::<_, Company>(
            "SELECT code, name, description FROM companies WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| backend("get company", e))
    }

    async fn create_company(&self, company: Company) -> StoreResult<Company> {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (code, name, description) \
             VALUES ($1, $2, $3) \
             RETURNING code, name, description",
        )
        .bind(&company.code)
        .bind(&company.name)
        .bind(&company.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let key = company_conflict_key(&e, &company.code, &company.name).to_string();
            classify(e, "create company", "company", &key)
        })
    }

    async fn update_company(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> StoreResult<Option<Company>> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = $1, description = $2 \
             WHERE code = $3 \
             RETURNING code, name, description",
        )
        .bind(name)
        .bind(description)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            let key = company_conflict_key(&e, code, name).to_string();
            classify(e, "update company", "company", &key)
        })
    }

    async fn delete_company(&self, code: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| backend("delete company", e))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl InvoiceService for PostgresStore {
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceSummary>> {
        sqlx::query_as::<_, InvoiceSummary>("SELECT id, comp_code FROM invoices ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| backend("list invoices", e))
    }

    async fn get_invoice_with_company(&self, id: i32) -> StoreResult<Option<InvoiceDetail>> {
        let row = sqlx::query_as::<_, InvoiceCompanyRow>(
            "SELECT i.id, i.amt, i.paid, i.add_date, i.paid_date, \
                    c.code, c.name, c.description \
             FROM invoices AS i \
             JOIN companies AS c ON c.code = i.comp_code \
             WHERE i.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| backend("get invoice", e))?;

        Ok(row.map(InvoiceDetail::from))
    }

    async fn create_invoice(&self, comp_code: &str, amt: f64) -> StoreResult<Invoice> {
        let sql = format!(
            "INSERT INTO invoices (comp_code, amt) VALUES ($1, $2) RETURNING {}",
            INVOICE_COLUMNS
        );
        sqlx::query_as::<_, Invoice>(&sql)
            .bind(comp_code)
            .bind(amt)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "create invoice", "company", comp_code))
    }

    async fn payment_state(&self, id: i32) -> StoreResult<Option<PaymentState>> {
        let row = sqlx::query_as::<_, (bool, Option<DateTime<Utc>>)>(
            "SELECT paid, paid_date FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| backend("read invoice payment state", e))?;

        Ok(row.map(|(paid, paid_date)| PaymentState { paid, paid_date }))
    }

    async fn write_invoice(
        &self,
        id: i32,
        amt: f64,
        paid: bool,
        paid_date: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<Invoice>> {
        let sql = format!(
            "UPDATE invoices SET amt = $1, paid = $2, paid_date = $3 \
             WHERE id = $4 RETURNING {}",
            INVOICE_COLUMNS
        );
        sqlx::query_as::<_, Invoice>(&sql)
            .bind(amt)
            .bind(paid)
            .bind(paid_date)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| backend("update invoice", e))
    }

    async fn delete_invoice(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| backend("delete invoice", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_company_invoices(
        &self,
        comp_code: &str,
    ) -> StoreResult<Option<Vec<CompanyInvoice>>> {
        let rows = sqlx::query_as::<_, CompanyInvoiceRow>(
            "SELECT i.id, i.amt, i.paid, i.add_date, i.paid_date \
             FROM companies AS c \
             LEFT JOIN invoices AS i ON i.comp_code = c.code \
             WHERE c.code = $1 \
             ORDER BY i.id",
        )
        .bind(comp_code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| backend("list company invoices", e))?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            rows.into_iter()
                .filter_map(CompanyInvoiceRow::into_invoice)
                .collect(),
        ))
    }
}
