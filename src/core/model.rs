//! Record types for companies and invoices
//!
//! Each entity has a full record plus the narrower projections returned by
//! list endpoints. Invoice details embed their company instead of exposing
//! the raw `comp_code` column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A company row: `{code, name, description}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: String,
}

impl Company {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// List projection of this company
    pub fn summary(&self) -> CompanySummary {
        CompanySummary {
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }
}

/// Company list projection: `{code, name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

/// An invoice row as stored, including its foreign key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
}

impl Invoice {
    /// List projection of this invoice
    pub fn summary(&self) -> InvoiceSummary {
        InvoiceSummary {
            id: self.id,
            comp_code: self.comp_code.clone(),
        }
    }

    /// Projection used when listing invoices under their company
    pub fn without_company(&self) -> CompanyInvoice {
        CompanyInvoice {
            id: self.id,
            amt: self.amt,
            paid: self.paid,
            add_date: self.add_date,
            paid_date: self.paid_date,
        }
    }

    /// Build the detail view, replacing `comp_code` with the company itself
    pub fn with_company(&self, company: Company) -> InvoiceDetail {
        InvoiceDetail {
            id: self.id,
            amt: self.amt,
            paid: self.paid,
            add_date: self.add_date,
            paid_date: self.paid_date,
            company,
        }
    }
}

/// Invoice list projection: `{id, comp_code}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// Invoice as listed under `/companies/{code}/invoices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInvoice {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
}

/// Invoice detail with its company embedded
///
/// Has no `comp_code` field; `company.code` carries it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
    pub company: Company,
}

/// Prior payment state of an invoice, read before an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentState {
    pub paid: bool,
    pub paid_date: Option<DateTime<Utc>>,
}
