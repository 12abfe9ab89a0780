//! In-memory implementation of the record accessors for testing and development

use crate::core::error::StoreError;
use crate::core::model::{
    Company, CompanyInvoice, CompanySummary, Invoice, InvoiceDetail, InvoiceSummary,
    PaymentState,
};
use crate::core::service::{CompanyService, InvoiceService, StoreResult};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    companies: BTreeMap<String, Company>,
    invoices: BTreeMap<i32, Invoice>,
    last_invoice_id: i32,
}

/// In-memory store holding both tables
///
/// Enforces the same constraints as the relational schema: unique company
/// code and name, the invoice → company foreign key, and cascade delete.
/// Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StoreError::Backend(anyhow!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StoreError::Backend(anyhow!("Failed to acquire write lock: {}", e)))
    }
}

impl Tables {
    fn name_taken(&self, name: &str, except_code: Option<&str>) -> bool {
        self.companies
            .values()
            .any(|c| c.name == name && Some(c.code.as_str()) != except_code)
    }
}

#[async_trait]
impl CompanyService for InMemoryStore {
    async fn list_companies(&self) -> StoreResult<Vec<CompanySummary>> {
        let tables = self.read()?;
        Ok(tables.companies.values().map(Company::summary).collect())
    }

    async fn get_company(&self, code: &str) -> StoreResult<Option<Company>> {
        let tables = self.read()?;
        Ok(tables.companies.get(code).cloned())
    }

    async fn create_company(&self, company: Company) -> StoreResult<Company> {
        let mut tables = self.write()?;

        if tables.companies.contains_key(&company.code) {
            return Err(StoreError::duplicate("company", company.code));
        }
        if tables.name_taken(&company.name, None) {
            return Err(StoreError::duplicate("company", company.name));
        }

        tables
            .companies
            .insert(company.code.clone(), company.clone());
        Ok(company)
    }

    async fn update_company(
        &self,
        code: &str,
        name: &str,
        description: &str,
    ) -> StoreResult<Option<Company>> {
        let mut tables = self.write()?;

        if !tables.companies.contains_key(code) {
            return Ok(None);
        }
        if tables.name_taken(name, Some(code)) {
            return Err(StoreError::duplicate("company", name));
        }

        let company = tables.companies.get_mut(code).map(|company| {
            company.name = name.to_string();
            company.description = description.to_string();
            company.clone()
        });
        Ok(company)
    }

    async fn delete_company(&self, code: &str) -> StoreResult<bool> {
        let mut tables = self.write()?;

        if tables.companies.remove(code).is_none() {
            return Ok(false);
        }
        tables.invoices.retain(|_, invoice| invoice.comp_code != code);
        Ok(true)
    }
}

#[async_trait]
impl InvoiceService for InMemoryStore {
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceSummary>> {
        let tables = self.read()?;
        Ok(tables.invoices.values().map(Invoice::summary).collect())
    }

    async fn get_invoice_with_company(&self, id: i32) -> StoreResult<Option<InvoiceDetail>> {
        let tables = self.read()?;

        let Some(invoice) = tables.invoices.get(&id) else {
            return Ok(None);
        };
        // Inner join: an invoice whose company vanished is not returned
        Ok(tables
            .companies
            .get(&invoice.comp_code)
            .map(|company| invoice.with_company(company.clone())))
    }

    async fn create_invoice(&self, comp_code: &str, amt: f64) -> StoreResult<Invoice> {
        let mut tables = self.write()?;

        if !tables.companies.contains_key(comp_code) {
            return Err(StoreError::missing_reference("company", comp_code));
        }

        tables.last_invoice_id += 1;
        let invoice = Invoice {
            id: tables.last_invoice_id,
            comp_code: comp_code.to_string(),
            amt,
            paid: false,
            add_date: Utc::now(),
            paid_date: None,
        };
        tables.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn payment_state(&self, id: i32) -> StoreResult<Option<PaymentState>> {
        let tables = self.read()?;
        Ok(tables.invoices.get(&id).map(|invoice| PaymentState {
            paid: invoice.paid,
            paid_date: invoice.paid_date,
        }))
    }

    async fn write_invoice(
        &self,
        id: i32,
        amt: f64,
        paid: bool,
        paid_date: Option<DateTime<Utc>>,
    ) -> StoreResult<Option<Invoice>> {
        if paid_date.is_some() != paid {
            return Err(StoreError::Backend(anyhow!(
                "Failed to update invoice {}: paid_date must be set exactly when paid",
                id
            )));
        }

        let mut tables = self.write()?;
        Ok(tables.invoices.get_mut(&id).map(|invoice| {
            invoice.amt = amt;
            invoice.paid = paid;
            invoice.paid_date = paid_date;
            invoice.clone()
        }))
    }

    async fn delete_invoice(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.write()?;
        Ok(tables.invoices.remove(&id).is_some())
    }

    async fn list_company_invoices(
        &self,
        comp_code: &str,
    ) -> StoreResult<Option<Vec<CompanyInvoice>>> {
        let tables = self.read()?;

        if !tables.companies.contains_key(comp_code) {
            return Ok(None);
        }
        Ok(Some(
            tables
                .invoices
                .values()
                .filter(|invoice| invoice.comp_code == comp_code)
                .map(Invoice::without_company)
                .collect(),
        ))
    }
}
