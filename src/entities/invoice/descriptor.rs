//! Entity descriptor for Invoice

use super::handlers::{
    InvoiceAppState, create_invoice, delete_invoice, get_invoice, list_company_invoices,
    list_invoices, update_invoice,
};
use crate::core::service::InvoiceService;
use crate::server::entity_registry::{EntityDescriptor, collection_path, member_path};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Descriptor for the Invoice entity
///
/// Also owns the nested `/companies/{code}/invoices` listing, since it reads
/// the invoices table.
pub struct InvoiceDescriptor {
    pub service: Arc<dyn InvoiceService>,
}

impl InvoiceDescriptor {
    pub fn new(service: Arc<dyn InvoiceService>) -> Self {
        Self { service }
    }
}

impl EntityDescriptor for InvoiceDescriptor {
    fn entity_type(&self) -> &str {
        "invoice"
    }

    fn plural(&self) -> &str {
        "invoices"
    }

    fn build_routes(&self) -> Router {
        let state = InvoiceAppState {
            service: self.service.clone(),
        };

        Router::new()
            .route(
                &collection_path(self),
                get(list_invoices).post(create_invoice),
            )
            .route(
                &member_path(self, "id"),
                get(get_invoice).put(update_invoice).delete(delete_invoice),
            )
            .route(
                &format!("/companies/{{code}}{}", collection_path(self)),
                get(list_company_invoices),
            )
            .with_state(state)
    }
}
