//! Entity descriptor for Company

use super::handlers::{
    CompanyAppState, create_company, delete_company, get_company, list_companies, update_company,
};
use crate::core::service::CompanyService;
use crate::server::entity_registry::{EntityDescriptor, collection_path, member_path};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Descriptor for the Company entity
pub struct CompanyDescriptor {
    pub service: Arc<dyn CompanyService>,
}

impl CompanyDescriptor {
    pub fn new(service: Arc<dyn CompanyService>) -> Self {
        Self { service }
    }
}

impl EntityDescriptor for CompanyDescriptor {
    fn entity_type(&self) -> &str {
        "company"
    }

    fn plural(&self) -> &str {
        "companies"
    }

    fn build_routes(&self) -> Router {
        let state = CompanyAppState {
            service: self.service.clone(),
        };

        Router::new()
            .route(
                &collection_path(self),
                get(list_companies).post(create_company),
            )
            .route(
                &member_path(self, "code"),
                get(get_company).put(update_company).delete(delete_company),
            )
            .with_state(state)
    }
}
