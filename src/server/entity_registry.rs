//! Entity registry collecting the route tables of every entity

use axum::Router;
use std::collections::BTreeMap;

/// How one entity contributes routes to the server
///
/// `plural` is the route prefix: a descriptor serves `/{plural}` and
/// `/{plural}/{key}` (see [`collection_path`] and [`member_path`]).
pub trait EntityDescriptor: Send + Sync {
    /// Singular name, also used in error messages ("company")
    fn entity_type(&self) -> &str;

    /// Route prefix ("companies")
    fn plural(&self) -> &str;

    fn build_routes(&self) -> Router;
}

/// `/{plural}`
pub fn collection_path(descriptor: &dyn EntityDescriptor) -> String {
    format!("/{}", descriptor.plural())
}

/// `/{plural}/{<key>}`, with `key` as the axum path parameter name
pub fn member_path(descriptor: &dyn EntityDescriptor, key: &str) -> String {
    format!("/{}/{{{}}}", descriptor.plural(), key)
}

/// Descriptors keyed by entity type
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any earlier one of the same type
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        tracing::debug!(
            entity_type = %entity_type,
            prefix = %collection_path(descriptor.as_ref()),
            "registering entity routes"
        );
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge the routes of every registered entity
    pub fn build_routes(&self) -> Router {
        self.descriptors
            .values()
            .fold(Router::new(), |router, descriptor| {
                router.merge(descriptor.build_routes())
            })
    }

    /// Registered entity types, sorted
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(String::as_str).collect()
    }
}
