//! REST API exposure
//!
//! Consumes the entity registry and produces the Axum `Router` served over
//! HTTP: health checks, entity routes, custom routes, and a JSON 404 for
//! anything else.

use crate::core::error::ApiError;
use crate::server::entity_registry::EntityRegistry;
use axum::{
    Json, Router,
    http::{Method, Uri},
    routing::get,
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from the registry
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Entity CRUD routes
    /// - Custom routes
    /// - A fallback answering unknown routes with the 404 error envelope
    /// - A 405 error envelope for known routes hit with an unsupported method
    ///
    /// Every request goes through a `TraceLayer`.
    pub fn build_router(registry: &EntityRegistry, custom_routes: Vec<Router>) -> Router {
        let mut app = Self::health_routes().merge(registry.build_routes());

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.method_not_allowed_fallback(Self::method_not_allowed)
            .fallback(Self::route_not_found)
            .layer(TraceLayer::new_for_http())
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "biztime"
        }))
    }

    async fn route_not_found(uri: Uri) -> ApiError {
        ApiError::not_found("route", uri.path())
    }

    async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
        ApiError::method_not_allowed(method, uri.path())
    }
}
