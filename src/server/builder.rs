//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::EntityRegistry;
use super::exposure::RestExposure;
use crate::core::service::{CompanyService, InvoiceService};
use crate::entities::{CompanyDescriptor, InvoiceDescriptor};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the biztime HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    company_service: Option<Arc<dyn CompanyService>>,
    invoice_service: Option<Arc<dyn InvoiceService>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            company_service: None,
            invoice_service: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the company accessors (required)
    pub fn with_company_service(mut self, service: impl CompanyService + 'static) -> Self {
        self.company_service = Some(Arc::new(service));
        self
    }

    /// Set the invoice accessors (required)
    pub fn with_invoice_service(mut self, service: impl InvoiceService + 'static) -> Self {
        self.invoice_service = Some(Arc::new(service));
        self
    }

    /// Use one store for both companies and invoices
    ///
    /// Both services share the same underlying store, so the foreign key
    /// between the two tables holds.
    pub fn with_store<S>(mut self, store: S) -> Self
    where
        S: CompanyService + InvoiceService + 'static,
    {
        let store = Arc::new(store);
        let companies: Arc<dyn CompanyService> = store.clone();
        let invoices: Arc<dyn InvoiceService> = store;
        self.company_service = Some(companies);
        self.invoice_service = Some(invoices);
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the entity registry from the configured services
    pub fn build_registry(&self) -> Result<EntityRegistry> {
        let companies = self.company_service.clone().ok_or_else(|| {
            anyhow::anyhow!("CompanyService is required. Call .with_store() or .with_company_service()")
        })?;
        let invoices = self.invoice_service.clone().ok_or_else(|| {
            anyhow::anyhow!("InvoiceService is required. Call .with_store() or .with_invoice_service()")
        })?;

        let mut registry = EntityRegistry::new();
        registry.register(Box::new(CompanyDescriptor::new(companies)));
        registry.register(Box::new(InvoiceDescriptor::new(invoices)));
        Ok(registry)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let registry = self.build_registry()?;
        tracing::info!(entities = ?registry.entity_types(), "building REST routes");
        let custom_routes = std::mem::take(&mut self.custom_routes);
        Ok(RestExposure::build_router(&registry, custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
