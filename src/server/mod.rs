//! HTTP surface for the site.
//!
//! Pages are served as JSON view models; the sitemap is XML. The server is
//! started via `start_server()` from the `skillhub-server` binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, http::Method};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::CatalogIndex;
use crate::config::SiteConfig;
use crate::locale::LocaleRouting;
use crate::messages::Messages;
use crate::views::ViewContext;

pub mod error;
mod routes;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogIndex>,
    pub messages: Arc<Messages>,
    pub config: Arc<SiteConfig>,
    pub routing: Arc<LocaleRouting>,
}

impl AppState {
    pub fn new(catalog: CatalogIndex, messages: Messages, config: SiteConfig) -> Self {
        let routing = config.routing();
        Self {
            catalog: Arc::new(catalog),
            messages: Arc::new(messages),
            config: Arc::new(config),
            routing: Arc::new(routing),
        }
    }

    /// Load the catalog named by `config` and the built-in messages.
    ///
    /// Fails when a category has no label in some locale.
    pub fn load(config: SiteConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => CatalogIndex::load(path)?,
            None => CatalogIndex::builtin()?,
        };
        let messages = Messages::builtin()?;
        messages.ensure_category_labels(catalog.categories())?;
        tracing::info!(
            skills = catalog.len(),
            categories = catalog.categories().len(),
            messages = messages.len(),
            "site data loaded"
        );
        Ok(Self::new(catalog, messages, config))
    }

    pub fn view_context(&self) -> ViewContext<'_> {
        ViewContext {
            catalog: &self.catalog,
            messages: &self.messages,
            routing: &self.routing,
        }
    }
}

/// Build the router with every endpoint and the tracing/CORS layers.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    routes::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `0.0.0.0:{port}` and serve until the process is stopped.
pub async fn start_server(state: AppState) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let site_url = state.config.site_url.clone();
    let app = build_router(state);

    tracing::info!("Starting skillhub-server on http://{} ({})", addr, site_url);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .await
        .context("server terminated")?;

    Ok(())
}
