//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and catalog wiring
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and nested product rendering
//! - `errors.rs`: error-to-status mapping

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use productapi_infra::StoreError;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from process configuration (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, StoreError> {
    let services = services::build_services(&config.store).await?;
    Ok(app_with_services(Arc::new(services)))
}

/// Build the router around already-wired services.
pub fn app_with_services(services: Arc<AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(services)))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_logging)))
}

pub use services::AppServices;
