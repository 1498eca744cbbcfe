use axum::{routing::get, Router};

pub mod products;
pub mod system;

/// Router for all service endpoints that need the shared services.
pub fn router() -> Router {
    Router::new()
        .route("/info", get(system::info))
        .nest("/products", products::router())
}
