use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;

use productapi_core::ProductId;
use productapi_infra::{CatalogError, StoreError};

/// Single place where catalog outcomes become HTTP statuses.
///
/// | error | status |
/// |---|---|
/// | `NotFound` | 404 (JSON) |
/// | `Conflict` | 400 (plain-text message) |
/// | `InvalidId` | 400 (JSON) |
/// | `Store` | 500 (JSON) |
pub fn catalog_error_to_response(err: CatalogError) -> axum::response::Response {
    match err {
        CatalogError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        CatalogError::Conflict(msg) => text_error(StatusCode::BAD_REQUEST, msg),
        CatalogError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        CatalogError::Store(e) => store_error_to_response(e),
    }
}

fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "store failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn text_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message.into(),
    )
        .into_response()
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse::<ProductId>()
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}
