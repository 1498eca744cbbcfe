use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use productapi_core::ProductId;
use productapi_products::Product;

use crate::app::dto::{ProductIndex, ProductRequest};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/bundle", post(create_bundle))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/:id/duplicate", post(duplicate_product))
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let products = match services.catalog.list().await {
        Ok(p) => p,
        Err(e) => return errors::catalog_error_to_response(e),
    };

    let index = ProductIndex::new(products.iter().cloned());
    let views = products.iter().map(|p| index.view(p)).collect::<Vec<_>>();
    (StatusCode::OK, Json(views)).into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.catalog.get(id).await {
        Ok(product) => render(&services, product).await,
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ProductRequest>,
) -> axum::response::Response {
    match services.catalog.create(body.into_new_product()).await {
        Ok(product) => render(&services, product).await,
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<ProductRequest>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.catalog.update(id, body.name, body.price).await {
        Ok(product) => render(&services, product).await,
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.catalog.delete(id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn duplicate_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.catalog.duplicate(id).await {
        Ok(product) => render(&services, product).await,
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_bundle(
    Extension(services): Extension<Arc<AppServices>>,
    Json(ids): Json<Vec<i64>>,
) -> axum::response::Response {
    let ids = ids.into_iter().map(ProductId::new).collect::<Vec<_>>();

    match services.catalog.create_bundle(&ids).await {
        Ok(product) => render(&services, product).await,
        Err(e) => errors::catalog_error_to_response(e),
    }
}

/// Serialize one product with its sources expanded from the current store contents.
async fn render(services: &AppServices, product: Product) -> axum::response::Response {
    let index = if product.is_bundle() {
        match services.catalog.list().await {
            Ok(all) => ProductIndex::new(all),
            Err(e) => return errors::catalog_error_to_response(e),
        }
    } else {
        ProductIndex::new(std::iter::empty::<Product>())
    };

    (StatusCode::OK, Json(index.view(&product))).into_response()
}
