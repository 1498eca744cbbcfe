use std::sync::Arc;

use thiserror::Error;

use productapi_core::ProductId;
use productapi_products::{NewProduct, Product};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("referential integrity violation: {0}")]
    Integrity(String),

    #[error("stored record could not be decoded: {0}")]
    Corrupt(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Persistence for product records.
///
/// ## Contract
///
/// - `find_all` returns records ordered by id (ids are assigned monotonically,
///   so this is insertion order).
/// - `find_by_id` never fails for a missing id; it returns `Ok(None)`.
/// - `save` inserts when `id` is `None` or unknown (a fresh id is assigned), and
///   overwrites the record in place when `id` matches an existing one. The
///   record and its source edges are written together.
/// - `delete_by_id` is idempotent. Edges pointing at the deleted record are
///   removed with it.
/// - `delete_all` clears every record and edge (fixture reset).
///
/// Each call is atomic on its own; nothing spans calls.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_all(&self) -> StoreResult<Vec<Product>>;

    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>>;

    async fn save(&self, product: NewProduct) -> StoreResult<Product>;

    async fn delete_by_id(&self, id: ProductId) -> StoreResult<()>;

    async fn delete_all(&self) -> StoreResult<()>;
}

#[async_trait::async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        (**self).find_all().await
    }

    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).find_by_id(id).await
    }

    async fn save(&self, product: NewProduct) -> StoreResult<Product> {
        (**self).save(product).await
    }

    async fn delete_by_id(&self, id: ProductId) -> StoreResult<()> {
        (**self).delete_by_id(id).await
    }

    async fn delete_all(&self) -> StoreResult<()> {
        (**self).delete_all().await
    }
}
