//! Product catalog operations (request-level business logic).
//!
//! `ProductCatalog` sits between the HTTP routes and a [`ProductStore`]. Each
//! operation is a short sequence of store calls; there is no locking or
//! cross-call transaction, so two bundle requests over overlapping ids can both
//! pass the reuse check before either one is written.
//!
//! ```text
//! route → ProductCatalog → ProductStore → ProductCatalog → route
//! ```

use thiserror::Error;
use tracing::{info, warn};

use productapi_core::{DomainError, ProductId};
use productapi_products::{
    BUNDLE_CONFLICT_MESSAGE, BundleDraft, NewProduct, Product, duplicate_of, sources_conflict,
};

use crate::product_store::{ProductStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The product (or one of the referenced products) does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A bundle component is already used by another bundle.
    #[error("{0}")]
    Conflict(String),
    /// Malformed identifier.
    #[error("{0}")]
    InvalidId(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for CatalogError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound(msg) => CatalogError::NotFound(msg),
            DomainError::Conflict(msg) => CatalogError::Conflict(msg),
            DomainError::InvalidId(msg) => CatalogError::InvalidId(msg),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Product operations over an injected store.
#[derive(Debug, Clone)]
pub struct ProductCatalog<S> {
    store: S,
}

impl<S> ProductCatalog<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, id: ProductId) -> CatalogResult<Product> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::product_not_found(id).into())
    }

    /// Persist `product` as given, sources included.
    ///
    /// Every source id must name a stored product.
    pub async fn create(&self, product: NewProduct) -> CatalogResult<Product> {
        for source_id in &product.source_ids {
            self.get(*source_id).await?;
        }

        let saved = self.store.save(product).await?;
        info!(product_id = %saved.id, sources = saved.source_ids.len(), "product saved");
        Ok(saved)
    }

    /// Overwrite name and price of an existing product. Sources are kept.
    pub async fn update(&self, id: ProductId, name: String, price: f64) -> CatalogResult<Product> {
        let mut existing = self.get(id).await?;
        existing.rename_and_reprice(name, price);

        let saved = self.store.save(existing.to_new()).await?;
        info!(product_id = %saved.id, "product updated");
        Ok(saved)
    }

    /// Remove a product. Missing ids are not an error.
    pub async fn delete(&self, id: ProductId) -> CatalogResult<()> {
        self.store.delete_by_id(id).await?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Copy a product under the name `"<name> copy"`, without its sources.
    pub async fn duplicate(&self, id: ProductId) -> CatalogResult<Product> {
        let original = self.get(id).await?;
        self.create(duplicate_of(&original)).await
    }

    /// Compose a bundle from `ids`, in order.
    ///
    /// Fails with `Conflict` when any requested id is already a source of a
    /// stored product; nothing is written in that case.
    pub async fn create_bundle(&self, ids: &[ProductId]) -> CatalogResult<Product> {
        if self.sources_in_use(ids).await? {
            warn!(requested = ?ids, "bundle rejected: component already bundled");
            return Err(DomainError::conflict(BUNDLE_CONFLICT_MESSAGE).into());
        }

        let mut components = Vec::with_capacity(ids.len());
        for id in ids {
            components.push(self.get(*id).await?);
        }

        let bundle = self.create(BundleDraft::compose(&components).into()).await?;
        info!(product_id = %bundle.id, components = components.len(), "bundle created");
        Ok(bundle)
    }

    /// One-hop reuse check against the whole store.
    pub async fn sources_in_use(&self, ids: &[ProductId]) -> CatalogResult<bool> {
        let all = self.store.find_all().await?;
        Ok(sources_conflict(&all, ids))
    }
}
