//! Infrastructure layer: product persistence and the catalog operations built on it.

pub mod catalog;
pub mod product_store;

pub use catalog::{CatalogError, ProductCatalog};
pub use product_store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
