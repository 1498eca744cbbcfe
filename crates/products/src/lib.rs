//! Products domain module.
//!
//! This crate contains the business rules for products and bundles, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod bundle;
pub mod product;

pub use bundle::{BUNDLE_CONFLICT_MESSAGE, BundleDraft, bundle_name, bundle_price, sources_conflict};
pub use product::{NewProduct, Product, duplicate_of};
