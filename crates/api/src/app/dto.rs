use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use productapi_core::{Entity, ProductId};
use productapi_products::{NewProduct, Product};

// -------------------------
// Request DTOs
// -------------------------

/// Reference to another product inside a request body.
///
/// Clients may send full nested products; only the id is read.
#[derive(Debug, Deserialize)]
pub struct SourceRef {
    pub id: i64,
}

/// Body of `POST /products` and `PUT /products/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductRequest {
    pub id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub sources: Vec<SourceRef>,
}

impl ProductRequest {
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            id: self.id.map(ProductId::new),
            name: self.name,
            price: self.price,
            source_ids: self.sources.into_iter().map(|s| ProductId::new(s.id)).collect(),
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// Wire shape of a product: sources are nested products, not ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub sources: Vec<ProductView>,
}

/// Lookup table used to expand `source_ids` into nested views.
pub struct ProductIndex {
    by_id: HashMap<ProductId, Product>,
}

impl ProductIndex {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            by_id: products.into_iter().map(|p| (p.id(), p)).collect(),
        }
    }

    /// Expand `product` into its wire shape.
    ///
    /// Sources missing from the index are skipped. A product that is already on
    /// the current expansion path is emitted with no sources, so self-referencing
    /// records terminate.
    pub fn view(&self, product: &Product) -> ProductView {
        let mut path = Vec::new();
        self.view_on_path(product, &mut path)
    }

    fn view_on_path(&self, product: &Product, path: &mut Vec<ProductId>) -> ProductView {
        let sources = if path.contains(&product.id) {
            Vec::new()
        } else {
            path.push(product.id);
            let sources = product
                .source_ids
                .iter()
                .filter_map(|id| self.by_id.get(id))
                .map(|source| self.view_on_path(source, path))
                .collect::<Vec<_>>();
            path.pop();
            sources
        };

        ProductView {
            id: product.id.get(),
            name: product.name.clone(),
            price: product.price,
            sources,
        }
    }
}
