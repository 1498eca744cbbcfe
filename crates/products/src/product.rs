use serde::{Deserialize, Serialize};

use productapi_core::{Entity, ProductId};

/// Suffix appended to a product name when it is duplicated.
const COPY_SUFFIX: &str = " copy";

/// A persisted product record.
///
/// Bundles reference their components by id only; nested representations are
/// resolved at the API boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub source_ids: Vec<ProductId>,
}

impl Product {
    pub fn is_bundle(&self) -> bool {
        !self.source_ids.is_empty()
    }

    /// Copy of this record as a save request targeting the same id.
    pub fn to_new(&self) -> NewProduct {
        NewProduct {
            id: Some(self.id),
            name: self.name.clone(),
            price: self.price,
            source_ids: self.source_ids.clone(),
        }
    }

    /// Overwrite name and price, leaving sources untouched.
    pub fn rename_and_reprice(&mut self, name: impl Into<String>, price: f64) {
        self.name = name.into();
        self.price = price;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Input to a store save.
///
/// `id: None` asks the store to assign one; `id: Some(_)` overwrites the
/// existing record with that id if there is one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    pub source_ids: Vec<ProductId>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            source_ids: Vec::new(),
        }
    }

    pub fn with_sources(mut self, source_ids: Vec<ProductId>) -> Self {
        self.source_ids = source_ids;
        self
    }

    /// Materialize the record once the store has settled on an id.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            source_ids: self.source_ids,
        }
    }
}

/// Build the save request for a duplicate of `original`.
///
/// The copy keeps the price, gets the `" copy"` suffix and has no sources.
pub fn duplicate_of(original: &Product) -> NewProduct {
    NewProduct::new(format!("{}{COPY_SUFFIX}", original.name), original.price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price: f64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price,
            source_ids: vec![],
        }
    }

    #[test]
    fn duplicate_appends_copy_suffix_and_keeps_price() {
        let original = product(1, "Testing Product A", 5.0);
        let copy = duplicate_of(&original);

        assert_eq!(copy.id, None);
        assert_eq!(copy.name, "Testing Product A copy");
        assert_eq!(copy.price, 5.0);
    }

    #[test]
    fn duplicate_drops_sources() {
        let mut bundle = product(3, "A + B +", 35.0);
        bundle.source_ids = vec![ProductId::new(1), ProductId::new(2)];

        assert!(bundle.is_bundle());
        assert!(duplicate_of(&bundle).source_ids.is_empty());
    }

    #[test]
    fn rename_and_reprice_keeps_sources() {
        let mut bundle = product(3, "A + B +", 35.0);
        bundle.source_ids = vec![ProductId::new(1), ProductId::new(2)];

        bundle.rename_and_reprice("Updated Product", 15.0);

        assert_eq!(bundle.name, "Updated Product");
        assert_eq!(bundle.price, 15.0);
        assert_eq!(bundle.source_ids, vec![ProductId::new(1), ProductId::new(2)]);
    }

    #[test]
    fn to_new_targets_same_id() {
        let p = product(9, "Widget", 1.5);
        let req = p.to_new();
        assert_eq!(req.id, Some(ProductId::new(9)));
        assert_eq!(req.clone().into_product(ProductId::new(9)), p);
    }
}
