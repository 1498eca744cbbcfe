//! Bundle composition rules.
//!
//! A bundle is a product whose `source_ids` list the products it was built from.
//! Its name and price are derived once, at creation time, from the components.

use std::collections::HashSet;

use productapi_core::ProductId;

use crate::product::{NewProduct, Product};

/// Message reported when a requested component is already used by a bundle.
pub const BUNDLE_CONFLICT_MESSAGE: &str = "Bundle with these products already exists!";

const NAME_SEPARATOR: &str = " + ";

/// One-hop reuse guard.
///
/// Returns `true` as soon as any stored product lists one of `requested` among
/// its sources. Deeper cycles, self references and repeated id sets are not
/// detected.
pub fn sources_conflict<'a, I>(existing: I, requested: &[ProductId]) -> bool
where
    I: IntoIterator<Item = &'a Product>,
{
    if requested.is_empty() {
        return false;
    }
    let requested: HashSet<ProductId> = requested.iter().copied().collect();

    existing
        .into_iter()
        .flat_map(|p| p.source_ids.iter())
        .any(|source| requested.contains(source))
}

/// Concatenate component names, each followed by `" + "`, then trim the
/// surrounding whitespace once. The last separator keeps its `+`.
pub fn bundle_name(components: &[Product]) -> String {
    let mut name = String::new();
    for component in components {
        name.push_str(&component.name);
        name.push_str(NAME_SEPARATOR);
    }
    name.trim().to_string()
}

/// Sum of component prices, added in input order.
pub fn bundle_price(components: &[Product]) -> f64 {
    components.iter().fold(0.0, |total, c| total + c.price)
}

/// Save request for a bundle built from already-resolved components.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleDraft {
    pub name: String,
    pub price: f64,
    pub source_ids: Vec<ProductId>,
}

impl BundleDraft {
    pub fn compose(components: &[Product]) -> Self {
        Self {
            name: bundle_name(components),
            price: bundle_price(components),
            source_ids: components.iter().map(|c| c.id).collect(),
        }
    }
}

impl From<BundleDraft> for NewProduct {
    fn from(draft: BundleDraft) -> Self {
        NewProduct::new(draft.name, draft.price).with_sources(draft.source_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price: f64, sources: &[i64]) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price,
            source_ids: sources.iter().copied().map(ProductId::new).collect(),
        }
    }

    fn ids(raw: &[i64]) -> Vec<ProductId> {
        raw.iter().copied().map(ProductId::new).collect()
    }

    #[test]
    fn compose_two_products() {
        let a = product(1, "Testing Product A", 5.0, &[]);
        let b = product(2, "Testing Product B", 30.0, &[]);

        let draft = BundleDraft::compose(&[a, b]);

        assert_eq!(draft.name, "Testing Product A + Testing Product B +");
        assert_eq!(draft.price, 35.0);
        assert_eq!(draft.source_ids, ids(&[1, 2]));
    }

    #[test]
    fn compose_preserves_input_order_and_duplicates() {
        let a = product(1, "A", 1.0, &[]);
        let b = product(2, "B", 2.0, &[]);

        let draft = BundleDraft::compose(&[b.clone(), a, b]);

        assert_eq!(draft.name, "B + A + B +");
        assert_eq!(draft.price, 5.0);
        assert_eq!(draft.source_ids, ids(&[2, 1, 2]));
    }

    #[test]
    fn compose_empty_is_blank_and_free() {
        let draft = BundleDraft::compose(&[]);
        assert_eq!(draft.name, "");
        assert_eq!(draft.price, 0.0);
        assert!(draft.source_ids.is_empty());
    }

    #[test]
    fn name_trims_leading_whitespace_of_first_component() {
        let a = product(1, "  padded", 1.0, &[]);
        assert_eq!(bundle_name(&[a]), "padded +");
    }

    #[test]
    fn draft_converts_into_new_product_without_id() {
        let a = product(1, "A", 1.0, &[]);
        let req: NewProduct = BundleDraft::compose(&[a]).into();
        assert_eq!(req.id, None);
        assert_eq!(req.source_ids, ids(&[1]));
    }

    #[test]
    fn conflict_when_requested_id_is_already_a_source() {
        let stored = vec![
            product(1, "A", 5.0, &[]),
            product(2, "B", 30.0, &[]),
            product(3, "A + B +", 35.0, &[1, 2]),
        ];

        assert!(sources_conflict(&stored, &ids(&[2, 4])));
        assert!(sources_conflict(&stored, &ids(&[1])));
    }

    #[test]
    fn no_conflict_for_unused_ids() {
        let stored = vec![
            product(1, "A", 5.0, &[]),
            product(2, "B", 30.0, &[]),
            product(3, "A + B +", 35.0, &[1, 2]),
            product(4, "C", 1.0, &[]),
        ];

        assert!(!sources_conflict(&stored, &ids(&[4])));
        // A bundle itself is not a source anywhere, so it may be re-bundled.
        assert!(!sources_conflict(&stored, &ids(&[3, 4])));
    }

    #[test]
    fn no_conflict_on_empty_store_or_empty_request() {
        assert!(!sources_conflict(&Vec::<Product>::new(), &ids(&[1, 2])));
        let stored = vec![product(3, "X", 0.0, &[1])];
        assert!(!sources_conflict(&stored, &[]));
    }

    #[test]
    fn self_reference_is_not_detected_for_fresh_ids() {
        let stored = vec![product(1, "loop", 1.0, &[1])];
        // One hop only: id 2 is unrelated to the self-referencing record.
        assert!(!sources_conflict(&stored, &ids(&[2])));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn trimmed_name() -> impl Strategy<Value = String> {
            "[A-Za-z]([A-Za-z0-9 ]{0,20}[A-Za-z0-9])?"
        }

        proptest! {
            /// Property: the name is the names joined by the separator plus a trailing `+`.
            #[test]
            fn bundle_name_keeps_trailing_plus(names in prop::collection::vec(trimmed_name(), 1..8)) {
                let components: Vec<Product> = names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| product(i as i64 + 1, n, 1.0, &[]))
                    .collect();

                let expected = format!("{} +", names.join(" + "));
                prop_assert_eq!(bundle_name(&components), expected);
            }

            /// Property: the price is the in-order sum of component prices.
            #[test]
            fn bundle_price_is_ordered_sum(prices in prop::collection::vec(-1.0e6f64..1.0e6, 0..10)) {
                let components: Vec<Product> = prices
                    .iter()
                    .enumerate()
                    .map(|(i, p)| product(i as i64 + 1, "x", *p, &[]))
                    .collect();

                let mut expected = 0.0;
                for p in &prices {
                    expected += p;
                }
                prop_assert_eq!(bundle_price(&components), expected);
            }

            /// Property: a conflict is reported iff some stored source is requested.
            #[test]
            fn conflict_iff_overlap(
                sources in prop::collection::vec(prop::collection::vec(0i64..20, 0..4), 0..6),
                requested in prop::collection::vec(0i64..20, 0..6),
            ) {
                let stored: Vec<Product> = sources
                    .iter()
                    .enumerate()
                    .map(|(i, s)| product(100 + i as i64, "b", 0.0, s))
                    .collect();

                let overlap = sources.iter().flatten().any(|s| requested.contains(s));
                prop_assert_eq!(sources_conflict(&stored, &ids(&requested)), overlap);
            }
        }
    }
}
