use std::collections::BTreeMap;
use std::sync::RwLock;

use productapi_core::ProductId;
use productapi_products::{NewProduct, Product};

use super::r#trait::{ProductStore, StoreError, StoreResult};

#[derive(Debug)]
struct State {
    next_id: i64,
    records: BTreeMap<ProductId, Product>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: BTreeMap::new(),
        }
    }
}

impl State {
    fn allocate_id(&mut self) -> ProductId {
        let id = ProductId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

/// In-memory product store.
///
/// Intended for tests/dev. Ids start at 1 and are never reused, including
/// after `delete_all`.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    state: RwLock<State>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.records.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.records.get(&id).cloned())
    }

    async fn save(&self, product: NewProduct) -> StoreResult<Product> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;

        // Edges must point at stored records, mirroring the join-table foreign key.
        if let Some(missing) = product
            .source_ids
            .iter()
            .find(|s| !state.records.contains_key(*s))
        {
            return Err(StoreError::Integrity(format!("unknown source id {missing}")));
        }

        let id = match product.id {
            Some(id) if state.records.contains_key(&id) => id,
            _ => state.allocate_id(),
        };

        let record = product.into_product(id);
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_by_id(&self, id: ProductId) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        if state.records.remove(&id).is_some() {
            for record in state.records.values_mut() {
                record.source_ids.retain(|s| *s != id);
            }
        }
        Ok(())
    }

    async fn delete_all(&self) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        state.records.clear();
        Ok(())
    }
}
