use std::sync::Arc;

use productapi_infra::{
    InMemoryProductStore, PostgresProductStore, ProductCatalog, ProductStore, StoreError,
};

use crate::config::StoreConfig;

/// Catalog over whichever store the process was configured with.
pub type SharedCatalog = ProductCatalog<Arc<dyn ProductStore>>;

/// Store backend in use (reported in logs).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::InMemory => "in_memory",
            StoreBackend::Postgres => "postgres",
        }
    }
}

/// Shared application services handed to every route.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: SharedCatalog,
    pub backend: StoreBackend,
}

impl AppServices {
    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        let store: Arc<dyn ProductStore> = Arc::new(InMemoryProductStore::new());
        Self {
            catalog: ProductCatalog::new(store),
            backend: StoreBackend::InMemory,
        }
    }

    /// Postgres wiring: connects, then creates the tables if missing.
    pub async fn postgres(database_url: &str) -> Result<Self, StoreError> {
        let store: Arc<dyn ProductStore> = Arc::new(PostgresProductStore::connect(database_url).await?);
        Ok(Self {
            catalog: ProductCatalog::new(store),
            backend: StoreBackend::Postgres,
        })
    }
}

pub async fn build_services(config: &StoreConfig) -> Result<AppServices, StoreError> {
    let services = match config {
        StoreConfig::InMemory => AppServices::in_memory(),
        StoreConfig::Postgres { database_url } => AppServices::postgres(database_url).await?,
    };
    tracing::info!(backend = services.backend.as_str(), "product store ready");
    Ok(services)
}
