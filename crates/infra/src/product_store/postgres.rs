//! Postgres-backed product store.
//!
//! ## Schema
//!
//! ```text
//! products(id BIGSERIAL PK, name TEXT, price DOUBLE PRECISION)
//! product_sources(product_id FK, source_id FK, position INT)   -- PK (product_id, position)
//! ```
//!
//! Both foreign keys cascade on delete, so removing a product also removes every
//! edge that mentions it. Source order is kept in `position`.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (foreign key violation) | `23503` | `Integrity` |
//! | Database (other) | Any other | `Database` |
//! | Column decode failure | N/A | `Corrupt` |
//! | Other | N/A | `Database` |

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{Span, instrument};

use productapi_core::ProductId;
use productapi_products::{NewProduct, Product};

use super::r#trait::{ProductStore, StoreError, StoreResult};

const CREATE_PRODUCTS: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL
    )
"#;

const CREATE_PRODUCT_SOURCES: &str = r#"
    CREATE TABLE IF NOT EXISTS product_sources (
        product_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        source_id BIGINT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        position INT NOT NULL,
        PRIMARY KEY (product_id, position)
    )
"#;

/// Postgres-backed product store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`. `save` runs in a
/// transaction so a record and its source edges land together.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` and make sure the tables exist.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the tables if they are missing. Existing tables are left as they are.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for ddl in [CREATE_PRODUCTS, CREATE_PRODUCT_SOURCES] {
            sqlx::query(ddl)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }

    async fn load_sources(&self, id: ProductId) -> StoreResult<Vec<ProductId>> {
        let rows = sqlx::query(
            r#"
            SELECT source_id
            FROM product_sources
            WHERE product_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(id.get())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_sources", e))?;

        rows.iter()
            .map(|row| decode::<i64>(row, "source_id").map(ProductId::new))
            .collect()
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self), err)]
    async fn find_all(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query("SELECT id, name, price FROM products ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        let edges = sqlx::query(
            r#"
            SELECT product_id, source_id
            FROM product_sources
            ORDER BY product_id ASC, position ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        let mut sources: HashMap<i64, Vec<ProductId>> = HashMap::new();
        for edge in &edges {
            let product_id = decode::<i64>(edge, "product_id")?;
            let source_id = decode::<i64>(edge, "source_id")?;
            sources
                .entry(product_id)
                .or_default()
                .push(ProductId::new(source_id));
        }

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = decode::<i64>(row, "id")?;
            products.push(Product {
                id: ProductId::new(id),
                name: decode(row, "name")?,
                price: decode(row, "price")?,
                source_ids: sources.remove(&id).unwrap_or_default(),
            });
        }

        tracing::debug!(count = products.len(), "loaded products");
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_by_id(&self, id: ProductId) -> StoreResult<Option<Product>> {
        let row = sqlx::query("SELECT id, name, price FROM products WHERE id = $1")
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Product {
            id,
            name: decode(&row, "name")?,
            price: decode(&row, "price")?,
            source_ids: self.load_sources(id).await?,
        }))
    }

    #[instrument(
        skip(self, product),
        fields(requested_id = ?product.id, product_id = tracing::field::Empty),
        err
    )]
    async fn save(&self, product: NewProduct) -> StoreResult<Product> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("save.begin", e))?;

        let existing = match product.id {
            Some(id) => sqlx::query("SELECT id FROM products WHERE id = $1 FOR UPDATE")
                .bind(id.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("save.lookup", e))?
                .map(|_| id),
            None => None,
        };

        let id = match existing {
            Some(id) => {
                sqlx::query("UPDATE products SET name = $2, price = $3 WHERE id = $1")
                    .bind(id.get())
                    .bind(&product.name)
                    .bind(product.price)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("save.update", e))?;
                sqlx::query("DELETE FROM product_sources WHERE product_id = $1")
                    .bind(id.get())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("save.clear_sources", e))?;
                id
            }
            None => {
                let row = sqlx::query("INSERT INTO products (name, price) VALUES ($1, $2) RETURNING id")
                    .bind(&product.name)
                    .bind(product.price)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| map_sqlx_error("save.insert", e))?;
                ProductId::new(decode(&row, "id")?)
            }
        };

        insert_sources(&mut tx, id, &product.source_ids).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("save.commit", e))?;

        Span::current().record("product_id", tracing::field::display(id));
        Ok(product.into_product(id))
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_by_id(&self, id: ProductId) -> StoreResult<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn delete_all(&self) -> StoreResult<()> {
        sqlx::query("TRUNCATE product_sources, products")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_all", e))?;
        Ok(())
    }
}

async fn insert_sources(
    tx: &mut Transaction<'_, Postgres>,
    id: ProductId,
    source_ids: &[ProductId],
) -> StoreResult<()> {
    for (position, source_id) in source_ids.iter().enumerate() {
        let position = i32::try_from(position)
            .map_err(|_| StoreError::Integrity(format!("too many sources for product {id}")))?;
        sqlx::query("INSERT INTO product_sources (product_id, source_id, position) VALUES ($1, $2, $3)")
            .bind(id.get())
            .bind(source_id.get())
            .bind(position)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("save.insert_sources", e))?;
    }
    Ok(())
}

fn decode<'r, T>(row: &'r sqlx::postgres::PgRow, column: &str) -> StoreResult<T>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get::<T, _>(column)
        .map_err(|e| StoreError::Corrupt(format!("column {column}: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23503") => StoreError::Integrity(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Database(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
