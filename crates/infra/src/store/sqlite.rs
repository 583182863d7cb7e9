//! SQLite-backed product store.
//!
//! ## Connection Handling
//!
//! Each operation checks a connection out of the pool for the duration of that
//! call only. The `PoolConnection` guard returns it on drop, so every exit
//! path (success, `?` early return, error) releases it. Nothing is pinned
//! across operations, except for in-memory databases which only exist on
//! their single connection.
//!
//! ## Schema
//!
//! ```text
//! products(id INTEGER PK AUTOINCREMENT, code TEXT NOT NULL UNIQUE,
//!          name TEXT NOT NULL, price REAL NOT NULL, quantity INTEGER NOT NULL)
//! ```
//!
//! The schema version lives in `PRAGMA user_version`. A database carrying any
//! other version is reset: the table is dropped and recreated, losing its rows.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | Database (unique violation on `code`) | `DuplicateCode` |
//! | Database (other) | `Persistence` |
//! | PoolClosed / PoolTimedOut | `Persistence` |
//! | Other (I/O, decode, configuration) | `Persistence` |

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{FromRow, Row, Sqlite};
use tracing::instrument;

use stockwidget_core::{ProductCode, RecordId};
use stockwidget_products::ProductRecord;

use super::r#trait::{InventoryStore, StoreError};
use crate::config::{StoreConfig, StoreLocation};

/// Current layout of the `products` table.
///
/// Version 1 had no uniqueness on `code`; version 2 enforces it.
pub const SCHEMA_VERSION: i64 = 2;

const CREATE_TABLE: &str = r#"
    CREATE TABLE products (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        code     TEXT    NOT NULL UNIQUE,
        name     TEXT    NOT NULL,
        price    REAL    NOT NULL,
        quantity INTEGER NOT NULL
    )
"#;

/// Durable product store on a local SQLite database.
///
/// Cheap to clone; clones share the pool. The store adds no locking of its
/// own beyond SQLite's single-writer guarantee.
#[derive(Debug, Clone)]
pub struct SqliteInventoryStore {
    pool: SqlitePool,
}

impl SqliteInventoryStore {
    /// Open (creating if needed) the database described by `config` and bring
    /// its schema to [`SCHEMA_VERSION`].
    #[instrument(skip(config), fields(location = ?config.location), err)]
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        if let StoreLocation::File(path) = &config.location {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::persistence(
                        "open",
                        format!("failed to create database directory {}: {e}", parent.display()),
                    )
                })?;
            }
        }

        let options = config
            .connect_options()
            .map_err(|e| map_sqlx_error("open", e))?;
        let pool = config
            .pool_options()
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("open", e))?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database, mostly for tests and previews.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::open(&StoreConfig::in_memory()).await
    }

    /// Wrap an existing pool, migrating its schema first.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Version stored in the database header.
    pub async fn schema_version(&self) -> Result<i64, StoreError> {
        let mut conn = self.acquire("schema_version").await?;
        sqlx::query_scalar::<_, i64>("PRAGMA user_version")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("schema_version", e))
    }

    /// Create the table, or drop and recreate it when the stored version is
    /// not [`SCHEMA_VERSION`].
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let version = self.schema_version().await?;
        if version == SCHEMA_VERSION {
            return Ok(());
        }

        let mut conn = self.acquire("ensure_schema").await?;
        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'products'",
        )
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        if existing > 0 {
            tracing::warn!(
                found = version,
                expected = SCHEMA_VERSION,
                "product table schema is out of date; dropping and recreating it"
            );
        } else {
            tracing::info!(version = SCHEMA_VERSION, "creating product table");
        }

        let mut tx = sqlx::Connection::begin(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query("DROP TABLE IF EXISTS products")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("drop_table", e))?;
        sqlx::query(CREATE_TABLE)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("create_table", e))?;
        // PRAGMA does not take bind parameters; the value is a constant.
        sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("set_schema_version", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Check out a connection for one operation.
    async fn acquire(&self, operation: &'static str) -> Result<PoolConnection<Sqlite>, StoreError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error(operation, e))
    }
}

#[async_trait]
impl InventoryStore for SqliteInventoryStore {
    #[instrument(skip(self, record), fields(code = %record.code), err)]
    async fn create(&self, record: &ProductRecord) -> Result<RecordId, StoreError> {
        let mut conn = self.acquire("create").await?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (code, name, price, quantity)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(record.code.as_str())
        .bind(&record.name)
        .bind(record.price)
        .bind(i64::from(record.quantity))
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateCode(record.code.clone())
            } else {
                map_sqlx_error("create", e)
            }
        })?;

        let id = RecordId::new(result.last_insert_rowid());
        tracing::debug!(%id, "product inserted");
        Ok(id)
    }

    #[instrument(skip(self), err)]
    async fn list_all(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let mut conn = self.acquire("list_all").await?;

        let rows = sqlx::query(
            r#"
            SELECT code, name, price, quantity
            FROM products
            ORDER BY name COLLATE BINARY ASC, id ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("list_all", e))?;

        let records = rows
            .iter()
            .map(decode_record)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = records.len(), "products listed");
        Ok(records)
    }

    #[instrument(skip(self, code), fields(code = %code), err)]
    async fn get_by_code(&self, code: &ProductCode) -> Result<Option<ProductRecord>, StoreError> {
        let mut conn = self.acquire("get_by_code").await?;

        let row = sqlx::query(
            r#"
            SELECT code, name, price, quantity
            FROM products
            WHERE code = ?1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("get_by_code", e))?;

        row.as_ref().map(decode_record).transpose()
    }

    #[instrument(skip(self, record), fields(code = %record.code), err)]
    async fn update(&self, record: &ProductRecord) -> Result<u64, StoreError> {
        let mut conn = self.acquire("update").await?;

        let affected = sqlx::query(
            r#"
            UPDATE products
            SET name = ?1, price = ?2, quantity = ?3
            WHERE code = ?4
            "#,
        )
        .bind(&record.name)
        .bind(record.price)
        .bind(i64::from(record.quantity))
        .bind(record.code.as_str())
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("update", e))?
        .rows_affected();

        tracing::debug!(affected, "product update applied");
        Ok(affected)
    }

    #[instrument(skip(self, code), fields(code = %code), err)]
    async fn delete(&self, code: &ProductCode) -> Result<u64, StoreError> {
        let mut conn = self.acquire("delete").await?;

        let affected = sqlx::query("DELETE FROM products WHERE code = ?1")
            .bind(code.as_str())
            .execute(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?
            .rows_affected();

        tracing::debug!(affected, "product delete applied");
        Ok(affected)
    }

    #[instrument(skip(self), err)]
    async fn count(&self) -> Result<u64, StoreError> {
        let mut conn = self.acquire("count").await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;

        u64::try_from(count)
            .map_err(|_| StoreError::persistence("count", format!("negative row count {count}")))
    }
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    code: String,
    name: String,
    price: f64,
    quantity: i64,
}

impl<'r> FromRow<'r, SqliteRow> for ProductRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            quantity: row.try_get("quantity")?,
        })
    }
}

impl TryFrom<ProductRow> for ProductRecord {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            StoreError::persistence(
                "decode_row",
                format!("quantity {} out of range for product {}", row.quantity, row.code),
            )
        })?;

        Ok(ProductRecord {
            code: ProductCode::from_stored(row.code),
            name: row.name,
            price: row.price,
            quantity,
        })
    }
}

fn decode_record(row: &SqliteRow) -> Result<ProductRecord, StoreError> {
    ProductRow::from_row(row)
        .map_err(|e| map_sqlx_error("decode_row", e))?
        .try_into()
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::persistence(operation, format!("database error: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => StoreError::persistence(operation, "connection pool closed"),
        sqlx::Error::PoolTimedOut => {
            StoreError::persistence(operation, "timed out waiting for a connection")
        }
        other => StoreError::persistence(operation, other.to_string()),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
