//! SQLite store implementation

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;

use super::{validate_field, Collection, DocumentStore, StoreError};

/// SQLite-backed document store: one table per collection, one JSON document per row.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wraps an open pool and creates the collection tables if needed.
    pub async fn new(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    doc TEXT NOT NULL
                )",
                collection.table()
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn decode(rows: Vec<String>) -> Result<Vec<Value>, StoreError> {
        rows.iter()
            .map(|raw| serde_json::from_str(raw).map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn insert(&self, collection: Collection, doc: &Value) -> Result<(), StoreError> {
        if !doc.is_object() {
            return Err(StoreError::NotAnObject(doc.to_string()));
        }

        let sql = format!("INSERT INTO {} (doc) VALUES (?)", collection.table());
        sqlx::query(&sql)
            .bind(serde_json::to_string(doc)?)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let sql = format!("SELECT doc FROM {} ORDER BY seq", collection.table());
        let rows: Vec<String> = sqlx::query_scalar(&sql).fetch_all(&self.pool).await?;
        Self::decode(rows)
    }

    async fn find_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        validate_field(field)?;

        let sql = format!(
            "SELECT doc FROM {} WHERE json_extract(doc, ?) = ? ORDER BY seq",
            collection.table()
        );
        let rows: Vec<String> = sqlx::query_scalar(&sql)
            .bind(format!("$.{field}"))
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Self::decode(rows)
    }

    async fn delete_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<u64, StoreError> {
        validate_field(field)?;

        let sql = format!(
            "DELETE FROM {} WHERE json_extract(doc, ?) = ?",
            collection.table()
        );
        let result = sqlx::query(&sql)
            .bind(format!("$.{field}"))
            .bind(value)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let one: i64 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(one == 1)
    }
}
