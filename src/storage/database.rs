use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, FromRow, Sqlite};
use std::collections::HashMap;
use tracing::{info, warn};

use super::RecordCache;
use crate::errors::Result;
use crate::models::{ItemRarity, ItemRecord, SourceTag};

#[derive(Debug, FromRow)]
struct RecordRow {
    id: String,
    name: String,
    description: String,
    rarity: String,
    max_stack_size: i64,
    tradeable: bool,
    value: f64,
    source_method: String,
    last_updated: String,
}

impl RecordRow {
    fn into_record(self) -> Option<ItemRecord> {
        let Some(source) = SourceTag::parse(&self.source_method) else {
            warn!(id = %self.id, source = %self.source_method, "skipping cached row with unknown source");
            return None;
        };
        let last_updated = match DateTime::parse_from_rfc3339(&self.last_updated) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                warn!(id = %self.id, error = %e, "skipping cached row with bad timestamp");
                return None;
            }
        };
        let max_stack_size = u32::try_from(self.max_stack_size).unwrap_or(0);

        Some(
            ItemRecord::new(self.id, source)
                .with_name(self.name)
                .with_description(self.description)
                .with_rarity(ItemRarity::from_loose(&self.rarity))
                .with_max_stack_size(max_stack_size)
                .with_tradeable(self.tradeable)
                .with_value(self.value)
                .with_last_updated(last_updated),
        )
    }
}

/// Record cache in a SQLite database, one row per identifier.
pub struct SqliteCache {
    pool: SqlitePool,
}

impl SqliteCache {
    pub async fn connect(database_url: &str) -> Result<Self> {
        if !Sqlite::database_exists(database_url).await? {
            info!(url = database_url, "creating new cache database");
            Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        info!("running cache migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn get(&self, id: &str) -> Result<Option<ItemRecord>> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT id, name, description, rarity, max_stack_size,
                   tradeable, value, source_method, last_updated
            FROM item_records WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.and_then(RecordRow::into_record))
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl RecordCache for SqliteCache {
    async fn load(&self) -> Result<HashMap<String, ItemRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT id, name, description, rarity, max_stack_size,
                   tradeable, value, source_method, last_updated
            FROM item_records
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let records: HashMap<String, ItemRecord> = rows
            .into_iter()
            .filter_map(RecordRow::into_record)
            .map(|record| (record.id().to_string(), record))
            .collect();
        info!(count = records.len(), "loaded products from cache database");
        Ok(records)
    }

    async fn save(&self, records: &[ItemRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            let max_stack_size = i64::from(record.max_stack_size());
            sqlx::query(
                r#"
                INSERT INTO item_records (
                    id, name, description, rarity, max_stack_size,
                    tradeable, value, source_method, last_updated, stored_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description,
                    rarity = excluded.rarity,
                    max_stack_size = excluded.max_stack_size,
                    tradeable = excluded.tradeable,
                    value = excluded.value,
                    source_method = excluded.source_method,
                    last_updated = excluded.last_updated,
                    stored_at = datetime('now')
                "#,
            )
            .bind(record.id())
            .bind(record.name())
            .bind(record.description())
            .bind(record.rarity().as_str())
            .bind(max_stack_size)
            .bind(record.tradeable())
            .bind(record.value())
            .bind(record.source().as_str())
            .bind(record.last_updated().to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        info!(count = records.len(), "saved products to cache database");
        Ok(())
    }
}
