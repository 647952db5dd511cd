//! Persistent identifier-to-record caches.
//!
//! The resolution pipeline never reads from a cache; caches are filled after
//! a batch run and consulted only for reporting and lookups.

mod database;
mod json_cache;
mod query;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::config::{CacheBackend, CacheConfig};
use crate::errors::Result;
use crate::models::ItemRecord;

pub use database::SqliteCache;
pub use json_cache::JsonFileCache;
pub use query::{render_listing, render_record, render_stats, CacheIndex, CacheStats};

#[async_trait]
pub trait RecordCache: Send + Sync {
    async fn load(&self) -> Result<HashMap<String, ItemRecord>>;

    async fn save(&self, records: &[ItemRecord]) -> Result<()>;
}

/// Opens the configured backend, or `None` when caching is disabled.
pub async fn open_cache(config: &CacheConfig) -> Result<Option<Box<dyn RecordCache>>> {
    let Some(location) = config.location() else {
        return Ok(None);
    };
    match config.backend {
        CacheBackend::None => Ok(None),
        CacheBackend::Json => Ok(Some(Box::new(JsonFileCache::new(location)))),
        CacheBackend::Sqlite => {
            let url = if location.starts_with("sqlite:") {
                location.to_string()
            } else {
                format!("sqlite:{}", location)
            };
            Ok(Some(Box::new(SqliteCache::connect(&url).await?)))
        }
    }
}

/// Overlays `fresh` onto what the cache already holds and writes the union back.
pub async fn merge_into(cache: &dyn RecordCache, fresh: &[ItemRecord]) -> Result<usize> {
    let mut merged = cache.load().await?;
    for record in fresh {
        merged.insert(record.id().to_string(), record.clone());
    }
    let all: Vec<ItemRecord> = merged.into_values().collect();
    cache.save(&all).await?;
    Ok(all.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceTag;

    #[tokio::test]
    async fn test_open_disabled_cache() {
        let config = CacheConfig::new(CacheBackend::None, "");
        assert!(open_cache(&config).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_merge_keeps_older_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = JsonFileCache::new(dir.path().join("cache.json"));
        cache
            .save(&[ItemRecord::new("minecraft:stone", SourceTag::GameData)])
            .await
            .unwrap();

        let total = merge_into(
            &cache,
            &[
                ItemRecord::new("minecraft:stone", SourceTag::PrimaryApi),
                ItemRecord::new("minecraft:dirt", SourceTag::DefaultValues),
            ],
        )
        .await
        .unwrap();

        assert_eq!(total, 2);
        let loaded = cache.load().await.unwrap();
        assert_eq!(loaded["minecraft:stone"].source(), SourceTag::PrimaryApi);
        assert!(loaded.contains_key("minecraft:dirt"));
    }

    #[tokio::test]
    async fn test_merge_over_legacy_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("product_cache.json");
        std::fs::write(
            &path,
            r#"{
  "minecraft:enchanted_book": {
    "id": "minecraft:enchanted_book",
    "name": "Enchanted Book",
    "description": "A book imbued with magical properties",
    "rarity": "uncommon",
    "max_stack_size": 1,
    "tradeable": true,
    "value": 50.0,
    "source_method": "game_data",
    "last_updated": "2024-05-01 10:00:00"
  }
}"#,
        )
        .unwrap();
        let cache = JsonFileCache::new(&path);

        let total = merge_into(
            &cache,
            &[ItemRecord::new("minecraft:stone", SourceTag::DefaultValues)],
        )
        .await
        .unwrap();

        assert_eq!(total, 2);
        let loaded = cache.load().await.unwrap();
        assert!(loaded.contains_key("minecraft:stone"));
        assert_eq!(loaded["minecraft:enchanted_book"].value(), 50.0);
    }

    #[tokio::test]
    async fn test_open_sqlite_accepts_plain_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig::new(
            CacheBackend::Sqlite,
            dir.path().join("items.db").display().to_string(),
        );
        let cache = open_cache(&config).await.unwrap().unwrap();
        assert!(cache.load().await.unwrap().is_empty());
    }
}
