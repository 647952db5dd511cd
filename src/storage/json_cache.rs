use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

use super::RecordCache;
use crate::errors::Result;
use crate::models::ItemRecord;

/// Record cache stored as one pretty-printed JSON object keyed by identifier.
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordCache for JsonFileCache {
    async fn load(&self) -> Result<HashMap<String, ItemRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no cache file found, starting fresh");
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: HashMap<String, ItemRecord> = serde_json::from_str(&content)?;
        info!(count = records.len(), path = %self.path.display(), "loaded products from cache");
        Ok(records)
    }

    async fn save(&self, records: &[ItemRecord]) -> Result<()> {
        // Sorted keys keep the file diff-friendly between runs.
        let by_id: BTreeMap<&str, &ItemRecord> =
            records.iter().map(|record| (record.id(), record)).collect();
        let json = serde_json::to_string_pretty(&by_id)?;
        tokio::fs::write(&self.path, json).await?;
        info!(count = by_id.len(), path = %self.path.display(), "saved products to cache");
        Ok(())
    }
}
