use std::collections::{BTreeMap, HashMap};

use super::RecordCache;
use crate::errors::Result;
use crate::models::{qualified_id, ItemRarity, ItemRecord, SourceTag, PLAIN_TIMESTAMP_FORMAT};

/// Read-only view over a loaded cache, iterated in identifier order.
pub struct CacheIndex {
    records: BTreeMap<String, ItemRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub total: usize,
    pub tradeable: usize,
    /// Records that came from one of the remote APIs.
    pub remote: usize,
    /// Non-zero counts in pipeline stage order.
    pub by_source: Vec<(SourceTag, usize)>,
    /// Non-zero counts from common to legendary.
    pub by_rarity: Vec<(ItemRarity, usize)>,
}

impl CacheIndex {
    pub fn new(records: HashMap<String, ItemRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    pub async fn load(cache: &dyn RecordCache) -> Result<Self> {
        Ok(Self::new(cache.load().await?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ItemRecord> {
        self.records.values()
    }

    /// Bare names are looked up in the `minecraft:` namespace.
    pub fn get(&self, id: &str) -> Option<&ItemRecord> {
        self.records.get(&qualified_id(id))
    }

    /// Case-insensitive substring match on name, identifier or description.
    pub fn search(&self, term: &str) -> Vec<&ItemRecord> {
        let needle = term.to_lowercase();
        self.records()
            .filter(|record| {
                record.name().to_lowercase().contains(&needle)
                    || record.id().to_lowercase().contains(&needle)
                    || record.description().to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn by_rarity(&self, rarity: ItemRarity) -> Vec<&ItemRecord> {
        self.records()
            .filter(|record| record.rarity() == rarity)
            .collect()
    }

    pub fn tradeable(&self) -> Vec<&ItemRecord> {
        self.records().filter(|record| record.tradeable()).collect()
    }

    pub fn stats(&self) -> CacheStats {
        let mut sources: HashMap<SourceTag, usize> = HashMap::new();
        let mut rarities: HashMap<ItemRarity, usize> = HashMap::new();
        for record in self.records() {
            *sources.entry(record.source()).or_insert(0) += 1;
            *rarities.entry(record.rarity()).or_insert(0) += 1;
        }

        CacheStats {
            total: self.len(),
            tradeable: self.tradeable().len(),
            remote: self.records().filter(|r| r.source().is_remote()).count(),
            by_source: SourceTag::ALL
                .into_iter()
                .filter_map(|tag| sources.get(&tag).map(|&count| (tag, count)))
                .collect(),
            by_rarity: ItemRarity::ALL
                .into_iter()
                .filter_map(|rarity| rarities.get(&rarity).map(|&count| (rarity, count)))
                .collect(),
        }
    }
}

pub fn render_record(record: &ItemRecord) -> String {
    [
        "=== Product Information ===".to_string(),
        format!("ID: {}", record.id()),
        format!("Name: {}", record.name()),
        format!("Description: {}", record.description()),
        format!("Rarity: {}", record.rarity()),
        format!("Max Stack: {}", record.max_stack_size()),
        format!("Tradeable: {}", if record.tradeable() { "Yes" } else { "No" }),
        format!("Value: {:.2}", record.value()),
        format!("Source: {}", record.source()),
        format!("Last Updated: {}", record.last_updated().format(PLAIN_TIMESTAMP_FORMAT)),
    ]
    .join("\n")
}

/// One line per record: name, rarity, value and identifier.
pub fn render_listing<'a>(records: impl IntoIterator<Item = &'a ItemRecord>) -> String {
    records
        .into_iter()
        .map(|record| {
            format!(
                "- {} ({}) - Value: {:.2} (Stack: {}) - {}",
                record.name(),
                record.rarity(),
                record.value(),
                record.max_stack_size(),
                record.id()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(stats: &CacheStats) -> String {
    let mut lines = vec![
        "=== Product Statistics ===".to_string(),
        format!("Total Products: {}", stats.total),
        format!("Tradeable Products: {}", stats.tradeable),
        format!("From Remote Sources: {}", stats.remote),
        "By Source Method:".to_string(),
    ];
    for (tag, count) in &stats.by_source {
        lines.push(format!("  {}: {}", tag, count));
    }
    lines.push("By Rarity:".to_string());
    for (rarity, count) in &stats.by_rarity {
        lines.push(format!("  {}: {}", rarity, count));
    }
    lines.join("\n")
}
