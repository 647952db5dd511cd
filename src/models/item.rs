use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::item_type::{ItemRarity, SourceTag};
use super::naming::fallback_display_name;

pub const DEFAULT_MAX_STACK_SIZE: u32 = 64;
pub const DEFAULT_VALUE: f64 = 1.0;

/// Offset-less layout used in reports and by older scraper caches.
pub const PLAIN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Item metadata as resolved by one pipeline stage.
///
/// Built through the consuming `with_*` methods and never mutated afterwards;
/// the only way to "change" a record is to build a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    id: String,
    name: String,
    description: String,
    rarity: ItemRarity,
    max_stack_size: u32,
    tradeable: bool,
    value: f64,
    #[serde(rename = "source_method")]
    source: SourceTag,
    #[serde(deserialize_with = "deserialize_timestamp")]
    last_updated: DateTime<Utc>,
}

/// Accepts RFC 3339 as well as the plain layout, read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, PLAIN_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
}

impl ItemRecord {
    /// A record carrying the safe defaults for every optional field.
    pub fn new(id: impl Into<String>, source: SourceTag) -> Self {
        let id = id.into();
        Self {
            name: fallback_display_name(&id),
            id,
            description: String::new(),
            rarity: ItemRarity::Common,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            tradeable: true,
            value: DEFAULT_VALUE,
            source,
            last_updated: Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rarity(mut self, rarity: ItemRarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Zero is not a valid stack size and falls back to the default.
    pub fn with_max_stack_size(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = if max_stack_size == 0 {
            DEFAULT_MAX_STACK_SIZE
        } else {
            max_stack_size
        };
        self
    }

    pub fn with_tradeable(mut self, tradeable: bool) -> Self {
        self.tradeable = tradeable;
        self
    }

    /// Negative and non-finite values fall back to the default.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = if value.is_finite() && value >= 0.0 {
            value
        } else {
            DEFAULT_VALUE
        };
        self
    }

    pub fn with_last_updated(mut self, last_updated: DateTime<Utc>) -> Self {
        self.last_updated = last_updated;
        self
    }

    /// Copy of this record attributed to `source`.
    pub fn restamped(mut self, source: SourceTag) -> Self {
        self.source = source;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rarity(&self) -> ItemRarity {
        self.rarity
    }

    pub fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    pub fn tradeable(&self) -> bool {
        self.tradeable
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Equality on everything except the timestamp.
    pub fn same_content(&self, other: &ItemRecord) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.description == other.description
            && self.rarity == other.rarity
            && self.max_stack_size == other.max_stack_size
            && self.tradeable == other.tradeable
            && self.value == other.value
            && self.source == other.source
    }
}
