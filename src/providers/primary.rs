use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{absorb_miss, SourceProvider};
use crate::config::EndpointConfig;
use crate::errors::Result;
use crate::fetcher::{decode, segment_url, JsonRequest, PrimaryItem, Transport};
use crate::models::{fallback_display_name, ItemRarity, ItemRecord, SourceTag};

/// The authoritative item API.
pub struct PrimaryApiProvider {
    transport: Arc<dyn Transport>,
    endpoint: EndpointConfig,
    user_agent: String,
}

impl PrimaryApiProvider {
    pub fn new(transport: Arc<dyn Transport>, endpoint: EndpointConfig, user_agent: &str) -> Self {
        Self {
            transport,
            endpoint,
            user_agent: user_agent.to_string(),
        }
    }

    async fn fetch(&self, id: &str) -> Result<Option<ItemRecord>> {
        let url = segment_url(self.endpoint.base(), &["items", id])?;
        let request = JsonRequest::get(url, self.endpoint.timeout()).with_user_agent(&self.user_agent);

        let payload = self.transport.get_json(&request).await?;
        let item: PrimaryItem = decode("primary", payload)?;
        Ok(Some(map_item(id, item)))
    }
}

fn map_item(requested_id: &str, item: PrimaryItem) -> ItemRecord {
    let name = item
        .name
        .unwrap_or_else(|| fallback_display_name(requested_id));
    let id = item.id.unwrap_or_else(|| requested_id.to_string());

    let mut record = ItemRecord::new(id, SourceTag::PrimaryApi)
        .with_name(name)
        .with_description(item.description.unwrap_or_default())
        .with_rarity(item.rarity.as_deref().map(ItemRarity::from_loose).unwrap_or_default());
    if let Some(stack) = item.max_stack_size {
        record = record.with_max_stack_size(stack);
    }
    if let Some(tradeable) = item.tradeable {
        record = record.with_tradeable(tradeable);
    }
    if let Some(value) = item.value {
        record = record.with_value(value);
    }
    record
}

#[async_trait]
impl SourceProvider for PrimaryApiProvider {
    fn tag(&self) -> SourceTag {
        SourceTag::PrimaryApi
    }

    async fn attempt(&self, id: &str) -> Result<Option<ItemRecord>> {
        info!(id, "attempting primary source");
        let outcome = absorb_miss(self.tag(), id, self.fetch(id).await)?;
        if outcome.is_some() {
            info!(id, "resolved using primary source");
        }
        Ok(outcome)
    }
}
