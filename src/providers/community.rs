use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use super::{absorb_miss, SourceProvider};
use crate::config::EndpointConfig;
use crate::errors::Result;
use crate::fetcher::{decode, CommunitySearch, JsonRequest, Transport};
use crate::models::{
    fallback_display_name, ItemRarity, ItemRecord, SourceTag, DEFAULT_MAX_STACK_SIZE, DEFAULT_VALUE,
};

const DEFAULT_DESCRIPTION: &str = "Retrieved from community database";

/// Community-aggregated trading database, queried by search rather than by id.
pub struct CommunityDbProvider {
    transport: Arc<dyn Transport>,
    endpoint: EndpointConfig,
}

impl CommunityDbProvider {
    pub fn new(transport: Arc<dyn Transport>, endpoint: EndpointConfig) -> Self {
        Self { transport, endpoint }
    }

    async fn fetch(&self, id: &str) -> Result<Option<ItemRecord>> {
        let request = JsonRequest::get(
            format!("{}/items", self.endpoint.base()),
            self.endpoint.timeout(),
        )
        .with_query("search", id);

        let payload = self.transport.get_json(&request).await?;
        let search: CommunitySearch = decode("community", payload)?;

        // Only the top hit counts.
        let Some(item) = search.into_first() else {
            debug!(id, "community search returned no results");
            return Ok(None);
        };

        let record = ItemRecord::new(id, SourceTag::CommunityDb)
            .with_name(item.name.unwrap_or_else(|| fallback_display_name(id)))
            .with_description(item.description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()))
            .with_rarity(item.rarity.as_deref().map(ItemRarity::from_loose).unwrap_or_default())
            .with_max_stack_size(item.max_stack.unwrap_or(DEFAULT_MAX_STACK_SIZE))
            .with_tradeable(item.tradeable.unwrap_or(true))
            .with_value(item.avg_price.unwrap_or(DEFAULT_VALUE));
        Ok(Some(record))
    }
}

#[async_trait]
impl SourceProvider for CommunityDbProvider {
    fn tag(&self) -> SourceTag {
        SourceTag::CommunityDb
    }

    async fn attempt(&self, id: &str) -> Result<Option<ItemRecord>> {
        info!(id, "trying community database");
        let outcome = absorb_miss(self.tag(), id, self.fetch(id).await)?;
        if outcome.is_some() {
            info!(id, "resolved using community database");
        }
        Ok(outcome)
    }
}
