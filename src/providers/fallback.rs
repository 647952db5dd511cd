use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::{absorb_miss, SourceProvider};
use crate::config::EndpointConfig;
use crate::errors::Result;
use crate::fetcher::{decode, segment_url, FallbackItem, JsonRequest, Transport};
use crate::models::{
    fallback_display_name, ItemRarity, ItemRecord, SourceTag, DEFAULT_MAX_STACK_SIZE, DEFAULT_VALUE,
};

const DEFAULT_DESCRIPTION: &str = "Retrieved from fallback API";

/// Secondary mirror of the item API with its own field names.
pub struct FallbackApiProvider {
    transport: Arc<dyn Transport>,
    endpoint: EndpointConfig,
    user_agent: String,
}

impl FallbackApiProvider {
    pub fn new(transport: Arc<dyn Transport>, endpoint: EndpointConfig, user_agent: &str) -> Self {
        Self {
            transport,
            endpoint,
            user_agent: user_agent.to_string(),
        }
    }

    async fn fetch(&self, id: &str) -> Result<Option<ItemRecord>> {
        let url = segment_url(self.endpoint.base(), &["minecraft", "items", id])?;
        let request = JsonRequest::get(url, self.endpoint.timeout()).with_user_agent(&self.user_agent);

        let payload = self.transport.get_json(&request).await?;
        let item: FallbackItem = decode("fallback", payload)?;

        // This source has no tradeable flag; everything it lists is tradeable.
        let record = ItemRecord::new(id, SourceTag::FallbackApi)
            .with_name(item.display_name.unwrap_or_else(|| fallback_display_name(id)))
            .with_description(item.description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()))
            .with_rarity(item.rarity.as_deref().map(ItemRarity::from_loose).unwrap_or_default())
            .with_max_stack_size(item.stack_size.unwrap_or(DEFAULT_MAX_STACK_SIZE))
            .with_tradeable(true)
            .with_value(item.estimated_value.unwrap_or(DEFAULT_VALUE));
        Ok(Some(record))
    }
}

#[async_trait]
impl SourceProvider for FallbackApiProvider {
    fn tag(&self) -> SourceTag {
        SourceTag::FallbackApi
    }

    async fn attempt(&self, id: &str) -> Result<Option<ItemRecord>> {
        info!(id, "trying fallback API");
        let outcome = absorb_miss(self.tag(), id, self.fetch(id).await)?;
        if outcome.is_some() {
            info!(id, "resolved using fallback API");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RecoveryError;
    use crate::providers::test_support::ScriptedTransport;
    use serde_json::json;
    use std::time::Duration;

    fn provider(transport: Arc<ScriptedTransport>) -> FallbackApiProvider {
        FallbackApiProvider::new(
            transport,
            EndpointConfig::new("https://backup.test/v2", 15),
            "agent/1.0",
        )
    }

    #[tokio::test]
    async fn test_maps_fallback_field_names() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(json!({
                "displayName": "Golden Apple",
                "rarity": "uncommon",
                "stackSize": 64,
                "estimatedValue": 30.0
            }))
        }));
        let record = provider(transport.clone())
            .attempt("minecraft:golden_apple")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.id(), "minecraft:golden_apple");
        assert_eq!(record.name(), "Golden Apple");
        assert_eq!(record.description(), DEFAULT_DESCRIPTION);
        assert_eq!(record.rarity(), ItemRarity::Uncommon);
        assert_eq!(record.value(), 30.0);
        assert!(record.tradeable());
        assert_eq!(record.source(), SourceTag::FallbackApi);

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.url,
            "https://backup.test/v2/minecraft/items/minecraft:golden_apple"
        );
        assert_eq!(request.timeout, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_identifier_is_percent_encoded() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(json!({}))));
        provider(transport.clone())
            .attempt("minecraft:ruby gem#2")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            transport.last_request().unwrap().url,
            "https://backup.test/v2/minecraft/items/minecraft:ruby%20gem%232"
        );
    }

    #[tokio::test]
    async fn test_bad_status_is_no_result() {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            Err(RecoveryError::BadStatus {
                status: 502,
                url: request.url.clone(),
            })
        }));
        assert!(provider(transport).attempt("minecraft:dirt").await.unwrap().is_none());
    }
}
