use async_trait::async_trait;
use tracing::info;

use super::SourceProvider;
use crate::data::GameDataSet;
use crate::errors::Result;
use crate::models::{ItemRecord, SourceTag};

/// Offline lookup into the locally-known item table.
pub struct GameDataProvider {
    dataset: GameDataSet,
}

impl GameDataProvider {
    pub fn new(dataset: GameDataSet) -> Self {
        Self { dataset }
    }

    pub fn builtin() -> Self {
        Self::new(GameDataSet::builtin())
    }
}

#[async_trait]
impl SourceProvider for GameDataProvider {
    fn tag(&self) -> SourceTag {
        SourceTag::GameData
    }

    async fn attempt(&self, id: &str) -> Result<Option<ItemRecord>> {
        info!(id, "trying game data extraction");
        let Some(item) = self.dataset.get(id) else {
            return Ok(None);
        };

        info!(id, "extracted from game data");
        Ok(Some(
            ItemRecord::new(id, SourceTag::GameData)
                .with_name(item.name.clone())
                .with_description(item.description.clone())
                .with_rarity(item.rarity)
                .with_max_stack_size(item.max_stack)
                .with_tradeable(true)
                .with_value(item.value),
        ))
    }
}
