use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::errors::Result;
use crate::models::{qualified_id, ItemRarity};

/// One entry of the locally-known item table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameItem {
    pub name: String,
    pub description: String,
    pub rarity: ItemRarity,
    #[serde(rename = "maxStack")]
    pub max_stack: u32,
    pub value: f64,
}

impl GameItem {
    pub fn new(name: &str, description: &str, rarity: ItemRarity, max_stack: u32, value: f64) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            rarity,
            max_stack,
            value,
        }
    }
}

/// Static item data keyed by fully-qualified identifier.
#[derive(Debug, Clone, Default)]
pub struct GameDataSet {
    items: HashMap<String, GameItem>,
}

impl GameDataSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The items shipped with the game data extractor.
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        set.insert(
            "minecraft:diamond_sword",
            GameItem::new(
                "Diamond Sword",
                "A powerful sword made of diamond",
                ItemRarity::Rare,
                1,
                100.0,
            ),
        );
        set.insert(
            "minecraft:enchanted_book",
            GameItem::new(
                "Enchanted Book",
                "A book imbued with magical properties",
                ItemRarity::Uncommon,
                1,
                50.0,
            ),
        );
        set.insert(
            "minecraft:netherite_ingot",
            GameItem::new(
                "Netherite Ingot",
                "The strongest material in Minecraft",
                ItemRarity::Legendary,
                64,
                500.0,
            ),
        );
        set
    }

    /// Keys are normalised, so `diamond` and `minecraft:diamond` are the same entry.
    pub fn insert(&mut self, id: &str, item: GameItem) {
        self.items.insert(qualified_id(id), item);
    }

    pub fn with_item(mut self, id: &str, item: GameItem) -> Self {
        self.insert(id, item);
        self
    }

    pub fn get(&self, id: &str) -> Option<&GameItem> {
        self.items.get(&qualified_id(id))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Overlays entries from a JSON object of `id -> item` onto this set.
    pub async fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let content = tokio::fs::read_to_string(path).await?;
        let extra: HashMap<String, GameItem> = serde_json::from_str(&content)?;
        let count = extra.len();
        for (id, item) in extra {
            self.insert(&id, item);
        }
        info!(path = %path.display(), count, "loaded extra game data");
        Ok(count)
    }
}
