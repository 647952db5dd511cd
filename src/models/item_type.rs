use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl ItemRarity {
    pub const ALL: [ItemRarity; 4] = [
        ItemRarity::Common,
        ItemRarity::Uncommon,
        ItemRarity::Rare,
        ItemRarity::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemRarity::Common => "common",
            ItemRarity::Uncommon => "uncommon",
            ItemRarity::Rare => "rare",
            ItemRarity::Legendary => "legendary",
        }
    }

    /// Case-insensitive; `None` for names outside the known tiers.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "common" => Some(ItemRarity::Common),
            "uncommon" => Some(ItemRarity::Uncommon),
            "rare" => Some(ItemRarity::Rare),
            "legendary" => Some(ItemRarity::Legendary),
            _ => None,
        }
    }

    /// Lenient parse for remote payloads; anything unrecognised is common.
    pub fn from_loose(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_default()
    }
}

impl Default for ItemRarity {
    fn default() -> Self {
        ItemRarity::Common
    }
}

impl fmt::Display for ItemRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pipeline stage that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    PrimaryApi,
    FallbackApi,
    CommunityDb,
    GameData,
    DefaultValues,
}

impl SourceTag {
    /// Stage order of the standard pipeline.
    pub const ALL: [SourceTag; 5] = [
        SourceTag::PrimaryApi,
        SourceTag::FallbackApi,
        SourceTag::CommunityDb,
        SourceTag::GameData,
        SourceTag::DefaultValues,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::PrimaryApi => "primary_api",
            SourceTag::FallbackApi => "fallback_api",
            SourceTag::CommunityDb => "community_db",
            SourceTag::GameData => "game_data",
            SourceTag::DefaultValues => "default_values",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "primary_api" => Some(SourceTag::PrimaryApi),
            "fallback_api" => Some(SourceTag::FallbackApi),
            "community_db" => Some(SourceTag::CommunityDb),
            "game_data" => Some(SourceTag::GameData),
            "default_values" => Some(SourceTag::DefaultValues),
            _ => None,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SourceTag::PrimaryApi | SourceTag::FallbackApi | SourceTag::CommunityDb
        )
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_loose_parsing() {
        assert_eq!(ItemRarity::from_loose("RARE"), ItemRarity::Rare);
        assert_eq!(ItemRarity::from_loose(" legendary "), ItemRarity::Legendary);
        assert_eq!(ItemRarity::from_loose("mythic"), ItemRarity::Common);
        assert_eq!(ItemRarity::from_loose(""), ItemRarity::Common);
    }

    #[test]
    fn test_rarity_strict_parsing() {
        assert_eq!(ItemRarity::parse("Uncommon"), Some(ItemRarity::Uncommon));
        assert_eq!(ItemRarity::parse("COMMON"), Some(ItemRarity::Common));
        assert_eq!(ItemRarity::parse("epic"), None);
        for rarity in ItemRarity::ALL {
            assert_eq!(ItemRarity::parse(rarity.as_str()), Some(rarity));
        }
    }

    #[test]
    fn test_source_tag_serde_matches_as_str() {
        for tag in SourceTag::ALL {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
            assert_eq!(SourceTag::parse(tag.as_str()), Some(tag));
        }
        assert!(SourceTag::CommunityDb.is_remote());
        assert!(!SourceTag::GameData.is_remote());
    }
}
