use serde::Deserialize;

use crate::errors::{RecoveryError, Result};

/// `GET {primary}/items/{id}`
#[derive(Debug, Deserialize)]
pub struct PrimaryItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub rarity: Option<String>,
    #[serde(rename = "maxStackSize")]
    pub max_stack_size: Option<u32>,
    pub tradeable: Option<bool>,
    pub value: Option<f64>,
}

/// `GET {fallback}/minecraft/items/{id}`
#[derive(Debug, Deserialize)]
pub struct FallbackItem {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub rarity: Option<String>,
    #[serde(rename = "stackSize")]
    pub stack_size: Option<u32>,
    #[serde(rename = "estimatedValue")]
    pub estimated_value: Option<f64>,
}

/// `GET {community}/items?search={id}`
#[derive(Debug, Deserialize)]
pub struct CommunitySearch {
    #[serde(default)]
    pub results: Vec<CommunityItem>,
}

#[derive(Debug, Deserialize)]
pub struct CommunityItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rarity: Option<String>,
    #[serde(rename = "maxStack")]
    pub max_stack: Option<u32>,
    pub tradeable: Option<bool>,
    #[serde(rename = "avgPrice")]
    pub avg_price: Option<f64>,
}

impl CommunitySearch {
    pub fn into_first(self) -> Option<CommunityItem> {
        self.results.into_iter().next()
    }
}

/// Decodes a payload, reporting shape mismatches as a malformed response
/// rather than an internal serialization failure.
pub fn decode<T>(source: &str, value: serde_json::Value) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(value)
        .map_err(|e| RecoveryError::MalformedResponse(format!("{} payload: {}", source, e)))
}
