//! Last-resort record synthesis from the identifier alone.

use tracing::warn;

use crate::models::{derived_display_name, ItemRarity, ItemRecord, SourceTag, DEFAULT_MAX_STACK_SIZE};

/// One keyword rule. `rarity: None` leaves the rarity at its default.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub keywords: &'static [&'static str],
    pub rarity: Option<ItemRarity>,
    pub value: f64,
    pub max_stack_size: Option<u32>,
}

/// Applied in order; the first rule with a keyword contained in the
/// lowercased identifier wins. The weapon rule does not touch rarity.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        keywords: &["diamond", "netherite", "dragon"],
        rarity: Some(ItemRarity::Rare),
        value: 100.0,
        max_stack_size: None,
    },
    ClassificationRule {
        keywords: &["enchanted", "golden", "emerald"],
        rarity: Some(ItemRarity::Uncommon),
        value: 25.0,
        max_stack_size: None,
    },
    ClassificationRule {
        keywords: &["sword", "bow", "trident"],
        rarity: None,
        value: 10.0,
        max_stack_size: Some(1),
    },
];

const UNCLASSIFIED_VALUE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub rarity: ItemRarity,
    pub value: f64,
    pub max_stack_size: u32,
}

pub fn classify(id: &str) -> Classification {
    let lowered = id.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|rule| Classification {
            rarity: rule.rarity.unwrap_or(ItemRarity::Common),
            value: rule.value,
            max_stack_size: rule.max_stack_size.unwrap_or(DEFAULT_MAX_STACK_SIZE),
        })
        .unwrap_or(Classification {
            rarity: ItemRarity::Common,
            value: UNCLASSIFIED_VALUE,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
        })
}

/// Terminal pipeline stage. Cannot fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSynthesizer;

impl DefaultSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn tag(&self) -> SourceTag {
        SourceTag::DefaultValues
    }

    pub fn synthesize(&self, id: &str) -> ItemRecord {
        warn!(id, "generating default item data");
        let name = derived_display_name(id);
        let class = classify(id);
        ItemRecord::new(id, SourceTag::DefaultValues)
            .with_description(format!("Default information for {}", name))
            .with_name(name)
            .with_rarity(class.rarity)
            .with_max_stack_size(class.max_stack_size)
            .with_tradeable(true)
            .with_value(class.value)
    }
}
