//! Built-in resolver tables.

use std::collections::HashMap;

use super::TableKey;

/// Icon used when nothing in the index matches.
pub const PLACEHOLDER_ICON: &str = "entity-unknown";

/// Hand-picked icons for report keys (damage causes, weapons, healing
/// causes), keyed by the underscore-normalized key.
const CURATED: &[(&str, &str)] = &[
    // Damage causes
    ("zombie", "entity-zombie"),
    ("pigman", "entity-zombie-pigman"),
    ("skeleton", "entity-skeleton"),
    ("witch", "entity-witch"),
    ("spider", "entity-spider"),
    ("cave_spider", "entity-cave-spider"),
    ("creeper", "entity-creeper"),
    ("enderman", "entity-enderman"),
    ("slime", "entity-slime"),
    ("ghast", "entity-ghast"),
    ("magma_cube", "entity-magma-cube"),
    ("blaze", "entity-blaze"),
    ("wolf", "entity-wolf"),
    ("angry_wolf", "entity-angry-wolf"),
    ("silverfish", "entity-silverfish"),
    ("iron_golem", "entity-iron-golem"),
    ("zombie_villager", "entity-zombie-villager"),
    ("ender_dragon", "entity-ender-dragon"),
    ("wither", "entity-wither"),
    ("wither_skeleton", "entity-wither-skeleton"),
    ("fire", "block-fire"),
    ("lava", "block-lava"),
    ("thunderbolt", "entity-lightning"),
    ("cactus", "block-cactus"),
    ("tnt", "block-tnt"),
    ("fall", "block-stone"),
    ("suffocation", "block-sand"),
    ("drowning", "block-water"),
    ("starvation", "item-rotten-flesh"),
    ("command", "entity-command-block"),
    // Weapons
    ("sword_wood", "item-wood-sword"),
    ("sword_stone", "item-stone-sword"),
    ("sword_iron", "item-iron-sword"),
    ("sword_gold", "item-gold-sword"),
    ("sword_diamond", "item-diamond-sword"),
    ("axe_wood", "item-wood-axe"),
    ("axe_stone", "item-stone-axe"),
    ("axe_iron", "item-iron-axe"),
    ("axe_gold", "item-gold-axe"),
    ("axe_diamond", "item-diamond-axe"),
    ("pickaxe_wood", "item-wood-pickaxe"),
    ("pickaxe_stone", "item-stone-pickaxe"),
    ("pickaxe_iron", "item-iron-pickaxe"),
    ("pickaxe_gold", "item-gold-pickaxe"),
    ("pickaxe_diamond", "item-diamond-pickaxe"),
    ("hoe_wood", "item-wood-hoe"),
    ("hoe_stone", "item-stone-hoe"),
    ("hoe_iron", "item-iron-hoe"),
    ("hoe_gold", "item-gold-hoe"),
    ("hoe_diamond", "item-diamond-hoe"),
    ("shovel_wood", "item-wood-shovel"),
    ("shovel_stone", "item-stone-shovel"),
    ("shovel_iron", "item-iron-shovel"),
    ("shovel_gold", "item-gold-shovel"),
    ("shovel_diamond", "item-diamond-shovel"),
    ("bow", "item-bow-pulling"),
    ("magic", "item-potion-bottle-splash"),
    ("thorns", "item-diamond-chestplate"),
    // Healing causes
    ("natural", "item-potato-baked"),
    ("golden_apple", "item-apple-golden"),
    ("notch_apple", "item-apple-golden"),
    ("healing_potion", "item-potion-bottle-splash"),
    // Others
    ("unknown", "entity-unknown"),
    // Rendered without an icon.
    ("player", ""),
    ("fists", ""),
];

/// Synonyms with no substring overlap with their icon, keyed by the
/// hyphen-normalized key. Seeded into the association cache.
pub const SEEDED_ASSOCIATIONS: &[(&str, &str)] = &[
    ("walk-one-cm", "item-iron-boots"),
    ("sprint-one-cm", "item-golden-boots"),
    ("crouch-one-cm", "item-leather-boots"),
    ("swim-one-cm", "block-water"),
    ("fly-one-cm", "item-elytra"),
    ("aviate-one-cm", "item-elytra"),
    ("jump", "item-rabbit-foot"),
    ("damage-dealt", "item-iron-sword"),
];

/// Exact key → icon overrides consulted before anything else.
#[derive(Debug, Clone, Default)]
pub struct CuratedTable {
    entries: HashMap<String, String>,
}

impl CuratedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self::from_pairs(CURATED.iter().copied())
    }

    /// Keys are normalized on insertion, so `"CAVE SPIDER"` and `"cave_spider"` are the same.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (k, v) in pairs {
            table.insert(k.as_ref(), v);
        }
        table
    }

    pub fn insert(&mut self, key: &str, icon: impl Into<String>) {
        self.entries
            .insert(TableKey::new(key).into_inner(), icon.into());
    }

    pub fn get(&self, key: &TableKey) -> Option<&str> {
        self.entries.get(key.as_str()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
