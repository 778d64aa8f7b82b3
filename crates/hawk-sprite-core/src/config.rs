use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::model::ColorRamp;

/// Sprite build configuration.
/// Key notes:
///   - rule tables are ordered; `replacements` is evaluated first-match-wins
///   - `trim_animations`, `colorize`, `large_icons` and `aliases` use canonical names (`block-lava`)
///   - `missing_targets` decides what happens when a trim/colorize name is absent from the working set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Archive path suffixes dropped before any naming rule (`block/soul_lantern.png`).
    #[serde(default = "default_exclusions")]
    pub exclusions: Vec<String>,
    /// Ordered replacement rules for redundant animation/orientation variants.
    #[serde(default = "default_replacements")]
    pub replacements: Vec<ReplacementRule>,
    /// Sprites whose stacked animation frames are cropped to the first native square.
    #[serde(default = "default_trim_animations")]
    pub trim_animations: Vec<String>,
    /// Grayscale masks tinted at build time.
    #[serde(default = "default_colorize")]
    pub colorize: Vec<ColorizeRule>,
    /// Non-entity sprites that also get a `-large` rendition.
    #[serde(default = "default_large_icons")]
    pub large_icons: Vec<String>,
    /// Alternate names kept for old references, in emission order.
    #[serde(default = "default_aliases")]
    pub aliases: Vec<AliasRule>,

    /// Side of one animation frame in the resources pack, in pixels.
    #[serde(default = "default_native_size")]
    pub native_size: u32,
    /// Integer factor from native to normal tier.
    #[serde(default = "default_normal_scale")]
    pub normal_scale: u32,
    /// Integer factor from normal to large tier.
    #[serde(default = "default_large_scale")]
    pub large_scale: u32,
    /// Ratio from normal to small tier.
    #[serde(default = "default_small_ratio")]
    pub small_ratio: f32,

    #[serde(default)]
    pub missing_targets: MissingTargetPolicy,
    /// SCSS map variable name (without `$`).
    #[serde(default = "default_map_name")]
    pub map_name: String,
}

/// `(prefix, keep_filename, replacement_name)`: a filename starting with `prefix` is
/// renamed when it equals `keep`, discarded otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    pub prefix: String,
    pub keep: String,
    pub rename_to: String,
}

/// What a matching replacement rule decided for a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Rename(String),
    Discard,
}

impl ReplacementRule {
    pub fn new(prefix: &str, keep: &str, rename_to: &str) -> Self {
        Self {
            prefix: prefix.into(),
            keep: keep.into(),
            rename_to: rename_to.into(),
        }
    }

    /// `None` when the rule does not apply to `filename`.
    pub fn apply(&self, filename: &str) -> Option<RuleOutcome> {
        if !filename.starts_with(&self.prefix) {
            return None;
        }
        if filename == self.keep {
            Some(RuleOutcome::Rename(self.rename_to.clone()))
        } else {
            Some(RuleOutcome::Discard)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorizeRule {
    pub sprite: String,
    #[serde(flatten)]
    pub ramp: ColorRamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
    pub canonical: String,
    pub aliases: Vec<String>,
}

/// Policy for trim/colorize names that are not in the working set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingTargetPolicy {
    /// Abort the build.
    #[default]
    Fail,
    /// Log a warning and carry on.
    Skip,
}

impl FromStr for MissingTargetPolicy {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "skip" => Ok(Self::Skip),
            _ => Err(()),
        }
    }
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            exclusions: default_exclusions(),
            replacements: default_replacements(),
            trim_animations: default_trim_animations(),
            colorize: default_colorize(),
            large_icons: default_large_icons(),
            aliases: default_aliases(),
            native_size: default_native_size(),
            normal_scale: default_normal_scale(),
            large_scale: default_large_scale(),
            small_ratio: default_small_ratio(),
            missing_targets: MissingTargetPolicy::default(),
            map_name: default_map_name(),
        }
    }
}

impl SpriteConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - a scale factor is zero or the small ratio is outside `(0, 1]`
    /// - a replacement rule has an empty prefix (it would swallow every file)
    /// - an alias is also an alias-table key, or listed twice
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpriteError;

        if self.native_size == 0 || self.normal_scale == 0 || self.large_scale == 0 {
            return Err(SpriteError::InvalidConfig(format!(
                "sizes must be non-zero (native {}, normal x{}, large x{})",
                self.native_size, self.normal_scale, self.large_scale
            )));
        }
        if !(self.small_ratio > 0.0 && self.small_ratio <= 1.0) {
            return Err(SpriteError::InvalidConfig(format!(
                "small_ratio must be in (0, 1], got {}",
                self.small_ratio
            )));
        }
        if let Some(rule) = self.replacements.iter().find(|r| r.prefix.is_empty()) {
            return Err(SpriteError::InvalidConfig(format!(
                "replacement rule keeping `{}` has an empty prefix",
                rule.keep
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for rule in &self.aliases {
            for alias in &rule.aliases {
                if self.aliases.iter().any(|r| &r.canonical == alias) {
                    return Err(SpriteError::InvalidConfig(format!(
                        "alias `{alias}` is itself an aliased sprite"
                    )));
                }
                if !seen.insert(alias.as_str()) {
                    return Err(SpriteError::InvalidConfig(format!(
                        "alias `{alias}` is listed twice"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn aliases_of(&self, canonical: &str) -> Option<&[String]> {
        self.aliases
            .iter()
            .find(|r| r.canonical == canonical)
            .map(|r| r.aliases.as_slice())
    }

    pub fn ramp_for(&self, sprite: &str) -> Option<ColorRamp> {
        self.colorize
            .iter()
            .find(|r| r.sprite == sprite)
            .map(|r| r.ramp)
    }

    /// Create a fluent builder for `SpriteConfig`.
    pub fn builder() -> SpriteConfigBuilder {
        SpriteConfigBuilder::new()
    }
}

fn default_exclusions() -> Vec<String> {
    vec!["block/soul_lantern.png".into()]
}

// Some textures are stored once per state (each compass direction, each fire
// frame); only one is kept, under a stable name.
fn default_replacements() -> Vec<ReplacementRule> {
    vec![
        ReplacementRule::new("destroy_stage", "destroy_stage_9.png", "destroy-stage.png"),
        ReplacementRule::new("frosted_ice", "frosted_ice_0.png", "frosted-ice.png"),
        ReplacementRule::new("fire", "fire_1.png", "fire.png"),
        ReplacementRule::new("lava", "lava_still.png", "lava.png"),
        ReplacementRule::new("water", "water_still.png", "water.png"),
        ReplacementRule::new("compass", "compass_19.png", "compass.png"),
        ReplacementRule::new("clock", "clock_04.png", "clock.png"),
        ReplacementRule::new("bow_pulling", "bow_pulling_1.png", "bow-pulling.png"),
        ReplacementRule::new(
            "crossbow_pulling",
            "crossbow_pulling_2.png",
            "crossbow-pulling.png",
        ),
    ]
}

fn default_trim_animations() -> Vec<String> {
    [
        "kelp",
        "stonecutter-saw",
        "smoker-front-on",
        "lantern",
        "repeating-command-block-back",
        "water",
        "seagrass",
        "repeating-command-block-front",
        "sea-lantern",
        "tall-seagrass-top",
        "kelp-plant",
        "magma",
        "prismarine",
        "lava",
        "nether-portal",
        "tall-seagrass-bottom",
        "repeating-command-block-side",
        "repeating-command-block-conditional",
        "command-block-back",
        "chain-command-block-back",
        "chain-command-block-side",
        "fire",
        "blast-furnace-front-on",
        "command-block-conditional",
        "chain-command-block-conditional",
        "command-block-side",
        "campfire-fire",
        "chain-command-block-front",
        "command-block-front",
        "campfire-log-lit",
    ]
    .iter()
    .map(|name| format!("block-{name}"))
    .collect()
}

// Water, grass, foliage and redstone are grayscale masks tinted by the game
// at render time.
fn default_colorize() -> Vec<ColorizeRule> {
    let rule = |sprite: &str, shadow: [u8; 3], highlight: [u8; 3]| ColorizeRule {
        sprite: sprite.into(),
        ramp: ColorRamp { shadow, highlight },
    };
    vec![
        rule("block-water", [0x12, 0x2a, 0x6a], [0x3f, 0x76, 0xe4]),
        rule("block-grass-block-top", [0x3b, 0x6b, 0x1f], [0x91, 0xbd, 0x59]),
        rule("block-oak-leaves", [0x2f, 0x5a, 0x10], [0x77, 0xab, 0x2f]),
        rule("block-redstone-dust-dot", [0x4b, 0x00, 0x00], [0xff, 0x1a, 0x00]),
    ]
}

// Entities always get a large rendition; these are used by the damage
// summaries.
fn default_large_icons() -> Vec<String> {
    [
        "block-fire",
        "block-lava",
        "block-cactus-side",
        "block-tnt-side",
        "block-stone",
        "block-sand",
        "block-water",
        "item-rotten-flesh",
        "block-command-block-back",
        "block-campfire-fire",
        "block-campfire-log-lit",
        "item-broken-elytra",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

// Names used by reports generated before the textures were renamed.
fn default_aliases() -> Vec<AliasRule> {
    let rule = |canonical: &str, aliases: &[&str]| AliasRule {
        canonical: canonical.into(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    };
    vec![
        rule("item-enchanted-book", &["item-book-enchanted"]),
        rule("item-golden-apple", &["item-apple-golden"]),
        rule("block-nether-portal", &["block-portal"]),
    ]
}

fn default_native_size() -> u32 {
    16
}
fn default_normal_scale() -> u32 {
    2
}
fn default_large_scale() -> u32 {
    2
}
fn default_small_ratio() -> f32 {
    0.62
}
fn default_map_name() -> String {
    "hawk_sprite".into()
}

/// Builder for `SpriteConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct SpriteConfigBuilder {
    cfg: SpriteConfig,
}

impl SpriteConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: SpriteConfig::default(),
        }
    }
    pub fn exclusions<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.cfg.exclusions = v.into_iter().map(Into::into).collect();
        self
    }
    pub fn replacements(mut self, v: Vec<ReplacementRule>) -> Self {
        self.cfg.replacements = v;
        self
    }
    pub fn trim_animations<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.cfg.trim_animations = v.into_iter().map(Into::into).collect();
        self
    }
    pub fn colorize(mut self, sprite: &str, ramp: ColorRamp) -> Self {
        self.cfg.colorize.push(ColorizeRule {
            sprite: sprite.into(),
            ramp,
        });
        self
    }
    pub fn no_colorize(mut self) -> Self {
        self.cfg.colorize.clear();
        self
    }
    pub fn large_icons<I: IntoIterator<Item = S>, S: Into<String>>(mut self, v: I) -> Self {
        self.cfg.large_icons = v.into_iter().map(Into::into).collect();
        self
    }
    pub fn alias(mut self, canonical: &str, aliases: &[&str]) -> Self {
        self.cfg.aliases.push(AliasRule {
            canonical: canonical.into(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        });
        self
    }
    pub fn no_aliases(mut self) -> Self {
        self.cfg.aliases.clear();
        self
    }
    pub fn native_size(mut self, v: u32) -> Self {
        self.cfg.native_size = v;
        self
    }
    pub fn normal_scale(mut self, v: u32) -> Self {
        self.cfg.normal_scale = v;
        self
    }
    pub fn large_scale(mut self, v: u32) -> Self {
        self.cfg.large_scale = v;
        self
    }
    pub fn small_ratio(mut self, v: f32) -> Self {
        self.cfg.small_ratio = v;
        self
    }
    pub fn missing_targets(mut self, v: MissingTargetPolicy) -> Self {
        self.cfg.missing_targets = v;
        self
    }
    pub fn map_name(mut self, v: &str) -> Self {
        self.cfg.map_name = v.into();
        self
    }
    pub fn build(self) -> SpriteConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SpriteConfig::default().validate().expect("valid defaults");
    }

    #[test]
    fn replacement_rule_keeps_only_the_chosen_variant() {
        let rule = ReplacementRule::new("clock", "clock_04.png", "clock.png");
        assert_eq!(
            rule.apply("clock_04.png"),
            Some(RuleOutcome::Rename("clock.png".into()))
        );
        assert_eq!(rule.apply("clock_07.png"), Some(RuleOutcome::Discard));
        assert_eq!(rule.apply("compass_00.png"), None);
    }

    #[test]
    fn chained_alias_is_rejected() {
        let cfg = SpriteConfig::builder()
            .no_aliases()
            .alias("item-a", &["item-b"])
            .alias("item-b", &["item-c"])
            .build();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_small_ratio_is_rejected() {
        let cfg = SpriteConfig::builder().small_ratio(0.0).build();
        assert!(cfg.validate().is_err());
    }
}
