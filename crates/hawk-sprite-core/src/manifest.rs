//! Turns the packer manifest into the SCSS sprite map and the icon index.

use std::fmt::Write as _;

use tracing::instrument;

use crate::config::SpriteConfig;
use crate::index::IconIndex;
use crate::model::{AtlasManifest, Rect, Tier};

/// One `name: {position, width, height}` entry of the sprite map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub name: String,
    pub rect: Rect,
    /// Canonical sprite name (with tier suffix) this alias copies.
    pub alias_of: Option<String>,
}

impl StyleRule {
    /// `"name": ("position": X Y, "width": Wpx, "height": Hpx),`
    pub fn to_scss(&self) -> String {
        let mut line = format!(
            "        \"{}\": (\"position\": {} {}, \"width\": {}px, \"height\": {}px),",
            self.name,
            axis(self.rect.x),
            axis(self.rect.y),
            self.rect.w,
            self.rect.h
        );
        if let Some(canonical) = &self.alias_of {
            let _ = write!(line, "  // Alias of {canonical}");
        }
        line
    }
}

/// A zero offset is written as the bare `0` token, others as `Npx`.
fn axis(v: u32) -> String {
    if v == 0 { "0".into() } else { format!("{v}px") }
}

/// Everything the emitter produces, in manifest order.
#[derive(Debug, Clone, Default)]
pub struct EmittedManifest {
    pub rules: Vec<StyleRule>,
    pub icons: usize,
    pub aliases: usize,
}

impl EmittedManifest {
    pub fn index(&self) -> IconIndex {
        IconIndex::new(self.rules.iter().map(|r| r.name.clone()).collect())
    }

    pub fn to_scss(&self, map_name: &str) -> String {
        let mut scss = String::from(
            "// File automatically generated by `hawk-sprite build`.\n\n",
        );
        let _ = writeln!(scss, "${map_name}: (");
        for rule in &self.rules {
            scss.push_str(&rule.to_scss());
            scss.push('\n');
        }
        scss.push_str(");\n");
        scss
    }

    pub fn total(&self) -> usize {
        self.icons + self.aliases
    }
}

/// Emits one rule per manifest frame, followed by one derived rule per alias
/// of its base name, carrying the same tier suffix and geometry.
#[instrument(skip_all)]
pub fn emit(manifest: &AtlasManifest, cfg: &SpriteConfig) -> EmittedManifest {
    let mut out = EmittedManifest::default();
    for frame in &manifest.frames {
        let name = frame
            .filename
            .strip_suffix(".png")
            .unwrap_or(&frame.filename)
            .to_string();
        let (base, tier) = Tier::split(&name);
        let aliases = cfg.aliases_of(base).unwrap_or_default();
        out.rules.push(StyleRule {
            name: name.clone(),
            rect: frame.frame,
            alias_of: None,
        });
        for alias in aliases {
            out.rules.push(StyleRule {
                name: tier.apply(alias),
                rect: frame.frame,
                alias_of: Some(name.clone()),
            });
        }
        out.icons += 1;
        out.aliases += aliases.len();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_axis_uses_bare_zero() {
        let rule = StyleRule {
            name: "block-stone".into(),
            rect: Rect::new(0, 64, 32, 32),
            alias_of: None,
        };
        assert_eq!(
            rule.to_scss(),
            r#"        "block-stone": ("position": 0 64px, "width": 32px, "height": 32px),"#
        );
    }
}
