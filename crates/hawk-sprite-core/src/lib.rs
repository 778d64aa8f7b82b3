//! Core library for building the Minecraft icon sprite used by the reports UI.
//!
//! - Build: resources pack + loose images → canonical sprites → tier files → packed atlas
//!   → SCSS sprite map and icon index (`build`)
//! - Packing and optimization are capabilities (`AtlasPacker`, `ImageOptimizer`); the
//!   external `glue` / `optipng` tools and an in-process shelf packer are provided.
//! - Runtime: `IconResolver` maps free-form report keys to names in the icon index.
//!
//! Quick example:
//! ```ignore
//! use hawk_sprite_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let req = BuildRequest {
//!     resources_pack: "static/sprites/resources.zip".into(),
//!     images: "static/sprites/images".into(),
//!     output_sprite: "static/dist/sprite/hawk-sprite.png".into(),
//!     output_scss: "static/scss/reports/minecraft/_icons_map.scss".into(),
//!     output_index: "static/dist/sprite/icons.json".into(),
//!     fast: true,
//!     inspect_dir: None,
//! };
//! let tools = Tools { packer: &ShelfPacker::default(), optimizer: &OptiPng::default() };
//! if let BuildOutcome::Written(report) = build(&req, &SpriteConfig::default(), tools, |_| {})? {
//!     println!("{} icons and {} aliases", report.icons, report.aliases);
//! }
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod index;
pub mod intake;
pub mod manifest;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod resolver;
pub mod scaling;
pub mod transform;

pub use config::*;
pub use error::*;
pub use index::IconIndex;
pub use manifest::{EmittedManifest, StyleRule, emit};
pub use model::*;
pub use packer::{
    AtlasPacker, GluePacker, ImageOptimizer, OptiPng, PackedAtlas, ShelfPacker, pack_verified,
};
pub use pipeline::*;
pub use resolver::{
    AssociationCache, CuratedTable, IconResolver, MemoryCache, PLACEHOLDER_ICON, Resolution,
    Strategy,
};

/// Convenience prelude for common types and functions.
/// Importing `hawk_sprite_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{MissingTargetPolicy, SpriteConfig, SpriteConfigBuilder};
    pub use crate::index::IconIndex;
    pub use crate::model::{AtlasManifest, Namespace, Rect, Tier};
    pub use crate::packer::{AtlasPacker, GluePacker, ImageOptimizer, OptiPng, ShelfPacker};
    pub use crate::pipeline::{
        BuildOutcome, BuildReport, BuildRequest, BuildStage, Tools, build,
    };
    pub use crate::resolver::{
        AssociationCache, CuratedTable, IconResolver, MemoryCache, Resolution, Strategy,
    };
}
