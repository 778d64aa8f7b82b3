use std::path::{Path, PathBuf};
use std::process::Command;

use super::{AtlasPacker, PackedAtlas, output_path, read_manifest, run_tool};
use crate::error::{Result, SpriteError};

/// Packs with the external `glue` sprite generator.
#[derive(Debug, Clone)]
pub struct GluePacker {
    pub program: PathBuf,
}

impl Default for GluePacker {
    fn default() -> Self {
        Self {
            program: PathBuf::from("glue"),
        }
    }
}

impl GluePacker {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl AtlasPacker for GluePacker {
    fn name(&self) -> &str {
        "glue"
    }

    fn pack(&self, images_dir: &Path, out_dir: &Path) -> Result<PackedAtlas> {
        run_tool(
            "glue",
            Command::new(&self.program)
                .arg("--source")
                .arg(images_dir)
                .arg("--output")
                .arg(out_dir)
                .arg("--json")
                .arg(out_dir)
                .arg("--quiet"),
        )?;
        let image = output_path(images_dir, out_dir, "png");
        let manifest_path = output_path(images_dir, out_dir, "json");
        if !image.is_file() || !manifest_path.is_file() {
            return Err(SpriteError::Tool {
                tool: "glue".into(),
                status: "exit 0".into(),
                detail: format!(
                    "expected {} and {}",
                    image.display(),
                    manifest_path.display()
                ),
            });
        }
        let manifest = read_manifest(&manifest_path)?;
        Ok(PackedAtlas {
            image,
            manifest_path,
            manifest,
        })
    }
}
