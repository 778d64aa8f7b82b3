use std::path::{Path, PathBuf};
use std::process::Command;

use super::run_tool;
use crate::error::Result;

/// Lossless in-place optimization of the packed atlas.
pub trait ImageOptimizer {
    fn name(&self) -> &str;
    fn optimize(&self, image: &Path) -> Result<()>;
}

/// `optipng -o<level> <image>`.
#[derive(Debug, Clone)]
pub struct OptiPng {
    pub program: PathBuf,
    pub level: u8,
}

impl Default for OptiPng {
    fn default() -> Self {
        Self {
            program: PathBuf::from("optipng"),
            level: 7,
        }
    }
}

impl ImageOptimizer for OptiPng {
    fn name(&self) -> &str {
        "optipng"
    }

    fn optimize(&self, image: &Path) -> Result<()> {
        run_tool(
            "optipng",
            Command::new(&self.program)
                .arg(format!("-o{}", self.level))
                .arg("-quiet")
                .arg(image),
        )
    }
}
