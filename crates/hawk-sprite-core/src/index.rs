use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Every icon name known to exist in one build (canonical and alias, every
/// tier), in emission order. Serialized as `{"icons": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconIndex {
    pub icons: Vec<String>,
}

impl IconIndex {
    pub fn new(icons: Vec<String>) -> Self {
        Self { icons }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Like `load`, but a missing file yields an empty index.
    pub fn load_or_empty(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "icon index not found, resolving against an empty index");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.icons.iter().any(|i| i == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.icons.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}
