//! Decorative assets: background art, logo and accent fonts.
//!
//! Assets are looked up by logical name (e.g. `"logo.png"`). A source
//! that cannot produce an asset returns an [`AssetError`]; the stage that
//! asked for it logs the failure and draws without it.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::AssetError;
use crate::images::{decode_image, ImageData};
use crate::truetype::EmbeddedFont;

/// Shared, immutable asset bytes.
pub type AssetData = Arc<Vec<u8>>;

/// Where the composer gets asset bytes from.
///
/// Implementations must be shareable across concurrent renders; each
/// render only ever reads from its source.
pub trait AssetSource: Send + Sync + Debug {
    fn load(&self, name: &str) -> Result<AssetData, AssetError>;

    /// Short name for log messages.
    fn describe(&self) -> String {
        "assets".to_string()
    }
}

/// Assets read from files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        DirectoryAssets {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` under the root. Absolute names and names with
    /// `..` components are refused.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if name.is_empty() || !plain {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl AssetSource for DirectoryAssets {
    fn load(&self, name: &str) -> Result<AssetData, AssetError> {
        let path = self
            .resolve(name)
            .ok_or_else(|| AssetError::NotFound(format!("{} (outside asset root)", name)))?;
        std::fs::read(&path).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound(name.to_string())
            } else {
                AssetError::Unreadable {
                    name: name.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Assets held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    entries: BTreeMap<String, AssetData>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, data: Vec<u8>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn insert(&mut self, name: &str, data: Vec<u8>) {
        self.entries.insert(name.to_string(), Arc::new(data));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetSource for MemoryAssets {
    fn load(&self, name: &str) -> Result<AssetData, AssetError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    fn describe(&self) -> String {
        format!("memory ({} entries)", self.entries.len())
    }
}

/// Load and decode an image asset.
pub fn load_image(source: &dyn AssetSource, name: &str) -> Result<ImageData, AssetError> {
    let data = source.load(name)?;
    decode_image(&data).map_err(|message| AssetError::Invalid {
        name: name.to_string(),
        message,
    })
}

/// Load and parse a TrueType font asset.
pub fn load_font(source: &dyn AssetSource, name: &str) -> Result<EmbeddedFont, AssetError> {
    let data = source.load(name)?;
    EmbeddedFont::from_bytes(data.as_ref().clone()).map_err(|message| AssetError::Invalid {
        name: name.to_string(),
        message,
    })
}
