// Asset file lookup and reading

use super::AssetError;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    /// Character templates
    Character,
    /// Timed input scripts
    Script,
}

impl AssetType {
    /// Get the default directory for this asset type
    pub fn default_directory(&self) -> &'static str {
        match self {
            AssetType::Character => "characters",
            AssetType::Script => "scripts",
        }
    }

    /// Get supported file extensions for this asset type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Character | AssetType::Script => &["ron"],
        }
    }
}

/// Asset loader responsible for finding and reading asset files
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Full path for an asset; a bare name gets the type's extension
    pub fn resolve_path(&self, asset_type: AssetType, name: &str) -> PathBuf {
        let path = self
            .base_path
            .join(asset_type.default_directory())
            .join(name);
        if path.extension().is_some() {
            path
        } else {
            path.with_extension(asset_type.extensions()[0])
        }
    }

    /// Read an asset as UTF-8 text
    pub fn load_text(&self, asset_type: AssetType, name: &str) -> Result<String, AssetError> {
        let path = self.resolve_path(asset_type, name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        Ok(std::fs::read_to_string(&path)?)
    }

    /// Check if an asset exists
    pub fn exists(&self, asset_type: AssetType, name: &str) -> bool {
        self.resolve_path(asset_type, name).exists()
    }

    /// List asset names (without extension) of a given type, sorted
    pub fn list_assets(&self, asset_type: AssetType) -> Result<Vec<String>, AssetError> {
        let dir = self.base_path.join(asset_type.default_directory());

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut assets = Vec::new();
        let extensions = asset_type.extensions();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let matches = path
                .extension()
                .is_some_and(|ext| extensions.contains(&ext.to_string_lossy().as_ref()));
            if let (true, Some(stem)) = (matches, path.file_stem()) {
                assets.push(stem.to_string_lossy().to_string());
            }
        }

        assets.sort();
        Ok(assets)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
