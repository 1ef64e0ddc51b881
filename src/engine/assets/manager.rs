// Character template and input script cache

use super::{AssetError, AssetLoader, AssetType};
use crate::engine::input::InputScript;
use crate::game::characters::CharacterConfig;
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// Loads, validates and caches data assets
#[derive(Debug)]
pub struct AssetManager {
    loader: AssetLoader,

    /// Validated character templates by asset name
    characters: HashMap<String, CharacterConfig>,
}

impl AssetManager {
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self {
            loader: AssetLoader::new(asset_path),
            characters: HashMap::new(),
        }
    }

    /// Load a character template, parsing and validating it on first use
    pub fn load_character(&mut self, name: &str) -> Result<&CharacterConfig, AssetError> {
        if !self.characters.contains_key(name) {
            let config = self.read_character(name)?;
            info!("Loaded character template '{}' ({})", name, config.name);
            self.characters.insert(name.to_string(), config);
        }

        self.characters
            .get(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Load a timed input script (not cached; scripts keep playback state)
    pub fn load_script(&self, name: &str) -> Result<InputScript, AssetError> {
        let path = self.loader.resolve_path(AssetType::Script, name);
        let text = self.loader.load_text(AssetType::Script, name)?;
        InputScript::from_ron(&text).map_err(|source| AssetError::Parse {
            path: path.to_string_lossy().to_string(),
            source,
        })
    }

    /// Every character template on disk, loaded
    pub fn load_all_characters(&mut self) -> Result<usize, AssetError> {
        let names = self.loader.list_assets(AssetType::Character)?;
        for name in &names {
            self.load_character(name)?;
        }
        Ok(names.len())
    }

    /// Drop a cached template so the next load re-reads it
    pub fn unload_character(&mut self, name: &str) -> bool {
        self.characters.remove(name).is_some()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.characters.contains_key(name)
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    fn read_character(&self, name: &str) -> Result<CharacterConfig, AssetError> {
        let path = self.loader.resolve_path(AssetType::Character, name);
        let text = self.loader.load_text(AssetType::Character, name)?;

        let config: CharacterConfig = ron::from_str(&text).map_err(|source| AssetError::Parse {
            path: path.to_string_lossy().to_string(),
            source,
        })?;
        config.validate().map_err(|source| AssetError::Invalid {
            name: name.to_string(),
            source,
        })?;

        Ok(config)
    }
}
