// Asset management
//
// Character templates and input scripts stored as RON under the asset root.

mod loader;
mod manager;

pub use loader::{AssetLoader, AssetType};
pub use manager::AssetManager;

use crate::game::characters::ConfigError;

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("Invalid template '{name}': {source}")]
    Invalid {
        name: String,
        #[source]
        source: ConfigError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_display() {
        let err = AssetError::NotFound("player.ron".to_string());
        assert_eq!(err.to_string(), "Asset not found: player.ron");

        let err = AssetError::Invalid {
            name: "grunt".to_string(),
            source: ConfigError::EmptyAttributeName,
        };
        assert_eq!(
            err.to_string(),
            "Invalid template 'grunt': attribute template with an empty name"
        );
    }

    #[test]
    fn test_parse_error_keeps_path() {
        let source = ron::from_str::<crate::game::characters::CharacterConfig>("(name: 5)")
            .err()
            .map(|source| AssetError::Parse {
                path: "characters/bad.ron".to_string(),
                source,
            });
        assert!(source.is_some_and(|e| e.to_string().starts_with("Failed to parse characters/bad.ron")));
    }
}
