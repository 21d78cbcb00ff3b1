// SPDX-License-Identifier: MIT OR Apache-2.0
//! Code generator settings.
//!
//! Stored as RON next to the host project so every export of a graph uses
//! the same class layout.

use crate::codegen::is_identifier;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const CONFIG_FILE_NAME: &str = "nodescript.ron";

/// Settings controlling the shape of generated programs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Format version
    pub version: u32,
    /// Name of the exported class
    pub class_name: String,
    /// Module the host runtime symbols are imported from
    pub runtime_module: String,
    /// Class field holding the host scene
    pub scene_field: String,
    /// Method running the runtime statements
    pub entry_method: String,
    /// Spaces per indentation level
    pub indent_width: usize,
    /// Comment lines placed above the imports
    pub header: Option<String>,
    /// Declare expressions consumed by several inputs once instead of repeating them
    pub hoist_shared_expressions: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            class_name: "GraphScript".to_string(),
            runtime_module: "@babylonjs/core".to_string(),
            scene_field: "_scene".to_string(),
            entry_method: "onStart".to_string(),
            indent_width: 4,
            header: None,
            hoist_shared_expressions: true,
        }
    }
}

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RON
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer version
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },

    /// A field has an unusable value
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// What is wrong
        reason: String,
    },
}

impl GeneratorConfig {
    /// Parse settings from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = ron::from_str(text)?;

        // Version check
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Serialize settings to RON text
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Check that names used in generated code are valid
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("class_name", &self.class_name),
            ("scene_field", &self.scene_field),
            ("entry_method", &self.entry_method),
        ] {
            if !is_identifier(value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value:?} is not an identifier"),
                });
            }
        }

        if self.runtime_module.is_empty() {
            return Err(ConfigError::Invalid {
                field: "runtime_module",
                reason: "module name is empty".to_string(),
            });
        }

        if self.indent_width == 0 {
            return Err(ConfigError::Invalid {
                field: "indent_width",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Indentation for a nesting depth
    pub fn indent(&self, depth: usize) -> String {
        " ".repeat(self.indent_width * depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.indent(2), "        ");
    }

    #[test]
    fn test_ron_roundtrip() {
        let config = GeneratorConfig {
            class_name: "BrickScript".to_string(),
            header: Some("Generated from brick.graph".to_string()),
            ..Default::default()
        };
        let text = config.to_ron().unwrap();
        let loaded = GeneratorConfig::from_ron(&text).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded = GeneratorConfig::from_ron("(class_name: \"Other\")").unwrap();
        assert_eq!(loaded.class_name, "Other");
        assert_eq!(loaded.runtime_module, "@babylonjs/core");
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = GeneratorConfig::from_ron("(version: 99)").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_invalid_names_rejected() {
        let err = GeneratorConfig::from_ron("(class_name: \"my class\")").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "class_name", .. }));

        let config = GeneratorConfig {
            indent_width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "indent_width", .. })));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("nodescript-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);

        let config = GeneratorConfig {
            indent_width: 2,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(GeneratorConfig::load(&path).unwrap(), config);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
