//! Configuration management for the model tools
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (dfx-schemas.toml)
//! - Environment variables (DFX_SCHEMAS__*)
//!
//! ## Example config file (dfx-schemas.toml):
//! ```toml
//! [schema]
//! path = "./schemas/dfx.json"
//!
//! [candid_ui]
//! port = 8080
//! workspace_root = "."
//! extension_path = "~/.vscode/extensions/dfx"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::schema::SchemaDocument;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Schema source
    #[serde(default)]
    pub schema: SchemaSourceConfig,

    /// Candid UI panel settings
    #[serde(default)]
    pub candid_ui: CandidUiConfig,
}

/// Where the schema document comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSourceConfig {
    /// Schema file to use instead of the bundled dfx.json
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Candid UI panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidUiConfig {
    /// Local port the Candid UI is served on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Project root holding `.dfx/local/canister_ids.json`
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,

    /// Extension install directory holding `tools/ui/.dfx/local/canister_ids.json`
    #[serde(default)]
    pub extension_path: Option<PathBuf>,
}

fn default_port() -> u16 {
    8080
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for CandidUiConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            workspace_root: default_workspace_root(),
            extension_path: None,
        }
    }
}

impl ModelConfig {
    /// Load configuration from default locations
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "dfx-schemas.toml",
            ".dfx-schemas.toml",
            "config/dfx-schemas.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("org", "dfinity", "dfx-schemas") {
            let xdg_config = config_dir.config_dir().join("dfx-schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("DFX_SCHEMAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// The configured schema file, or the bundled one
    pub fn schema_document(&self) -> Result<SchemaDocument> {
        match &self.schema.path {
            Some(path) => SchemaDocument::load(path),
            None => SchemaDocument::bundled().cloned(),
        }
    }
}
