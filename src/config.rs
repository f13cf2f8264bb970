use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::EncryptVersion;

const CONFIG_FILE_NAME: &str = "solo_data_bag.toml";
const DEFAULT_DATA_BAG_PATH: &str = "data_bags";
const SYSTEM_SECRET_PATH: &str = "/etc/chef/encrypted_data_bag_secret";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_bag_path: Option<PathBuf>,
    pub encrypted_data_bag_secret: Option<PathBuf>,
    pub encrypt_version: EncryptVersion,
}

impl Config {
    /// Loads `path` when given, otherwise `~/.chef/solo_data_bag.toml` if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => match get_config_path() {
                Some(path) if path.exists() => Self::load_from(&path)?,
                _ => Self::default(),
            },
        };

        if config.encrypted_data_bag_secret.is_none() {
            config.encrypted_data_bag_secret =
                Some(PathBuf::from(SYSTEM_SECRET_PATH)).filter(|p| p.exists());
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn data_bag_path(&self) -> PathBuf {
        self.data_bag_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_BAG_PATH))
    }
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".chef").join(CONFIG_FILE_NAME))
}
