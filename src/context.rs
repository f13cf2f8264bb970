use std::path::{Path, PathBuf};

use crate::cli::SecretArgs;
use crate::config::Config;
use crate::domain::{EncryptVersion, Secret};

/// Everything one command invocation knows, assembled once from flags and the config file.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub secret: Option<Secret>,
    pub secret_file_path: Option<PathBuf>,
    /// Set by secret resolution when a plain secret file is used.
    pub secret_file: Option<PathBuf>,
    pub enable_aws_kms: bool,
    pub region: String,
    pub environment: Option<String>,
    /// `encrypted_data_bag_secret` from the config file.
    pub default_secret_path: Option<PathBuf>,
    pub encrypt_version: EncryptVersion,
    bags_path: PathBuf,
}

impl CommandContext {
    pub fn new(secrets: SecretArgs, data_bag_path: Option<PathBuf>, config: &Config) -> Self {
        let bags_path = data_bag_path.unwrap_or_else(|| config.data_bag_path());

        Self {
            secret: secrets.secret.as_deref().map(Secret::from),
            secret_file_path: secrets.secret_file_path,
            secret_file: None,
            enable_aws_kms: secrets.enable_aws_kms,
            region: secrets.region,
            environment: secrets.environment,
            default_secret_path: config.encrypted_data_bag_secret.clone(),
            encrypt_version: config.encrypt_version,
            bags_path,
        }
    }

    pub fn bags_path(&self) -> &Path {
        &self.bags_path
    }
}
