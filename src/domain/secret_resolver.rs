use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

use super::crypto::ItemCipher;
use super::kms::KeyManagementService;
use super::secret::Secret;
use crate::context::CommandContext;
use crate::infrastructure::{load_secret, DataBagStorage};

const SECRET_FILE_PREFIX: &str = "encrypted_data_bag_secret-";

pub struct SecretResolver;

impl SecretResolver {
    pub fn secret_file_for(ctx: &CommandContext) -> Option<PathBuf> {
        let dir = ctx.secret_file_path.as_ref()?;
        let environment = ctx.environment.as_deref().unwrap_or_default();
        Some(dir.join(format!("{}{}", SECRET_FILE_PREFIX, environment)))
    }

    /// Turns `secret_file_path` into either a KMS-decrypted `secret` or a `secret_file`.
    pub fn resolve_secret_file(
        ctx: &mut CommandContext,
        kms: &dyn KeyManagementService,
    ) -> Result<()> {
        let Some(secret_file) = Self::secret_file_for(ctx) else {
            return Ok(());
        };

        if ctx.enable_aws_kms {
            let ciphertext = fs::read(&secret_file).with_context(|| {
                format!("Failed to read encrypted secret {}", secret_file.display())
            })?;
            let plaintext = kms.decrypt(&ciphertext, &ctx.region).with_context(|| {
                format!("Failed to decrypt {} via AWS KMS", secret_file.display())
            })?;
            tracing::info!("Decrypted data bag secret with AWS KMS in {}", ctx.region);
            ctx.secret = Some(Secret::new(plaintext));
        } else {
            tracing::debug!("Using data bag secret file {}", secret_file.display());
            ctx.secret_file = Some(secret_file);
        }

        Ok(())
    }

    pub fn should_be_encrypted(ctx: &CommandContext) -> bool {
        ctx.secret.is_some() || ctx.secret_file.is_some() || ctx.default_secret_path.is_some()
    }

    pub fn secret_key(ctx: &CommandContext) -> Result<Secret> {
        if let Some(secret) = &ctx.secret {
            return Ok(secret.clone());
        }

        let path = ctx
            .secret_file
            .as_ref()
            .or(ctx.default_secret_path.as_ref())
            .context("No data bag secret configured")?;
        Ok(load_secret(path)?)
    }

    /// The whole bag when no item is named, otherwise the item, decrypted when a secret is configured.
    pub fn load_content(
        storage: &DataBagStorage,
        bag_name: &str,
        item_name: Option<&str>,
        ctx: &CommandContext,
        cipher: &dyn ItemCipher,
    ) -> Result<Value> {
        let Some(item_name) = item_name else {
            return Ok(Value::Object(storage.load_bag(bag_name)?));
        };

        let raw: Map<String, Value> = storage.load_item(bag_name, item_name)?;
        if !Self::should_be_encrypted(ctx) {
            return Ok(Value::Object(raw));
        }

        let secret = Self::secret_key(ctx)?;
        let decrypted = cipher
            .decrypt_item(&raw, &secret)
            .with_context(|| format!("Failed to decrypt data bag item {}/{}", bag_name, item_name))?;
        Ok(Value::Object(decrypted))
    }
}
