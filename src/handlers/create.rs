use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

use crate::context::CommandContext;
use crate::domain::{
    bag::is_valid_name, validate_json_string, validation, DataBagError, DataBagItem, ItemCipher,
    KeyManagementService, SecretResolver,
};
use crate::infrastructure::{ChefItemCipher, DataBagStorage};

pub struct ItemSource {
    pub json_string: Option<String>,
    pub json_file: Option<PathBuf>,
}

impl ItemSource {
    fn read(self) -> Result<String> {
        match (self.json_string, self.json_file) {
            (Some(json), _) => Ok(json),
            (None, Some(path)) => fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display())),
            (None, None) => Err(DataBagError::Usage(
                "Please supply the item content with --json or --json-file".to_string(),
            )
            .into()),
        }
    }
}

pub fn handle_create(
    bag: Option<String>,
    item: Option<String>,
    source: ItemSource,
    mut ctx: CommandContext,
    kms: &dyn KeyManagementService,
) -> Result<()> {
    let bag_name = validation::ensure_valid_arguments(bag.as_deref(), &ctx)?;
    if !is_valid_name(bag_name) {
        return Err(DataBagError::Usage(format!(
            "Data bag names may only contain letters, digits, '.', '-' and '_', you gave: '{}'",
            bag_name
        ))
        .into());
    }

    SecretResolver::resolve_secret_file(&mut ctx, kms)?;

    let storage = DataBagStorage::new(ctx.bags_path());
    if storage.create_bag(bag_name)? {
        println!("Created data_bag[{}]", bag_name);
    }

    let Some(item_name) = item else {
        return Ok(());
    };

    let item = build_item(bag_name, &item_name, source, &ctx)?;
    let path = storage.persist_item(bag_name, &item_name, &item)?;
    tracing::info!("Item written to {}", path.display());
    println!("Created data_bag_item[{}]", item_name);
    Ok(())
}

fn build_item(
    bag_name: &str,
    item_name: &str,
    source: ItemSource,
    ctx: &CommandContext,
) -> Result<DataBagItem> {
    let raw = source.read()?;
    let item = DataBagItem::from_value(validate_json_string(&raw)?, Some(item_name))?;
    if item.id() != item_name {
        return Err(DataBagError::InvalidItem(format!(
            "item id '{}' does not match item name '{}'",
            item.id(),
            item_name
        ))
        .into());
    }

    if !SecretResolver::should_be_encrypted(ctx) {
        return Ok(item);
    }

    let secret = SecretResolver::secret_key(ctx)?;
    let encrypted = ChefItemCipher::new(ctx.encrypt_version)
        .encrypt_item(item.raw_data(), &secret)
        .with_context(|| format!("Failed to encrypt data bag item {}/{}", bag_name, item_name))?;
    Ok(DataBagItem::from_value(Value::Object(encrypted), None)?)
}
