use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::domain::{bag, DataBagError, DataBagItem};

/// Data bags laid out as `<bags_path>/<bag>/<item>.json`.
pub struct DataBagStorage {
    bags_path: PathBuf,
}

impl DataBagStorage {
    pub fn new(bags_path: impl Into<PathBuf>) -> Self {
        Self {
            bags_path: bags_path.into(),
        }
    }

    pub fn bag_path(&self, bag_name: &str) -> PathBuf {
        bag::bag_path(&self.bags_path, bag_name)
    }

    pub fn item_path(&self, bag_name: &str, item_name: &str) -> PathBuf {
        bag::item_path(&self.bag_path(bag_name), item_name)
    }

    pub fn list_bags(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.bags_path).with_context(|| {
            format!("Failed to read data bag path {}", self.bags_path.display())
        })?;

        let mut bags = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read data bag directory entry")?;
            if entry.file_type()?.is_dir() {
                bags.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        bags.sort();
        Ok(bags)
    }

    /// Returns `false` when the bag already existed.
    pub fn create_bag(&self, bag_name: &str) -> Result<bool> {
        let path = self.bag_path(bag_name);
        if path.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create data bag directory {}", path.display()))?;
        Ok(true)
    }

    /// Every item of the bag keyed by its `id`. A bag without a directory is empty.
    pub fn load_bag(&self, bag_name: &str) -> Result<Map<String, Value>> {
        let path = self.bag_path(bag_name);
        let mut bag = Map::new();
        if !path.is_dir() {
            return Ok(bag);
        }

        let mut files: Vec<PathBuf> = fs::read_dir(&path)
            .with_context(|| format!("Failed to read data bag directory {}", path.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for file in files {
            let raw = read_object(&file)?;
            let item = DataBagItem::from_value(Value::Object(raw), None)
                .with_context(|| format!("Invalid data bag item {}", file.display()))?;
            let id = item.id().to_string();

            match bag.get(&id) {
                Some(existing) if existing.as_object() != Some(item.raw_data()) => {
                    return Err(DataBagError::DuplicateItem {
                        bag: bag_name.to_string(),
                        id,
                    }
                    .into());
                }
                _ => {
                    bag.insert(id, Value::Object(item.into_raw_data()));
                }
            }
        }

        Ok(bag)
    }

    pub fn load_item(&self, bag_name: &str, item_name: &str) -> Result<Map<String, Value>> {
        let path = self.item_path(bag_name, item_name);
        if !path.is_file() {
            return Err(DataBagError::ItemNotFound {
                bag: bag_name.to_string(),
                item: item_name.to_string(),
                path,
            }
            .into());
        }
        read_object(&path)
    }

    /// Writes the item as pretty JSON, replacing any existing file.
    pub fn persist_item(&self, bag_name: &str, item_name: &str, item: &DataBagItem) -> Result<PathBuf> {
        let path = self.item_path(bag_name, item_name);
        let dir = self.bag_path(bag_name);

        let content =
            serde_json::to_string_pretty(item.raw_data()).context("Failed to serialize data bag item")?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        temp.write_all(content.as_bytes())
            .context("Failed to write data bag item")?;
        temp.persist(&path)
            .with_context(|| format!("Failed to write data bag item {}", path.display()))?;

        tracing::debug!("Wrote data bag item {}", path.display());
        Ok(path)
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            anyhow::bail!("Data bag item file {} not found", path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    match serde_json::from_str::<Value>(&content)
        .with_context(|| format!("Failed to parse data bag item {}", path.display()))?
    {
        Value::Object(map) => Ok(map),
        _ => Err(DataBagError::InvalidItem(format!(
            "{} does not contain a JSON object",
            path.display()
        ))
        .into()),
    }
}
