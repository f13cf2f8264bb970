use anyhow::Result;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::context::CommandContext;
use crate::domain::validation;
use crate::infrastructure::DataBagStorage;
use crate::ui;

pub fn handle_list(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let bags = list_bags(ctx)?;
    ui::output(&Value::from(bags), format)
}

fn list_bags(ctx: &CommandContext) -> Result<Vec<String>> {
    validation::validate_bags_path_exists(ctx)?;
    DataBagStorage::new(ctx.bags_path()).list_bags()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SecretArgs;
    use crate::config::Config;
    use crate::domain::DataBagError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_bags() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("users")).unwrap();
        fs::create_dir(dir.path().join("apps")).unwrap();
        let ctx = CommandContext::new(
            SecretArgs::default(),
            Some(dir.path().to_path_buf()),
            &Config::default(),
        );

        assert_eq!(list_bags(&ctx).unwrap(), vec!["apps", "users"]);
    }

    #[test]
    fn test_list_requires_bags_path() {
        let dir = TempDir::new().unwrap();
        let ctx = CommandContext::new(
            SecretArgs::default(),
            Some(dir.path().join("missing")),
            &Config::default(),
        );
        let err = list_bags(&ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataBagError>(),
            Some(DataBagError::InvalidPath(_))
        ));
    }
}
