use anyhow::Result;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::context::CommandContext;
use crate::domain::{validation, BagRef, KeyManagementService, SecretResolver};
use crate::infrastructure::{ChefItemCipher, DataBagStorage};
use crate::ui;

pub fn handle_show(
    bag: Option<String>,
    item: Option<String>,
    ctx: CommandContext,
    format: OutputFormat,
    kms: &dyn KeyManagementService,
) -> Result<()> {
    let content = show_content(bag, item, ctx, kms)?;
    ui::output(&content, format)
}

fn show_content(
    bag: Option<String>,
    item: Option<String>,
    mut ctx: CommandContext,
    kms: &dyn KeyManagementService,
) -> Result<Value> {
    let bag_name = validation::ensure_valid_arguments(bag.as_deref(), &ctx)?;
    let target = BagRef::new(bag_name, item);

    SecretResolver::resolve_secret_file(&mut ctx, kms)?;

    let storage = DataBagStorage::new(ctx.bags_path());
    let cipher = ChefItemCipher::new(ctx.encrypt_version);
    SecretResolver::load_content(
        &storage,
        &target.bag_name,
        target.item_name.as_deref(),
        &ctx,
        &cipher,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SecretArgs;
    use crate::config::Config;
    use crate::domain::{DataBagError, EncryptVersion, ItemCipher, KmsError, Secret};
    use serde_json::json;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    struct CountingKms {
        calls: Cell<usize>,
    }

    impl KeyManagementService for CountingKms {
        fn decrypt(&self, _ciphertext: &[u8], _region: &str) -> Result<Vec<u8>, KmsError> {
            self.calls.set(self.calls.get() + 1);
            Ok(b"kms-secret".to_vec())
        }
    }

    fn kitchen() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("data_bags/users")).unwrap();
        fs::write(
            dir.path().join("data_bags/users/alice.json"),
            r#"{"id":"alice"}"#,
        )
        .unwrap();
        dir
    }

    fn context(dir: &TempDir, secrets: SecretArgs) -> CommandContext {
        CommandContext::new(
            secrets,
            Some(dir.path().join("data_bags")),
            &Config::default(),
        )
    }

    fn kms() -> CountingKms {
        CountingKms {
            calls: Cell::new(0),
        }
    }

    #[test]
    fn test_show_plain_item() {
        let dir = kitchen();
        let content = show_content(
            Some("users".to_string()),
            Some("alice".to_string()),
            context(&dir, SecretArgs::default()),
            &kms(),
        )
        .unwrap();
        assert_eq!(content, json!({"id": "alice"}));
    }

    #[test]
    fn test_conflicting_secrets_stop_before_loading() {
        let dir = kitchen();
        let kms = kms();
        let err = show_content(
            Some("users".to_string()),
            Some("alice".to_string()),
            context(
                &dir,
                SecretArgs {
                    secret: Some("mysecret".to_string()),
                    secret_file_path: Some(dir.path().to_path_buf()),
                    environment: Some("production".to_string()),
                    enable_aws_kms: true,
                    region: "us-east-1".to_string(),
                },
            ),
            &kms,
        )
        .unwrap_err();

        assert!(err.downcast_ref::<DataBagError>().unwrap().is_usage());
        assert_eq!(kms.calls.get(), 0);
    }

    #[test]
    fn test_missing_bag_name_is_usage_error() {
        let dir = kitchen();
        let err = show_content(None, None, context(&dir, SecretArgs::default()), &kms()).unwrap_err();
        assert!(err.downcast_ref::<DataBagError>().unwrap().is_usage());
    }

    #[test]
    fn test_invalid_bags_path_is_distinct() {
        let dir = TempDir::new().unwrap();
        let err = show_content(
            Some("users".to_string()),
            None,
            context(&dir, SecretArgs::default()),
            &kms(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataBagError>(),
            Some(DataBagError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_show_item_with_kms_protected_secret() {
        let dir = kitchen();
        fs::create_dir(dir.path().join("secrets")).unwrap();
        fs::write(
            dir.path().join("secrets/encrypted_data_bag_secret-production"),
            b"ciphertext",
        )
        .unwrap();

        let plain = json!({"id": "bob", "password": "hunter2"});
        let encrypted = crate::infrastructure::ChefItemCipher::new(EncryptVersion::V2)
            .encrypt_item(plain.as_object().unwrap(), &Secret::from("kms-secret"))
            .unwrap();
        fs::write(
            dir.path().join("data_bags/users/bob.json"),
            serde_json::to_string(&encrypted).unwrap(),
        )
        .unwrap();

        let kms = kms();
        let content = show_content(
            Some("users".to_string()),
            Some("bob".to_string()),
            context(
                &dir,
                SecretArgs {
                    secret_file_path: Some(dir.path().join("secrets")),
                    environment: Some("production".to_string()),
                    enable_aws_kms: true,
                    region: "ap-southeast-2".to_string(),
                    ..SecretArgs::default()
                },
            ),
            &kms,
        )
        .unwrap();

        assert_eq!(content, plain);
        assert_eq!(kms.calls.get(), 1);
    }
}
