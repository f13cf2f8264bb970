use super::error::DataBagError;
use crate::context::CommandContext;
use crate::ui;

pub const AWS_REGIONS: [&str; 9] = [
    "us-east-1",
    "us-west-2",
    "eu-west-1",
    "eu-central-1",
    "ap-southeast-1",
    "ap-northeast-1",
    "ap-southeast-2",
    "sa-east-1",
    "us-west-1",
];

pub fn validate_bag_name_provided(bag_name: Option<&str>) -> Result<&str, DataBagError> {
    bag_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DataBagError::Usage("You must supply a name for the data bag".to_string()))
}

pub fn validate_bags_path_exists(ctx: &CommandContext) -> Result<(), DataBagError> {
    if ctx.bags_path().is_dir() {
        Ok(())
    } else {
        Err(DataBagError::InvalidPath(ctx.bags_path().to_path_buf()))
    }
}

/// Returns whether the configured default secret was overridden, which is only warned about.
pub fn validate_no_conflicting_secrets(ctx: &CommandContext) -> Result<bool, DataBagError> {
    let has_secret = ctx.secret.is_some();
    let has_secret_file_path = ctx.secret_file_path.is_some();

    if has_secret && has_secret_file_path {
        return Err(DataBagError::Usage(
            "Please specify either --secret or --secret-file-path only".to_string(),
        ));
    }

    let shadowed = (has_secret || has_secret_file_path) && ctx.default_secret_path.is_some();
    if shadowed {
        tracing::warn!(
            "Default secret {:?} shadowed by the command line",
            ctx.default_secret_path
        );
        ui::warn(
            "The encrypted_data_bag_secret option defined in the configuration was overridden by the command line.",
        );
    }

    Ok(shadowed)
}

pub fn validate_environment_required_for_secret_file(
    ctx: &CommandContext,
) -> Result<(), DataBagError> {
    if ctx.secret_file_path.is_some() && ctx.environment.is_none() {
        return Err(DataBagError::Usage(
            "Please specify chef environment using -E or --environment as you supplied secret file path"
                .to_string(),
        ));
    }
    Ok(())
}

pub fn validate_region(region: &str) -> Result<(), DataBagError> {
    if region.is_empty() || AWS_REGIONS.contains(&region) {
        return Ok(());
    }
    Err(DataBagError::UnsupportedRegion {
        region: region.to_string(),
        supported: AWS_REGIONS.join(","),
    })
}

/// Runs every argument check in order, stopping at the first failure.
pub fn ensure_valid_arguments<'a>(
    bag_name: Option<&'a str>,
    ctx: &CommandContext,
) -> Result<&'a str, DataBagError> {
    let bag_name = validate_bag_name_provided(bag_name)?;
    validate_bags_path_exists(ctx)?;
    validate_no_conflicting_secrets(ctx)?;
    validate_environment_required_for_secret_file(ctx)?;
    validate_region(&ctx.region)?;
    Ok(bag_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SecretArgs;
    use crate::config::Config;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn context(dir: &TempDir, secrets: SecretArgs) -> CommandContext {
        CommandContext::new(secrets, Some(dir.path().to_path_buf()), &Config::default())
    }

    #[test]
    fn test_bag_name_required() {
        assert!(validate_bag_name_provided(None).unwrap_err().is_usage());
        assert!(validate_bag_name_provided(Some("")).unwrap_err().is_usage());
        assert_eq!(validate_bag_name_provided(Some("users")).unwrap(), "users");
    }

    #[test]
    fn test_bags_path_must_be_a_directory() {
        let dir = TempDir::new().unwrap();
        assert!(validate_bags_path_exists(&context(&dir, SecretArgs::default())).is_ok());

        let ctx = CommandContext::new(
            SecretArgs::default(),
            Some(dir.path().join("missing")),
            &Config::default(),
        );
        let err = validate_bags_path_exists(&ctx).unwrap_err();
        assert!(matches!(err, DataBagError::InvalidPath(_)));
        assert!(!err.is_usage());
    }

    #[test]
    fn test_secret_and_secret_file_path_conflict() {
        let dir = TempDir::new().unwrap();
        let ctx = context(
            &dir,
            SecretArgs {
                secret: Some("mysecret".to_string()),
                secret_file_path: Some(PathBuf::from("/etc/secrets")),
                environment: Some("production".to_string()),
                ..SecretArgs::default()
            },
        );
        assert!(validate_no_conflicting_secrets(&ctx).unwrap_err().is_usage());
        assert!(ensure_valid_arguments(Some("users"), &ctx).unwrap_err().is_usage());
    }

    fn shadowing_context(dir: &TempDir, secrets: SecretArgs, default: Option<&str>) -> CommandContext {
        let config = Config {
            encrypted_data_bag_secret: default.map(PathBuf::from),
            ..Config::default()
        };
        CommandContext::new(secrets, Some(dir.path().to_path_buf()), &config)
    }

    #[test]
    fn test_secret_shadowing_default_is_only_a_warning() {
        let dir = TempDir::new().unwrap();
        let args = SecretArgs {
            secret: Some("mysecret".to_string()),
            ..SecretArgs::default()
        };
        let ctx = shadowing_context(&dir, args, Some("/etc/chef/secret"));
        assert!(validate_no_conflicting_secrets(&ctx).unwrap());
        assert_eq!(ensure_valid_arguments(Some("users"), &ctx).unwrap(), "users");
    }

    #[test]
    fn test_secret_file_path_shadowing_default_is_only_a_warning() {
        let dir = TempDir::new().unwrap();
        let args = SecretArgs {
            secret_file_path: Some(PathBuf::from("/etc/secrets")),
            environment: Some("production".to_string()),
            ..SecretArgs::default()
        };
        let ctx = shadowing_context(&dir, args, Some("/etc/chef/secret"));
        assert!(validate_no_conflicting_secrets(&ctx).unwrap());
    }

    #[test]
    fn test_no_warning_without_default_secret_or_override() {
        let dir = TempDir::new().unwrap();
        let args = SecretArgs {
            secret: Some("mysecret".to_string()),
            ..SecretArgs::default()
        };
        let ctx = shadowing_context(&dir, args, None);
        assert!(!validate_no_conflicting_secrets(&ctx).unwrap());

        let ctx = shadowing_context(&dir, SecretArgs::default(), Some("/etc/chef/secret"));
        assert!(!validate_no_conflicting_secrets(&ctx).unwrap());
    }

    #[test]
    fn test_secret_file_path_requires_environment() {
        let dir = TempDir::new().unwrap();
        let mut secrets = SecretArgs {
            secret_file_path: Some(PathBuf::from("/etc/secrets")),
            ..SecretArgs::default()
        };
        let ctx = context(&dir, secrets.clone());
        assert!(validate_environment_required_for_secret_file(&ctx)
            .unwrap_err()
            .is_usage());

        secrets.environment = Some("staging".to_string());
        let ctx = context(&dir, secrets);
        assert!(validate_environment_required_for_secret_file(&ctx).is_ok());
    }

    #[test]
    fn test_region_allow_list() {
        for region in AWS_REGIONS {
            assert!(validate_region(region).is_ok(), "{} should be accepted", region);
        }
        assert!(validate_region("").is_ok());

        for region in ["us-east-2", "eu-north-1", "US-EAST-1", "mars-1"] {
            let err = validate_region(region).unwrap_err();
            assert!(!err.is_usage(), "region errors carry no usage banner");
            assert!(matches!(err, DataBagError::UnsupportedRegion { .. }));
            assert!(err.to_string().contains("us-east-1,us-west-2"));
        }
    }

    #[test]
    fn test_ensure_valid_arguments_passes() {
        let dir = TempDir::new().unwrap();
        let ctx = context(
            &dir,
            SecretArgs {
                region: "us-east-1".to_string(),
                ..SecretArgs::default()
            },
        );
        assert_eq!(ensure_valid_arguments(Some("users"), &ctx).unwrap(), "users");
    }
}
