use std::fs;
use std::path::Path;

use crate::domain::{CryptoError, Secret};

/// Loads a data bag secret file. Surrounding whitespace is not part of the secret.
pub fn load_secret(path: &Path) -> Result<Secret, CryptoError> {
    let raw = zeroize::Zeroizing::new(fs::read(path).map_err(|source| {
        CryptoError::SecretUnreadable {
            path: path.to_path_buf(),
            source,
        }
    })?);

    let secret = Secret::new(raw.trim_ascii());
    if secret.is_empty() {
        return Err(CryptoError::EmptySecret(path.to_path_buf()));
    }

    tracing::debug!("Loaded data bag secret from {}", path.display());
    Ok(secret)
}
