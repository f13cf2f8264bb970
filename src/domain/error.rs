use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataBagError {
    /// Bad command-line usage. The caller shows the usage banner before the message.
    #[error("{0}")]
    Usage(String),

    #[error("Configured data bag path '{0}' is invalid")]
    InvalidPath(PathBuf),

    #[error("Given aws region is invalid. The following are the supported regions {supported}")]
    UnsupportedRegion { region: String, supported: String },

    #[error("Syntax error in {text}: {message}")]
    Syntax { text: String, message: String },

    #[error("Data bag item '{item}' not found in data bag '{bag}' ({path})")]
    ItemNotFound {
        bag: String,
        item: String,
        path: PathBuf,
    },

    #[error("Data bag '{bag}' has items with the same name '{id}' but different content")]
    DuplicateItem { bag: String, id: String },

    #[error("Invalid data bag item: {0}")]
    InvalidItem(String),
}

impl DataBagError {
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encrypted data bag secret in '{0}' is empty")]
    EmptySecret(PathBuf),

    #[error("Failed to read encrypted data bag secret from '{path}': {source}")]
    SecretUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Value of '{0}' is not an encrypted data bag value")]
    UnsupportedFormat(String),

    #[error("Encrypted data bag value of '{key}' uses unsupported version {version}")]
    UnsupportedVersion { key: String, version: u64 },

    #[error("Encrypted data bag value of '{key}' uses unsupported cipher '{cipher}'")]
    UnsupportedCipher { key: String, cipher: String },

    #[error("Encrypted data bag value of '{key}' is missing field '{field}'")]
    MissingField { key: String, field: &'static str },

    #[error("Error decrypting data bag value '{0}': invalid hmac. Most likely the provided key is incorrect")]
    InvalidHmac(String),

    #[error("Error decrypting data bag value '{0}'. Most likely the provided key is incorrect")]
    DecryptionFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Invalid encrypted data: {0}")]
    InvalidData(String),
}

#[derive(Error, Debug)]
pub enum KmsError {
    #[error("KMS request failed: {0}")]
    Request(String),

    #[error("KMS returned {kind}: {message}")]
    Service { kind: String, message: String },

    #[error("KMS response is invalid: {0}")]
    InvalidResponse(String),
}
