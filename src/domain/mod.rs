pub mod bag;
pub mod crypto;
pub mod error;
pub mod item;
pub mod kms;
pub mod secret;
pub mod secret_resolver;
pub mod validation;

pub use bag::BagRef;
pub use crypto::{EncryptVersion, ItemCipher};
pub use error::{CryptoError, DataBagError, KmsError};
pub use item::{validate_json_string, DataBagItem};
pub use kms::KeyManagementService;
pub use secret::Secret;
pub use secret_resolver::SecretResolver;
