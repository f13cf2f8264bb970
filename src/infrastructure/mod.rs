pub mod crypto_impl;
pub mod kms;
pub mod secret_file;
pub mod storage;

pub use crypto_impl::ChefItemCipher;
pub use kms::AwsKmsClient;
pub use secret_file::load_secret;
pub use storage::DataBagStorage;
