use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::CryptoError;
use super::secret::Secret;

/// Format version written when encrypting item values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum EncryptVersion {
    V1,
    V2,
    #[default]
    V3,
}

impl TryFrom<u64> for EncryptVersion {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            other => Err(format!(
                "unsupported encrypt_version {}, expected 1, 2 or 3",
                other
            )),
        }
    }
}

impl From<EncryptVersion> for u64 {
    fn from(value: EncryptVersion) -> Self {
        match value {
            EncryptVersion::V1 => 1,
            EncryptVersion::V2 => 2,
            EncryptVersion::V3 => 3,
        }
    }
}

/// Field-level cipher for data bag items. The `id` field is never encrypted.
pub trait ItemCipher {
    fn encrypt_value(&self, key: &str, value: &Value, secret: &Secret)
        -> Result<Value, CryptoError>;
    fn decrypt_value(&self, key: &str, value: &Value, secret: &Secret)
        -> Result<Value, CryptoError>;

    fn encrypt_item(
        &self,
        raw_data: &Map<String, Value>,
        secret: &Secret,
    ) -> Result<Map<String, Value>, CryptoError> {
        raw_data
            .iter()
            .map(|(key, value)| {
                if key == "id" {
                    Ok((key.clone(), value.clone()))
                } else {
                    Ok((key.clone(), self.encrypt_value(key, value, secret)?))
                }
            })
            .collect()
    }

    fn decrypt_item(
        &self,
        raw_data: &Map<String, Value>,
        secret: &Secret,
    ) -> Result<Map<String, Value>, CryptoError> {
        raw_data
            .iter()
            .map(|(key, value)| {
                if key == "id" {
                    Ok((key.clone(), value.clone()))
                } else {
                    Ok((key.clone(), self.decrypt_value(key, value, secret)?))
                }
            })
            .collect()
    }
}
