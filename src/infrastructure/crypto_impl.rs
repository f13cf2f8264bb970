use crate::domain::{CryptoError, EncryptVersion, ItemCipher, Secret};
use aes::Aes256;
use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const CBC_CIPHER: &str = "aes-256-cbc";
const GCM_CIPHER: &str = "aes-256-gcm";
const CBC_IV_LEN: usize = 16;
const GCM_IV_LEN: usize = 12;
const GCM_TAG_LEN: usize = 16;
const JSON_WRAPPER: &str = "json_wrapper";

/// Reads and writes Chef encrypted data bag values (format versions 1, 2 and 3).
pub struct ChefItemCipher {
    version: EncryptVersion,
}

impl ChefItemCipher {
    pub fn new(version: EncryptVersion) -> Self {
        Self { version }
    }
}

impl Default for ChefItemCipher {
    fn default() -> Self {
        Self::new(EncryptVersion::default())
    }
}

impl ItemCipher for ChefItemCipher {
    fn encrypt_value(
        &self,
        _key: &str,
        value: &Value,
        secret: &Secret,
    ) -> Result<Value, CryptoError> {
        let mut wrapper = Map::new();
        wrapper.insert(JSON_WRAPPER.to_string(), value.clone());
        let plaintext = Zeroizing::new(
            serde_json::to_vec(&wrapper).map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?,
        );
        let cipher_key = cipher_key(secret);

        match self.version {
            EncryptVersion::V1 | EncryptVersion::V2 => {
                let mut iv = [0u8; CBC_IV_LEN];
                OsRng.fill_bytes(&mut iv);

                let ciphertext = Aes256CbcEnc::new_from_slices(cipher_key.as_slice(), &iv)
                    .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?
                    .encrypt_padded_vec_mut::<Pkcs7>(&plaintext);
                let encrypted_data = BASE64.encode(ciphertext);

                let mut out = Map::new();
                out.insert("encrypted_data".into(), Value::String(encrypted_data.clone()));
                out.insert("iv".into(), Value::String(BASE64.encode(iv)));
                if self.version == EncryptVersion::V2 {
                    let hmac = hmac_of(secret, &encrypted_data)?.finalize().into_bytes();
                    out.insert("hmac".into(), Value::String(BASE64.encode(hmac)));
                }
                out.insert("version".into(), json!(u64::from(self.version)));
                out.insert("cipher".into(), Value::String(CBC_CIPHER.to_string()));
                Ok(Value::Object(out))
            }
            EncryptVersion::V3 => {
                let mut iv = [0u8; GCM_IV_LEN];
                OsRng.fill_bytes(&mut iv);

                let cipher = Aes256Gcm::new_from_slice(cipher_key.as_slice())
                    .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
                let mut sealed = cipher
                    .encrypt(Nonce::from_slice(&iv), plaintext.as_slice())
                    .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
                let auth_tag = sealed.split_off(sealed.len() - GCM_TAG_LEN);

                Ok(json!({
                    "encrypted_data": BASE64.encode(sealed),
                    "iv": BASE64.encode(iv),
                    "auth_tag": BASE64.encode(auth_tag),
                    "version": 3,
                    "cipher": GCM_CIPHER,
                }))
            }
        }
    }

    fn decrypt_value(
        &self,
        key: &str,
        value: &Value,
        secret: &Secret,
    ) -> Result<Value, CryptoError> {
        let fields = value
            .as_object()
            .ok_or_else(|| CryptoError::UnsupportedFormat(key.to_string()))?;
        let version = fields
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| CryptoError::UnsupportedFormat(key.to_string()))?;
        let version = EncryptVersion::try_from(version).map_err(|_| {
            CryptoError::UnsupportedVersion {
                key: key.to_string(),
                version,
            }
        })?;

        let plaintext = match version {
            EncryptVersion::V1 => decrypt_cbc(key, fields, secret)?,
            EncryptVersion::V2 => {
                validate_hmac(key, fields, secret)?;
                decrypt_cbc(key, fields, secret)?
            }
            EncryptVersion::V3 => decrypt_gcm(key, fields, secret)?,
        };

        unwrap_json(key, &plaintext)
    }
}

fn cipher_key(secret: &Secret) -> Zeroizing<[u8; 32]> {
    Zeroizing::new(Sha256::digest(secret.as_bytes()).into())
}

fn hmac_of(secret: &Secret, encrypted_data: &str) -> Result<HmacSha256, CryptoError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .map_err(|e| CryptoError::InvalidData(e.to_string()))?;
    mac.update(encrypted_data.as_bytes());
    Ok(mac)
}

fn field<'a>(
    key: &str,
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a str, CryptoError> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| CryptoError::MissingField {
            key: key.to_string(),
            field: name,
        })
}

/// Base64 as written by Ruby may carry line breaks.
fn decode_base64(key: &str, name: &str, encoded: &str) -> Result<Vec<u8>, CryptoError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64
        .decode(compact)
        .map_err(|e| CryptoError::InvalidData(format!("'{}' of '{}': {}", name, key, e)))
}

fn assert_cipher(
    key: &str,
    fields: &Map<String, Value>,
    expected: &str,
) -> Result<(), CryptoError> {
    let cipher = field(key, fields, "cipher")?;
    if cipher != expected {
        return Err(CryptoError::UnsupportedCipher {
            key: key.to_string(),
            cipher: cipher.to_string(),
        });
    }
    Ok(())
}

fn validate_hmac(
    key: &str,
    fields: &Map<String, Value>,
    secret: &Secret,
) -> Result<(), CryptoError> {
    let encrypted_data = field(key, fields, "encrypted_data")?;
    let candidate = match fields.get("hmac").and_then(Value::as_str) {
        Some(hmac) => decode_base64(key, "hmac", hmac)?,
        None => return Err(CryptoError::InvalidHmac(key.to_string())),
    };

    hmac_of(secret, encrypted_data)?
        .verify_slice(&candidate)
        .map_err(|_| CryptoError::InvalidHmac(key.to_string()))
}

fn decrypt_cbc(
    key: &str,
    fields: &Map<String, Value>,
    secret: &Secret,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    assert_cipher(key, fields, CBC_CIPHER)?;
    let ciphertext = decode_base64(key, "encrypted_data", field(key, fields, "encrypted_data")?)?;
    let iv = decode_base64(key, "iv", field(key, fields, "iv")?)?;
    if iv.len() != CBC_IV_LEN {
        return Err(CryptoError::InvalidData(format!(
            "'iv' of '{}' must be {} bytes",
            key, CBC_IV_LEN
        )));
    }

    let cipher_key = cipher_key(secret);
    let plaintext = Aes256CbcDec::new_from_slices(cipher_key.as_slice(), &iv)
        .map_err(|e| CryptoError::InvalidData(e.to_string()))?
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed(key.to_string()))?;

    Ok(Zeroizing::new(plaintext))
}

fn decrypt_gcm(
    key: &str,
    fields: &Map<String, Value>,
    secret: &Secret,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    assert_cipher(key, fields, GCM_CIPHER)?;
    let mut sealed = decode_base64(key, "encrypted_data", field(key, fields, "encrypted_data")?)?;
    let iv = decode_base64(key, "iv", field(key, fields, "iv")?)?;
    let auth_tag = decode_base64(key, "auth_tag", field(key, fields, "auth_tag")?)?;
    if iv.len() != GCM_IV_LEN {
        return Err(CryptoError::InvalidData(format!(
            "'iv' of '{}' must be {} bytes",
            key, GCM_IV_LEN
        )));
    }
    if auth_tag.len() != GCM_TAG_LEN {
        return Err(CryptoError::InvalidData(format!(
            "'auth_tag' of '{}' must be {} bytes",
            key, GCM_TAG_LEN
        )));
    }
    sealed.extend_from_slice(&auth_tag);

    let cipher_key = cipher_key(secret);
    let cipher = Aes256Gcm::new_from_slice(cipher_key.as_slice())
        .map_err(|e| CryptoError::InvalidData(e.to_string()))?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), sealed.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed(key.to_string()))?;

    Ok(Zeroizing::new(plaintext))
}

fn unwrap_json(key: &str, plaintext: &[u8]) -> Result<Value, CryptoError> {
    let mut wrapped: Value =
        serde_json::from_slice(plaintext).map_err(|_| CryptoError::DecryptionFailed(key.to_string()))?;
    wrapped
        .get_mut(JSON_WRAPPER)
        .map(Value::take)
        .ok_or_else(|| CryptoError::InvalidData(format!("'{}' has no {}", key, JSON_WRAPPER)))
}
