use super::error::KmsError;

/// Remote key-management service able to decrypt a ciphertext blob.
pub trait KeyManagementService {
    fn decrypt(&self, ciphertext: &[u8], region: &str) -> Result<Vec<u8>, KmsError>;
}
