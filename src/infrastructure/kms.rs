use aws_config::{BehaviorVersion, ConfigLoader};
use aws_sdk_kms::config::Region;
use aws_sdk_kms::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_kms::operation::decrypt::DecryptError;
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::Client;
use tokio::runtime::{Builder, Runtime};

use crate::domain::{KeyManagementService, KmsError};

/// AWS KMS through the SDK's default credential chain, driven on a
/// current-thread runtime so callers stay synchronous.
pub struct AwsKmsClient {
    runtime: Runtime,
    client: Option<Client>,
}

impl AwsKmsClient {
    pub fn new() -> Result<Self, KmsError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| KmsError::Request(e.to_string()))?;

        Ok(Self {
            runtime,
            client: None,
        })
    }
}

impl KeyManagementService for AwsKmsClient {
    fn decrypt(&self, ciphertext: &[u8], region: &str) -> Result<Vec<u8>, KmsError> {
        tracing::debug!("Calling KMS Decrypt in {} ({} byte blob)", region, ciphertext.len());

        self.runtime.block_on(async {
            let client = match &self.client {
                Some(client) => client.clone(),
                None => client_for(aws_config::defaults(BehaviorVersion::latest()), region).await,
            };
            decrypt_blob(&client, ciphertext).await
        })
    }
}

async fn client_for(loader: ConfigLoader, region: &str) -> Client {
    let sdk_config = loader
        .region(Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&sdk_config)
}

async fn decrypt_blob(client: &Client, ciphertext: &[u8]) -> Result<Vec<u8>, KmsError> {
    let output = client
        .decrypt()
        .ciphertext_blob(Blob::new(ciphertext.to_vec()))
        .send()
        .await
        .map_err(request_error)?;

    output
        .plaintext()
        .map(|plaintext| plaintext.as_ref().to_vec())
        .ok_or_else(|| KmsError::InvalidResponse("no plaintext in Decrypt response".to_string()))
}

fn request_error(err: SdkError<DecryptError>) -> KmsError {
    if let Some(service) = err.as_service_error() {
        return KmsError::Service {
            kind: service.code().unwrap_or("UnknownError").to_string(),
            message: service.message().unwrap_or_default().to_string(),
        };
    }
    KmsError::Request(DisplayErrorContext(&err).to_string())
}
