//! Key-management capability and its AWS KMS implementation.

use std::collections::HashMap;
use std::sync::Arc;

use aws_config::SdkConfig;
use aws_sdk_kms::{error::ProvideErrorMetadata, primitives::Blob};
use tracing::{debug, error};

use crate::utils::AlertError;

/// Key under which the execution-context name is bound into the encryption
/// context. Ciphertexts were produced with this exact key.
pub const ENCRYPTION_CONTEXT_KEY: &str = "LambdaFunctionName";

pub type EncryptionContext = HashMap<String, String>;

/// Key-management interface
///
/// Abstracts the decrypt call so tests can substitute a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeyManagement: Send + Sync {
    /// Decrypts `ciphertext` under `context`, returning the plaintext bytes.
    async fn decrypt(
        &self,
        ciphertext: Vec<u8>,
        context: EncryptionContext,
    ) -> Result<Vec<u8>, AlertError>;
}

pub type KeyManagementClient = Arc<dyn KeyManagement>;

/// AWS KMS backed key management.
#[derive(Clone)]
pub struct KmsKeyManagement {
    client: aws_sdk_kms::Client,
}

impl KmsKeyManagement {
    pub fn new(client: aws_sdk_kms::Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(aws_sdk_kms::Client::new(sdk_config))
    }
}

#[async_trait::async_trait]
impl KeyManagement for KmsKeyManagement {
    async fn decrypt(
        &self,
        ciphertext: Vec<u8>,
        context: EncryptionContext,
    ) -> Result<Vec<u8>, AlertError> {
        debug!(ciphertext_len = ciphertext.len(), "Calling KMS decrypt");

        let response = match self
            .client
            .decrypt()
            .ciphertext_blob(Blob::new(ciphertext))
            .set_encryption_context(Some(context))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(
                    code = e.code().unwrap_or_default(),
                    "KMS rejected the decrypt request"
                );
                return Err(AlertError::Decryption(format!(
                    "KMS decrypt failed ({}): {}",
                    e.code().unwrap_or_default(),
                    e.message().unwrap_or_default()
                )));
            }
        };

        let plaintext = response
            .plaintext()
            .ok_or_else(|| AlertError::Decryption("KMS returned no plaintext".to_string()))?;

        Ok(plaintext.as_ref().to_vec())
    }
}
