use std::env;
use std::fmt;

use tracing::{debug, instrument};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::kms::{EncryptionContext, KeyManagementClient, ENCRYPTION_CONTEXT_KEY};
use crate::domain::InvocationContext;
use crate::utils::AlertError;

/// Decrypted secret, held for a single invocation.
///
/// The plaintext is wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    plaintext: String,
}

impl Credential {
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self {
            plaintext: plaintext.into(),
        }
    }

    pub fn expose(&self) -> &str {
        &self.plaintext
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Builds the encryption context the ciphertext was bound to.
pub fn encryption_context(execution_context: &str) -> EncryptionContext {
    EncryptionContext::from([(
        ENCRYPTION_CONTEXT_KEY.to_string(),
        execution_context.to_string(),
    )])
}

/// Turns an encrypted, base64-encoded environment value into a [`Credential`].
#[derive(Clone)]
pub struct CredentialResolver {
    kms: KeyManagementClient,
}

impl CredentialResolver {
    pub fn new(kms: KeyManagementClient) -> Self {
        Self { kms }
    }

    /// Reads `env_var_name` and decrypts it.
    ///
    /// An unset variable is reported as a decryption failure: there is no
    /// usable ciphertext and no safe default.
    #[instrument(skip(self, ctx), fields(invocation_id = %ctx.invocation_id))]
    pub async fn resolve(
        &self,
        env_var_name: &str,
        ctx: &InvocationContext,
    ) -> Result<Credential, AlertError> {
        let encoded = env::var(env_var_name).map_err(|_| {
            AlertError::Decryption(format!("{} environment variable is not set", env_var_name))
        })?;

        self.decrypt_encoded(&encoded, ctx).await
    }

    /// base64 → bytes → decrypt → UTF-8.
    pub async fn decrypt_encoded(
        &self,
        encoded: &str,
        ctx: &InvocationContext,
    ) -> Result<Credential, AlertError> {
        let ciphertext = base64::decode(encoded.trim()).map_err(|e| {
            AlertError::Decryption(format!("stored value is not valid base64: {}", e))
        })?;

        let plaintext = self
            .kms
            .decrypt(ciphertext, encryption_context(&ctx.execution_context))
            .await?;

        let plaintext = String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            AlertError::Decryption("decrypted value is not valid UTF-8".to_string())
        })?;

        debug!("Credential decrypted");
        Ok(Credential::new(plaintext))
    }
}
