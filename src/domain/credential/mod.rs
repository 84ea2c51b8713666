//! Credential resolution: base64 ciphertext from the environment, decrypted
//! through a key-management capability.

pub mod kms;
pub mod resolver;

pub use kms::{
    EncryptionContext, KeyManagement, KeyManagementClient, KmsKeyManagement, ENCRYPTION_CONTEXT_KEY,
};
pub use resolver::{encryption_context, Credential, CredentialResolver};
