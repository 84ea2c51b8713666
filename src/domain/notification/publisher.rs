//! Pub/sub capability and its AWS SNS implementation.

use std::sync::Arc;

use aws_config::SdkConfig;
use aws_sdk_sns::error::ProvideErrorMetadata;
use tracing::{error, info};

use crate::utils::AlertError;

/// Pub/sub publish interface
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Publishes `message` to `target` in a single call.
    async fn publish(&self, target: &str, message: &str) -> Result<(), AlertError>;
}

pub type PublisherClient = Arc<dyn Publisher>;

/// AWS SNS publisher; `target` is a topic or endpoint ARN.
#[derive(Clone)]
pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
}

impl SnsPublisher {
    pub fn new(client: aws_sdk_sns::Client) -> Self {
        Self { client }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(aws_sdk_sns::Client::new(sdk_config))
    }
}

#[async_trait::async_trait]
impl Publisher for SnsPublisher {
    async fn publish(&self, target: &str, message: &str) -> Result<(), AlertError> {
        let output = self
            .client
            .publish()
            .target_arn(target)
            .message(message)
            .send()
            .await
            .map_err(|e| {
                error!(
                    target_arn = %target,
                    code = e.code().unwrap_or_default(),
                    "SNS publish failed"
                );
                AlertError::Dispatch(format!(
                    "SNS publish to `{}` failed ({}): {}",
                    target,
                    e.code().unwrap_or_default(),
                    e.message().unwrap_or_default()
                ))
            })?;

        info!(
            target_arn = %target,
            message_id = output.message_id().unwrap_or_default(),
            "SNS message published"
        );
        Ok(())
    }
}
