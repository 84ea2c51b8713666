use aws_config::{retry::RetryConfig, BehaviorVersion, Region, SdkConfig};
use tracing::info;

/// Loads the shared AWS configuration for the given region.
///
/// SDK-level retries are disabled: a KMS or SNS call is attempted exactly once
/// per invocation and redelivery is left to the trigger.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .retry_config(RetryConfig::disabled())
        .load()
        .await;

    info!(region = %region, "Loaded AWS SDK configuration");
    sdk_config
}
