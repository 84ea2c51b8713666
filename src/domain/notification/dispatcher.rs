use tracing::{info, instrument};

use super::publisher::PublisherClient;
use crate::domain::InvocationContext;
use crate::utils::AlertError;

/// Where an alert summary is published.
///
/// The stored address may carry stray whitespace; [`NotificationTarget::normalized`]
/// is what actually goes on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationTarget {
    pub address: String,
}

impl NotificationTarget {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.address.is_empty()
    }

    /// The address with every whitespace character removed.
    pub fn normalized(&self) -> String {
        self.address.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// Publishes alert summaries. One publish attempt per call, never retried.
#[derive(Clone)]
pub struct NotificationDispatcher {
    publisher: PublisherClient,
}

impl NotificationDispatcher {
    pub fn new(publisher: PublisherClient) -> Self {
        Self { publisher }
    }

    #[instrument(skip_all, fields(invocation_id = %ctx.invocation_id, alert_id = ctx.alert_id))]
    pub async fn dispatch(
        &self,
        ctx: &InvocationContext,
        target: &NotificationTarget,
        message: &str,
    ) -> Result<(), AlertError> {
        let address = target.normalized();
        info!(target_arn = %address, "Dispatching alert notification");

        self.publisher.publish(&address, message).await
    }
}
