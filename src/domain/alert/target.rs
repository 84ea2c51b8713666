use tracing::{info, instrument};

use crate::domain::notification::NotificationTarget;
use crate::domain::store::{DataStoreClient, Procedure, TARGET_ADDRESS_COLUMN};
use crate::domain::InvocationContext;
use crate::utils::AlertError;

/// Looks up the notification target configured for an alert.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    procedure: Procedure,
}

impl TargetResolver {
    pub fn new(procedure: Procedure) -> Self {
        Self { procedure }
    }

    /// The last row returned wins; no rows yields an empty address.
    #[instrument(skip_all, fields(invocation_id = %ctx.invocation_id, alert_id = ctx.alert_id))]
    pub async fn resolve_target(
        &self,
        ctx: &InvocationContext,
        store: &DataStoreClient,
    ) -> Result<NotificationTarget, AlertError> {
        let rows = store.query(&self.procedure, ctx.alert_id).await?;
        if rows.len() > 1 {
            info!(rows = rows.len(), "Multiple targets configured, using the last one");
        }

        let address = match rows.last() {
            Some(row) => row.get(TARGET_ADDRESS_COLUMN).cloned().ok_or_else(|| {
                AlertError::DataStore(format!(
                    "target row is missing column `{}`",
                    TARGET_ADDRESS_COLUMN
                ))
            })?,
            None => String::new(),
        };

        info!(target_arn = %address, "Notification target resolved");
        Ok(NotificationTarget::new(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionParameters;
    use crate::domain::store::client::MockAlertStore;
    use crate::domain::store::StoreRow;
    use std::sync::Arc;

    fn store_returning(result: Result<Vec<StoreRow>, AlertError>) -> DataStoreClient {
        let mut store = MockAlertStore::new();
        let mut result = Some(result);
        store
            .expect_call_procedure()
            .withf(|_, procedure, _| procedure.name == "GetSecurityAlertURL")
            .times(1)
            .returning(move |_, _, _| result.take().unwrap_or_else(|| Ok(Vec::new())));
        DataStoreClient::new(
            Arc::new(store),
            ConnectionParameters {
                host: "db".into(),
                database: "securities".into(),
                username: "alerts".into(),
                password: crate::domain::credential::Credential::new("pw"),
                timeout_seconds: 30,
            },
        )
    }

    fn target_row(address: &str) -> StoreRow {
        StoreRow::from([("awsSNSURL".to_string(), address.to_string())])
    }

    fn resolver() -> TargetResolver {
        TargetResolver::new(Procedure::target_lookup("GetSecurityAlertURL").unwrap())
    }

    fn ctx() -> InvocationContext {
        InvocationContext::new(5, "SecurityAlertSNS")
    }

    #[tokio::test]
    async fn should_take_last_row_when_multiple_targets_exist() {
        // Arrange
        let store = store_returning(Ok(vec![
            target_row("arn:aws:sns:us-east-2:1:first"),
            target_row("arn:aws:sns:us-east-2:1:second"),
            target_row("arn:aws:sns:us-east-2:1:last"),
        ]));

        // Act
        let target = resolver().resolve_target(&ctx(), &store).await.unwrap();

        // Assert
        assert_eq!(target.address, "arn:aws:sns:us-east-2:1:last");
    }

    #[tokio::test]
    async fn should_yield_empty_address_without_rows() {
        let store = store_returning(Ok(Vec::new()));

        let target = resolver().resolve_target(&ctx(), &store).await.unwrap();

        assert!(target.is_empty());
    }

    #[tokio::test]
    async fn should_keep_raw_address_for_dispatcher_to_normalize() {
        let store = store_returning(Ok(vec![target_row("arn:aws:sns: topic ")]));

        let target = resolver().resolve_target(&ctx(), &store).await.unwrap();

        assert_eq!(target.address, "arn:aws:sns: topic ");
        assert_eq!(target.normalized(), "arn:aws:sns:topic");
    }

    #[tokio::test]
    async fn should_propagate_store_failure() {
        let store = store_returning(Err(AlertError::DataStore("deadlock victim".into())));

        let result = resolver().resolve_target(&ctx(), &store).await;

        assert!(matches!(result, Err(AlertError::DataStore(_))));
    }
}
