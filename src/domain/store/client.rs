use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::Procedure;
use crate::config::ConnectionParameters;
use crate::utils::AlertError;

/// One result row: column name → textual value. SQL NULL reads as "".
pub type StoreRow = HashMap<String, String>;

/// Relational store interface
///
/// Each call opens its own connection from `params`, runs `procedure` with
/// `value` bound to its single parameter and releases everything before
/// returning, whether the call succeeded or not.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AlertStore: Send + Sync {
    async fn call_procedure(
        &self,
        params: &ConnectionParameters,
        procedure: &Procedure,
        value: &str,
    ) -> Result<Vec<StoreRow>, AlertError>;
}

pub type AlertStoreClient = Arc<dyn AlertStore>;

/// Invocation-scoped handle on the store: a backend plus the connection
/// parameters assembled for this invocation only.
#[derive(Clone)]
pub struct DataStoreClient {
    backend: AlertStoreClient,
    params: ConnectionParameters,
}

impl DataStoreClient {
    pub fn new(backend: AlertStoreClient, params: ConnectionParameters) -> Self {
        Self { backend, params }
    }

    /// Runs `procedure` with the alert identifier, bound as text.
    #[instrument(skip(self, procedure), fields(procedure = %procedure.name, parameter = %procedure.parameter))]
    pub async fn query(&self, procedure: &Procedure, value: i64) -> Result<Vec<StoreRow>, AlertError> {
        let rows = self
            .backend
            .call_procedure(&self.params, procedure, &value.to_string())
            .await?;

        debug!(rows = rows.len(), "Procedure returned");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectionParameters {
        ConnectionParameters {
            host: "db.internal".to_string(),
            database: "securities".to_string(),
            username: "alerts".to_string(),
            password: crate::domain::credential::Credential::new("hunter2"),
            timeout_seconds: 30,
        }
    }

    #[tokio::test]
    async fn should_bind_alert_id_as_text_with_invocation_parameters() {
        // Arrange
        let mut store = MockAlertStore::new();
        store
            .expect_call_procedure()
            .withf(|params, procedure, value| {
                params.password.expose() == "hunter2"
                    && params.timeout_seconds == 30
                    && procedure.name == "SecurityAlertCheck"
                    && value == "7"
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![StoreRow::from([("symbol".to_string(), "AAPL".to_string())])]));
        let client = DataStoreClient::new(Arc::new(store), params());
        let procedure = Procedure::evaluation("SecurityAlertCheck").unwrap();

        // Act
        let rows = client.query(&procedure, 7).await.unwrap();

        // Assert
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn should_propagate_store_errors() {
        let mut store = MockAlertStore::new();
        store
            .expect_call_procedure()
            .returning(|_, _, _| Err(AlertError::DataStore("Login failed for user".into())));
        let client = DataStoreClient::new(Arc::new(store), params());
        let procedure = Procedure::target_lookup("GetSecurityAlertURL").unwrap();

        let result = client.query(&procedure, 7).await;

        assert!(matches!(result, Err(AlertError::DataStore(_))));
    }
}
