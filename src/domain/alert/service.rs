use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use super::dto::{AlertRequest, InvocationResponse};
use super::pipeline::{InvocationOutcome, Pipeline};
use crate::config::{AppConfig, ConfigError};
use crate::domain::InvocationContext;
use crate::utils::AlertError;

/// Produces the per-invocation settings.
pub type SettingsLoader = Arc<dyn Fn() -> Result<AppConfig, ConfigError> + Send + Sync>;

/// Entry point shared by every trigger surface.
///
/// Invocations are serialized: the next one starts only after the previous
/// one has finished.
#[derive(Clone)]
pub struct AlertService {
    pipeline: Arc<Pipeline>,
    settings: SettingsLoader,
    gate: Arc<Mutex<()>>,
}

impl AlertService {
    pub fn new(pipeline: Pipeline, settings: SettingsLoader) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            settings,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Settings are read from the environment on every invocation.
    pub fn from_env(pipeline: Pipeline) -> Self {
        Self::new(pipeline, Arc::new(AppConfig::from_env))
    }

    pub async fn invoke(&self, request: AlertRequest) -> Result<InvocationResponse, AlertError> {
        self.invoke_with_outcome(request)
            .await
            .map(|(response, _)| response)
    }

    /// Like [`AlertService::invoke`], also returning how the invocation ended.
    pub async fn invoke_with_outcome(
        &self,
        request: AlertRequest,
    ) -> Result<(InvocationResponse, InvocationOutcome), AlertError> {
        let _turn = self.gate.lock().await;

        let config = (self.settings)().map_err(|e| {
            warn!(alert_id = request.id, error = %e, "Invocation settings are incomplete");
            AlertError::from(e)
        })?;
        let ctx = InvocationContext::new(request.id, config.function_name.clone());
        info!(
            alert_id = ctx.alert_id,
            invocation_id = %ctx.invocation_id,
            "Alert request accepted"
        );

        let outcome = self.pipeline.run(&config, &ctx).await?;

        Ok((
            InvocationResponse {
                alert_id: ctx.alert_id,
                invocation_id: ctx.invocation_id,
            },
            outcome,
        ))
    }
}
