//! Alert pipeline orchestration.
//!
//! `ResolveCredentials → EvaluateAlert → {Empty: End | NonEmpty: ResolveTarget → Dispatch → End}`
//!
//! Every stage runs at most once and strictly in order. Only credential
//! resolution can fail the invocation; later faults are logged and replaced
//! by an empty result (evaluation, target lookup) or dropped (dispatch).

use aws_config::SdkConfig;
use std::sync::Arc;
use tracing::{error, info, instrument, Instrument};

use super::evaluator::{AlertEvaluator, AlertSummary};
use super::target::TargetResolver;
use crate::config::{AppConfig, ConnectionParameters};
use crate::domain::credential::{CredentialResolver, KeyManagementClient, KmsKeyManagement};
use crate::domain::notification::{
    NotificationDispatcher, NotificationTarget, PublisherClient, SnsPublisher,
};
use crate::domain::store::{AlertStoreClient, DataStoreClient, MySqlAlertStore};
use crate::domain::InvocationContext;
use crate::utils::AlertError;

/// How an invocation ended.
///
/// Recorded in the log and returned to in-process callers. Trigger surfaces
/// report every variant as plain success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOutcome {
    /// Evaluation succeeded with zero rows.
    NoMatches,
    /// Evaluation failed and was treated as zero rows.
    EvaluationFailed,
    /// The summary was published.
    Dispatched,
    /// The publish call failed; nothing was delivered.
    DispatchFailed,
}

impl InvocationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationOutcome::NoMatches => "no_matches",
            InvocationOutcome::EvaluationFailed => "evaluation_failed",
            InvocationOutcome::Dispatched => "dispatched",
            InvocationOutcome::DispatchFailed => "dispatch_failed",
        }
    }
}

/// Wires the three external capabilities into one alert invocation.
///
/// Holds no per-invocation state: credentials, connection parameters and the
/// alert id live in locals and the [`InvocationContext`].
#[derive(Clone)]
pub struct Pipeline {
    key_management: KeyManagementClient,
    store: AlertStoreClient,
    publisher: PublisherClient,
}

impl Pipeline {
    pub fn new(
        key_management: KeyManagementClient,
        store: AlertStoreClient,
        publisher: PublisherClient,
    ) -> Self {
        Self {
            key_management,
            store,
            publisher,
        }
    }

    /// KMS, MySQL and SNS backed pipeline.
    pub fn from_sdk_config(sdk_config: &SdkConfig) -> Self {
        Self::new(
            Arc::new(KmsKeyManagement::from_sdk_config(sdk_config)),
            Arc::new(MySqlAlertStore::new()),
            Arc::new(SnsPublisher::from_sdk_config(sdk_config)),
        )
    }

    /// Runs one invocation to completion.
    ///
    /// Returns `Err` only when credentials could not be resolved.
    pub async fn run(
        &self,
        config: &AppConfig,
        ctx: &InvocationContext,
    ) -> Result<InvocationOutcome, AlertError> {
        let span = tracing::info_span!(
            "invocation",
            invocation_id = %ctx.invocation_id,
            alert_id = ctx.alert_id
        );
        self.run_stages(config, ctx).instrument(span).await
    }

    async fn run_stages(
        &self,
        config: &AppConfig,
        ctx: &InvocationContext,
    ) -> Result<InvocationOutcome, AlertError> {
        info!(alert_id = ctx.alert_id, "Alert invocation started");

        let store = self.open_store(config, ctx).await?;

        let summary = match AlertEvaluator::new(config.evaluation_procedure.clone())
            .evaluate(ctx, &store)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                error!(error = %e, "Alert evaluation failed, treating as no matches");
                return Ok(self.finish(InvocationOutcome::EvaluationFailed));
            }
        };

        info!(results = %summary.as_str(), "Alert evaluation finished");
        if summary.is_empty() {
            return Ok(self.finish(InvocationOutcome::NoMatches));
        }

        let target = self.resolve_target(config, ctx, &store).await;

        Ok(self.finish(self.dispatch(ctx, &target, &summary).await))
    }

    /// ResolveCredentials: the only fatal stage.
    #[instrument(skip_all)]
    async fn open_store(
        &self,
        config: &AppConfig,
        ctx: &InvocationContext,
    ) -> Result<DataStoreClient, AlertError> {
        let credential = CredentialResolver::new(Arc::clone(&self.key_management))
            .resolve(&config.password_var, ctx)
            .await
            .map_err(|e| {
                error!(error = %e, "Credential resolution failed, aborting invocation");
                e
            })?;

        let params = ConnectionParameters::new(config, &credential);
        Ok(DataStoreClient::new(Arc::clone(&self.store), params))
    }

    async fn resolve_target(
        &self,
        config: &AppConfig,
        ctx: &InvocationContext,
        store: &DataStoreClient,
    ) -> NotificationTarget {
        match TargetResolver::new(config.target_procedure.clone())
            .resolve_target(ctx, store)
            .await
        {
            Ok(target) => target,
            Err(e) => {
                error!(error = %e, "Target lookup failed, continuing with an empty target");
                NotificationTarget::empty()
            }
        }
    }

    async fn dispatch(
        &self,
        ctx: &InvocationContext,
        target: &NotificationTarget,
        summary: &AlertSummary,
    ) -> InvocationOutcome {
        match NotificationDispatcher::new(Arc::clone(&self.publisher))
            .dispatch(ctx, target, summary.as_str())
            .await
        {
            Ok(()) => InvocationOutcome::Dispatched,
            Err(e) => {
                error!(error = %e, "Error: notification was not delivered");
                InvocationOutcome::DispatchFailed
            }
        }
    }

    fn finish(&self, outcome: InvocationOutcome) -> InvocationOutcome {
        info!(outcome = outcome.as_str(), "Alert invocation completed");
        outcome
    }
}
