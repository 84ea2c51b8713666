use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::AlertError;

/// Trigger payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct AlertRequest {
    /// Alert type identifier
    #[serde(alias = "Id")]
    #[schema(example = 7)]
    pub id: i64,
}

impl AlertRequest {
    /// Parses a raw trigger document such as `{"id": 7}`.
    pub fn from_json(raw: &str) -> Result<Self, AlertError> {
        Ok(serde_json::from_str(raw.trim())?)
    }
}

/// Acknowledgement returned to the HTTP trigger.
///
/// Carries no outcome: a completed invocation looks the same whether or not
/// anything was published.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub alert_id: i64,
    /// Correlates with the `invocation_id` field in the logs
    pub invocation_id: Uuid,
}
