use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::dto::{AlertRequest, InvocationResponse};
use crate::state::AppState;
use crate::utils::{AlertError, BaseResponse};

/// Alert invocation trigger.
///
/// Runs one alert invocation. The response is the same whether or not a
/// notification was published.
#[utoipa::path(
    post,
    path = "/api/v1/alerts/invoke",
    request_body = AlertRequest,
    responses(
        (status = 200, description = "Invocation completed", body = InvocationResponse),
        (status = 400, description = "Malformed trigger payload", body = crate::utils::ErrorResponse),
        (status = 500, description = "Settings or credentials unavailable", body = crate::utils::ErrorResponse)
    ),
    tag = "Alert"
)]
pub async fn invoke_handler(
    State(state): State<AppState>,
    payload: Result<Json<AlertRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<InvocationResponse>>, AlertError> {
    let Json(request) = payload?;

    let response = state.alert_service.invoke(request).await?;

    Ok(Json(BaseResponse::success(response)))
}
