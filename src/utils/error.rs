use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::response::ErrorResponse;
use crate::config::ConfigError;

/// 알림 파이프라인 전역 에러 타입
///
/// `Decryption`, `Config`는 실행을 중단시키는 치명적 에러입니다.
/// `DataStore`, `Dispatch`는 파이프라인 내부에서 복구되며,
/// 컴포넌트를 단독으로 사용할 때만 호출자에게 전달됩니다.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("invalid alert request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("credential decryption failed: {0}")]
    Decryption(String),
    #[error("data store failure: {0}")]
    DataStore(String),
    #[error("notification dispatch failed: {0}")]
    Dispatch(String),
}

impl AlertError {
    /// 에러 코드 반환
    pub fn error_code(&self) -> String {
        match self {
            AlertError::InvalidRequest(_) => "COMMON400",
            AlertError::Config(_) => "ALERT_001",
            AlertError::Decryption(_) => "ALERT_002",
            AlertError::DataStore(_) => "ALERT_003",
            AlertError::Dispatch(_) => "ALERT_004",
        }
        .to_string()
    }

    /// HTTP 상태 코드 반환
    pub fn status_code(&self) -> StatusCode {
        match self {
            AlertError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AlertError::DataStore(_) | AlertError::Dispatch(_) => StatusCode::BAD_GATEWAY,
            AlertError::Config(_) | AlertError::Decryption(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 실행을 중단시키는 에러인지 여부
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AlertError::InvalidRequest(_) | AlertError::Config(_) | AlertError::Decryption(_)
        )
    }
}

impl IntoResponse for AlertError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(code = %error_code, "Alert invocation failed: {}", message);
        } else {
            error!("Error [{}]: {}", error_code, message);
        }

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}

/// JsonRejection을 AlertError로 변환
impl From<JsonRejection> for AlertError {
    fn from(rejection: JsonRejection) -> Self {
        AlertError::InvalidRequest(rejection.body_text())
    }
}

impl From<serde_json::Error> for AlertError {
    fn from(err: serde_json::Error) -> Self {
        AlertError::InvalidRequest(err.to_string())
    }
}
