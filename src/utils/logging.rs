//! 로깅 초기화 모듈
//!
//! JSON 형식의 구조화된 로깅을 제공합니다.
//! stdout과 일별 로그 파일에 동시 출력합니다.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,security_alert=debug";
const LOG_FILE_PREFIX: &str = "security-alert.log";

/// 로깅 시스템을 초기화합니다.
///
/// JSON 포맷으로 로그를 출력하며, 환경 변수 `RUST_LOG`를 통해 로그 레벨을 설정할 수 있습니다.
/// 기본값은 `info,security_alert=debug`입니다.
///
/// 로그는 stdout과 `LOG_DIR` (기본 `logs/`) 디렉토리의 일별 파일에 동시 출력됩니다.
/// 파일명 형식: `security-alert.log.YYYY-MM-DD`
///
/// 반환되는 `WorkerGuard`를 main에서 유지해야 프로세스 종료 시 버퍼링된 로그가 손실되지 않습니다.
/// 로그 디렉토리를 만들 수 없으면 stdout에만 출력하고 `None`을 반환합니다.
pub fn init_logging() -> Option<WorkerGuard> {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    init_logging_in(&log_dir)
}

/// `log_dir`에 일별 로그 파일을 여는 appender를 생성합니다.
pub fn file_appender(log_dir: &str) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(log_dir)
}

/// 지정한 디렉토리로 로깅을 초기화합니다.
pub fn init_logging_in(log_dir: &str) -> Option<WorkerGuard> {
    let (file_layer, guard, file_error) = match file_appender(log_dir) {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_current_span(true)
                .flatten_event(false)
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let stdout_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .flatten_event(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .or_else(|err| {
            // 이미 초기화된 경우는 무시
            use std::error::Error;
            if err
                .source()
                .and_then(|s| s.downcast_ref::<tracing::dispatcher::SetGlobalDefaultError>())
                .is_some()
            {
                return Ok(());
            }
            eprintln!("Failed to initialize tracing: {}", err);
            Err(err)
        })
        .ok();

    if let Some(e) = file_error {
        tracing::warn!(
            log_dir = %log_dir,
            error = %e,
            "Log directory is unavailable, logging to stdout only"
        );
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNCREATABLE_DIR: &str = "/proc/security_alert_no_such_dir/logs";

    #[test]
    fn should_report_error_when_log_directory_cannot_be_created() {
        let result = file_appender(UNCREATABLE_DIR);

        assert!(result.is_err());
    }

    #[test]
    fn should_fall_back_to_stdout_without_panicking() {
        // Arrange & Act
        let outcome = std::panic::catch_unwind(|| init_logging_in(UNCREATABLE_DIR));

        // Assert
        let guard = outcome.expect("init_logging_in must not panic");
        assert!(guard.is_none());
    }
}
