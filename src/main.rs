use std::net::SocketAddr;
use std::process::ExitCode;

use security_alert::{
    app,
    config::{aws_region_from_env, load_sdk_config, ServerConfig},
    shutdown::shutdown_signal,
    utils::logging::init_logging,
    AlertError, AlertRequest, AlertService, AppState, Pipeline,
};
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

/// 보안 알림 실행 진입점
///
/// `security-alert serve`는 HTTP 트리거를 시작합니다.
/// 그 외 인자는 트리거 문서(`{"id": 7}`)로 처리하고,
/// 인자가 없으면 stdin에서 문서를 읽어 한 번 실행합니다.
#[tokio::main]
async fn main() -> ExitCode {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화
    let _guard = init_logging();

    // 3. AWS 클라이언트 구성
    let sdk_config = load_sdk_config(&aws_region_from_env()).await;
    let service = AlertService::from_env(Pipeline::from_sdk_config(&sdk_config));

    // 4. 실행
    match std::env::args().nth(1).as_deref() {
        Some("serve") => serve(service).await,
        Some(document) => run_once(&service, document).await,
        None => {
            let mut document = String::new();
            if let Err(e) = tokio::io::stdin().read_to_string(&mut document).await {
                error!(error = %e, "Failed to read trigger document from stdin");
                return ExitCode::FAILURE;
            }
            run_once(&service, &document).await
        }
    }
}

async fn serve(service: AlertService) -> ExitCode {
    let port = match ServerConfig::from_env() {
        Ok(config) => config.server_port,
        Err(e) => {
            error!(error = %e, "Invalid server configuration");
            return ExitCode::FAILURE;
        }
    };

    let app = app(AppState {
        alert_service: service,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind listener");
            return ExitCode::FAILURE;
        }
    };
    info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server terminated with an error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run_once(service: &AlertService, document: &str) -> ExitCode {
    let result = match AlertRequest::from_json(document) {
        Ok(request) => service.invoke(request).await.map(|response| {
            info!(
                alert_id = response.alert_id,
                invocation_id = %response.invocation_id,
                "Invocation finished"
            );
        }),
        Err(e) => Err(e),
    };

    exit_code(result)
}

/// 치명적 에러일 때만 실패 코드로 종료
fn exit_code(result: Result<(), AlertError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_fatal() => {
            error!(code = %e.error_code(), error = %e, "Invocation aborted");
            ExitCode::FAILURE
        }
        Err(e) => {
            warn!(code = %e.error_code(), error = %e, "Invocation degraded");
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use security_alert::config::ConfigError;

    #[test]
    fn should_fail_only_on_fatal_errors() {
        assert_eq!(exit_code(Ok(())), ExitCode::SUCCESS);
        assert_eq!(
            exit_code(Err(AlertError::InvalidRequest("missing field `id`".into()))),
            ExitCode::FAILURE
        );
        assert_eq!(
            exit_code(Err(AlertError::Config(ConfigError::Missing("DATABASE")))),
            ExitCode::FAILURE
        );
        assert_eq!(
            exit_code(Err(AlertError::Decryption("AccessDeniedException".into()))),
            ExitCode::FAILURE
        );
        assert_eq!(
            exit_code(Err(AlertError::Dispatch("AuthorizationError".into()))),
            ExitCode::SUCCESS
        );
    }
}
