//! 매물 플랫폼 인증 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다. 로그인/등록/역할 관리와
//! 헬스 체크 엔드포인트를 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::StatusCode;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use estate_api::auth::{TokenSigner, TokenVerifier};
use estate_api::repository::{PgProfileCatalog, PgRoleDirectory, PgUserDirectory};
use estate_api::routes::create_api_router;
use estate_api::services::AuthService;
use estate_api::state::AppState;
use estate_core::config::{AuthConfig, DatabaseConfig, ServerConfig};
use estate_core::logging::init_logging_from_env;

/// CORS 미들웨어 구성.
///
/// `CORS_ORIGINS` 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// AppState 초기화.
///
/// 사용자/역할 디렉터리가 모두 데이터베이스 위에 있으므로 연결 실패는
/// 시작 실패입니다.
async fn create_app_state(
    db_config: &DatabaseConfig,
    auth_config: &AuthConfig,
) -> anyhow::Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .acquire_timeout(Duration::from_secs(db_config.acquire_timeout_secs))
        .connect(&db_config.url)
        .await
        .context("데이터베이스 연결 실패")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("데이터베이스 연결 검증 실패")?;
    info!("Connected to PostgreSQL successfully");

    let auth = AuthService::new(
        Arc::new(PgUserDirectory::new(pool.clone())),
        Arc::new(PgRoleDirectory::new(pool.clone())),
        Arc::new(PgProfileCatalog::new(pool.clone())),
        Arc::new(TokenSigner::new(auth_config)),
    );

    Ok(AppState::new(auth).with_db_pool(pool))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    init_logging_from_env().map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    info!("Starting Estate API server...");

    // 설정 로드. 비밀 키/DB URL이 없으면 여기서 즉시 실패합니다.
    let server_config = ServerConfig::from_env();
    let db_config = DatabaseConfig::from_env().context("데이터베이스 설정 로드 실패")?;
    let auth_config = AuthConfig::from_env().context("토큰 서명 설정 로드 실패")?;

    let addr = server_config
        .socket_addr()
        .context("소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT를 확인하세요.")?;

    let verifier = TokenVerifier::new(&auth_config);
    let state = Arc::new(create_app_state(&db_config, &auth_config).await?);

    info!(version = %state.version, "Application state initialized");

    let app = create_api_router()
        .with_state(state)
        .layer(axum::Extension(verifier))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer());

    info!(%addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("리스너 바인딩 실패")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("서버 실행 실패")?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료를 시작합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
