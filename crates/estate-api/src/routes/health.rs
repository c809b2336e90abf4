//! 헬스 체크 엔드포인트.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// 컴포넌트 상태.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// 상태 ("up", "down", "not_configured")
    pub status: String,

    /// 추가 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    fn up() -> Self {
        Self {
            status: "up".to_string(),
            message: None,
        }
    }

    fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }

    fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            message: None,
        }
    }
}

/// 준비 상태 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// 전체 상태 ("healthy" 또는 "degraded")
    pub status: String,

    /// API 버전
    pub version: String,

    /// 업타임 (초)
    pub uptime_secs: i64,

    /// 데이터베이스 상태
    pub database: ComponentStatus,
}

/// 단순 생존 확인.
///
/// GET /health
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 의존성까지 확인하는 준비 상태 체크.
///
/// GET /health/ready
async fn health_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match &state.db_pool {
        Some(_) => {
            if state.is_db_healthy().await {
                ComponentStatus::up()
            } else {
                ComponentStatus::down("데이터베이스 연결 실패")
            }
        }
        None => ComponentStatus::not_configured(),
    };

    let degraded = database.status == "down";
    let response = ReadinessResponse {
        status: if degraded { "degraded" } else { "healthy" }.to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        database,
    };

    let code = if degraded {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (code, Json(response))
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health_check))
        .route("/ready", get(health_ready))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        health_router().with_state(Arc::new(create_test_state()))
    }

    #[tokio::test]
    async fn health_check_returns_ok() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn readiness_without_db_is_healthy() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ReadinessResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.status, "healthy");
        assert_eq!(parsed.database.status, "not_configured");
        assert!(parsed.uptime_secs >= 0);
    }
}
