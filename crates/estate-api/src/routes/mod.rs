//! API 라우트 정의.

pub mod auth;
pub mod health;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub use auth::{auth_router, AssignRoleRequest, LoginRequest, LoginResponse, RegisterRequest};
pub use health::{health_router, ComponentStatus, ReadinessResponse};

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/auth", auth_router())
}
