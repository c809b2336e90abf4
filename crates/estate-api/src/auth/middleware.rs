//! Axum용 JWT 인증 추출기.
//!
//! 역할이 걸린 엔드포인트는 토큰 검증기의 계약에만 의존합니다:
//! 서명/만료/발급자/대상을 검사하고 클레임을 꺼내 줍니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::jwt::{JwtError, TokenVerifier};
use super::Claims;

/// JWT 인증 추출기.
///
/// Authorization 헤더의 Bearer 토큰을 검증하고 클레임을 추출합니다.
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

/// JWT 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtAuthError {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("권한이 부족합니다")]
    InsufficientPermission,
    #[error("토큰 검증기가 설정되지 않았습니다")]
    VerifierUnavailable,
}

impl IntoResponse for JwtAuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            JwtAuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            JwtAuthError::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "INVALID_AUTH_HEADER"),
            JwtAuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            JwtAuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            JwtAuthError::InsufficientPermission => {
                (StatusCode::FORBIDDEN, "INSUFFICIENT_PERMISSION")
            }
            JwtAuthError::VerifierUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "VERIFIER_UNAVAILABLE")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}

impl<S> FromRequestParts<S> for JwtAuth
where
    S: Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(JwtAuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(JwtAuthError::InvalidAuthHeader)?;

        // 검증기는 서버 시작 시 Extension 레이어로 주입됩니다.
        let verifier = parts
            .extensions
            .get::<TokenVerifier>()
            .ok_or(JwtAuthError::VerifierUnavailable)?;

        let claims = verifier.verify(token).map_err(|e| match e {
            JwtError::Expired => JwtAuthError::TokenExpired,
            _ => JwtAuthError::InvalidToken,
        })?;

        Ok(JwtAuth(claims))
    }
}

/// `Admin` 역할 클레임을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Claims);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
{
    type Rejection = JwtAuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(JwtAuthError::InsufficientPermission);
        }
        Ok(AdminAuth(claims))
    }
}
