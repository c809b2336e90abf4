//! 인증/등록/역할 관리 라우트.
//!
//! 기존 클라이언트가 의존하는 응답 본문과 상태 코드를 그대로 유지합니다.
//! 로그인 실패는 본문 없는 401로, 역할 관리 실패는 500 + `{status,
//! message}` 본문으로 돌려줍니다.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AdminAuth;
use crate::error::StatusResponse;
use crate::services::{LoginError, RegistrationError, RoleAdminError};
use crate::state::AppState;

/// 로그인 요청.
///
/// 기존 클라이언트가 보내는 camelCase 키(`phoneNumber`)를 그대로
/// 받습니다.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// 로그인 식별자로 쓰이는 전화번호
    pub phone_number: String,
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// 서명된 JWT
    pub token: String,
    /// 토큰 만료 시각
    pub expiration: DateTime<Utc>,
    /// 발급 시점의 역할 목록
    pub roles: Vec<String>,
}

/// 등록 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// 역할 할당 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRoleRequest {
    pub username: String,
    pub role: String,
}

/// `?name=` 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct RoleNameQuery {
    pub name: String,
}

/// 전화번호 + 비밀번호 로그인.
///
/// POST /api/v1/auth/login
///
/// 자격 증명이 틀리면 계정 존재 여부를 드러내지 않는 본문 없는 401을
/// 돌려줍니다.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    match state.auth.login(&request.phone_number, &request.password).await {
        Ok(success) => Json(LoginResponse {
            token: success.token,
            expiration: success.expires_at,
            roles: success
                .roles
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        })
        .into_response(),
        Err(LoginError::InvalidCredentials) => StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            error!(error = %e, "로그인 처리 실패");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// 일반 사용자 등록.
///
/// POST /api/v1/auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    if request.validate().is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(StatusResponse::error(
                "User creation failed. Please check user details and try again.",
            )),
        )
            .into_response();
    }

    match state
        .auth
        .register(&request.username, &request.phone_number, &request.password)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse::success("User created successfully.")),
        )
            .into_response(),
        Err(RegistrationError::UsernameTaken) => (
            StatusCode::CONFLICT,
            Json(StatusResponse::error("Username in use.")),
        )
            .into_response(),
        Err(RegistrationError::PhoneTaken) => (
            StatusCode::CONFLICT,
            Json(StatusResponse::error("Contact Number in use.")),
        )
            .into_response(),
        Err(RegistrationError::InvalidInput) => (
            StatusCode::BAD_REQUEST,
            Json(StatusResponse::error(
                "User creation failed. Please check user details and try again.",
            )),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "등록 처리 실패");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse::error(
                    "User creation failed. Please check user details and try again.",
                )),
            )
                .into_response()
        }
    }
}

/// 관리자 등록 (부트스트랩 경로).
///
/// POST /api/v1/auth/register-admin
///
/// 사용자 이름 충돌 외의 모든 실패는 세부 사유를 노출하지 않고 일반
/// 500 메시지로 합쳐집니다.
async fn register_admin(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Response {
    match state
        .auth
        .register_admin(&request.username, &request.phone_number, &request.password)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse::success("User created successfully.")),
        )
            .into_response(),
        Err(RegistrationError::UsernameTaken) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusResponse::error("User already exists.")),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "관리자 등록 실패");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse::error(
                    "User creation failed. Please check user details and try again.",
                )),
            )
                .into_response()
        }
    }
}

/// 역할 생성. 관리자 전용.
///
/// POST /api/v1/auth/create-role?name=...
async fn create_role(
    AdminAuth(_claims): AdminAuth,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoleNameQuery>,
) -> Response {
    match state.auth.create_role(&query.name).await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse::success("Role created successfully.")),
        )
            .into_response(),
        Err(RoleAdminError::AlreadyExists) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusResponse::error("Role already exists.")),
        )
            .into_response(),
        Err(e) => {
            error!(role = %query.name, error = %e, "역할 생성 실패");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse::error("Role creation failed.")),
            )
                .into_response()
        }
    }
}

/// 역할 삭제. 관리자 전용.
///
/// DELETE /api/v1/auth/delete-role?name=...
///
/// 성공 시 본문 없는 204를 돌려줍니다. 삭제된 역할을 가리키는 기존
/// 멤버십은 이후 "역할 없음"으로 취급됩니다.
async fn delete_role(
    AdminAuth(_claims): AdminAuth,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoleNameQuery>,
) -> Response {
    match state.auth.delete_role(&query.name).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(RoleAdminError::RoleNotFound) | Err(RoleAdminError::InvalidName(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusResponse::error("Role does not exist.")),
        )
            .into_response(),
        Err(e) => {
            error!(role = %query.name, error = %e, "역할 삭제 실패");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse::error("Role deletion failed.")),
            )
                .into_response()
        }
    }
}

/// 사용자에게 역할 할당. 관리자 전용, 멱등.
///
/// POST /api/v1/auth/assign-role
async fn assign_role(
    AdminAuth(_claims): AdminAuth,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AssignRoleRequest>,
) -> Response {
    match state.auth.assign_role(&request.username, &request.role).await {
        Ok(()) => (
            StatusCode::OK,
            Json(StatusResponse::success("Role assigned successfully.")),
        )
            .into_response(),
        Err(RoleAdminError::UserNotFound) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusResponse::error("User does not exist.")),
        )
            .into_response(),
        Err(RoleAdminError::RoleNotFound) | Err(RoleAdminError::InvalidName(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusResponse::error("Role does not exist.")),
        )
            .into_response(),
        Err(e) => {
            error!(
                username = %request.username,
                role = %request.role,
                error = %e,
                "역할 할당 실패"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse::error("Role assignment failed.")),
            )
                .into_response()
        }
    }
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/register-admin", post(register_admin))
        .route("/create-role", post(create_role))
        .route("/delete-role", delete(delete_role))
        .route("/assign-role", post(assign_role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{TokenSigner, TokenVerifier};
    use crate::repository::memory::{
        MemoryProfileCatalog, MemoryRoleDirectory, MemoryUserDirectory,
    };
    use crate::services::AuthService;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::Extension;
    use estate_core::config::AuthConfig;
    use estate_core::directory::RoleDirectory;
    use estate_core::role::RoleName;
    use serde_json::json;
    use tower::ServiceExt;

    struct TestApp {
        app: Router,
        service: AuthService,
        signer: Arc<TokenSigner>,
        roles: Arc<MemoryRoleDirectory>,
    }

    fn test_app() -> TestApp {
        let config = AuthConfig::new(
            "test-secret-key-for-jwt-testing-minimum-32-chars",
            "estate-api",
            "estate-clients",
        )
        .unwrap();

        let users = Arc::new(MemoryUserDirectory::new());
        let roles = Arc::new(MemoryRoleDirectory::new());
        let profiles = Arc::new(MemoryProfileCatalog::new());
        let signer = Arc::new(TokenSigner::new(&config));
        let verifier = TokenVerifier::new(&config);

        let service = AuthService::new(users, roles.clone(), profiles, signer.clone());
        let state = Arc::new(AppState::new(service.clone()));

        let app = auth_router().layer(Extension(verifier)).with_state(state);

        TestApp {
            app,
            service,
            signer,
            roles,
        }
    }

    async fn seed_user_role(t: &TestApp) {
        t.roles.create_role(&RoleName::user()).await.unwrap();
    }

    fn admin_token(t: &TestApp) -> String {
        t.signer
            .issue(99, "+admin", &[RoleName::admin(), RoleName::user()])
            .unwrap()
            .token
    }

    async fn send_json(
        app: Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, bytes.to_vec())
    }

    fn parse_status(body: &[u8]) -> StatusResponse {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_login_failure_is_empty_401() {
        let t = test_app();

        let (status, body) = send_json(
            t.app,
            "POST",
            "/login",
            Some(json!({"phoneNumber": "+9999", "password": "nope"})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_login_success_returns_token_and_roles() {
        let t = test_app();
        seed_user_role(&t).await;
        t.service
            .register("alice", "+1000", "Secret1!")
            .await
            .unwrap();

        let (status, body) = send_json(
            t.app,
            "POST",
            "/login",
            Some(json!({"phoneNumber": "+1000", "password": "Secret1!"})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let parsed: LoginResponse = serde_json::from_slice(&body).unwrap();
        assert!(!parsed.token.is_empty());
        assert_eq!(parsed.roles, vec!["User"]);
        assert!(parsed.expiration > Utc::now());
    }

    #[tokio::test]
    async fn test_register_conflicts_report_which_field() {
        let t = test_app();
        seed_user_role(&t).await;

        let payload = json!({"username": "alice", "phoneNumber": "+1000", "password": "pw"});
        let (status, body) =
            send_json(t.app.clone(), "POST", "/register", Some(payload), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse_status(&body).message, "User created successfully.");

        let dup_name = json!({"username": "alice", "phoneNumber": "+2000", "password": "pw"});
        let (status, body) =
            send_json(t.app.clone(), "POST", "/register", Some(dup_name), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(parse_status(&body).message, "Username in use.");

        let dup_phone = json!({"username": "bob", "phoneNumber": "+1000", "password": "pw"});
        let (status, body) = send_json(t.app, "POST", "/register", Some(dup_phone), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(parse_status(&body).message, "Contact Number in use.");
    }

    #[tokio::test]
    async fn test_register_blank_field_is_bad_request() {
        let t = test_app();

        let payload = json!({"username": "", "phoneNumber": "+1000", "password": "pw"});
        let (status, body) = send_json(t.app, "POST", "/register", Some(payload), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            parse_status(&body).message,
            "User creation failed. Please check user details and try again."
        );
    }

    #[tokio::test]
    async fn test_register_admin_duplicate_masked_as_500() {
        let t = test_app();

        let payload = json!({"username": "root", "phoneNumber": "+9000", "password": "pw"});
        let (status, _) =
            send_json(t.app.clone(), "POST", "/register-admin", Some(payload.clone()), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            send_json(t.app, "POST", "/register-admin", Some(payload), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse_status(&body).message, "User already exists.");
    }

    #[tokio::test]
    async fn test_role_routes_require_admin_token() {
        let t = test_app();

        let (status, _) =
            send_json(t.app.clone(), "POST", "/create-role?name=Agent", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let user_token = t.signer.issue(1, "+1000", &[RoleName::user()]).unwrap();
        let (status, _) = send_json(
            t.app,
            "POST",
            "/create-role?name=Agent",
            None,
            Some(&user_token.token),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_create_and_delete_role_flow() {
        let t = test_app();
        let token = admin_token(&t);

        let (status, body) = send_json(
            t.app.clone(),
            "POST",
            "/create-role?name=Agent",
            None,
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse_status(&body).message, "Role created successfully.");

        let (status, body) = send_json(
            t.app.clone(),
            "POST",
            "/create-role?name=Agent",
            None,
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse_status(&body).message, "Role already exists.");

        let (status, body) = send_json(
            t.app.clone(),
            "DELETE",
            "/delete-role?name=Agent",
            None,
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (status, body) = send_json(
            t.app,
            "DELETE",
            "/delete-role?name=Agent",
            None,
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse_status(&body).message, "Role does not exist.");
    }

    #[tokio::test]
    async fn test_assign_role_flow() {
        let t = test_app();
        seed_user_role(&t).await;
        t.service
            .register("alice", "+1000", "Secret1!")
            .await
            .unwrap();
        t.service.create_role("Agent").await.unwrap();
        let token = admin_token(&t);

        let (status, body) = send_json(
            t.app.clone(),
            "POST",
            "/assign-role",
            Some(json!({"username": "alice", "role": "Agent"})),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse_status(&body).message, "Role assigned successfully.");

        let (status, body) = send_json(
            t.app.clone(),
            "POST",
            "/assign-role",
            Some(json!({"username": "ghost", "role": "Agent"})),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse_status(&body).message, "User does not exist.");

        let (status, body) = send_json(
            t.app,
            "POST",
            "/assign-role",
            Some(json!({"username": "alice", "role": "Ghost"})),
            Some(&token),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse_status(&body).message, "Role does not exist.");
    }
}
