//! 인증 및 역할 권한 REST API 서버.
//!
//! 이 크레이트는 부동산 매물 API의 자격 증명 검증과 접근 토큰 발급 계층을
//! 제공합니다:
//! - 전화번호 + 비밀번호 로그인과 HS256 서명 JWT 발급
//! - 계정 등록 (기본 / 관리자 부트스트랩)
//! - 관리자 전용 역할 생성/삭제/할당
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 발급/검증, 비밀번호 해싱, 인증 추출기
//! - [`services`]: 인증/역할 관리 도메인 로직
//! - [`repository`]: 디렉터리 trait의 PostgreSQL 구현

pub mod auth;
pub mod error;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{
    hash_password, verify_password, AdminAuth, Claims, JwtAuth, JwtAuthError, PasswordError,
    SignedToken, TokenSigner, TokenVerifier,
};
pub use error::StatusResponse;
pub use routes::create_api_router;
pub use services::{AuthService, LoginError, RegistrationError, RoleAdminError};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
