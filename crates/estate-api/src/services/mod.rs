//! 도메인 서비스 계층.
//!
//! 라우트 핸들러에서 인증/등록/역할 관리 로직을 분리하여 관리합니다.
//! 서비스는 디렉터리 trait에만 의존하므로 인메모리 구현으로 그대로
//! 테스트할 수 있습니다.

mod auth;
mod roles;

pub use auth::{AuthService, LoginError, LoginSuccess, RegistrationError};
pub use roles::RoleAdminError;
