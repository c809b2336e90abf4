//! 인증 및 권한 부여.
//!
//! JWT 기반 인증 및 역할 클레임 기반 접근 제어를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`TokenSigner`] / [`TokenVerifier`]: 토큰 발급과 검증
//! - [`JwtAuth`] / [`AdminAuth`]: Axum 핸들러용 인증 추출기
//! - 비밀번호 해싱/검증 함수

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtError, SignedToken, TokenSigner, TokenVerifier};
pub use middleware::{AdminAuth, JwtAuth, JwtAuthError};
pub use password::{hash_password, verify_password, PasswordError};
