//! # Estate Core
//!
//! 부동산 매물 API의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 인증/권한 계층 전반에서 사용되는 기본 타입을 제공합니다:
//! - 계정(Identity) 및 프로필 레코드
//! - 역할(Role) 이름 타입과 잘 알려진 역할 상수
//! - 사용자/역할 디렉터리 추상화 (trait)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod directory;
pub mod identity;
pub mod logging;
pub mod role;

pub use config::{AuthConfig, ConfigError, DatabaseConfig, ServerConfig};
pub use directory::{DirectoryError, ProfileCatalog, RoleDirectory, UniqueField, UserDirectory};
pub use identity::{Identity, NewIdentity, ProfileRecord};
pub use logging::{init_logging, init_logging_from_env, LogConfig, LogFormat};
pub use role::{InvalidRoleName, RoleName, ROLE_ADMIN, ROLE_USER};
