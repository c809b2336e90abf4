//! 디렉터리 trait의 영속성 구현.
//!
//! 데이터베이스 접근 로직을 서비스/핸들러에서 분리하여 관리합니다.
//! 운영 구현은 PostgreSQL이며, 테스트용 인메모리 구현은 `memory` 모듈에
//! 있습니다.
//!
//! # 스키마 (참고)
//!
//! ```sql
//! CREATE TABLE users (
//!     id            BIGSERIAL PRIMARY KEY,
//!     username      TEXT NOT NULL,
//!     phone_number  TEXT NOT NULL,
//!     password_hash TEXT NOT NULL,
//!     created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     UNIQUE (username),
//!     UNIQUE (phone_number)
//! );
//!
//! CREATE TABLE roles (
//!     name TEXT PRIMARY KEY
//! );
//!
//! -- 멤버십은 roles에 FK를 걸지 않습니다. 역할 삭제 시 멤버십은
//! -- dangling 상태로 남고, 조회 시 JOIN으로 걸러냅니다.
//! CREATE TABLE user_roles (
//!     user_id   BIGINT NOT NULL REFERENCES users (id),
//!     role_name TEXT   NOT NULL,
//!     PRIMARY KEY (user_id, role_name)
//! );
//!
//! CREATE TABLE catalog_users (
//!     id           BIGSERIAL PRIMARY KEY,
//!     name         TEXT NOT NULL,
//!     phone_number TEXT NOT NULL,
//!     username     TEXT NOT NULL
//! );
//! ```

pub mod profiles;
pub mod roles;
pub mod users;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use profiles::PgProfileCatalog;
pub use roles::PgRoleDirectory;
pub use users::PgUserDirectory;

use estate_core::directory::{DirectoryError, UniqueField};

/// sqlx 에러를 디렉터리 에러로 변환.
///
/// 유니크 제약 위반은 제약 이름으로 필드를 식별해 매핑하고, 그 외는
/// 인프라 장애로 전파합니다.
pub(crate) fn map_directory_err(e: sqlx::Error) -> DirectoryError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some("users_username_key") => Some(UniqueField::Username),
                Some("users_phone_number_key") => Some(UniqueField::PhoneNumber),
                Some("roles_pkey") => Some(UniqueField::RoleName),
                _ => None,
            };
            if let Some(field) = field {
                return DirectoryError::UniqueViolation(field);
            }
        }
    }
    DirectoryError::Unavailable(e.to_string())
}
