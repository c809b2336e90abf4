//! 디렉터리 추상화.
//!
//! 사용자/역할 디렉터리와 프로필 카탈로그는 외부 영속성 협력자입니다.
//! 이 모듈은 그 경계를 trait으로 정의하고, 구현체(PostgreSQL, 테스트용
//! 인메모리)는 API 크레이트에서 제공합니다.
//!
//! 디렉터리는 레코드 단위의 원자적 생성/조회를 제공한다고 가정합니다.
//! 유일성은 check-then-act 조회와 디렉터리 자체의 유니크 제약이 함께
//! 보장하며, 경합에서 밀린 쓰기는 [`DirectoryError::UniqueViolation`]으로
//! 거부됩니다.

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::{Identity, NewIdentity, ProfileRecord};
use crate::role::RoleName;

/// 유니크 제약이 걸린 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    PhoneNumber,
    RoleName,
}

/// 디렉터리 접근 에러.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// 유니크 제약 위반 (동시 등록 경합 포함)
    #[error("유니크 제약 위반: {0:?}")]
    UniqueViolation(UniqueField),

    /// 디렉터리 연결 불가 등 인프라 장애. 도메인 에러로 가장하지 않고
    /// 호출자에게 그대로 전파됩니다.
    #[error("디렉터리 접근 실패: {0}")]
    Unavailable(String),
}

/// 계정 영속성 디렉터리.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DirectoryError>;

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Identity>, DirectoryError>;

    /// 계정 생성. username/phone_number 유니크 제약 위반 시
    /// [`DirectoryError::UniqueViolation`]을 반환합니다.
    async fn create(&self, user: NewIdentity) -> Result<Identity, DirectoryError>;
}

/// 역할 및 멤버십 영속성 디렉터리.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn role_exists(&self, name: &RoleName) -> Result<bool, DirectoryError>;

    async fn create_role(&self, name: &RoleName) -> Result<(), DirectoryError>;

    /// 역할 삭제. 삭제되었으면 `true`, 없었으면 `false`.
    ///
    /// 기존 멤버십은 지우지 않습니다. 삭제된 역할을 가리키는 멤버십은
    /// [`RoleDirectory::roles_of`]에서 "역할 없음"으로 취급됩니다.
    async fn delete_role(&self, name: &RoleName) -> Result<bool, DirectoryError>;

    /// 멤버십 추가. 이미 있으면 no-op (멱등).
    async fn assign_role(&self, user_id: i64, name: &RoleName) -> Result<(), DirectoryError>;

    /// 계정이 보유한 현존 역할 목록. 멤버십이 없으면 빈 목록.
    /// 삭제된 역할에 대한 dangling 멤버십은 제외됩니다.
    async fn roles_of(&self, user_id: i64) -> Result<Vec<RoleName>, DirectoryError>;
}

/// 매물 카탈로그의 프로필 저장소.
#[async_trait]
pub trait ProfileCatalog: Send + Sync {
    async fn insert(&self, profile: ProfileRecord) -> Result<(), DirectoryError>;
}
