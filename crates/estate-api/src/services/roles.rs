//! 역할 관리 작업.
//!
//! 생성/삭제/할당 모두 호출자의 토큰에 `Admin` 역할 클레임이 있어야
//! 합니다. 게이트는 라우트의 [`crate::auth::AdminAuth`] 추출기가
//! 담당하고, 이 모듈은 도메인 로직만 다룹니다.
//!
//! 역할 이름은 조회/변경 전에 항상 앞뒤 공백을 제거합니다.

use estate_core::directory::DirectoryError;
use estate_core::role::{InvalidRoleName, RoleName};

use super::auth::AuthService;

/// 역할 관리 실패.
#[derive(Debug, thiserror::Error)]
pub enum RoleAdminError {
    #[error("역할이 이미 존재합니다")]
    AlreadyExists,

    #[error("역할이 존재하지 않습니다")]
    RoleNotFound,

    #[error("사용자가 존재하지 않습니다")]
    UserNotFound,

    #[error("유효하지 않은 역할 이름")]
    InvalidName(#[from] InvalidRoleName),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl AuthService {
    /// 역할 생성. 이미 있으면 실패합니다.
    pub async fn create_role(&self, name: &str) -> Result<(), RoleAdminError> {
        let role = RoleName::new(name)?;

        if self.roles.role_exists(&role).await? {
            return Err(RoleAdminError::AlreadyExists);
        }

        // 선검사와 생성 사이의 경합은 디렉터리의 유니크 제약이 잡습니다.
        match self.roles.create_role(&role).await {
            Ok(()) => Ok(()),
            Err(DirectoryError::UniqueViolation(_)) => Err(RoleAdminError::AlreadyExists),
            Err(other) => Err(other.into()),
        }
    }

    /// 역할 삭제. 없으면 실패합니다.
    ///
    /// 삭제된 역할을 가리키는 기존 멤버십은 지우지 않으며, 역할 조회에서
    /// "역할 없음"으로 취급됩니다.
    pub async fn delete_role(&self, name: &str) -> Result<(), RoleAdminError> {
        let role = RoleName::new(name)?;

        if self.roles.delete_role(&role).await? {
            Ok(())
        } else {
            Err(RoleAdminError::RoleNotFound)
        }
    }

    /// 사용자에게 역할 할당. 멱등 작업입니다 (두 번 할당해도 에러 아님).
    pub async fn assign_role(&self, username: &str, role_name: &str) -> Result<(), RoleAdminError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(RoleAdminError::UserNotFound)?;

        let role = RoleName::new(role_name)?;
        if !self.roles.role_exists(&role).await? {
            return Err(RoleAdminError::RoleNotFound);
        }

        self.roles.assign_role(user.id, &role).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenSigner;
    use crate::repository::memory::{
        MemoryProfileCatalog, MemoryRoleDirectory, MemoryUserDirectory,
    };
    use estate_core::config::AuthConfig;
    use estate_core::directory::RoleDirectory;
    use std::sync::Arc;

    fn service() -> (AuthService, Arc<MemoryRoleDirectory>) {
        let config = AuthConfig::new(
            "test-secret-key-for-jwt-testing-minimum-32-chars",
            "estate-api",
            "estate-clients",
        )
        .unwrap();

        let roles = Arc::new(MemoryRoleDirectory::new());
        let service = AuthService::new(
            Arc::new(MemoryUserDirectory::new()),
            roles.clone(),
            Arc::new(MemoryProfileCatalog::new()),
            Arc::new(TokenSigner::new(&config)),
        );
        (service, roles)
    }

    #[tokio::test]
    async fn test_create_role_then_conflict() {
        let (service, _) = service();

        service.create_role("Agent").await.unwrap();
        let result = service.create_role("Agent").await;
        assert!(matches!(result, Err(RoleAdminError::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_role_names_are_trimmed() {
        let (service, roles) = service();

        service.create_role("  Agent  ").await.unwrap();
        assert!(roles
            .role_exists(&RoleName::new("Agent").unwrap())
            .await
            .unwrap());

        // 공백만 다른 이름은 같은 역할입니다.
        let result = service.create_role("Agent ").await;
        assert!(matches!(result, Err(RoleAdminError::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_blank_role_name_rejected() {
        let (service, _) = service();
        assert!(matches!(
            service.create_role("   ").await,
            Err(RoleAdminError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_role() {
        let (service, _) = service();
        let result = service.delete_role("Ghost").await;
        assert!(matches!(result, Err(RoleAdminError::RoleNotFound)));
    }

    #[tokio::test]
    async fn test_assign_role_is_idempotent() {
        let (service, roles) = service();
        roles.create_role(&RoleName::user()).await.unwrap();

        service.register("alice", "+1000", "Secret1!").await.unwrap();
        service.create_role("Agent").await.unwrap();

        service.assign_role("alice", "Agent").await.unwrap();
        service.assign_role("alice", "Agent").await.unwrap();

        let success = service.login("+1000", "Secret1!").await.unwrap();
        let names: Vec<&str> = success.roles.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["Agent", "User"]);
    }

    #[tokio::test]
    async fn test_assign_role_unknown_user_or_role() {
        let (service, roles) = service();
        roles.create_role(&RoleName::user()).await.unwrap();
        service.register("alice", "+1000", "Secret1!").await.unwrap();

        let no_user = service.assign_role("ghost", "User").await;
        assert!(matches!(no_user, Err(RoleAdminError::UserNotFound)));

        let no_role = service.assign_role("alice", "Ghost").await;
        assert!(matches!(no_role, Err(RoleAdminError::RoleNotFound)));
    }

    #[tokio::test]
    async fn test_deleted_role_becomes_dangling_membership() {
        let (service, roles) = service();
        roles.create_role(&RoleName::user()).await.unwrap();

        service.register("alice", "+1000", "Secret1!").await.unwrap();
        service.create_role("Agent").await.unwrap();
        service.assign_role("alice", "Agent").await.unwrap();

        service.delete_role("Agent").await.unwrap();

        // 사용자 측 에러 없이, 삭제된 역할만 조용히 빠집니다.
        let success = service.login("+1000", "Secret1!").await.unwrap();
        let names: Vec<&str> = success.roles.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["User"]);
    }
}
