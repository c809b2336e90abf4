//! 역할(Role) 도메인 타입.
//!
//! 역할은 닫힌 enum이 아니라 런타임에 생성 가능한 열린 집합입니다.
//! 두 개의 잘 알려진 역할만 상수로 제공합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 기본 역할. 모든 신규 계정에 자동으로 부여됩니다.
pub const ROLE_USER: &str = "User";

/// 관리자 역할. 역할 관리 및 관리자 등록에 필요합니다.
pub const ROLE_ADMIN: &str = "Admin";

/// 유효하지 않은 역할 이름.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("역할 이름은 공백 제거 후 비어 있지 않아야 합니다")]
pub struct InvalidRoleName;

/// 역할 이름 newtype.
///
/// 생성 시 앞뒤 공백을 제거하며, 제거 후 비어 있으면 거부합니다.
/// 비교는 대소문자를 구분합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// 새 역할 이름 생성. 앞뒤 공백을 제거합니다.
    pub fn new(name: impl AsRef<str>) -> Result<Self, InvalidRoleName> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InvalidRoleName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 기본 `User` 역할.
    pub fn user() -> Self {
        Self(ROLE_USER.to_string())
    }

    /// 관리자 `Admin` 역할.
    pub fn admin() -> Self {
        Self(ROLE_ADMIN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.0 == ROLE_ADMIN
    }
}

impl TryFrom<String> for RoleName {
    type Error = InvalidRoleName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleName> for String {
    fn from(role: RoleName) -> Self {
        role.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_trims_whitespace() {
        let role = RoleName::new("  Agent  ").unwrap();
        assert_eq!(role.as_str(), "Agent");
    }

    #[test]
    fn test_empty_role_name_rejected() {
        assert!(RoleName::new("").is_err());
        assert!(RoleName::new("   ").is_err());
    }

    #[test]
    fn test_role_name_case_sensitive() {
        let upper = RoleName::new("Admin").unwrap();
        let lower = RoleName::new("admin").unwrap();
        assert_ne!(upper, lower);
        assert!(upper.is_admin());
        assert!(!lower.is_admin());
    }

    #[test]
    fn test_well_known_roles() {
        assert_eq!(RoleName::user().as_str(), ROLE_USER);
        assert_eq!(RoleName::admin().as_str(), ROLE_ADMIN);
        assert!(RoleName::admin().is_admin());
    }

    #[test]
    fn test_serde_round_trip() {
        let role = RoleName::new("Agent").unwrap();
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"Agent\"");

        let parsed: RoleName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, role);
    }

    #[test]
    fn test_serde_rejects_blank() {
        let result: Result<RoleName, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
