//! 테스트용 인메모리 디렉터리 구현.
//!
//! 서비스/라우트 테스트가 실제 데이터베이스 없이 디렉터리 계약 전체를
//! 검증할 수 있게 합니다. 운영 구현과 동일하게 유니크 제약과 멱등
//! 멤버십, dangling 멤버십 필터링을 따릅니다.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use estate_core::directory::{
    DirectoryError, ProfileCatalog, RoleDirectory, UniqueField, UserDirectory,
};
use estate_core::identity::{Identity, NewIdentity, ProfileRecord};
use estate_core::role::RoleName;

/// 인메모리 사용자 디렉터리.
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: Mutex<Vec<Identity>>,
    next_id: AtomicI64,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DirectoryError> {
        let users = self.users.lock().expect("lock poisoned");
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Identity>, DirectoryError> {
        let users = self.users.lock().expect("lock poisoned");
        Ok(users.iter().find(|u| u.phone_number == phone_number).cloned())
    }

    async fn create(&self, user: NewIdentity) -> Result<Identity, DirectoryError> {
        let mut users = self.users.lock().expect("lock poisoned");

        if users.iter().any(|u| u.username == user.username) {
            return Err(DirectoryError::UniqueViolation(UniqueField::Username));
        }
        if users.iter().any(|u| u.phone_number == user.phone_number) {
            return Err(DirectoryError::UniqueViolation(UniqueField::PhoneNumber));
        }

        let identity = Identity {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            username: user.username,
            phone_number: user.phone_number,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.push(identity.clone());

        Ok(identity)
    }
}

/// 인메모리 역할 디렉터리.
#[derive(Default)]
pub struct MemoryRoleDirectory {
    roles: Mutex<BTreeSet<String>>,
    memberships: Mutex<BTreeSet<(i64, String)>>,
}

impl MemoryRoleDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleDirectory for MemoryRoleDirectory {
    async fn role_exists(&self, name: &RoleName) -> Result<bool, DirectoryError> {
        let roles = self.roles.lock().expect("lock poisoned");
        Ok(roles.contains(name.as_str()))
    }

    async fn create_role(&self, name: &RoleName) -> Result<(), DirectoryError> {
        let mut roles = self.roles.lock().expect("lock poisoned");
        if !roles.insert(name.as_str().to_string()) {
            return Err(DirectoryError::UniqueViolation(UniqueField::RoleName));
        }
        Ok(())
    }

    async fn delete_role(&self, name: &RoleName) -> Result<bool, DirectoryError> {
        // 멤버십은 남겨둡니다 (dangling). roles_of가 걸러냅니다.
        let mut roles = self.roles.lock().expect("lock poisoned");
        Ok(roles.remove(name.as_str()))
    }

    async fn assign_role(&self, user_id: i64, name: &RoleName) -> Result<(), DirectoryError> {
        let mut memberships = self.memberships.lock().expect("lock poisoned");
        memberships.insert((user_id, name.as_str().to_string()));
        Ok(())
    }

    async fn roles_of(&self, user_id: i64) -> Result<Vec<RoleName>, DirectoryError> {
        let roles = self.roles.lock().expect("lock poisoned");
        let memberships = self.memberships.lock().expect("lock poisoned");

        memberships
            .iter()
            .filter(|(id, name)| *id == user_id && roles.contains(name))
            .map(|(_, name)| {
                RoleName::new(name)
                    .map_err(|e| DirectoryError::Unavailable(format!("잘못된 역할 레코드: {}", e)))
            })
            .collect()
    }
}

/// 인메모리 프로필 카탈로그.
///
/// [`MemoryProfileCatalog::fail_writes`]로 쓰기 실패를 주입해 미러
/// 기록 실패 경로를 테스트할 수 있습니다.
#[derive(Default)]
pub struct MemoryProfileCatalog {
    records: Mutex<Vec<ProfileRecord>>,
    fail: AtomicBool,
}

impl MemoryProfileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이후의 모든 쓰기를 실패시킬지 설정.
    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// 지금까지 기록된 프로필 레코드.
    pub fn records(&self) -> Vec<ProfileRecord> {
        self.records.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl ProfileCatalog for MemoryProfileCatalog {
    async fn insert(&self, profile: ProfileRecord) -> Result<(), DirectoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable(
                "카탈로그 저장소에 연결할 수 없습니다".to_string(),
            ));
        }
        self.records.lock().expect("lock poisoned").push(profile);
        Ok(())
    }
}
