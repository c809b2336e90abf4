//! 인증 및 등록 서비스.
//!
//! 자격 증명 검증, 토큰 발급, 계정 등록을 담당합니다. 서비스는 요청
//! 범위의 무상태 로직이며, 모든 영속성은 디렉터리 협력자를 통합니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use estate_core::directory::{
    DirectoryError, ProfileCatalog, RoleDirectory, UniqueField, UserDirectory,
};
use estate_core::identity::{NewIdentity, ProfileRecord};
use estate_core::role::RoleName;

use crate::auth::{hash_password, verify_password, JwtError, PasswordError, TokenSigner};

/// 로그인 성공 결과.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// 발급 시점에 토큰에 포함된 역할 목록
    pub roles: Vec<RoleName>,
}

/// 로그인 실패.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// 계정 없음과 비밀번호 불일치를 구분하지 않습니다 (계정 열거 방지).
    #[error("인증 실패")]
    InvalidCredentials,

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("토큰 발급 실패: {0}")]
    Token(#[from] JwtError),
}

/// 등록 실패.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("입력 값이 유효하지 않습니다")]
    InvalidInput,

    #[error("이미 사용 중인 사용자 이름입니다")]
    UsernameTaken,

    #[error("이미 사용 중인 전화번호입니다")]
    PhoneTaken,

    #[error("비밀번호 처리 실패: {0}")]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Directory(DirectoryError),
}

/// 인증/등록/역할 관리 서비스.
///
/// 디렉터리 협력자와 토큰 발급기를 묶어 요청 핸들러에 제공합니다.
#[derive(Clone)]
pub struct AuthService {
    pub(super) users: Arc<dyn UserDirectory>,
    pub(super) roles: Arc<dyn RoleDirectory>,
    profiles: Arc<dyn ProfileCatalog>,
    signer: Arc<TokenSigner>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        roles: Arc<dyn RoleDirectory>,
        profiles: Arc<dyn ProfileCatalog>,
        signer: Arc<TokenSigner>,
    ) -> Self {
        Self {
            users,
            roles,
            profiles,
            signer,
        }
    }

    /// 전화번호 + 비밀번호 로그인.
    ///
    /// 성공하면 발급 시점의 역할 집합을 담은 서명 토큰을 돌려줍니다.
    /// 이후의 역할 변경은 이미 발급된 토큰에 소급 적용되지 않습니다.
    pub async fn login(
        &self,
        phone_number: &str,
        password: &str,
    ) -> Result<LoginSuccess, LoginError> {
        let user = self
            .users
            .find_by_phone(phone_number)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)
            .map_err(|_| LoginError::InvalidCredentials)?;

        let roles = self.roles.roles_of(user.id).await?;

        // name 클레임은 로그인에 사용한 전화번호를 그대로 사용합니다
        // (원 시스템과의 호환 동작).
        let signed = self.signer.issue(user.id, &user.phone_number, &roles)?;

        Ok(LoginSuccess {
            token: signed.token,
            expires_at: signed.expires_at,
            roles,
        })
    }

    /// 계정 등록.
    ///
    /// 입력 형태 검증 → 사용자 이름 중복 → 전화번호 중복 순으로 검사한 뒤
    /// 계정을 생성하고 기본 `User` 역할을 부여합니다. 매물 카탈로그의
    /// 프로필 미러 기록은 best-effort이며, 실패해도 등록은 유지됩니다.
    pub async fn register(
        &self,
        username: &str,
        phone_number: &str,
        password: &str,
    ) -> Result<(), RegistrationError> {
        if username.trim().is_empty() || phone_number.trim().is_empty() || password.is_empty() {
            return Err(RegistrationError::InvalidInput);
        }

        if self
            .users
            .find_by_username(username)
            .await
            .map_err(RegistrationError::Directory)?
            .is_some()
        {
            return Err(RegistrationError::UsernameTaken);
        }

        if self
            .users
            .find_by_phone(phone_number)
            .await
            .map_err(RegistrationError::Directory)?
            .is_some()
        {
            return Err(RegistrationError::PhoneTaken);
        }

        let user = self
            .create_identity(username, phone_number, password)
            .await?;

        self.roles
            .assign_role(user.id, &RoleName::user())
            .await
            .map_err(RegistrationError::Directory)?;

        // 보조 저장소 미러 기록. 실패는 삼키되 반드시 관측 가능하게 남깁니다.
        let profile = ProfileRecord {
            name: username.to_string(),
            phone_number: phone_number.to_string(),
            username: username.to_string(),
        };
        if let Err(e) = self.profiles.insert(profile).await {
            metrics::counter!("profile_mirror_failures_total").increment(1);
            warn!(username = %username, error = %e, "프로필 미러 기록 실패 (등록은 유지됨)");
        }

        Ok(())
    }

    /// 관리자 등록 (부트스트랩 경로).
    ///
    /// 원 시스템과 동일하게 입력의 앞뒤 공백을 제거하고, 사용자 이름
    /// 중복만 선검사합니다. `Admin`/`User` 역할이 없으면 생성한 뒤 둘 다
    /// 부여하며, 프로필 미러 기록 실패는 (기본 등록과 달리) 그대로
    /// 전파됩니다.
    pub async fn register_admin(
        &self,
        username: &str,
        phone_number: &str,
        password: &str,
    ) -> Result<(), RegistrationError> {
        let username = username.trim();
        let phone_number = phone_number.trim();
        let password = password.trim();

        if username.is_empty() || phone_number.is_empty() || password.is_empty() {
            return Err(RegistrationError::InvalidInput);
        }

        if self
            .users
            .find_by_username(username)
            .await
            .map_err(RegistrationError::Directory)?
            .is_some()
        {
            return Err(RegistrationError::UsernameTaken);
        }

        let user = self
            .create_identity(username, phone_number, password)
            .await?;

        self.ensure_role(&RoleName::admin())
            .await
            .map_err(RegistrationError::Directory)?;
        self.ensure_role(&RoleName::user())
            .await
            .map_err(RegistrationError::Directory)?;

        self.roles
            .assign_role(user.id, &RoleName::admin())
            .await
            .map_err(RegistrationError::Directory)?;
        self.roles
            .assign_role(user.id, &RoleName::user())
            .await
            .map_err(RegistrationError::Directory)?;

        let profile = ProfileRecord {
            name: username.to_string(),
            phone_number: phone_number.to_string(),
            username: username.to_string(),
        };
        self.profiles
            .insert(profile)
            .await
            .map_err(RegistrationError::Directory)?;

        Ok(())
    }

    /// 해시 생성 후 계정 생성. 디렉터리의 유니크 제약 위반은 선검사를
    /// 통과한 동시 등록 경합이므로 사후에 Taken 에러로 매핑합니다.
    async fn create_identity(
        &self,
        username: &str,
        phone_number: &str,
        password: &str,
    ) -> Result<estate_core::Identity, RegistrationError> {
        let password_hash = hash_password(password)?;

        self.users
            .create(NewIdentity {
                username: username.to_string(),
                phone_number: phone_number.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DirectoryError::UniqueViolation(UniqueField::Username) => {
                    RegistrationError::UsernameTaken
                }
                DirectoryError::UniqueViolation(UniqueField::PhoneNumber) => {
                    RegistrationError::PhoneTaken
                }
                other => RegistrationError::Directory(other),
            })
    }

    /// 역할이 없으면 생성. 동시 생성 경합으로 인한 중복 에러는 무시합니다.
    async fn ensure_role(&self, name: &RoleName) -> Result<(), DirectoryError> {
        if self.roles.role_exists(name).await? {
            return Ok(());
        }
        match self.roles.create_role(name).await {
            Ok(()) | Err(DirectoryError::UniqueViolation(_)) => Ok(()),
            Err(other) => Err(other),
        }
    }
}
