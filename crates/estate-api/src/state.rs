//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 Axum의 State extractor를 통해 핸들러에
//! 주입됩니다. 토큰 검증기는 인증 추출기가 요청 확장에서 읽을 수 있도록
//! 별도의 Extension 레이어로 주입됩니다.

use chrono::{DateTime, Utc};

use crate::services::AuthService;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 인증/등록/역할 관리 서비스
    pub auth: AuthService,

    /// 데이터베이스 연결 풀 (헬스 체크용)
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            db_pool: None,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 헬스 체크용 데이터베이스 풀 설정.
    #[must_use]
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => false,
        }
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 AppState 생성.
///
/// 인메모리 디렉터리와 고정 테스트 비밀 키를 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use crate::auth::TokenSigner;
    use crate::repository::memory::{
        MemoryProfileCatalog, MemoryRoleDirectory, MemoryUserDirectory,
    };
    use estate_core::config::AuthConfig;
    use std::sync::Arc;

    let config = AuthConfig::new(
        "test-secret-key-for-jwt-testing-minimum-32-chars",
        "estate-api",
        "estate-clients",
    )
    .expect("test auth config");

    let auth = AuthService::new(
        Arc::new(MemoryUserDirectory::new()),
        Arc::new(MemoryRoleDirectory::new()),
        Arc::new(MemoryProfileCatalog::new()),
        Arc::new(TokenSigner::new(&config)),
    );

    AppState::new(auth)
}
