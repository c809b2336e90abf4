//! 매물 카탈로그 프로필 저장소의 PostgreSQL 구현.
//!
//! 등록 시 비정규화 프로필 레코드가 이 저장소로 미러링됩니다.
//! 기본 등록 경로에서 이 쓰기는 best-effort이며, 실패 처리는 서비스
//! 계층이 결정합니다.

use async_trait::async_trait;
use sqlx::PgPool;

use estate_core::directory::{DirectoryError, ProfileCatalog};
use estate_core::identity::ProfileRecord;

use super::map_directory_err;

/// `catalog_users` 테이블 기반 프로필 카탈로그.
pub struct PgProfileCatalog {
    pool: PgPool,
}

impl PgProfileCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileCatalog for PgProfileCatalog {
    async fn insert(&self, profile: ProfileRecord) -> Result<(), DirectoryError> {
        sqlx::query(
            r#"
            INSERT INTO catalog_users (name, phone_number, username)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.phone_number)
        .bind(&profile.username)
        .execute(&self.pool)
        .await
        .map_err(map_directory_err)?;

        Ok(())
    }
}
