//! 사용자 디렉터리의 PostgreSQL 구현.

use async_trait::async_trait;
use sqlx::PgPool;

use estate_core::directory::{DirectoryError, UserDirectory};
use estate_core::identity::{Identity, NewIdentity};

use super::map_directory_err;

/// `users` 테이블 기반 사용자 디렉터리.
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, DirectoryError> {
        sqlx::query_as::<_, Identity>(
            r#"
            SELECT id, username, phone_number, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_directory_err)
    }

    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Identity>, DirectoryError> {
        sqlx::query_as::<_, Identity>(
            r#"
            SELECT id, username, phone_number, password_hash, created_at
            FROM users
            WHERE phone_number = $1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_directory_err)
    }

    async fn create(&self, user: NewIdentity) -> Result<Identity, DirectoryError> {
        sqlx::query_as::<_, Identity>(
            r#"
            INSERT INTO users (username, phone_number, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, phone_number, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_directory_err)
    }
}
