//! 역할/멤버십 디렉터리의 PostgreSQL 구현.

use async_trait::async_trait;
use sqlx::PgPool;

use estate_core::directory::{DirectoryError, RoleDirectory};
use estate_core::role::RoleName;

use super::map_directory_err;

/// `roles` / `user_roles` 테이블 기반 역할 디렉터리.
pub struct PgRoleDirectory {
    pool: PgPool,
}

impl PgRoleDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleDirectory for PgRoleDirectory {
    async fn role_exists(&self, name: &RoleName) -> Result<bool, DirectoryError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
            .bind(name.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_directory_err)?;

        Ok(row.0)
    }

    async fn create_role(&self, name: &RoleName) -> Result<(), DirectoryError> {
        sqlx::query("INSERT INTO roles (name) VALUES ($1)")
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_directory_err)?;

        Ok(())
    }

    async fn delete_role(&self, name: &RoleName) -> Result<bool, DirectoryError> {
        // 멤버십은 의도적으로 남겨둡니다. roles_of의 JOIN이 걸러냅니다.
        let result = sqlx::query("DELETE FROM roles WHERE name = $1")
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_directory_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn assign_role(&self, user_id: i64, name: &RoleName) -> Result<(), DirectoryError> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_name)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_name) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(name.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_directory_err)?;

        Ok(())
    }

    async fn roles_of(&self, user_id: i64) -> Result<Vec<RoleName>, DirectoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT r.name
            FROM user_roles ur
            JOIN roles r ON r.name = ur.role_name
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_directory_err)?;

        rows.into_iter()
            .map(|(name,)| {
                RoleName::new(&name)
                    .map_err(|e| DirectoryError::Unavailable(format!("잘못된 역할 레코드: {}", e)))
            })
            .collect()
    }
}
