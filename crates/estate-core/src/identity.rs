//! 계정(Identity) 및 프로필 레코드.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 사용자 디렉터리에 저장된 계정 레코드.
///
/// `username`과 `phone_number`는 각각 전역적으로 유일합니다.
/// 등록 시 한 번 생성되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct Identity {
    /// 내부 숫자 id
    pub id: i64,
    /// 사용자 이름 (1차 유일 키)
    pub username: String,
    /// 전화번호 (2차 유일 키, 로그인 식별자)
    pub phone_number: String,
    /// PHC 형식 비밀번호 해시 (솔트 포함)
    pub password_hash: String,
    /// 등록 시각
    pub created_at: DateTime<Utc>,
}

/// 신규 계정 생성 입력.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub username: String,
    pub phone_number: String,
    pub password_hash: String,
}

/// 매물 카탈로그가 사용하는 비정규화 프로필 레코드.
///
/// 등록 성공 시 보조 저장소에 미러링됩니다. 기본 등록 경로에서 이 쓰기는
/// best-effort이며 실패해도 등록 자체는 유지됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub phone_number: String,
    pub username: String,
}
