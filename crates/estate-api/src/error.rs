//! 통합 API 응답 타입.
//!
//! 모든 실패는 안정적인 `{status, message}` 쌍으로 반환됩니다.
//! 스택 트레이스나 내부 식별자는 노출하지 않습니다.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 상태 + 메시지 응답 본문.
///
/// 기존 클라이언트와의 호환을 위해 `status`는 `"Success"` 또는
/// `"Error"` 두 값만 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// "Success" | "Error"
    pub status: String,
    /// 사람이 읽을 수 있는 메시지
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "Error".to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StatusResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}
