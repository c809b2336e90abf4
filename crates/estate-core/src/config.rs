//! 설정 관리.
//!
//! 모든 설정은 환경 변수에서 로드됩니다. 서명 비밀 키가 없으면 프로세스
//! 시작 자체가 실패해야 하며(fail-fast), 요청 처리 시점의 에러가 아닙니다.

use chrono::Duration;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// 발급 토큰의 절대 수명 (시간).
pub const TOKEN_TTL_HOURS: i64 = 6;

/// 설정 로드 에러. 모두 시작 시점에 치명적입니다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET 환경 변수가 설정되지 않았습니다")]
    MissingJwtSecret,

    #[error("JWT_SECRET이 비어 있습니다")]
    EmptyJwtSecret,

    #[error("DATABASE_URL 환경 변수가 설정되지 않았습니다")]
    MissingDatabaseUrl,
}

/// HTTP 서버 설정.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// 환경 변수(`API_HOST`, `API_PORT`)에서 설정 로드.
    pub fn from_env() -> Self {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self { host, port }
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// 사용자/역할 디렉터리가 모두 이 데이터베이스 위에 있으므로
    /// `DATABASE_URL`은 필수입니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);
        let acquire_timeout_secs = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            url,
            max_connections,
            acquire_timeout_secs,
        })
    }
}

/// 토큰 서명/검증 설정.
///
/// 비밀 키는 프로세스 전역에서 초기화 이후 불변이며, 전역 조회가 아니라
/// 컴포넌트에 주입되어 사용됩니다.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 서명 비밀 키
    pub secret: SecretString,
    /// 토큰 발급자 (`iss` 클레임)
    pub issuer: String,
    /// 토큰 대상 (`aud` 클레임)
    pub audience: String,
    /// 토큰 수명
    pub token_ttl: Duration,
}

impl AuthConfig {
    /// 새 설정 생성. 비밀 키가 비어 있으면 거부합니다.
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptyJwtSecret);
        }

        Ok(Self {
            secret: SecretString::from(secret),
            issuer: issuer.into(),
            audience: audience.into(),
            token_ttl: Duration::hours(TOKEN_TTL_HOURS),
        })
    }

    /// 환경 변수에서 설정 로드.
    ///
    /// - `JWT_SECRET` (필수, 없으면 시작 실패)
    /// - `JWT_ISSUER` (기본값: "estate-api")
    /// - `JWT_AUDIENCE` (기본값: "estate-clients")
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingJwtSecret)?;
        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "estate-api".to_string());
        let audience =
            std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "estate-clients".to_string());

        Self::new(secret, issuer, audience)
    }

    /// 서명 비밀 키 바이트.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
