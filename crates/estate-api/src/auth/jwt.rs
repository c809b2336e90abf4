//! JWT 토큰 발급 및 검증.
//!
//! HS256 대칭 서명을 사용하는 자기 완결형 토큰입니다. 서버는 발급한
//! 토큰을 저장하지 않으며, 유효성은 서명과 만료 시각만으로 판정됩니다.

use chrono::{DateTime, Duration, Utc};
use estate_core::config::AuthConfig;
use estate_core::role::RoleName;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT 페이로드.
///
/// 기존 토큰 소비자와의 호환을 위해 클레임 키를 원 시스템 그대로
/// 유지합니다: `Id`(문자열로 직렬화된 내부 id), `name`(로그인에 사용한
/// 전화번호), `jti`(토큰별 난수), `role`(보유 역할 배열).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 내부 숫자 id (문자열로 직렬화)
    #[serde(rename = "Id")]
    pub id: String,
    /// 주체 이름. 로그인에 사용한 전화번호가 들어갑니다.
    pub name: String,
    /// 토큰 고유 식별자 (재사용 방지용 난수)
    pub jti: String,
    /// 발급 시점에 보유한 역할 이름 목록
    #[serde(rename = "role", default)]
    pub roles: Vec<String>,
    /// 발급자
    pub iss: String,
    /// 대상
    pub aud: String,
    /// 발급 시각 (Unix timestamp)
    pub iat: i64,
    /// 만료 시각 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// `Admin` 역할 클레임 보유 여부.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == estate_core::ROLE_ADMIN)
    }
}

/// 서명된 토큰과 만료 시각.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 서명 실패: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("토큰이 만료되었습니다")]
    Expired,
    #[error("유효하지 않은 토큰")]
    Invalid,
}

/// 토큰 발급기.
///
/// 서명 비밀 키는 시작 시 설정에서 한 번 로드되어 이후 불변입니다.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: config.token_ttl,
        }
    }

    /// 토큰 발급.
    ///
    /// 동일 입력이라도 호출마다 `jti`와 타임스탬프가 달라집니다.
    pub fn issue(
        &self,
        user_id: i64,
        phone_number: &str,
        roles: &[RoleName],
    ) -> Result<SignedToken, JwtError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            id: user_id.to_string(),
            name: phone_number.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Signing)?;

        Ok(SignedToken { token, expires_at })
    }
}

/// 토큰 검증기.
///
/// 서명, 만료, 발급자/대상 일치를 검사하고 클레임을 돌려줍니다.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // 기본 60초 유예를 없애고 만료 시각을 엄격하게 적용합니다.
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Self {
            decoding_key: DecodingKey::from_secret(config.secret_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid,
            })
    }
}
