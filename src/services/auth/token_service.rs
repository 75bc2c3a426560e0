//! JWT 토큰 엔진
//!
//! 액세스/리프레시 토큰 쌍의 발급과 검증을 담당합니다.
//!
//! ## 서명 방식
//!
//! - 알고리즘은 HS256 하나만 허용합니다. 헤더의 알고리즘이 다르면 거부합니다.
//! - 토큰 종류마다 별도의 시크릿을 사용합니다. 다른 종류의 시크릿으로
//!   재시도하는 일은 없습니다.
//! - 모든 토큰에 `token_type` 판별자를 넣고 검증 시 확인하므로,
//!   액세스 토큰을 리프레시 토큰 자리에 쓸 수 없습니다.
//!
//! ## 만료 검사
//!
//! 만료 시각은 주입된 [`Clock`] 기준으로 비교하며, `leeway_seconds` 만큼의
//! 시계 오차를 허용합니다 (`now > exp + leeway` 이면 만료).
//!
//! ```rust,ignore
//! let engine = TokenService::new(config.jwt.clone(), Arc::new(SystemClock));
//! let pair = engine.issue(&user)?;
//! let claims = engine.validate(&pair.access_token, TokenKind::Access)?;
//! assert_eq!(claims.sub, user.id);
//! ```

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    config::JwtConfig,
    core::Clock,
    domain::entities::users::user::User,
    domain::models::token::{TokenClaims, TokenKind, TokenPair},
    errors::{AppError, AppResult},
};

const ALGORITHM: Algorithm = Algorithm::HS256;

pub struct TokenService {
    config: JwtConfig,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    fn secret(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.config.access_secret,
            TokenKind::Refresh => &self.config.refresh_secret,
        }
    }

    fn sign(&self, claims: &TokenClaims) -> AppResult<String> {
        let secret = self.secret(claims.token_type);
        if secret.is_empty() {
            return Err(AppError::SigningFailure(format!("{} secret is empty", claims.token_type)));
        }

        encode(
            &Header::new(ALGORITHM),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::SigningFailure(format!("{} 토큰 서명 실패: {}", claims.token_type, e)))
    }

    /// 사용자에게 새 토큰 쌍을 발급합니다.
    ///
    /// 호출마다 새 `jti`를 부여하므로 같은 사용자라도 이전 쌍과 절대 같지 않습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::SigningFailure` - 시크릿이 비어 있거나 서명 실패
    pub fn issue(&self, user: &User) -> AppResult<TokenPair> {
        let now = self.clock.now();

        let access = TokenClaims {
            sub: user.id.clone(),
            iat: now.timestamp(),
            exp: (now + self.config.access_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: TokenKind::Access,
            role: Some(user.role.as_str().to_string()),
            nickname: Some(user.nickname.clone()),
            status: Some(user.status.code()),
        };

        let refresh = TokenClaims {
            sub: user.id.clone(),
            iat: now.timestamp(),
            exp: (now + self.config.refresh_ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: TokenKind::Refresh,
            role: None,
            nickname: None,
            status: None,
        };

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
        })
    }

    /// 토큰을 검증하고 클레임을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidToken` - 서명 불일치, 알고리즘 불일치, 형식 오류,
    ///   만료, 필수 클레임 누락, 토큰 종류 불일치
    pub fn validate(&self, token: &str, kind: TokenKind) -> AppResult<TokenClaims> {
        let secret = self.secret(kind);
        if secret.is_empty() {
            return Err(AppError::InvalidToken);
        }

        let mut validation = Validation::new(ALGORITHM);
        // 만료는 주입된 시계로 직접 비교
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            log::debug!("{} 토큰 검증 실패: {:?}", kind, e.kind());
            AppError::InvalidToken
        })?;

        if claims.token_type != kind {
            log::debug!("토큰 종류 불일치: expected {}, got {}", kind, claims.token_type);
            return Err(AppError::InvalidToken);
        }

        let now = self.clock.now().timestamp();
        if now > claims.exp.saturating_add(self.config.leeway_seconds as i64) {
            log::debug!("{} 토큰 만료: exp={}, now={}", kind, claims.exp, now);
            return Err(AppError::InvalidToken);
        }

        if claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(claims)
    }

    /// Bearer 토큰에서 실제 토큰 부분 추출
    ///
    /// HTTP Authorization 헤더의 "Bearer {token}" 형식에서 토큰 부분만을 추출합니다.
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> AppResult<&'a str> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AppError::Unauthorized),
        }
    }
}
