//! JWT 클레임 구조체 및 페어링 된 토큰 세트
//!
//! 액세스 토큰과 리프레시 토큰은 같은 클레임 구조체를 쓰되,
//! `token_type` 판별자로 서로를 구분합니다.
use std::fmt;

use serde::{Deserialize, Serialize};

/// 토큰 종류 판별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// JWT 토큰의 클레임(Payload) 구조체
///
/// ## 클레임 구성
///
/// - `sub`: 토큰의 주체 (사용자 ID)
/// - `iat` / `exp`: 발급/만료 시간 (Unix timestamp)
/// - `jti`: 발급마다 새로 생성되는 토큰 ID
/// - `token_type`: `access` 또는 `refresh`
/// - `role`, `nickname`, `status`: 액세스 토큰에만 포함
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
}

/// 함께 발급되고 함께 저장되는 토큰 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
