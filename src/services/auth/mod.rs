//! 인증 및 보안 서비스 모듈
//!
//! JWT 토큰 엔진, 프로바이더 프로필 정규화, OAuth 2.0 프로바이더 클라이언트를 제공합니다.
//!
//! # Security
//!
//! - HMAC-SHA256 토큰 서명, 액세스/리프레시 시크릿 분리
//! - `token_type` 판별자로 두 종류의 토큰을 서로 대체할 수 없음
//! - CSRF 방지 (OAuth State 매개변수, [`crate::services::sessions::CorrelationStore`])
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{TokenService, TokenKind};
//!
//! let tokens = token_service.issue(&user)?;
//! let claims = token_service.validate(&tokens.access_token, TokenKind::Access)?;
//! ```

pub mod identity_normalizer;
pub mod oauth_client;
pub mod token_service;

pub use oauth_client::*;
pub use token_service::*;
