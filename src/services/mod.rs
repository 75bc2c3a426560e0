//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 생성자 주입으로 조립되며 `main`에서 `web::Data`로 공유됩니다.
//!
//! # Features
//!
//! - JWT 액세스/리프레시 토큰 발급과 검증
//! - OAuth 2.0 소셜 로그인 (GitHub, Google)
//! - 인증 세션(state) 관리와 토큰 회전
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::sessions::SessionService;
//!
//! let redirect = session_service.begin_auth(Provider::GitHub, Some(referer))?;
//! let pair = session_service.refresh(&access, &refresh).await?;
//! ```

pub mod auth;
pub mod sessions;
