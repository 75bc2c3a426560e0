//! 가디언 게이트웨이
//!
//! 외부 OAuth 2.0 프로바이더(GitHub, Google)로 사용자를 인증하고,
//! 게이트웨이가 직접 서명한 액세스/리프레시 JWT 쌍을 발급하는 연합 인증 서비스입니다.
//!
//! # Features
//!
//! - **인증 세션**: OAuth `state` ↔ 반환 주소, 단일 사용, 시간 제한
//! - **JWT 토큰**: HS256, 액세스/리프레시 시크릿 분리, `token_type` 판별자
//! - **토큰 회전**: 저장된 쌍을 덮어써서 이전 쌍을 즉시 무효화
//! - **신원 정규화**: 프로바이더별 프로필을 하나의 사용자 레코드로
//! - **MongoDB**: `(provider, provider_user_id)` 기준 upsert
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트, 베어러 게이트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SessionService  │ ← 콜백, 갱신, 등록, 로그아웃 흐름
//! └─────────────────┘
//!     │         │
//!     ▼         ▼
//! ┌────────┐ ┌──────────────────┐
//! │ Tokens │ │  UserRepository  │ ← MongoDB 또는 메모리
//! └────────┘ └──────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use guardian_gateway::services::sessions::SessionService;
//!
//! let location = sessions.begin_auth(Provider::GitHub, Some("http://localhost:3000/home"))?;
//! let redirect = sessions.complete_callback(Provider::GitHub, &query).await?;
//! let pair = sessions.refresh(&access_token, &refresh_token).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
