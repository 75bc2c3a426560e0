//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 요청을 해석하고 [`SessionService`](crate::services::sessions::SessionService)에
//! 위임한 뒤 결과를 HTTP 응답으로 변환하는 일만 합니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client (Browser, Frontend)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈)                            ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   SessionService / TokenService                ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   UserRepository                               ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 에러 처리
//!
//! 모든 핸들러는 `Result<HttpResponse, AppError>`를 반환합니다.
//! 인증 관련 실패는 원인과 무관하게 `401 {"error":"unauthorized"}`로 응답합니다.
//!
//! ## 모듈 구성
//!
//! - **`auth`**: 로그인 시작, 프로바이더 콜백, 토큰 갱신 (인증 불필요)
//! - **`users`**: 등록, 사용자 조회, 로그아웃 (베어러 필요)

pub mod auth;
pub mod users;
