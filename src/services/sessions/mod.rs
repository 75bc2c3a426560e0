//! 인증 세션 모듈
//!
//! - [`CorrelationStore`]: OAuth `state` ↔ 반환 주소, 단일 사용, 시간 제한
//! - [`SessionService`]: 로그인 콜백, 토큰 갱신, 등록, 로그아웃 흐름 조합

pub mod correlation_store;
pub mod session_service;

#[cfg(test)]
pub mod testing;

pub use correlation_store::*;
pub use session_service::*;
