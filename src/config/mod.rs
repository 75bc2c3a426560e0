//! # Configuration Module
//!
//! 게이트웨이의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수를 기동 시 한 번 읽어 타입이 있는 구조체로 고정하고,
//! 필수 값이 빠진 경우 요청을 받기 전에 실패합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 서버, 저장소, Rate Limiting, 전체 설정 묶음
//! - [`auth_config`] - JWT, OAuth 프로바이더, 인증 세션 설정

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
