//! # Domain Layer Module
//!
//! 게이트웨이의 도메인 타입을 모아 둔 계층입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - 저장소에 기록되는 User 엔티티
//! ├── dto       - HTTP 요청/응답 계약
//! └── models    - 토큰 클레임, 프로바이더 프로필, 인증된 사용자
//!      │
//!      ▼
//! Services (토큰 엔진, 정규화, 세션 오케스트레이터)
//!      │
//!      ▼
//! Repositories (MongoDB / In-memory)
//! ```

pub mod entities;
pub mod dto;
pub mod models;
