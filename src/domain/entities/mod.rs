//! # Domain Entities Module
//!
//! 영구 저장소에 기록되는 엔티티를 정의합니다.
//!
//! ```text
//! entities/
//! └── users/
//!     └── user.rs     ← User 엔티티 (프로바이더 신원 + 현재 토큰 쌍)
//! ```

pub mod users;
