//! # OAuth Domain Models Module
//!
//! 외부 프로바이더가 돌려준 사용자 프로필을 프로바이더 독립적인 형태로 담습니다.
//! 프로바이더별 차이는 `raw` 필드에 원본 JSON 으로 남겨 두고,
//! 정규화 단계에서 해석합니다.

pub mod provider_profile;

pub use provider_profile::*;
