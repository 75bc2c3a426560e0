//! 핵심 공용 인프라
//!
//! 여러 서비스가 공유하는 시간 추상화를 제공합니다.

pub mod clock;

pub use clock::*;
