//! 시간 추상화
//!
//! 상관관계 저장소, 토큰 엔진, 리포지토리는 현재 시각을 직접 읽지 않고
//! [`Clock`]을 통해 읽습니다. 운영에서는 [`SystemClock`],
//! 테스트에서는 [`ManualClock`]으로 시간을 임의로 진행시킵니다.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// 현재 시각 공급자
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 벽시계 기반 구현
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 수동으로 진행시키는 시계
///
/// ```rust,ignore
/// let clock = Arc::new(ManualClock::new(Utc::now()));
/// let store = CorrelationStore::new(Duration::minutes(5), clock.clone());
/// clock.advance(Duration::minutes(6));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
