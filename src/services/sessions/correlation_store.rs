//! # 인증 세션 상관관계 저장소
//!
//! OAuth `state` 값을 인증을 시작한 호출자의 반환 주소에 묶어 둡니다.
//! 프로세스 메모리에만 존재하며 재시작하면 진행 중이던 핸드셰이크는 실패합니다.
//!
//! ## 규칙
//!
//! - `begin`: 새 `state`를 만들고 `{반환 주소, 만료 시각 = now + window}`를 기록
//! - `consume`: 한 번만 성공합니다. 없는 값과 만료된 값을 구분하지 않습니다.
//! - `sweep`: 요청과 무관한 주기로 만료 항목을 제거
//!
//! 모든 연산은 저장소 하나의 락으로 직렬화되며, 락을 잡은 동안 I/O 는 없습니다.
//!
//! ```rust,ignore
//! let store = Arc::new(CorrelationStore::new(Duration::minutes(5), Arc::new(SystemClock)));
//! let sweeper = store.spawn_sweeper(std::time::Duration::from_secs(300));
//!
//! let state = store.begin("https://app.example.com/home");
//! assert_eq!(store.consume(&state).as_deref(), Some("https://app.example.com/home"));
//! assert_eq!(store.consume(&state), None);
//!
//! sweeper.stop();
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use actix_web::rt;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::core::Clock;

#[derive(Debug, Clone)]
struct CorrelationEntry {
    return_address: String,
    expires_at: DateTime<Utc>,
}

impl CorrelationEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

pub struct CorrelationStore {
    entries: Mutex<HashMap<String, CorrelationEntry>>,
    window: Duration,
    clock: Arc<dyn Clock>,
}

impl CorrelationStore {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            window,
            clock,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CorrelationEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 새 핸드셰이크를 시작하고 프로바이더 리다이렉트에 넣을 `state`를 반환합니다.
    pub fn begin(&self, return_address: &str) -> String {
        let state = Uuid::new_v4().simple().to_string();
        let entry = CorrelationEntry {
            return_address: return_address.to_string(),
            expires_at: self.clock.now() + self.window,
        };

        self.entries().insert(state.clone(), entry);
        state
    }

    /// `state`에 해당하는 반환 주소를 꺼내고 항목을 삭제합니다.
    ///
    /// 없거나 만료된 경우 모두 `None`입니다.
    pub fn consume(&self, state: &str) -> Option<String> {
        let now = self.clock.now();
        let entry = self.entries().remove(state)?;

        if entry.is_expired(now) {
            return None;
        }
        Some(entry.return_address)
    }

    /// 삭제하지 않고 유효한 항목이 있는지만 확인합니다.
    pub fn is_pending(&self, state: &str) -> bool {
        let now = self.clock.now();
        self.entries()
            .get(state)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// 만료된 항목을 모두 제거하고 제거한 개수를 반환합니다.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// 현재 런타임에 주기적 정리 작업을 띄웁니다.
    pub fn spawn_sweeper(self: &Arc<Self>, every: std::time::Duration) -> SweeperHandle {
        let store = Arc::clone(self);

        let handle = rt::spawn(async move {
            let mut ticker = rt::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = store.sweep();
                if removed > 0 {
                    log::debug!("만료된 인증 세션 {}개 정리 (남은 세션 {}개)", removed, store.len());
                }
            }
        });

        log::info!("🧹 인증 세션 정리 작업 시작: {:?} 주기", every);
        SweeperHandle { handle }
    }
}

/// 정리 작업 핸들. `stop()` 또는 drop 시 작업을 중단합니다.
pub struct SweeperHandle {
    handle: rt::task::JoinHandle<()>,
}

impl SweeperHandle {
    pub fn stop(self) {
        self.handle.abort();
        log::info!("인증 세션 정리 작업 중단");
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
