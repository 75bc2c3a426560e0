//! User Entity Implementation
//!
//! 외부 프로바이더 신원과 연결된 정규 사용자 레코드입니다.
//!
//! ## 불변 조건
//!
//! - `(provider, provider_user_id)` 조합은 유일합니다.
//! - `id`는 생성 후 바뀌지 않습니다.
//! - 유효한 토큰 쌍은 저장된 `(access_token, refresh_token)` 하나뿐이며,
//!   새 쌍을 발급하면 덮어쓰기로 이전 쌍이 무효화됩니다.
//! - 상태 전이는 `Pending → Active` 하나만 정의됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Provider;

/// 사용자 생애주기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Pending,
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    /// 하위 서비스와 공유하는 숫자 상태 코드
    pub fn code(&self) -> i32 {
        match self {
            UserStatus::Active => 1,
            UserStatus::Pending => 40,
            UserStatus::Inactive => 50,
            UserStatus::Suspended => 51,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    NormalUser,
    GmUser,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::NormalUser => "NormalUser",
            UserRole::GmUser => "GmUser",
            UserRole::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// 내부 사용자 ID (UUID v4 문자열)
    #[serde(rename = "_id")]
    pub id: String,
    pub provider: Provider,
    pub provider_user_id: String,
    pub nickname: String,
    pub email: Option<String>,
    pub avatar_url: String,
    pub provider_access_token: String,
    pub provider_refresh_token: Option<String>,
    /// 최초 발급 전까지 `None`
    pub access_token: Option<String>,
    /// 최초 발급 전까지 `None`
    pub refresh_token: Option<String>,
    pub status: UserStatus,
    pub role: UserRole,
    pub terms_accepted: bool,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 저장된 액세스 토큰과 문자열이 정확히 같은지 확인합니다.
    pub fn holds_access_token(&self, token: &str) -> bool {
        self.access_token.as_deref() == Some(token)
    }

    pub fn holds_refresh_token(&self, token: &str) -> bool {
        self.refresh_token.as_deref() == Some(token)
    }
}
