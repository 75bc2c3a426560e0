//! # 신원 정규화
//!
//! 프로바이더가 돌려준 프로필을 정규 [`User`] 레코드로 변환합니다.
//! I/O 가 없는 순수 함수이며 실패하지 않습니다.
//!
//! ## 프로바이더별 대체 규칙
//!
//! | 필드 | GitHub | Google |
//! |------|--------|--------|
//! | 닉네임 | `nickname` → `login` → `twitter_username` | `nickname` → `name` → `given_name` |
//! | 이메일 | `email` → `login` | `email` → 원본 `email` |
//! | 아바타 | `avatar_url` → 원본 `avatar_url` | `avatar_url` → `picture` |
//!
//! 모든 후보가 비어 있으면 닉네임/아바타는 빈 문자열, 이메일은 `None`입니다.
//! 정규화된 사용자는 항상 `Pending` / `NormalUser` / 약관 미동의 상태로 시작합니다.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    config::Provider,
    domain::entities::users::user::{User, UserRole, UserStatus},
    domain::models::oauth::ProviderProfile,
};

/// 프로바이더별 매핑 결과
#[derive(Debug, Default, PartialEq)]
struct ResolvedIdentity {
    nickname: String,
    email: Option<String>,
    avatar_url: String,
}

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

fn github_identity(profile: &ProviderProfile) -> ResolvedIdentity {
    ResolvedIdentity {
        nickname: first_non_empty([
            non_empty(&profile.nickname),
            profile.raw_str("login"),
            profile.raw_str("twitter_username"),
        ])
        .unwrap_or_default(),
        // 공개 이메일이 없는 계정은 로그인 ID를 대신 사용
        email: first_non_empty([non_empty(&profile.email), profile.raw_str("login")]),
        avatar_url: first_non_empty([
            non_empty(&profile.avatar_url),
            profile.raw_str("avatar_url"),
        ])
        .unwrap_or_default(),
    }
}

fn google_identity(profile: &ProviderProfile) -> ResolvedIdentity {
    ResolvedIdentity {
        nickname: first_non_empty([
            non_empty(&profile.nickname),
            profile.raw_str("name"),
            profile.raw_str("given_name"),
        ])
        .unwrap_or_default(),
        email: first_non_empty([non_empty(&profile.email), profile.raw_str("email")]),
        avatar_url: first_non_empty([
            non_empty(&profile.avatar_url),
            profile.raw_str("picture"),
        ])
        .unwrap_or_default(),
    }
}

/// 프로바이더 프로필을 신규 사용자 레코드로 정규화합니다.
///
/// 내부 ID 는 매번 새로 생성됩니다. 이미 존재하는 사용자라면 upsert 단계에서
/// 저장된 ID 가 유지되고 이 값은 버려집니다.
pub fn normalize(provider: Provider, profile: &ProviderProfile, now: DateTime<Utc>) -> User {
    let identity = match provider {
        Provider::GitHub => github_identity(profile),
        Provider::Google => google_identity(profile),
    };

    User {
        id: Uuid::new_v4().to_string(),
        provider,
        provider_user_id: profile.provider_user_id.clone(),
        nickname: identity.nickname,
        email: identity.email,
        avatar_url: identity.avatar_url,
        provider_access_token: profile.access_token.clone(),
        provider_refresh_token: profile.refresh_token.clone(),
        access_token: None,
        refresh_token: None,
        status: UserStatus::Pending,
        role: UserRole::NormalUser,
        terms_accepted: false,
        updated_at: now,
    }
}
