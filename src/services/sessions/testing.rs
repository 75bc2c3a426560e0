//! 세션 흐름 테스트용 조립 도구
//!
//! 네트워크 없이 프로바이더 응답을 미리 정해 두는 [`ScriptedOAuthClient`]와,
//! 토큰 저장 실패를 흉내 내는 [`FlakyUserRepository`]를 제공합니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use actix_web::web;
use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::{
    config::{JwtConfig, OAuthConfig, Provider, ProviderCredentials},
    core::ManualClock,
    domain::dto::users::request::CallbackQuery,
    domain::entities::users::user::User,
    domain::models::oauth::ProviderProfile,
    domain::models::token::TokenPair,
    errors::{AppError, AppResult},
    repositories::users::{InMemoryUserRepository, UserRepository},
    services::auth::TokenService,
    services::sessions::{CorrelationStore, SessionService},
};

pub const ALLOWED_FRONTENDS: [&str; 2] = ["http://localhost:3000/", "https://app/"];

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "access-secret-for-tests".to_string(),
        refresh_secret: "refresh-secret-for-tests".to_string(),
        access_ttl: Duration::minutes(60),
        refresh_ttl: Duration::days(7),
        leeway_seconds: 5,
    }
}

pub fn oauth_config() -> OAuthConfig {
    OAuthConfig {
        providers: vec![ProviderCredentials {
            provider: Provider::GitHub,
            client_id: "gh-client".to_string(),
            client_secret: "gh-secret".to_string(),
        }],
        public_base_url: "http://localhost:8080".to_string(),
        allowed_frontend_hosts: ALLOWED_FRONTENDS.iter().map(|h| h.to_string()).collect(),
    }
}

pub fn github_profile(id: &str, login: &str) -> ProviderProfile {
    let raw = serde_json::json!({ "id": id, "login": login });
    ProviderProfile {
        provider_user_id: id.to_string(),
        nickname: login.to_string(),
        email: format!("{}@users.noreply.github.com", login),
        avatar_url: format!("https://avatars.githubusercontent.com/u/{}", id),
        access_token: format!("gho_{}", id),
        refresh_token: None,
        raw: raw.as_object().cloned().unwrap_or_default(),
    }
}

/// `code` 별로 돌려줄 프로필을 미리 정해 두는 프로바이더
#[derive(Default)]
pub struct ScriptedOAuthClient {
    profiles: Mutex<HashMap<String, ProviderProfile>>,
    calls: AtomicUsize,
}

impl ScriptedOAuthClient {
    pub fn script(&self, code: &str, profile: ProviderProfile) {
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(code.to_string(), profile);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl crate::services::auth::OAuthClient for ScriptedOAuthClient {
    fn begin_auth(&self, provider: Provider, state: &str) -> AppResult<String> {
        Ok(format!("https://provider.test/{}/authorize?state={}", provider, state))
    }

    async fn complete_auth(
        &self,
        _provider: Provider,
        query: &CallbackQuery,
    ) -> AppResult<ProviderProfile> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if query.error.is_some() {
            return Err(AppError::Unauthorized);
        }

        let code = query.code.as_deref().unwrap_or_default();
        self.profiles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(code)
            .cloned()
            .ok_or_else(|| AppError::ExternalServiceError(format!("unknown code {}", code)))
    }
}

/// 토큰/프로필 저장을 선택적으로 실패시키는 저장소
pub struct FlakyUserRepository {
    inner: InMemoryUserRepository,
    fail_updates: AtomicBool,
}

impl FlakyUserRepository {
    pub fn new(inner: InMemoryUserRepository) -> Self {
        Self {
            inner,
            fail_updates: AtomicBool::new(false),
        }
    }

    pub fn fail_token_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn check(&self) -> AppResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            Err(AppError::DatabaseError("write rejected".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserRepository for FlakyUserRepository {
    async fn upsert_by_provider_id(&self, user: &User) -> AppResult<()> {
        self.inner.upsert_by_provider_id(user).await
    }

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> AppResult<Option<User>> {
        self.inner.find_by_provider_id(provider, provider_user_id).await
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.inner.find_by_id(id).await
    }

    async fn update_tokens(&self, user_id: &str, tokens: &TokenPair) -> AppResult<()> {
        self.check()?;
        self.inner.update_tokens(user_id, tokens).await
    }

    async fn update_profile(&self, user: &User) -> AppResult<()> {
        self.check()?;
        self.inner.update_profile(user).await
    }
}

/// 수동 시계를 공유하는 세션 서비스 조립
pub struct Fixture {
    pub clock: Arc<ManualClock>,
    pub repo: Arc<FlakyUserRepository>,
    pub oauth: Arc<ScriptedOAuthClient>,
    pub correlations: Arc<CorrelationStore>,
    service: Arc<SessionService>,
}

impl Fixture {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let repo = Arc::new(FlakyUserRepository::new(InMemoryUserRepository::new(
            clock.clone(),
        )));
        let oauth = Arc::new(ScriptedOAuthClient::default());
        let correlations = Arc::new(CorrelationStore::new(Duration::minutes(5), clock.clone()));
        let tokens = Arc::new(TokenService::new(jwt_config(), clock.clone()));

        let service = Arc::new(SessionService::new(
            repo.clone(),
            tokens,
            correlations.clone(),
            oauth.clone(),
            oauth_config(),
            clock.clone(),
        ));

        Self {
            clock,
            repo,
            oauth,
            correlations,
            service,
        }
    }

    pub fn service(&self) -> &SessionService {
        &self.service
    }

    pub fn data(&self) -> web::Data<SessionService> {
        web::Data::from(Arc::clone(&self.service))
    }
}
