//! # 세션 오케스트레이터
//!
//! 상관관계 저장소, 신원 정규화, 사용자 저장소, 토큰 엔진을 조합하여
//! 사용자에게 노출되는 인증 흐름을 구현합니다.
//!
//! ## 콜백 완료 흐름
//!
//! ```text
//! AwaitingProviderResult → Normalizing → Upserting → Reissuing → Redirecting
//!          │                    │            │           │            │
//!          └──── 실패 시 Failed (401: 인증/세션, 500: 발급/저장) ──────┘
//! ```
//!
//! 1. `state`가 유효한지 먼저 확인합니다 (소비하지 않음). 모르는 값이면
//!    저장소를 건드리지 않고 401.
//! 2. 프로바이더 결과를 받아 정규화 후 `(provider, provider_user_id)` 기준 upsert.
//! 3. 저장된 정규 레코드를 다시 읽고 새 토큰 쌍을 발급/저장 (이전 쌍 폐기).
//! 4. 토큰이 저장된 뒤에 `state`를 소비합니다. 그 사이 사라졌다면 401.
//! 5. 반환 주소에 토큰 쌍을 붙여 리다이렉트합니다.
//!
//! ## 갱신 흐름
//!
//! 리프레시 토큰 검증 → subject 로 사용자 조회 → 저장된 리프레시 토큰 일치 →
//! 저장된 액세스 토큰 일치 → 새 쌍 발급/저장. 저장 실패 시 이전 쌍이 그대로 유효합니다.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{OAuthConfig, Provider},
    core::Clock,
    domain::dto::users::request::{CallbackQuery, RegisterRequest},
    domain::dto::users::response::UserInfoResponse,
    domain::entities::users::user::{User, UserStatus},
    domain::models::auth::AuthenticatedUser,
    domain::models::token::{TokenKind, TokenPair},
    errors::{AppError, AppResult},
    repositories::users::UserRepository,
    services::auth::{identity_normalizer, OAuthClient, TokenService},
    services::sessions::CorrelationStore,
};

pub struct SessionService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    correlations: Arc<CorrelationStore>,
    oauth: Arc<dyn OAuthClient>,
    oauth_config: OAuthConfig,
    clock: Arc<dyn Clock>,
}

/// 반환 주소에 토큰 쌍을 쿼리 파라미터로 붙입니다.
///
/// `#fragment`가 있으면 쿼리는 fragment 앞에 들어갑니다.
pub fn redirect_with_tokens(return_address: &str, tokens: &TokenPair) -> String {
    let (base, fragment) = match return_address.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (return_address, None),
    };
    let separator = if base.contains('?') { '&' } else { '?' };

    let mut location = format!(
        "{}{}access_token={}&refresh_token={}",
        base,
        separator,
        urlencoding::encode(&tokens.access_token),
        urlencoding::encode(&tokens.refresh_token),
    );
    if let Some(fragment) = fragment {
        location.push('#');
        location.push_str(fragment);
    }
    location
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        correlations: Arc<CorrelationStore>,
        oauth: Arc<dyn OAuthClient>,
        oauth_config: OAuthConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            correlations,
            oauth,
            oauth_config,
            clock,
        }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    fn ensure_enabled(&self, provider: Provider) -> AppResult<()> {
        if self.oauth_config.is_enabled(provider) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("provider {}", provider)))
        }
    }

    /// 새 토큰 쌍을 발급하고 저장하여 이전 쌍을 무효화합니다.
    async fn rotate(&self, user: &User) -> AppResult<TokenPair> {
        let pair = self.tokens.issue(user)?;

        self.users
            .update_tokens(&user.id, &pair)
            .await
            .map_err(|e| AppError::TokenUpdateFailure(e.to_string()))?;

        Ok(pair)
    }

    /// 인증 흐름을 시작하고 프로바이더 인증 페이지 URL 을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 비활성 프로바이더
    /// * `AppError::ValidationError` - 반환 주소 누락 또는 허용되지 않은 주소
    pub fn begin_auth(&self, provider: Provider, return_address: Option<&str>) -> AppResult<String> {
        self.ensure_enabled(provider)?;

        let return_address = match return_address {
            Some(address) if self.oauth_config.is_allowed_return_address(address) => address,
            Some(address) => {
                log::warn!("허용되지 않은 반환 주소: {}", address);
                return Err(AppError::ValidationError("return address is not allowed".to_string()));
            }
            None => {
                return Err(AppError::ValidationError("return address is required".to_string()));
            }
        };

        let state = self.correlations.begin(return_address);

        match self.oauth.begin_auth(provider, &state) {
            Ok(url) => Ok(url),
            Err(e) => {
                self.correlations.consume(&state);
                Err(e)
            }
        }
    }

    /// 프로바이더 콜백을 완료하고 토큰 쌍이 포함된 리다이렉트 URL 을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::Unauthorized` - 알 수 없거나 만료된 `state`, 프로바이더 인증 실패
    /// * `AppError::SigningFailure` / `AppError::TokenUpdateFailure` - 발급/저장 실패
    pub async fn complete_callback(
        &self,
        provider: Provider,
        query: &CallbackQuery,
    ) -> AppResult<String> {
        self.ensure_enabled(provider)?;

        if !self.correlations.is_pending(&query.state) {
            log::warn!("{} 콜백: 알 수 없거나 만료된 state", provider);
            return Err(AppError::Unauthorized);
        }

        let profile = self
            .oauth
            .complete_auth(provider, query)
            .await
            .map_err(|e| {
                log::warn!("{} 프로바이더 인증 실패: {}", provider, e);
                AppError::Unauthorized
            })?;

        if profile.access_token.is_empty() {
            log::warn!("{} 프로바이더 액세스 토큰 없음", provider);
            return Err(AppError::Unauthorized);
        }

        let candidate = identity_normalizer::normalize(provider, &profile, self.clock.now());
        self.users.upsert_by_provider_id(&candidate).await?;

        let user = self
            .users
            .find_by_provider_id(provider, &profile.provider_user_id)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(format!(
                    "upserted user {}:{} not found",
                    provider, profile.provider_user_id
                ))
            })?;

        let pair = self.rotate(&user).await?;

        let return_address = self.correlations.consume(&query.state).ok_or_else(|| {
            log::warn!("{} 콜백: 처리 중 state 만료", provider);
            AppError::Unauthorized
        })?;

        log::info!("{} 로그인 완료: 사용자 {}", provider, user.id);
        Ok(redirect_with_tokens(&return_address, &pair))
    }

    /// 토큰 쌍을 갱신합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidRefreshToken` - 리프레시 토큰 검증 실패, subject 형식 오류
    /// * `AppError::UserNotFound` - subject 에 해당하는 사용자 없음
    /// * `AppError::RefreshTokenMismatch` / `AppError::AccessTokenMismatch` - 저장된 쌍과 다름
    /// * `AppError::TokenUpdateFailure` - 저장 실패 (이전 쌍 유지)
    pub async fn refresh(&self, access_token: &str, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self
            .tokens
            .validate(refresh_token, TokenKind::Refresh)
            .map_err(|_| AppError::InvalidRefreshToken)?;

        if Uuid::parse_str(&claims.sub).is_err() {
            return Err(AppError::InvalidRefreshToken);
        }

        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !user.holds_refresh_token(refresh_token) {
            log::warn!("리프레시 토큰 불일치: 사용자 {}", user.id);
            return Err(AppError::RefreshTokenMismatch);
        }

        if !user.holds_access_token(access_token) {
            log::warn!("액세스 토큰 불일치: 사용자 {}", user.id);
            return Err(AppError::AccessTokenMismatch);
        }

        let pair = self.rotate(&user).await?;
        log::debug!("토큰 갱신: 사용자 {}", user.id);
        Ok(pair)
    }

    /// 약관 동의 및 프로필 등록. 사용자를 `Active`로 전환하고 새 토큰 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 약관 미동의 또는 입력값 오류
    /// * `AppError::Unauthorized` - 요청한 사용자와 베어러 주체가 다르거나 정지/비활성 사용자
    /// * `AppError::UserNotFound` - 사용자 없음
    pub async fn register(
        &self,
        caller: &AuthenticatedUser,
        request: RegisterRequest,
    ) -> AppResult<TokenPair> {
        if !request.terms_accepted {
            return Err(AppError::ValidationError("terms must be accepted".to_string()));
        }
        request.validate()?;

        if request.user_id != caller.user_id {
            log::warn!("등록 주체 불일치: bearer {} / 요청 {}", caller.user_id, request.user_id);
            return Err(AppError::Unauthorized);
        }

        let mut user = self
            .users
            .find_by_id(&request.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if matches!(user.status, UserStatus::Inactive | UserStatus::Suspended) {
            log::warn!("{:?} 상태 사용자의 등록 시도: {}", user.status, user.id);
            return Err(AppError::Unauthorized);
        }

        user.nickname = request.nickname;
        user.avatar_url = request.avatar_url;
        user.terms_accepted = true;
        user.status = UserStatus::Active;

        let pair = self.tokens.issue(&user)?;
        user.access_token = Some(pair.access_token.clone());
        user.refresh_token = Some(pair.refresh_token.clone());

        self.users
            .update_profile(&user)
            .await
            .map_err(|e| AppError::TokenUpdateFailure(e.to_string()))?;

        log::info!("사용자 등록 완료: {}", user.id);
        Ok(pair)
    }

    /// 저장된 토큰 쌍을 새 쌍으로 덮어쓰고 버립니다 (로그아웃).
    pub async fn revoke(&self, user_id: &str) -> AppResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.rotate(&user).await?;
        log::info!("토큰 폐기: 사용자 {}", user_id);
        Ok(())
    }

    /// 베어러 액세스 토큰을 검증하고 저장된 토큰과 일치하는 사용자를 반환합니다.
    pub async fn authenticate_bearer(&self, token: &str) -> AppResult<User> {
        let claims = self
            .tokens
            .validate(token, TokenKind::Access)
            .map_err(|_| AppError::Unauthorized)?;

        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.holds_access_token(token) {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    pub async fn user_info(&self, user_id: &str) -> AppResult<UserInfoResponse> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserInfoResponse::from)
            .ok_or(AppError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sessions::testing::{github_profile, Fixture};
    use chrono::Duration;

    const RETURN: &str = "http://localhost:3000/home";

    fn callback(state: &str, code: &str) -> CallbackQuery {
        CallbackQuery {
            state: state.to_string(),
            code: Some(code.to_string()),
            ..Default::default()
        }
    }

    fn tokens_from(redirect: &str) -> TokenPair {
        let query = redirect.split_once('?').map(|(_, q)| q).unwrap_or_default();
        let mut access = String::new();
        let mut refresh = String::new();
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("access_token", v)) => access = v.to_string(),
                Some(("refresh_token", v)) => refresh = v.to_string(),
                _ => {}
            }
        }
        TokenPair { access_token: access, refresh_token: refresh }
    }

    /// 로그인을 끝까지 진행하고 (사용자, 토큰 쌍)을 반환
    async fn login(fixture: &Fixture, code: &str) -> (User, TokenPair) {
        let service = fixture.service();
        let url = service.begin_auth(Provider::GitHub, Some(RETURN)).unwrap();
        let state = url.rsplit_once("state=").unwrap().1.to_string();

        let redirect = service
            .complete_callback(Provider::GitHub, &callback(&state, code))
            .await
            .unwrap();
        let pair = tokens_from(&redirect);
        let claims = service.token_service().validate(&pair.access_token, TokenKind::Access).unwrap();
        let user = fixture.repo.find_by_id(&claims.sub).await.unwrap().unwrap();
        (user, pair)
    }

    #[test]
    fn test_redirect_with_tokens() {
        let pair = TokenPair { access_token: "a.b.c".into(), refresh_token: "d.e.f".into() };

        assert_eq!(
            redirect_with_tokens("https://app/x", &pair),
            "https://app/x?access_token=a.b.c&refresh_token=d.e.f"
        );
        assert_eq!(
            redirect_with_tokens("https://app/x?tab=1", &pair),
            "https://app/x?tab=1&access_token=a.b.c&refresh_token=d.e.f"
        );
    }

    #[test]
    fn test_redirect_keeps_fragment_last() {
        let pair = TokenPair { access_token: "a.b.c".into(), refresh_token: "d.e.f".into() };

        assert_eq!(
            redirect_with_tokens("https://app/#/home", &pair),
            "https://app/?access_token=a.b.c&refresh_token=d.e.f#/home"
        );
        assert_eq!(
            redirect_with_tokens("https://app/x?tab=1#/home?mode=dark", &pair),
            "https://app/x?tab=1&access_token=a.b.c&refresh_token=d.e.f#/home?mode=dark"
        );
    }

    #[actix_web::test]
    async fn test_begin_auth_rejects_look_alike_host() {
        let fixture = Fixture::new();

        for address in ["https://app.evil.net/steal", "https://app@evil.net/", "http://app/"] {
            assert!(
                matches!(
                    fixture.service().begin_auth(Provider::GitHub, Some(address)),
                    Err(AppError::ValidationError(_))
                ),
                "{} should be rejected",
                address
            );
        }
        assert!(fixture.correlations.is_empty());
    }

    #[actix_web::test]
    async fn test_begin_auth_rejects_foreign_return_address() {
        let fixture = Fixture::new();
        let service = fixture.service();

        assert!(matches!(
            service.begin_auth(Provider::GitHub, Some("https://evil.example.com/")),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.begin_auth(Provider::GitHub, None),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            service.begin_auth(Provider::Google, Some(RETURN)),
            Err(AppError::NotFound(_))
        ));
        assert!(fixture.correlations.is_empty());
    }

    #[actix_web::test]
    async fn test_callback_redirects_with_valid_pair() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));

        let (user, pair) = login(&fixture, "code-1").await;

        assert!(user.holds_access_token(&pair.access_token));
        assert!(user.holds_refresh_token(&pair.refresh_token));
        assert_eq!(user.status, UserStatus::Pending);
        assert_eq!(user.nickname, "octocat");
        assert!(fixture.correlations.is_empty());

        let refresh = fixture.service()
            .token_service()
            .validate(&pair.refresh_token, TokenKind::Refresh)
            .unwrap();
        assert_eq!(refresh.sub, user.id);
    }

    #[actix_web::test]
    async fn test_unknown_state_skips_upsert() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));

        let result = fixture
            .service()
            .complete_callback(Provider::GitHub, &callback("deadbeef", "code-1"))
            .await;

        assert_eq!(result.unwrap_err(), AppError::Unauthorized);
        assert!(fixture.repo.is_empty());
        assert_eq!(fixture.oauth.calls(), 0);
    }

    #[actix_web::test]
    async fn test_expired_state_is_unauthorized() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let url = fixture.service().begin_auth(Provider::GitHub, Some(RETURN)).unwrap();
        let state = url.rsplit_once("state=").unwrap().1.to_string();

        fixture.clock.advance(Duration::minutes(6));
        let result = fixture
            .service()
            .complete_callback(Provider::GitHub, &callback(&state, "code-1"))
            .await;

        assert_eq!(result.unwrap_err(), AppError::Unauthorized);
        assert!(fixture.repo.is_empty());
    }

    #[actix_web::test]
    async fn test_provider_failure_is_unauthorized() {
        let fixture = Fixture::new();
        let url = fixture.service().begin_auth(Provider::GitHub, Some(RETURN)).unwrap();
        let state = url.rsplit_once("state=").unwrap().1.to_string();

        // 스크립트에 없는 code
        let result = fixture
            .service()
            .complete_callback(Provider::GitHub, &callback(&state, "unknown"))
            .await;
        assert_eq!(result.unwrap_err(), AppError::Unauthorized);

        // 빈 프로바이더 토큰
        let mut profile = github_profile("1", "empty");
        profile.access_token.clear();
        fixture.oauth.script("empty", profile);
        let result = fixture
            .service()
            .complete_callback(Provider::GitHub, &callback(&state, "empty"))
            .await;
        assert_eq!(result.unwrap_err(), AppError::Unauthorized);
        assert!(fixture.repo.is_empty());
    }

    #[actix_web::test]
    async fn test_repeat_login_is_idempotent_upsert() {
        let fixture = Fixture::new();
        fixture.oauth.script("first", github_profile("583231", "octocat"));
        let mut renamed = github_profile("583231", "renamed");
        renamed.email = "new@example.com".to_string();
        renamed.access_token = "gho_second".to_string();
        fixture.oauth.script("second", renamed);

        let (first, first_pair) = login(&fixture, "first").await;
        fixture.clock.advance(Duration::seconds(10));
        let (second, second_pair) = login(&fixture, "second").await;

        assert_eq!(fixture.repo.len(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(second.nickname, first.nickname);
        assert_eq!(second.email, first.email);
        assert_eq!(second.provider_access_token, "gho_second");
        assert!(second.updated_at > first.updated_at);

        // 두 번째 로그인이 첫 번째 쌍을 폐기
        assert!(!second.holds_access_token(&first_pair.access_token));
        assert!(second.holds_access_token(&second_pair.access_token));
    }

    #[actix_web::test]
    async fn test_state_survives_failed_persistence() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let url = fixture.service().begin_auth(Provider::GitHub, Some(RETURN)).unwrap();
        let state = url.rsplit_once("state=").unwrap().1.to_string();

        fixture.repo.fail_token_updates(true);
        let result = fixture
            .service()
            .complete_callback(Provider::GitHub, &callback(&state, "code-1"))
            .await;
        assert!(matches!(result, Err(AppError::TokenUpdateFailure(_))));
        assert!(fixture.correlations.is_pending(&state));

        fixture.repo.fail_token_updates(false);
        assert!(fixture
            .service()
            .complete_callback(Provider::GitHub, &callback(&state, "code-1"))
            .await
            .is_ok());
    }

    #[actix_web::test]
    async fn test_refresh_rotates_pair() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let (user, pair) = login(&fixture, "code-1").await;

        let rotated = fixture
            .service()
            .refresh(&pair.access_token, &pair.refresh_token)
            .await
            .unwrap();
        assert_ne!(rotated, pair);

        let stored = fixture.repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(stored.holds_refresh_token(&rotated.refresh_token));

        // 이전 쌍은 더 이상 사용할 수 없음
        assert_eq!(
            fixture.service().refresh(&pair.access_token, &pair.refresh_token).await,
            Err(AppError::RefreshTokenMismatch)
        );
    }

    #[actix_web::test]
    async fn test_refresh_mismatch_does_not_rotate() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let (user, pair) = login(&fixture, "code-1").await;

        // 같은 사용자에게 서명은 유효하지만 저장되지 않은 리프레시 토큰
        let stranger = fixture.service().token_service().issue(&user).unwrap();
        assert_eq!(
            fixture.service().refresh(&pair.access_token, &stranger.refresh_token).await,
            Err(AppError::RefreshTokenMismatch)
        );

        assert_eq!(
            fixture.service().refresh(&stranger.access_token, &pair.refresh_token).await,
            Err(AppError::AccessTokenMismatch)
        );

        let stored = fixture.repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(stored.holds_access_token(&pair.access_token));
        assert!(stored.holds_refresh_token(&pair.refresh_token));
    }

    #[actix_web::test]
    async fn test_refresh_rejects_invalid_tokens() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let (user, pair) = login(&fixture, "code-1").await;

        // 액세스 토큰을 리프레시 자리에
        assert_eq!(
            fixture.service().refresh(&pair.access_token, &pair.access_token).await,
            Err(AppError::InvalidRefreshToken)
        );
        assert_eq!(
            fixture.service().refresh(&pair.access_token, "garbage").await,
            Err(AppError::InvalidRefreshToken)
        );

        // 서명은 유효하지만 존재하지 않는 사용자
        let mut ghost = user.clone();
        ghost.id = Uuid::new_v4().to_string();
        let ghost_pair = fixture.service().token_service().issue(&ghost).unwrap();
        assert_eq!(
            fixture.service().refresh(&ghost_pair.access_token, &ghost_pair.refresh_token).await,
            Err(AppError::UserNotFound)
        );

        // 만료된 액세스 토큰이라도 저장된 값과 같으면 갱신 가능
        fixture.clock.advance(Duration::hours(2));
        assert!(fixture.service().refresh(&pair.access_token, &pair.refresh_token).await.is_ok());
    }

    #[actix_web::test]
    async fn test_refresh_persistence_failure_keeps_old_pair() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let (_, pair) = login(&fixture, "code-1").await;

        fixture.repo.fail_token_updates(true);
        assert!(matches!(
            fixture.service().refresh(&pair.access_token, &pair.refresh_token).await,
            Err(AppError::TokenUpdateFailure(_))
        ));

        fixture.repo.fail_token_updates(false);
        assert!(fixture.service().refresh(&pair.access_token, &pair.refresh_token).await.is_ok());
    }

    fn register_request(user_id: &str, terms_accepted: bool) -> RegisterRequest {
        RegisterRequest {
            user_id: user_id.to_string(),
            nickname: "새닉네임".to_string(),
            avatar_url: "https://cdn/avatar.png".to_string(),
            terms_accepted,
        }
    }

    #[actix_web::test]
    async fn test_register_activates_user() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let (user, pair) = login(&fixture, "code-1").await;
        let caller = AuthenticatedUser::from(&user);

        let fresh = fixture
            .service()
            .register(&caller, register_request(&user.id, true))
            .await
            .unwrap();

        let stored = fixture.repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.status, UserStatus::Active);
        assert!(stored.terms_accepted);
        assert_eq!(stored.nickname, "새닉네임");
        assert_eq!(stored.avatar_url, "https://cdn/avatar.png");
        assert!(stored.holds_access_token(&fresh.access_token));
        assert!(!stored.holds_access_token(&pair.access_token));

        let claims = fixture.service()
            .token_service()
            .validate(&fresh.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(claims.status, Some(UserStatus::Active.code()));
    }

    #[actix_web::test]
    async fn test_register_without_terms_keeps_pending() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let (user, pair) = login(&fixture, "code-1").await;
        let caller = AuthenticatedUser::from(&user);

        let result = fixture
            .service()
            .register(&caller, register_request(&user.id, false))
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));

        let stored = fixture.repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.status, UserStatus::Pending);
        assert!(stored.holds_access_token(&pair.access_token));
    }

    #[actix_web::test]
    async fn test_register_for_another_user_is_unauthorized() {
        let fixture = Fixture::new();
        fixture.oauth.script("a", github_profile("1", "alice"));
        fixture.oauth.script("b", github_profile("2", "bob"));
        let (alice, _) = login(&fixture, "a").await;
        let (bob, _) = login(&fixture, "b").await;

        let result = fixture
            .service()
            .register(&AuthenticatedUser::from(&alice), register_request(&bob.id, true))
            .await;
        assert_eq!(result.unwrap_err(), AppError::Unauthorized);
    }

    #[actix_web::test]
    async fn test_revoke_invalidates_bearer() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let (user, pair) = login(&fixture, "code-1").await;

        assert!(fixture.service().authenticate_bearer(&pair.access_token).await.is_ok());
        fixture.service().revoke(&user.id).await.unwrap();

        assert_eq!(
            fixture.service().authenticate_bearer(&pair.access_token).await.unwrap_err(),
            AppError::Unauthorized
        );
        assert_eq!(
            fixture.service().refresh(&pair.access_token, &pair.refresh_token).await,
            Err(AppError::RefreshTokenMismatch)
        );
    }

    #[actix_web::test]
    async fn test_bearer_rejects_refresh_token_and_unknown_user() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let (user, pair) = login(&fixture, "code-1").await;

        assert_eq!(
            fixture.service().authenticate_bearer(&pair.refresh_token).await.unwrap_err(),
            AppError::Unauthorized
        );

        let mut ghost = user.clone();
        ghost.id = Uuid::new_v4().to_string();
        let ghost_pair = fixture.service().token_service().issue(&ghost).unwrap();
        assert_eq!(
            fixture.service().authenticate_bearer(&ghost_pair.access_token).await.unwrap_err(),
            AppError::Unauthorized
        );
    }

    #[actix_web::test]
    async fn test_user_info() {
        let fixture = Fixture::new();
        fixture.oauth.script("code-1", github_profile("583231", "octocat"));
        let (user, _) = login(&fixture, "code-1").await;

        let info = fixture.service().user_info(&user.id).await.unwrap();
        assert_eq!(info.id, user.id);
        assert_eq!(info.nickname, "octocat");
        assert!(!info.accepted_terms);
        assert_eq!(info.status, UserStatus::Pending.code());

        assert_eq!(
            fixture.service().user_info("missing").await.unwrap_err(),
            AppError::UserNotFound
        );
    }
}
