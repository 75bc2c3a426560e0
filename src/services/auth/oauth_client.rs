//! # OAuth 2.0 클라이언트
//!
//! 프로바이더와의 Authorization Code 핸드셰이크를 담당하는 외부 협력자입니다.
//! 세션 오케스트레이터는 [`OAuthClient`] 트레이트에만 의존하며,
//! 운영에서는 `reqwest` 기반의 [`HttpOAuthClient`]를 주입합니다.
//!
//! ```text
//! 클라이언트            게이트웨이                     프로바이더
//!    │ GET /auth/github      │                              │
//!    ├──────────────────────►│ begin_auth(state)            │
//!    │ 307 authorize?state=..│                              │
//!    │◄──────────────────────┤                              │
//!    │ 로그인/동의 ──────────────────────────────────────────►│
//!    │ GET /auth/github/callback?code=..&state=..           │
//!    ├──────────────────────►│ complete_auth                │
//!    │                       ├── code → access_token ──────►│
//!    │                       ├── GET user profile ─────────►│
//!    │                       │◄─────────────────────────────┤
//! ```
//!
//! ## 사용하는 엔드포인트
//!
//! | 프로바이더 | 용도 | 엔드포인트 |
//! |------------|------|------------|
//! | GitHub | Authorization | `https://github.com/login/oauth/authorize` |
//! | GitHub | Token Exchange | `https://github.com/login/oauth/access_token` |
//! | GitHub | User Info | `https://api.github.com/user` |
//! | Google | Authorization | `https://accounts.google.com/o/oauth2/v2/auth` |
//! | Google | Token Exchange | `https://oauth2.googleapis.com/token` |
//! | Google | User Info | `https://www.googleapis.com/oauth2/v2/userinfo` |

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    config::{OAuthConfig, Provider, ProviderCredentials},
    domain::dto::users::request::CallbackQuery,
    domain::models::oauth::ProviderProfile,
    errors::{AppError, AppResult},
};

/// 프로바이더 핸드셰이크 협력자 계약
#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// `state`를 포함한 프로바이더 인증 페이지 URL 을 만듭니다.
    fn begin_auth(&self, provider: Provider, state: &str) -> AppResult<String>;

    /// 콜백 파라미터로 토큰을 교환하고 사용자 프로필을 가져옵니다.
    async fn complete_auth(
        &self,
        provider: Provider,
        query: &CallbackQuery,
    ) -> AppResult<ProviderProfile>;
}

struct ProviderEndpoints {
    authorize: &'static str,
    token: &'static str,
    user_info: &'static str,
    scope: &'static str,
}

fn endpoints(provider: Provider) -> ProviderEndpoints {
    match provider {
        Provider::GitHub => ProviderEndpoints {
            authorize: "https://github.com/login/oauth/authorize",
            token: "https://github.com/login/oauth/access_token",
            user_info: "https://api.github.com/user",
            scope: "read:user user:email",
        },
        Provider::Google => ProviderEndpoints {
            authorize: "https://accounts.google.com/o/oauth2/v2/auth",
            token: "https://oauth2.googleapis.com/token",
            user_info: "https://www.googleapis.com/oauth2/v2/userinfo",
            scope: "openid email profile",
        },
    }
}

/// 토큰 교환 응답
#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    error: Option<String>,
}

/// `reqwest` 기반 OAuth 클라이언트
pub struct HttpOAuthClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl HttpOAuthClient {
    pub fn new(config: OAuthConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("guardian_gateway/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::ConfigError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self { config, http })
    }

    fn credentials(&self, provider: Provider) -> AppResult<&ProviderCredentials> {
        self.config
            .credentials(provider)
            .ok_or_else(|| AppError::NotFound(format!("provider {}", provider)))
    }

    async fn exchange_code(
        &self,
        provider: Provider,
        code: &str,
    ) -> AppResult<TokenExchangeResponse> {
        let credentials = self.credentials(provider)?;
        let redirect_uri = self.config.callback_url(provider);

        let params = [
            ("code", code),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.http
            .post(endpoints(provider).token)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 토큰 요청 실패: {}", provider, e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 토큰 교환 실패: {}", provider, error_text
            )));
        }

        let exchanged = response
            .json::<TokenExchangeResponse>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 토큰 응답 파싱 실패: {}", provider, e)))?;

        if let Some(error) = &exchanged.error {
            return Err(AppError::ExternalServiceError(format!(
                "{} 토큰 교환 거부: {}", provider, error
            )));
        }

        Ok(exchanged)
    }

    async fn fetch_user(&self, provider: Provider, access_token: &str) -> AppResult<Map<String, Value>> {
        let response = self.http
            .get(endpoints(provider).user_info)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 사용자 정보 요청 실패: {}", provider, e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 사용자 정보 조회 실패: {}", provider, error_text
            )));
        }

        response
            .json::<Map<String, Value>>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 사용자 정보 파싱 실패: {}", provider, e)))
    }
}

/// 사용자 API 원본 응답에서 프로필을 구성합니다.
///
/// 프로바이더 사용자 ID 는 숫자(GitHub)나 문자열(Google) 모두 허용합니다.
pub fn profile_from_raw(
    provider: Provider,
    raw: Map<String, Value>,
    access_token: String,
    refresh_token: Option<String>,
) -> AppResult<ProviderProfile> {
    let provider_user_id = match raw.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => {
            return Err(AppError::ExternalServiceError(format!(
                "{} 사용자 ID 누락", provider
            )));
        }
    };

    let field = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let (nickname, avatar_url) = match provider {
        Provider::GitHub => (field("login"), field("avatar_url")),
        Provider::Google => (field("name"), field("picture")),
    };
    let email = field("email");

    Ok(ProviderProfile {
        provider_user_id,
        nickname,
        email,
        avatar_url,
        access_token,
        refresh_token: refresh_token.filter(|t| !t.is_empty()),
        raw,
    })
}

/// 인증 페이지 URL 을 조립합니다.
pub fn authorize_url(
    provider: Provider,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
) -> String {
    let endpoints = endpoints(provider);

    let mut params = vec![
        ("client_id", client_id),
        ("redirect_uri", redirect_uri),
        ("scope", endpoints.scope),
        ("state", state),
    ];
    if provider == Provider::Google {
        params.push(("response_type", "code"));
        params.push(("access_type", "offline"));
    }

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", endpoints.authorize, query_string)
}

#[async_trait]
impl OAuthClient for HttpOAuthClient {
    fn begin_auth(&self, provider: Provider, state: &str) -> AppResult<String> {
        let credentials = self.credentials(provider)?;
        Ok(authorize_url(
            provider,
            &credentials.client_id,
            &self.config.callback_url(provider),
            state,
        ))
    }

    async fn complete_auth(
        &self,
        provider: Provider,
        query: &CallbackQuery,
    ) -> AppResult<ProviderProfile> {
        if let Some(error) = &query.error {
            log::warn!("{} 인증 거부: {} {:?}", provider, error, query.error_description);
            return Err(AppError::Unauthorized);
        }

        let code = match query.code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => return Err(AppError::Unauthorized),
        };

        let exchanged = self.exchange_code(provider, code).await?;
        let access_token = exchanged.access_token.unwrap_or_default();
        if access_token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        let raw = self.fetch_user(provider, &access_token).await?;
        profile_from_raw(provider, raw, access_token, exchanged.refresh_token)
    }
}
