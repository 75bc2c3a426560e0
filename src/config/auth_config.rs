//! # Authentication Configuration Module
//!
//! OAuth 프로바이더, JWT 토큰, 인증 세션(state) 관련 설정을 관리하는 모듈입니다.
//!
//! 모든 설정은 기동 시 한 번 읽혀 구조체로 고정되며, 이후 서비스들은
//! 생성자를 통해 주입받습니다. 필수 값이 없거나 비어 있으면
//! [`AppError::ConfigError`]로 기동을 중단합니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ### JWT 토큰 설정
//! ```bash
//! export ACCESS_TOKEN_SECRET="access-secret"
//! export REFRESH_TOKEN_SECRET="refresh-secret"
//! export ACCESS_TOKEN_TTL_MINUTES="60"
//! export REFRESH_TOKEN_TTL_DAYS="7"
//! export TOKEN_LEEWAY_SECONDS="5"
//! ```
//!
//! ### OAuth 프로바이더 설정
//! ```bash
//! export AUTH_PROVIDERS="github,google"
//! export AUTH_GITHUB_KEY="github-client-id"
//! export AUTH_GITHUB_SECRET="github-client-secret"
//! export AUTH_GOOGLE_KEY="google-client-id"
//! export AUTH_GOOGLE_SECRET="google-client-secret"
//! export PUBLIC_BASE_URL="https://gateway.example.com"
//! export ALLOWED_FRONTEND_HOSTS="http://localhost:3000/,https://localhost:8443/"
//! ```
//!
//! ### 인증 세션 설정
//! ```bash
//! export SESSION_WINDOW_SECONDS="300"
//! export SESSION_SWEEP_SECONDS="300"
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// 라우트 접두사. 프로바이더 콜백 URL 생성에 사용합니다.
pub const API_PREFIX: &str = "/api/v1/guardian";

const DEFAULT_FRONTEND_HOSTS: &str = "http://localhost:3000/,https://localhost:8443/";

/// 필수 환경 변수를 읽습니다. 없거나 공백뿐이면 설정 오류입니다.
pub(crate) fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::ConfigError(format!("{} must be set", key))),
    }
}

/// 숫자형 선택 환경 변수를 읽습니다. 파싱 실패 시 경고 후 기본값을 사용합니다.
pub(crate) fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Display + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{} 파싱 실패: '{}'. 기본값 {} 사용", key, raw, default);
            default
        }),
    }
}

/// 범위가 정해진 정수형 선택 환경 변수를 읽습니다.
///
/// 파싱 실패는 [`parsed_or`]와 같이 기본값으로 대체하지만,
/// 범위를 벗어난 값은 설정 오류입니다.
pub(crate) fn bounded_or<F>(
    lookup: &F,
    key: &str,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
) -> Result<i64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parsed_or(lookup, key, default);
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(AppError::ConfigError(format!(
            "{} must be within {}..={}, got {}",
            key,
            range.start(),
            range.end(),
            value
        )))
    }
}

fn duration_or_error(value: Option<Duration>, key: &str) -> Result<Duration, AppError> {
    value.ok_or_else(|| AppError::ConfigError(format!("{} is out of range", key)))
}

/// 프론트엔드 주소를 `scheme://host[:port]/path/` 형태로 정규화합니다.
///
/// 경로는 항상 `/`로 끝나므로 `https://app.example.com`이
/// `https://app.example.com.evil.net`과 접두사로 겹치지 않습니다.
fn normalize_frontend_host(raw: &str) -> Result<String, AppError> {
    let invalid = || AppError::ConfigError(format!("ALLOWED_FRONTEND_HOSTS entry is invalid: {}", raw));

    let mut url = reqwest::Url::parse(raw).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid());
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url.to_string())
}

/// 지원하는 외부 인증 프로바이더
///
/// 닫힌 집합입니다. 알 수 없는 이름은 [`FromStr`]에서 설정 오류로 거부되므로
/// 요청 처리 중에 정규화 함수를 찾지 못하는 경우는 생기지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    GitHub,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::GitHub, Provider::Google];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GitHub => "github",
            Provider::Google => "google",
        }
    }

    /// 클라이언트 자격 증명 환경 변수 접두사
    fn env_key(&self) -> &'static str {
        match self {
            Provider::GitHub => "AUTH_GITHUB",
            Provider::Google => "AUTH_GOOGLE",
        }
    }
}

impl FromStr for Provider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "github" => Ok(Provider::GitHub),
            "google" => Ok(Provider::Google),
            _ => Err(AppError::ConfigError(format!("Unsupported auth provider: {}", s))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT 발급/검증 설정
///
/// 액세스 토큰과 리프레시 토큰은 서로 다른 시크릿으로 서명합니다.
#[derive(Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub leeway_seconds: u64,
}

impl JwtConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret = required(&lookup, "ACCESS_TOKEN_SECRET")?;
        let refresh_secret = required(&lookup, "REFRESH_TOKEN_SECRET")?;

        if access_secret == refresh_secret {
            return Err(AppError::ConfigError(
                "ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ".to_string(),
            ));
        }

        // 액세스 토큰 최대 1일, 리프레시 토큰 최대 1년
        let access_minutes = bounded_or(&lookup, "ACCESS_TOKEN_TTL_MINUTES", 60, 1..=24 * 60)?;
        let refresh_days = bounded_or(&lookup, "REFRESH_TOKEN_TTL_DAYS", 7, 1..=365)?;
        let leeway_seconds = bounded_or(&lookup, "TOKEN_LEEWAY_SECONDS", 5, 0..=300)?;

        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl: duration_or_error(
                Duration::try_minutes(access_minutes),
                "ACCESS_TOKEN_TTL_MINUTES",
            )?,
            refresh_ttl: duration_or_error(
                Duration::try_days(refresh_days),
                "REFRESH_TOKEN_TTL_DAYS",
            )?,
            leeway_seconds: leeway_seconds as u64,
        })
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

/// 프로바이더별 OAuth 클라이언트 자격 증명
#[derive(Clone)]
pub struct ProviderCredentials {
    pub provider: Provider,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("provider", &self.provider)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// OAuth 관련 설정
///
/// 활성화된 프로바이더 목록, 콜백 URL 생성을 위한 공개 주소,
/// 그리고 인증 완료 후 돌아갈 수 있는 프론트엔드 주소 목록을 담습니다.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub providers: Vec<ProviderCredentials>,
    pub public_base_url: String,
    pub allowed_frontend_hosts: Vec<String>,
}

impl OAuthConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let names = lookup("AUTH_PROVIDERS").unwrap_or_else(|| "github".to_string());

        let mut providers = Vec::new();
        for name in names.split(',').filter(|n| !n.trim().is_empty()) {
            let provider: Provider = name.parse()?;
            if providers.iter().any(|p: &ProviderCredentials| p.provider == provider) {
                continue;
            }
            providers.push(ProviderCredentials {
                provider,
                client_id: required(&lookup, &format!("{}_KEY", provider.env_key()))?,
                client_secret: required(&lookup, &format!("{}_SECRET", provider.env_key()))?,
            });
        }

        if providers.is_empty() {
            return Err(AppError::ConfigError("AUTH_PROVIDERS is empty".to_string()));
        }

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| "http://localhost:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let allowed_frontend_hosts = lookup("ALLOWED_FRONTEND_HOSTS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_HOSTS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(normalize_frontend_host)
            .collect::<Result<Vec<_>, _>>()?;

        if allowed_frontend_hosts.is_empty() {
            return Err(AppError::ConfigError("ALLOWED_FRONTEND_HOSTS is empty".to_string()));
        }

        Ok(Self {
            providers,
            public_base_url,
            allowed_frontend_hosts,
        })
    }

    pub fn credentials(&self, provider: Provider) -> Option<&ProviderCredentials> {
        self.providers.iter().find(|c| c.provider == provider)
    }

    pub fn is_enabled(&self, provider: Provider) -> bool {
        self.credentials(provider).is_some()
    }

    /// 프로바이더가 인증 후 호출할 콜백 URL
    pub fn callback_url(&self, provider: Provider) -> String {
        format!(
            "{}{}/auth/{}/callback",
            self.public_base_url,
            API_PREFIX,
            provider.as_str()
        )
    }

    /// 반환 주소가 허용된 프론트엔드 주소 아래에 있는지 확인합니다.
    ///
    /// scheme, host, port 가 정확히 같고 경로가 허용 경로로 시작해야 합니다.
    pub fn is_allowed_return_address(&self, address: &str) -> bool {
        let Ok(target) = reqwest::Url::parse(address) else {
            return false;
        };
        if !target.username().is_empty() || target.password().is_some() {
            return false;
        }

        self.allowed_frontend_hosts.iter().any(|host| {
            reqwest::Url::parse(host).is_ok_and(|allowed| {
                allowed.origin() == target.origin() && target.path().starts_with(allowed.path())
            })
        })
    }

    /// CORS 허용 Origin 목록
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        for url in self.allowed_frontend_hosts.iter().filter_map(|h| reqwest::Url::parse(h).ok()) {
            let origin = url.origin().ascii_serialization();
            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }
        origins
    }
}

/// 인증 세션(state) 설정
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// state 항목의 유효 시간
    pub window: Duration,
    /// 만료 항목 정리 주기
    pub sweep_interval: std::time::Duration,
}

impl SessionConfig {
    /// 두 값 모두 1초 이상 1일 이하입니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let window_seconds = bounded_or(&lookup, "SESSION_WINDOW_SECONDS", 300, 1..=86_400)?;
        let sweep_seconds = bounded_or(&lookup, "SESSION_SWEEP_SECONDS", 300, 1..=86_400)?;

        Ok(Self {
            window: duration_or_error(
                Duration::try_seconds(window_seconds),
                "SESSION_WINDOW_SECONDS",
            )?,
            sweep_interval: std::time::Duration::from_secs(sweep_seconds as u64),
        })
    }
}
