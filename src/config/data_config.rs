//! 데이터 및 서버 설정 관리 모듈
//!
//! 서버 바인딩, 사용자 저장소 종류, Rate Limiting 설정과
//! 이 모든 설정을 묶는 [`AppConfig`]를 제공합니다.

use std::env;

use crate::config::auth_config::{parsed_or, JwtConfig, OAuthConfig, SessionConfig};
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed_or(lookup, "PORT", 8080),
            workers: parsed_or(lookup, "SERVER_WORKERS", 4),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 사용자 저장소 종류
#[derive(Debug, Clone, PartialEq)]
pub enum UserStoreKind {
    Mongo { uri: String, database: String },
    Memory,
}

impl UserStoreKind {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("USER_STORE")
            .unwrap_or_else(|| "mongo".to_string())
            .to_lowercase()
            .as_str()
        {
            "mongo" | "mongodb" => Ok(UserStoreKind::Mongo {
                uri: lookup("MONGODB_URI")
                    .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
                database: lookup("DATABASE_NAME")
                    .unwrap_or_else(|| "guardian_dev".to_string()),
            }),
            "memory" => Ok(UserStoreKind::Memory),
            other => Err(AppError::ConfigError(format!("Unsupported USER_STORE: {}", other))),
        }
    }
}

/// Rate Limiting 설정
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            per_second: parsed_or(lookup, "RATE_LIMIT_PER_SECOND", 100u64).max(1),
            burst_size: parsed_or(lookup, "RATE_LIMIT_BURST_SIZE", 200u32).max(1),
        }
    }
}

/// 애플리케이션 전체 설정
///
/// 기동 시 한 번 생성되어 각 서비스 생성자에 나누어 전달됩니다.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: UserStoreKind,
    pub rate_limit: RateLimitConfig,
    pub jwt: JwtConfig,
    pub oauth: OAuthConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// 프로세스 환경 변수로부터 설정을 읽습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigError` - 필수 시크릿 누락, 알 수 없는 프로바이더 등
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            environment: Environment::from_name(
                &lookup("PROFILE").unwrap_or_else(|| "dev".to_string()),
            ),
            server: ServerConfig::from_lookup(&lookup),
            store: UserStoreKind::from_lookup(&lookup)?,
            rate_limit: RateLimitConfig::from_lookup(&lookup),
            jwt: JwtConfig::from_lookup(&lookup)?,
            oauth: OAuthConfig::from_lookup(&lookup)?,
            session: SessionConfig::from_lookup(&lookup)?,
        })
    }
}
