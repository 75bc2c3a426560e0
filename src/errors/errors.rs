//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 게이트웨이의 모든 계층이 공유하는 에러 타입입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 도메인 에러를
//! HTTP 응답으로 일관되게 변환합니다.
//!
//! ## 인증 실패 응답
//!
//! 토큰 검증, 토큰 불일치, 사용자 없음, 세션 만료 등 인증 계열 실패는
//! 모두 동일한 `401` 본문(`{"error": "unauthorized"}`)으로 응답합니다.
//! 어떤 검사에서 실패했는지는 로그에만 남습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn load(repo: &dyn UserRepository, id: &str) -> AppResult<User> {
//!     repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// 프로바이더 인증 실패, 세션(state) 만료/위조, 베어러 토큰 불일치 (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// 서명, 만료, 알고리즘, 클레임 구조, 토큰 종류 검증 실패 (401)
    #[error("Invalid token")]
    InvalidToken,

    /// 리프레시 토큰 검증 실패 또는 subject 누락 (401)
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// 제시된 리프레시 토큰이 저장된 토큰과 다름 (401)
    #[error("Refresh token mismatch")]
    RefreshTokenMismatch,

    /// 제시된 액세스 토큰이 저장된 토큰과 다름 (401)
    #[error("Access token mismatch")]
    AccessTokenMismatch,

    /// 토큰 subject 가 사용자로 해석되지 않음 (401)
    #[error("User not found")]
    UserNotFound,

    /// 시크릿 누락 또는 서명 실패 (500)
    #[error("Token signing failure: {0}")]
    SigningFailure(String),

    /// 토큰 교체 중 저장 실패 (500)
    #[error("Token update failure: {0}")]
    TokenUpdateFailure(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 외부 서비스 에러 (500 Internal Server Error)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 설정 오류. 기동 시점에만 발생하며 프로세스를 종료시킵니다.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 인증 계열 에러 여부
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AppError::Unauthorized
                | AppError::InvalidToken
                | AppError::InvalidRefreshToken
                | AppError::RefreshTokenMismatch
                | AppError::AccessTokenMismatch
                | AppError::UserNotFound
        )
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            _ if self.is_auth_failure() => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 400/404 는 메시지를 그대로 전달하고, 401/500 은 고정 문구만 내려보냅니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();

        let message = match self {
            _ if self.is_auth_failure() => "unauthorized".to_string(),
            AppError::ValidationError(_) | AppError::NotFound(_) => self.to_string(),
            _ => {
                log::error!("서버 에러: {}", self);
                "internal_server_error".to_string()
            }
        };

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "error": message
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::ValidationError(e.to_string())
    }
}
