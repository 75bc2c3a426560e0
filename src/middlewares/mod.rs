//! 미들웨어 모듈
//!
//! 요청 처리 파이프라인의 횡단 관심사를 처리합니다.
//!
//! # 제공 미들웨어
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 토큰 추출 및 검증
//! - 저장된 액세스 토큰과 대조
//! - 사용자 정보를 request extension에 저장
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! App::new()
//!     .app_data(session_service.clone())
//!     .service(
//!         web::resource("/users")
//!             .wrap(AuthMiddleware::required())
//!             .route(web::get().to(users::user_info))
//!     )
//! ```

use actix_web::HttpRequest;

pub mod auth_middleware;
mod auth_inner;

// 미들웨어 재export
pub use auth_middleware::AuthMiddleware;

/// 요청 추적용 헤더
pub const CORRELATION_HEADER: &str = "X-Correlation-Id";

/// 로그에 남길 요청 상관관계 ID. 헤더가 없으면 `-`
pub fn correlation_id(req: &HttpRequest) -> String {
    req.headers()
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("-")
        .to_string()
}
