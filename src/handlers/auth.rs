//! Authentication HTTP Handlers
//!
//! 프로바이더 로그인 시작, 콜백 완료, 토큰 갱신을 처리하는 핸들러 함수들입니다.
//!
//! # Endpoints
//!
//! - **로그인 시작**: `GET /auth/{provider}` (307 → 프로바이더)
//! - **콜백**: `GET /auth/{provider}/callback` (302 → 프론트엔드, 토큰 쌍 포함)
//! - **토큰 갱신**: `PUT /auth/refresh`
use actix_web::{get, put, web, HttpRequest, HttpResponse};
use actix_web::http::header;
use validator::Validate;

use crate::config::Provider;
use crate::domain::dto::tokens::RefreshRequest;
use crate::domain::dto::users::request::CallbackQuery;
use crate::errors::errors::AppError;
use crate::middlewares::correlation_id;
use crate::services::sessions::SessionService;

/// 경로의 프로바이더 이름을 해석합니다. 모르는 이름은 404
fn provider_from_path(name: &str) -> Result<Provider, AppError> {
    name.parse()
        .map_err(|_| AppError::NotFound(format!("provider {}", name)))
}

/// 프로바이더 로그인 시작 핸들러
///
/// `Referer` 헤더를 반환 주소로 기록하고 프로바이더 인증 페이지로 보냅니다.
///
/// # Endpoint
/// `GET /auth/{provider}`
#[get("/auth/{provider}")]
pub async fn begin_login(
    req: HttpRequest,
    provider: web::Path<String>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let provider = provider_from_path(&provider)?;

    let referer = req
        .headers()
        .get(header::REFERER)
        .and_then(|h| h.to_str().ok());

    let location = sessions.begin_auth(provider, referer)?;

    log::debug!("[{}] {} 로그인 시작", correlation_id(&req), provider);
    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, location))
        .finish())
}

/// 프로바이더 콜백 처리 핸들러
///
/// 성공하면 인증을 시작했던 프론트엔드 주소로 토큰 쌍과 함께 리다이렉트합니다.
///
/// # Endpoint
/// `GET /auth/{provider}/callback?code={code}&state={state}`
#[get("/auth/{provider}/callback")]
pub async fn oauth_callback(
    req: HttpRequest,
    provider: web::Path<String>,
    query: web::Query<CallbackQuery>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let correlation = correlation_id(&req);
    let provider = provider_from_path(&provider)?;

    let location = sessions
        .complete_callback(provider, &query)
        .await
        .inspect_err(|e| log::warn!("[{}] {} 콜백 실패: {}", correlation, provider, e))?;

    log::info!("[{}] {} 콜백 완료", correlation, provider);
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}

/// 토큰 갱신 핸들러
///
/// 저장된 쌍과 일치하는 액세스/리프레시 토큰을 받아 새 쌍을 발급합니다.
/// 이전 쌍은 즉시 무효화됩니다.
///
/// # Endpoint
/// `PUT /auth/refresh`
#[put("/auth/refresh")]
pub async fn refresh_tokens(
    payload: web::Json<RefreshRequest>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let pair = sessions
        .refresh(&payload.access_token, &payload.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(pair))
}
