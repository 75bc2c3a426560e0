//! # User HTTP Handlers
//!
//! 베어러 게이트 뒤에서 동작하는 사용자 엔드포인트입니다.
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `PUT` | `/register` | 약관 동의 및 프로필 등록, 새 토큰 쌍 발급 | 200 OK |
//! | `GET` | `/users?userId=` | 공개 사용자 정보 조회 | 200 OK |
//! | `POST` | `/logout` | 저장된 토큰 쌍 폐기 | 204 No Content |
//!
//! 모든 핸들러는 [`AuthenticatedUser`] 추출자를 통해 게이트를 통과한 사용자 정보를 받습니다.
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::domain::dto::users::request::{RegisterRequest, UserInfoQuery};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::sessions::SessionService;

/// 약관 동의 및 프로필 등록
///
/// `Pending` 사용자를 `Active`로 전환하고 새 상태가 반영된 토큰 쌍을 반환합니다.
pub async fn register(
    caller: AuthenticatedUser,
    payload: web::Json<RegisterRequest>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let pair = sessions.register(&caller, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(pair))
}

/// 사용자 정보 조회
pub async fn user_info(
    _caller: AuthenticatedUser,
    query: web::Query<UserInfoQuery>,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let info = sessions.user_info(&query.user_id).await?;
    Ok(HttpResponse::Ok().json(info))
}

/// 로그아웃
///
/// 저장된 쌍을 새로 발급한 쌍으로 덮어쓰고 버리므로,
/// 이전에 발급된 모든 사본이 더 이상 게이트와 갱신을 통과하지 못합니다.
pub async fn logout(
    caller: AuthenticatedUser,
    sessions: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    sessions.revoke(&caller.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
