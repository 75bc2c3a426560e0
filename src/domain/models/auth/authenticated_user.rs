use std::future::{ready, Ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::domain::entities::users::user::{User, UserRole, UserStatus};
use crate::errors::AppError;

/// 베어러 게이트를 통과한 요청의 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID (토큰 subject)
    pub user_id: String,

    pub role: UserRole,

    pub status: UserStatus,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role,
            status: user.status,
        }
    }
}

/// ActixWeb FromRequest trait 구현
///
/// `AuthMiddleware`가 요청 extensions 에 넣어 둔 값을 꺼냅니다.
impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::Unauthorized)),
        }
    }
}
