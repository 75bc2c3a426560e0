use serde::{Deserialize, Serialize};

use crate::domain::entities::users::user::User;

/// 사용자 공개 정보 응답 DTO
///
/// 토큰과 프로바이더 자격 증명은 포함하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfoResponse {
    pub id: String,
    pub nickname: String,
    pub img_url: String,
    pub accepted_terms: bool,
    pub status: i32,
}

impl From<User> for UserInfoResponse {
    fn from(user: User) -> Self {
        Self {
            status: user.status.code(),
            id: user.id,
            nickname: user.nickname,
            img_url: user.avatar_url,
            accepted_terms: user.terms_accepted,
        }
    }
}
