use serde::Deserialize;
use validator::Validate;

/// 약관 동의 및 프로필 등록 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "user_id가 필요합니다"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 64, message = "닉네임은 1~64자여야 합니다"))]
    pub nickname: String,

    #[serde(default)]
    pub avatar_url: String,

    pub terms_accepted: bool,
}
