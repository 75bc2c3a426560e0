use serde::Deserialize;
use validator::Validate;

/// 토큰 갱신 요청 DTO
///
/// 만료된 액세스 토큰도 함께 보내야 합니다. 저장된 쌍과 둘 다 일치해야 갱신됩니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "액세스 토큰이 필요합니다"))]
    pub access_token: String,

    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}
