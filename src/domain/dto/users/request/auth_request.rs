//! 인증 요청관련 DTO
//!
//! 프로바이더 콜백과 사용자 조회 요청의 쿼리 파라미터를 매핑합니다.
use serde::Deserialize;
use validator::Validate;

/// OAuth 콜백 쿼리 파라미터 구조체
///
/// 사용자가 동의를 거부한 경우 `code` 없이 `error`만 전달됩니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub state: String,

    pub code: Option<String>,

    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// 사용자 정보 조회 쿼리
#[derive(Debug, Deserialize, Validate)]
pub struct UserInfoQuery {
    #[serde(rename = "userId", default)]
    #[validate(length(min = 1, message = "userId가 필요합니다"))]
    pub user_id: String,
}
