use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// OAuth 인증 완료 후 프로바이더에서 받은 사용자 정보
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub provider_user_id: String,
    /// 프로바이더의 대표 닉네임 필드 (없으면 빈 문자열)
    pub nickname: String,
    /// 프로바이더가 확인한 이메일 (없으면 빈 문자열)
    pub email: String,
    pub avatar_url: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// 프로바이더 사용자 API 의 원본 응답
    pub raw: Map<String, Value>,
}

impl ProviderProfile {
    /// 원본 응답에서 비어 있지 않은 문자열 필드를 꺼냅니다.
    pub fn raw_str(&self, key: &str) -> Option<&str> {
        self.raw
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_str_skips_empty_and_non_string() {
        let mut profile = ProviderProfile::default();
        profile.raw.insert("login".to_string(), json!("octocat"));
        profile.raw.insert("twitter_username".to_string(), json!(""));
        profile.raw.insert("id".to_string(), json!(42));

        assert_eq!(profile.raw_str("login"), Some("octocat"));
        assert_eq!(profile.raw_str("twitter_username"), None);
        assert_eq!(profile.raw_str("id"), None);
        assert_eq!(profile.raw_str("missing"), None);
    }
}
