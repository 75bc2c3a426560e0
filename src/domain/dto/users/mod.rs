//! # User Data Transfer Objects Module
//!
//! 사용자 관련 API의 요청/응답 데이터 구조를 정의합니다.
//!
//! ```text
//! users/
//! ├── request/
//! │   ├── auth_request.rs        # 콜백 쿼리, 사용자 조회 쿼리
//! │   └── register_request.rs    # 약관 동의 및 프로필 등록
//! └── response/
//!     └── user_response.rs       # 공개 사용자 정보
//! ```
//!
//! ## JSON 응답 예제 (`GET /api/v1/guardian/users?userId=...`)
//!
//! ```json
//! {
//!   "id": "1f0c4c1e-6a38-4b7b-9d8e-0b5b3f8f2a11",
//!   "nickname": "octocat",
//!   "img_url": "https://avatars.githubusercontent.com/u/583231",
//!   "accepted_terms": true,
//!   "status": 1
//! }
//! ```

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
