//! # 사용자 리포지토리
//!
//! 세션 오케스트레이터가 요구하는 읽기/쓰기 계약([`UserRepository`])과
//! MongoDB 구현체([`MongoUserRepository`])를 정의합니다.
//!
//! ## 특징
//!
//! - **자연 키 upsert**: `(provider, provider_user_id)` 유니크 인덱스 기준
//! - **신원 필드 보존**: 재로그인 시 닉네임/이메일 등은 덮어쓰지 않음
//! - **덮어쓰기 폐기**: 토큰 쌍 저장은 항상 이전 쌍을 대체
//! - 모든 쓰기는 `updated_at`을 갱신

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, to_bson, to_document, Bson, Document},
    options::{IndexOptions, UpdateOptions},
    Collection, IndexModel,
};

use crate::{
    config::Provider,
    core::Clock,
    db::Database,
    domain::entities::users::user::User,
    domain::models::token::TokenPair,
    errors::{AppError, AppResult},
};

const COLLECTION: &str = "users";

/// 사용자 저장소 계약
///
/// 모든 쓰기는 단일 레코드 단위로 원자적이어야 합니다.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 프로바이더 신원이 없으면 삽입하고, 있으면 프로바이더 토큰과 `updated_at`만 갱신합니다.
    async fn upsert_by_provider_id(&self, user: &User) -> AppResult<()>;

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// 저장된 토큰 쌍을 교체합니다. 사용자가 없으면 `NotFound`.
    async fn update_tokens(&self, user_id: &str, tokens: &TokenPair) -> AppResult<()>;

    /// 프로필 필드, 상태, 약관 동의, 토큰 쌍을 한 번에 기록합니다.
    async fn update_profile(&self, user: &User) -> AppResult<()>;
}

/// MongoDB 기반 사용자 저장소
pub struct MongoUserRepository {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
}

impl MongoUserRepository {
    pub fn new(db: Arc<Database>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    fn collection(&self) -> Collection<User> {
        self.db.get_database().collection::<User>(COLLECTION)
    }

    fn now_bson(&self) -> AppResult<Bson> {
        to_bson(&self.clock.now()).map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 유니크 인덱스를 생성합니다. 기동 시 한 번 호출합니다.
    pub async fn create_indexes(&self) -> AppResult<()> {
        let identity_index = IndexModel::builder()
            .keys(doc! { "provider": 1, "provider_user_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("provider_identity_unique".to_string())
                .build())
            .build();

        self.collection()
            .create_indexes([identity_index])
            .await?;

        Ok(())
    }

    /// 삽입 시에만 기록할 필드 (upsert 의 `$set` 대상은 제외)
    fn insert_only_fields(user: &User) -> AppResult<Document> {
        let mut document = to_document(user).map_err(|e| AppError::DatabaseError(e.to_string()))?;
        for key in ["provider_access_token", "provider_refresh_token", "updated_at"] {
            document.remove(key);
        }
        Ok(document)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn upsert_by_provider_id(&self, user: &User) -> AppResult<()> {
        let options = UpdateOptions::builder().upsert(true).build();

        let update = doc! {
            "$setOnInsert": Self::insert_only_fields(user)?,
            "$set": {
                "provider_access_token": user.provider_access_token.as_str(),
                "provider_refresh_token": user.provider_refresh_token.as_deref(),
                "updated_at": self.now_bson()?,
            },
        };

        self.collection()
            .update_one(
                doc! { "provider": user.provider.as_str(), "provider_user_id": user.provider_user_id.as_str() },
                update,
            )
            .with_options(options)
            .await?;

        Ok(())
    }

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> AppResult<Option<User>> {
        let user = self.collection()
            .find_one(doc! { "provider": provider.as_str(), "provider_user_id": provider_user_id })
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection()
            .find_one(doc! { "_id": id })
            .await?;

        Ok(user)
    }

    async fn update_tokens(&self, user_id: &str, tokens: &TokenPair) -> AppResult<()> {
        let result = self.collection()
            .update_one(
                doc! { "_id": user_id },
                doc! { "$set": {
                    "access_token": tokens.access_token.as_str(),
                    "refresh_token": tokens.refresh_token.as_str(),
                    "updated_at": self.now_bson()?,
                }},
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }

        Ok(())
    }

    async fn update_profile(&self, user: &User) -> AppResult<()> {
        let status = to_bson(&user.status).map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let result = self.collection()
            .update_one(
                doc! { "_id": user.id.as_str() },
                doc! { "$set": {
                    "nickname": user.nickname.as_str(),
                    "avatar_url": user.avatar_url.as_str(),
                    "terms_accepted": user.terms_accepted,
                    "status": status,
                    "access_token": user.access_token.as_deref(),
                    "refresh_token": user.refresh_token.as_deref(),
                    "updated_at": self.now_bson()?,
                }},
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("user {}", user.id)));
        }

        Ok(())
    }
}
