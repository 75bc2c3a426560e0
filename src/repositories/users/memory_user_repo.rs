//! 프로세스 메모리 기반 사용자 저장소
//!
//! `USER_STORE=memory` 로 기동하거나 테스트에서 사용합니다.
//! 재시작하면 모든 사용자가 사라집니다.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::{
    config::Provider,
    core::Clock,
    domain::entities::users::user::User,
    domain::models::token::TokenPair,
    errors::{AppError, AppResult},
    repositories::users::user_repo::UserRepository,
};

pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn users(&self) -> MutexGuard<'_, HashMap<String, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.users().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users().is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn upsert_by_provider_id(&self, user: &User) -> AppResult<()> {
        let now = self.clock.now();
        let mut users = self.users();

        let existing = users.values_mut().find(|u| {
            u.provider == user.provider && u.provider_user_id == user.provider_user_id
        });

        match existing {
            Some(stored) => {
                stored.provider_access_token = user.provider_access_token.clone();
                stored.provider_refresh_token = user.provider_refresh_token.clone();
                stored.updated_at = now;
            }
            None => {
                let mut inserted = user.clone();
                inserted.updated_at = now;
                users.insert(inserted.id.clone(), inserted);
            }
        }

        Ok(())
    }

    async fn find_by_provider_id(
        &self,
        provider: Provider,
        provider_user_id: &str,
    ) -> AppResult<Option<User>> {
        Ok(self
            .users()
            .values()
            .find(|u| u.provider == provider && u.provider_user_id == provider_user_id)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users().get(id).cloned())
    }

    async fn update_tokens(&self, user_id: &str, tokens: &TokenPair) -> AppResult<()> {
        let now = self.clock.now();
        let mut users = self.users();
        let stored = users
            .get_mut(user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

        stored.access_token = Some(tokens.access_token.clone());
        stored.refresh_token = Some(tokens.refresh_token.clone());
        stored.updated_at = now;
        Ok(())
    }

    async fn update_profile(&self, user: &User) -> AppResult<()> {
        let now = self.clock.now();
        let mut users = self.users();
        let stored = users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", user.id)))?;

        stored.nickname = user.nickname.clone();
        stored.avatar_url = user.avatar_url.clone();
        stored.terms_accepted = user.terms_accepted;
        stored.status = user.status;
        stored.access_token = user.access_token.clone();
        stored.refresh_token = user.refresh_token.clone();
        stored.updated_at = now;
        Ok(())
    }
}
