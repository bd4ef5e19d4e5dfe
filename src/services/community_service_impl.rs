//! `SeaORM` implementation of the `CommunityService` trait.

use async_trait::async_trait;

use crate::db::{self, Store};
use crate::models::community::{Comment, Feedback, NewFeedback};
use crate::services::community_service::{CommunityError, CommunityService};

pub struct SeaOrmCommunityService {
    store: Store,
}

impl SeaOrmCommunityService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn database(err: &anyhow::Error) -> CommunityError {
    CommunityError::Database(format!("{err:#}"))
}

#[async_trait]
impl CommunityService for SeaOrmCommunityService {
    async fn add_comment(
        &self,
        username: &str,
        hero_id: i32,
        text: &str,
    ) -> Result<Comment, CommunityError> {
        if text.trim().is_empty() {
            return Err(CommunityError::EmptyComment);
        }

        if self
            .store
            .get_hero(hero_id)
            .await
            .map_err(|e| database(&e))?
            .is_none()
        {
            return Err(CommunityError::HeroNotFound);
        }

        let comment = self
            .store
            .add_comment(username, text, hero_id)
            .await
            .map_err(|e| {
                if db::is_foreign_key_violation(&e) {
                    CommunityError::HeroNotFound
                } else {
                    database(&e)
                }
            })?;

        tracing::info!(comment_id = comment.id, hero_id, "Comment added");
        Ok(comment)
    }

    async fn submit_feedback(&self, feedback: NewFeedback) -> Result<Feedback, CommunityError> {
        let fields = [
            &feedback.user_name,
            &feedback.user_email,
            &feedback.theme,
            &feedback.message,
        ];
        if fields.iter().any(|value| value.trim().is_empty()) {
            return Err(CommunityError::IncompleteFeedback);
        }

        self.store
            .add_feedback(&feedback)
            .await
            .map_err(|e| database(&e))
    }

    async fn list_feedback(&self) -> Result<Vec<Feedback>, CommunityError> {
        self.store.list_feedback().await.map_err(|e| database(&e))
    }
}
