//! Domain service for hero comments and visitor feedback.

use thiserror::Error;

use crate::models::community::{Comment, Feedback, NewFeedback};

#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("Comment cannot be empty")]
    EmptyComment,

    #[error("All fields must be filled in")]
    IncompleteFeedback,

    #[error("Hero not found")]
    HeroNotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CommunityError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CommunityService: Send + Sync {
    /// Stores a comment under `username` on the given hero.
    async fn add_comment(
        &self,
        username: &str,
        hero_id: i32,
        text: &str,
    ) -> Result<Comment, CommunityError>;

    /// Stores visitor feedback. No account is required.
    async fn submit_feedback(&self, feedback: NewFeedback) -> Result<Feedback, CommunityError>;

    async fn list_feedback(&self) -> Result<Vec<Feedback>, CommunityError>;
}
