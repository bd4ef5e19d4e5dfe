use crate::entities::feedback;
use crate::models::community::{Feedback, NewFeedback};
use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

pub struct FeedbackRepository {
    conn: DatabaseConnection,
}

impl From<feedback::Model> for Feedback {
    fn from(m: feedback::Model) -> Self {
        Self {
            id: m.id,
            user_name: m.user_name,
            user_email: m.user_email,
            theme: m.theme,
            message: m.message,
        }
    }
}

impl FeedbackRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Feedback>> {
        let rows = feedback::Entity::find()
            .order_by_asc(feedback::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list feedback")?;

        Ok(rows.into_iter().map(Feedback::from).collect())
    }

    pub async fn add(&self, entry: &NewFeedback) -> Result<Feedback> {
        let active = feedback::ActiveModel {
            user_name: Set(entry.user_name.clone()),
            user_email: Set(entry.user_email.clone()),
            theme: Set(entry.theme.clone()),
            message: Set(entry.message.clone()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert feedback")?;
        Ok(Feedback::from(model))
    }
}
