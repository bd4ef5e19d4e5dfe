use crate::entities::{comments, prelude::*};
use crate::models::community::Comment;
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl From<comments::Model> for Comment {
    fn from(m: comments::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            text: m.text,
            hero_id: m.hero_id,
        }
    }
}

impl CommentRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_hero(&self, hero_id: i32) -> Result<Vec<Comment>> {
        let rows = Comments::find()
            .filter(comments::Column::HeroId.eq(hero_id))
            .order_by_asc(comments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list comments for hero")?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    pub async fn add(&self, username: &str, text: &str, hero_id: i32) -> Result<Comment> {
        let active = comments::ActiveModel {
            username: Set(username.to_string()),
            text: Set(text.to_string()),
            hero_id: Set(hero_id),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert comment")?;
        Ok(Comment::from(model))
    }
}
