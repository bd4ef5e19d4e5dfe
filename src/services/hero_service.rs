//! Domain service for the hero catalogue and hero abilities.

use thiserror::Error;

use crate::models::Updated;
use crate::models::ability::{Ability, AbilityChanges, NewAbility};
use crate::models::hero::{Hero, HeroChanges, HeroDetail, HeroWithAbilities, NewHero};

#[derive(Debug, Error)]
pub enum HeroError {
    #[error("Hero not found")]
    HeroNotFound,

    #[error("Ability not found")]
    AbilityNotFound,

    #[error("Hero '{0}' already exists")]
    DuplicateName(String),

    #[error("{0}")]
    InvalidData(String),

    #[error("Specification must be valid JSON")]
    InvalidSpecification,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for HeroError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for heroes and their abilities.
///
/// Handlers only see this trait, so tests can swap the storage behind it.
#[async_trait::async_trait]
pub trait HeroService: Send + Sync {
    async fn list_heroes(&self) -> Result<Vec<Hero>, HeroError>;

    /// Hero by exact name, then its abilities and comments.
    async fn hero_detail(&self, name: &str) -> Result<HeroDetail, HeroError>;

    async fn hero_for_edit(&self, hero_id: i32) -> Result<HeroWithAbilities, HeroError>;

    /// # Errors
    ///
    /// [`HeroError::DuplicateName`] when another hero already uses the name.
    async fn create_hero(&self, hero: NewHero) -> Result<Hero, HeroError>;

    /// Applies `changes` to the stored hero. Media paths left as `None` keep
    /// their stored value; replaced ones come back as superseded.
    async fn update_hero(
        &self,
        hero_id: i32,
        changes: HeroChanges,
    ) -> Result<Updated<Hero>, HeroError>;

    /// Removes the hero with its abilities and comments. Returns whether a
    /// hero row existed.
    async fn delete_hero(&self, hero_id: i32) -> Result<bool, HeroError>;

    async fn list_abilities(&self, hero_id: i32) -> Result<Vec<Ability>, HeroError>;

    async fn create_ability(&self, ability: NewAbility) -> Result<Ability, HeroError>;

    async fn update_ability(
        &self,
        ability_id: i32,
        changes: AbilityChanges,
    ) -> Result<Updated<Ability>, HeroError>;

    async fn delete_ability(&self, ability_id: i32) -> Result<bool, HeroError>;
}
