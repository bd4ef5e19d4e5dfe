use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::ability::{Ability, AbilityChanges, NewAbility};
use crate::models::community::{Comment, Feedback, NewFeedback};
use crate::models::hero::{Hero, HeroChanges, HeroWithAbilities, NewHero};
use crate::models::Updated;
use crate::models::user::{User, UserRole};

pub mod migrator;
pub mod repositories;

pub use repositories::user::{hash_password, verify_password};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn hero_repo(&self) -> repositories::hero::HeroRepository {
        repositories::hero::HeroRepository::new(self.conn.clone())
    }

    fn ability_repo(&self) -> repositories::ability::AbilityRepository {
        repositories::ability::AbilityRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    fn feedback_repo(&self) -> repositories::feedback::FeedbackRepository {
        repositories::feedback::FeedbackRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    /// Looks a user up by email or username with one shared identifier.
    pub async fn get_user_for_login(&self, identifier: &str) -> Result<Option<(User, String)>> {
        self.user_repo().get_for_login(identifier).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User> {
        self.user_repo()
            .create(username, email, password_hash, role)
            .await
    }

    pub async fn set_user_role(&self, username: &str, role: UserRole) -> Result<bool> {
        self.user_repo().set_role(username, role).await
    }

    /// Creates the configured admin account unless that username already exists.
    pub async fn ensure_bootstrap_admin(&self, security: &SecurityConfig) -> Result<bool> {
        let Some(admin) = &security.bootstrap_admin else {
            return Ok(false);
        };

        if self.get_user_by_username(&admin.username).await?.is_some() {
            return Ok(false);
        }

        let password = admin.password.clone();
        let config = security.clone();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password, &config)).await??;

        self.create_user(&admin.username, &admin.email, &hash, UserRole::Admin)
            .await?;
        info!(username = %admin.username, "Bootstrap admin account created");
        Ok(true)
    }

    // ========================================================================
    // Heroes
    // ========================================================================

    pub async fn list_heroes(&self) -> Result<Vec<Hero>> {
        self.hero_repo().list_all().await
    }

    pub async fn get_hero(&self, hero_id: i32) -> Result<Option<Hero>> {
        self.hero_repo().get(hero_id).await
    }

    pub async fn get_hero_by_name(&self, name: &str) -> Result<Option<Hero>> {
        self.hero_repo().get_by_name(name).await
    }

    pub async fn get_hero_with_abilities(&self, hero_id: i32) -> Result<Option<HeroWithAbilities>> {
        self.hero_repo().get_with_abilities(hero_id).await
    }

    pub async fn add_hero(&self, hero: &NewHero) -> Result<Hero> {
        self.hero_repo().add(hero).await
    }

    pub async fn update_hero(
        &self,
        hero_id: i32,
        changes: &HeroChanges,
    ) -> Result<Option<Updated<Hero>>> {
        self.hero_repo().update(hero_id, changes).await
    }

    pub async fn remove_hero(&self, hero_id: i32) -> Result<bool> {
        self.hero_repo().remove_cascade(hero_id).await
    }

    // ========================================================================
    // Abilities
    // ========================================================================

    pub async fn list_abilities_for_hero(&self, hero_id: i32) -> Result<Vec<Ability>> {
        self.ability_repo().list_for_hero(hero_id).await
    }

    pub async fn add_ability(&self, ability: &NewAbility) -> Result<Ability> {
        self.ability_repo().add(ability).await
    }

    pub async fn update_ability(
        &self,
        ability_id: i32,
        changes: &AbilityChanges,
    ) -> Result<Option<Updated<Ability>>> {
        self.ability_repo().update(ability_id, changes).await
    }

    pub async fn remove_ability(&self, ability_id: i32) -> Result<bool> {
        self.ability_repo().remove(ability_id).await
    }

    // ========================================================================
    // Comments & feedback
    // ========================================================================

    pub async fn list_comments_for_hero(&self, hero_id: i32) -> Result<Vec<Comment>> {
        self.comment_repo().list_for_hero(hero_id).await
    }

    pub async fn add_comment(&self, username: &str, text: &str, hero_id: i32) -> Result<Comment> {
        self.comment_repo().add(username, text, hero_id).await
    }

    pub async fn list_feedback(&self) -> Result<Vec<Feedback>> {
        self.feedback_repo().list_all().await
    }

    pub async fn add_feedback(&self, feedback: &NewFeedback) -> Result<Feedback> {
        self.feedback_repo().add(feedback).await
    }
}

fn sql_err(err: &anyhow::Error) -> Option<SqlErr> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DbErr>())
        .and_then(DbErr::sql_err)
}

/// Driver message of a UNIQUE constraint rejection, e.g.
/// `UNIQUE constraint failed: users.email`.
#[must_use]
pub fn unique_violation(err: &anyhow::Error) -> Option<String> {
    match sql_err(err) {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}

#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    unique_violation(err).is_some()
}

/// True when a write referenced a row that does not exist.
#[must_use]
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    matches!(sql_err(err), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
