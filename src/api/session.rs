use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::AppError;
use crate::models::user::{User, UserRole};

const SESSION_USER_KEY: &str = "user";

/// Snapshot of the signed-in user, taken at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub role: UserRole,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

impl SessionUser {
    pub async fn get(session: &Session) -> Result<Option<Self>, AppError> {
        Ok(session.get::<Self>(SESSION_USER_KEY).await?)
    }

    /// Like [`SessionUser::get`], for pages that render either way. An
    /// unreadable session counts as anonymous.
    pub async fn current(session: &Session) -> Option<Self> {
        match session.get::<Self>(SESSION_USER_KEY).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session");
                None
            }
        }
    }

    /// Stores the snapshot under a fresh session id.
    pub async fn insert(session: &Session, user: &User) -> Result<Self, AppError> {
        let snapshot = Self::from(user);
        session.cycle_id().await?;
        session.insert(SESSION_USER_KEY, &snapshot).await?;
        Ok(snapshot)
    }

    pub async fn clear(session: &Session) -> Result<(), AppError> {
        session.flush().await?;
        Ok(())
    }
}
