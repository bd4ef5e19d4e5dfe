use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub username: String,
    pub text: String,
    pub hero_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i32,
    pub user_name: String,
    pub user_email: String,
    pub theme: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewFeedback {
    pub user_name: String,
    pub user_email: String,
    pub theme: String,
    pub message: String,
}
