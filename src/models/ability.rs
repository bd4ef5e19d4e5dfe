use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub ability_id: i32,
    pub hero_id: i32,
    pub name: String,
    pub image_url: String,
    pub video_url: Option<String>,
    pub description: String,
    pub specification: String,
}

#[derive(Debug, Clone)]
pub struct NewAbility {
    pub hero_id: i32,
    pub name: String,
    pub description: String,
    pub specification: String,
    pub image_url: String,
    pub video_url: Option<String>,
}

/// Media left as `None` keeps the stored path.
#[derive(Debug, Clone)]
pub struct AbilityChanges {
    pub hero_id: i32,
    pub name: String,
    pub description: String,
    pub specification: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}
