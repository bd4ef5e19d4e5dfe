use serde::{Deserialize, Serialize};

use super::ability::Ability;
use super::community::Comment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub hero_id: i32,
    pub name: String,
    pub primary_attribute: String,
    pub image_url: String,
    pub attack_type: String,
    pub complexity: String,
    pub short_description: Option<String>,
    pub full_story_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub highlight_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_image_url: String,
}

/// The ten text columns an admin edits directly. Media paths travel separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroFields {
    pub name: String,
    pub primary_attribute: String,
    pub attack_type: String,
    pub complexity: String,
    pub short_description: Option<String>,
    pub full_story_url: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub highlight_color: Option<String>,
    pub secondary_color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewHero {
    pub fields: HeroFields,
    pub image_url: String,
    pub background_image_url: String,
}

/// `None` media keeps whatever the stored record already points at.
#[derive(Debug, Clone)]
pub struct HeroChanges {
    pub fields: HeroFields,
    pub image_url: Option<String>,
    pub background_image_url: Option<String>,
}

/// Everything the public hero page shows.
#[derive(Debug, Clone)]
pub struct HeroDetail {
    pub hero: Hero,
    pub abilities: Vec<Ability>,
    pub comments: Vec<Comment>,
}

/// A hero plus its abilities as loaded for the admin edit form.
#[derive(Debug, Clone)]
pub struct HeroWithAbilities {
    pub hero: Hero,
    pub abilities: Vec<Ability>,
}
