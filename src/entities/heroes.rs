use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "heroes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub hero_id: i32,

    #[sea_orm(unique)]
    pub name: String,

    pub primary_attribute: String,

    pub image_url: String,

    pub attack_type: String,

    pub complexity: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub short_description: Option<String>,

    pub full_story_url: Option<String>,

    pub background_color: Option<String>,

    pub text_color: Option<String>,

    pub highlight_color: Option<String>,

    pub secondary_color: Option<String>,

    pub background_image_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::abilities::Entity")]
    Abilities,
    #[sea_orm(has_many = "super::comments::Entity")]
    Comments,
}

impl Related<super::abilities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Abilities.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
