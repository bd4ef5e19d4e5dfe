use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "abilities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub ability_id: i32,

    pub hero_id: i32,

    pub name: String,

    pub image_url: String,

    pub video_url: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// JSON document kept exactly as submitted.
    #[sea_orm(column_type = "Text")]
    pub specification: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::heroes::Entity",
        from = "Column::HeroId",
        to = "super::heroes::Column::HeroId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Hero,
}

impl Related<super::heroes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hero.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
