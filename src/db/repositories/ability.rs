use crate::entities::{abilities, prelude::*};
use super::hero::superseded_urls;
use crate::models::Updated;
use crate::models::ability::{Ability, AbilityChanges, NewAbility};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

pub struct AbilityRepository {
    conn: DatabaseConnection,
}

impl From<abilities::Model> for Ability {
    fn from(m: abilities::Model) -> Self {
        Self {
            ability_id: m.ability_id,
            hero_id: m.hero_id,
            name: m.name,
            image_url: m.image_url,
            video_url: m.video_url,
            description: m.description,
            specification: m.specification,
        }
    }
}

impl AbilityRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_hero(&self, hero_id: i32) -> Result<Vec<Ability>> {
        let rows = Abilities::find()
            .filter(abilities::Column::HeroId.eq(hero_id))
            .order_by_asc(abilities::Column::AbilityId)
            .all(&self.conn)
            .await
            .context("Failed to list abilities for hero")?;

        Ok(rows.into_iter().map(Ability::from).collect())
    }

    pub async fn add(&self, ability: &NewAbility) -> Result<Ability> {
        let active = abilities::ActiveModel {
            hero_id: Set(ability.hero_id),
            name: Set(ability.name.clone()),
            image_url: Set(ability.image_url.clone()),
            video_url: Set(ability.video_url.clone()),
            description: Set(ability.description.clone()),
            specification: Set(ability.specification.clone()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert ability")?;
        info!(
            ability_id = model.ability_id,
            hero_id = model.hero_id,
            "Added ability"
        );
        Ok(Ability::from(model))
    }

    pub async fn update(
        &self,
        ability_id: i32,
        changes: &AbilityChanges,
    ) -> Result<Option<Updated<Ability>>> {
        let Some(existing) = Abilities::find_by_id(ability_id)
            .one(&self.conn)
            .await
            .context("Failed to query ability for update")?
        else {
            return Ok(None);
        };

        let mut superseded = superseded_urls([(&existing.image_url, changes.image_url.as_ref())]);
        if let (Some(stored), Some(new)) = (&existing.video_url, &changes.video_url) {
            superseded.extend(superseded_urls([(stored, Some(new))]));
        }

        let mut active: abilities::ActiveModel = existing.into();
        active.hero_id = Set(changes.hero_id);
        active.name = Set(changes.name.clone());
        active.description = Set(changes.description.clone());
        active.specification = Set(changes.specification.clone());
        if let Some(url) = &changes.image_url {
            active.image_url = Set(url.clone());
        }
        if let Some(url) = &changes.video_url {
            active.video_url = Set(Some(url.clone()));
        }

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update ability")?;
        Ok(Some(Updated {
            record: Ability::from(model),
            superseded,
        }))
    }

    pub async fn remove(&self, ability_id: i32) -> Result<bool> {
        let result = Abilities::delete_by_id(ability_id)
            .exec(&self.conn)
            .await
            .context("Failed to delete ability")?;

        Ok(result.rows_affected > 0)
    }
}
