use crate::entities::{abilities, comments, heroes, prelude::*};
use crate::models::ability::Ability;
use crate::models::Updated;
use crate::models::hero::{Hero, HeroChanges, HeroWithAbilities, NewHero};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

/// Repository for hero cards
pub struct HeroRepository {
    conn: DatabaseConnection,
}

impl From<heroes::Model> for Hero {
    fn from(m: heroes::Model) -> Self {
        Self {
            hero_id: m.hero_id,
            name: m.name,
            primary_attribute: m.primary_attribute,
            image_url: m.image_url,
            attack_type: m.attack_type,
            complexity: m.complexity,
            short_description: m.short_description,
            full_story_url: m.full_story_url,
            background_color: m.background_color,
            text_color: m.text_color,
            highlight_color: m.highlight_color,
            secondary_color: m.secondary_color,
            background_image_url: m.background_image_url,
        }
    }
}

impl HeroRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<Hero>> {
        let rows = Heroes::find()
            .order_by_asc(heroes::Column::HeroId)
            .all(&self.conn)
            .await
            .context("Failed to list heroes")?;

        Ok(rows.into_iter().map(Hero::from).collect())
    }

    pub async fn get(&self, hero_id: i32) -> Result<Option<Hero>> {
        let row = Heroes::find_by_id(hero_id)
            .one(&self.conn)
            .await
            .context("Failed to query hero by id")?;

        Ok(row.map(Hero::from))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Hero>> {
        let row = Heroes::find()
            .filter(heroes::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query hero by name")?;

        Ok(row.map(Hero::from))
    }

    /// Single LEFT JOIN of the hero against its abilities.
    pub async fn get_with_abilities(&self, hero_id: i32) -> Result<Option<HeroWithAbilities>> {
        let rows = Heroes::find_by_id(hero_id)
            .find_also_related(Abilities)
            .order_by_asc(abilities::Column::AbilityId)
            .all(&self.conn)
            .await
            .context("Failed to load hero with abilities")?;

        Ok(fold_joined_rows(rows))
    }

    pub async fn add(&self, hero: &NewHero) -> Result<Hero> {
        let f = &hero.fields;
        let active = heroes::ActiveModel {
            name: Set(f.name.clone()),
            primary_attribute: Set(f.primary_attribute.clone()),
            image_url: Set(hero.image_url.clone()),
            attack_type: Set(f.attack_type.clone()),
            complexity: Set(f.complexity.clone()),
            short_description: Set(f.short_description.clone()),
            full_story_url: Set(f.full_story_url.clone()),
            background_color: Set(f.background_color.clone()),
            text_color: Set(f.text_color.clone()),
            highlight_color: Set(f.highlight_color.clone()),
            secondary_color: Set(f.secondary_color.clone()),
            background_image_url: Set(hero.background_image_url.clone()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert hero")?;
        info!(hero_id = model.hero_id, name = %model.name, "Added hero");
        Ok(Hero::from(model))
    }

    /// Overwrites every text column. Media columns change only when a new path
    /// is given; the paths replaced that way are returned as superseded.
    pub async fn update(
        &self,
        hero_id: i32,
        changes: &HeroChanges,
    ) -> Result<Option<Updated<Hero>>> {
        let Some(existing) = Heroes::find_by_id(hero_id)
            .one(&self.conn)
            .await
            .context("Failed to query hero for update")?
        else {
            return Ok(None);
        };

        let superseded = superseded_urls([
            (&existing.image_url, changes.image_url.as_ref()),
            (&existing.background_image_url, changes.background_image_url.as_ref()),
        ]);

        let f = &changes.fields;
        let mut active: heroes::ActiveModel = existing.into();
        active.name = Set(f.name.clone());
        active.primary_attribute = Set(f.primary_attribute.clone());
        active.attack_type = Set(f.attack_type.clone());
        active.complexity = Set(f.complexity.clone());
        active.short_description = Set(f.short_description.clone());
        active.full_story_url = Set(f.full_story_url.clone());
        active.background_color = Set(f.background_color.clone());
        active.text_color = Set(f.text_color.clone());
        active.highlight_color = Set(f.highlight_color.clone());
        active.secondary_color = Set(f.secondary_color.clone());
        if let Some(url) = &changes.image_url {
            active.image_url = Set(url.clone());
        }
        if let Some(url) = &changes.background_image_url {
            active.background_image_url = Set(url.clone());
        }

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update hero")?;
        Ok(Some(Updated {
            record: Hero::from(model),
            superseded,
        }))
    }

    /// Deletes the hero together with its abilities and comments in one transaction.
    pub async fn remove_cascade(&self, hero_id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let abilities_removed = Abilities::delete_many()
            .filter(abilities::Column::HeroId.eq(hero_id))
            .exec(&txn)
            .await
            .context("Failed to delete hero abilities")?
            .rows_affected;

        let comments_removed = Comments::delete_many()
            .filter(comments::Column::HeroId.eq(hero_id))
            .exec(&txn)
            .await
            .context("Failed to delete hero comments")?
            .rows_affected;

        let result = Heroes::delete_by_id(hero_id)
            .exec(&txn)
            .await
            .context("Failed to delete hero")?;

        txn.commit().await?;

        if result.rows_affected > 0 {
            info!(
                hero_id,
                abilities_removed, comments_removed, "Removed hero card"
            );
        }

        Ok(result.rows_affected > 0)
    }
}

/// Stored paths that a new upload replaces.
pub(super) fn superseded_urls<'a, const N: usize>(
    pairs: [(&'a String, Option<&'a String>); N],
) -> Vec<String> {
    pairs
        .into_iter()
        .filter_map(|(stored, new)| new.filter(|new| *new != stored).map(|_| stored.clone()))
        .collect()
}

/// Reshapes LEFT JOIN rows into one hero and its abilities. Rows where the
/// join found no ability carry `None` and are dropped.
fn fold_joined_rows(
    rows: Vec<(heroes::Model, Option<abilities::Model>)>,
) -> Option<HeroWithAbilities> {
    let mut rows = rows.into_iter();
    let (hero, first) = rows.next()?;

    let abilities = std::iter::once(first)
        .chain(rows.map(|(_, ability)| ability))
        .flatten()
        .map(Ability::from)
        .collect();

    Some(HeroWithAbilities {
        hero: Hero::from(hero),
        abilities,
    })
}
