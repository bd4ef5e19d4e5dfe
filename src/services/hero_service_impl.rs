//! `SeaORM` implementation of the `HeroService` trait.

use async_trait::async_trait;

use crate::db::{self, Store};
use crate::models::Updated;
use crate::models::ability::{Ability, AbilityChanges, NewAbility};
use crate::models::hero::{Hero, HeroChanges, HeroDetail, HeroFields, HeroWithAbilities, NewHero};
use crate::services::hero_service::{HeroError, HeroService};

pub struct SeaOrmHeroService {
    store: Store,
}

impl SeaOrmHeroService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn require_hero(&self, hero_id: i32) -> Result<Hero, HeroError> {
        self.store
            .get_hero(hero_id)
            .await
            .map_err(|e| database(&e))?
            .ok_or(HeroError::HeroNotFound)
    }
}

fn database(err: &anyhow::Error) -> HeroError {
    HeroError::Database(format!("{err:#}"))
}

/// Maps write failures that the schema caught to domain errors.
fn write_error(err: &anyhow::Error, name: &str) -> HeroError {
    if db::is_unique_violation(err) {
        HeroError::DuplicateName(name.to_string())
    } else if db::is_foreign_key_violation(err) {
        HeroError::HeroNotFound
    } else {
        database(err)
    }
}

fn validate_fields(fields: &HeroFields) -> Result<(), HeroError> {
    let required = [
        &fields.name,
        &fields.primary_attribute,
        &fields.attack_type,
        &fields.complexity,
    ];

    if required.iter().any(|value| value.trim().is_empty()) {
        return Err(HeroError::InvalidData(
            "Name, primary attribute, attack type and complexity are required".to_string(),
        ));
    }
    Ok(())
}

fn validate_ability_text(name: &str, description: &str) -> Result<(), HeroError> {
    if name.trim().is_empty() || description.trim().is_empty() {
        return Err(HeroError::InvalidData(
            "Ability name and description are required".to_string(),
        ));
    }
    Ok(())
}

/// The specification is stored verbatim; it only has to parse.
fn validate_specification(specification: &str) -> Result<(), HeroError> {
    serde_json::from_str::<serde_json::Value>(specification)
        .map(|_| ())
        .map_err(|_| HeroError::InvalidSpecification)
}

#[async_trait]
impl HeroService for SeaOrmHeroService {
    async fn list_heroes(&self) -> Result<Vec<Hero>, HeroError> {
        self.store.list_heroes().await.map_err(|e| database(&e))
    }

    async fn hero_detail(&self, name: &str) -> Result<HeroDetail, HeroError> {
        let hero = self
            .store
            .get_hero_by_name(name)
            .await
            .map_err(|e| database(&e))?
            .ok_or(HeroError::HeroNotFound)?;

        let abilities = self
            .store
            .list_abilities_for_hero(hero.hero_id)
            .await
            .map_err(|e| database(&e))?;

        let comments = self
            .store
            .list_comments_for_hero(hero.hero_id)
            .await
            .map_err(|e| database(&e))?;

        Ok(HeroDetail {
            hero,
            abilities,
            comments,
        })
    }

    async fn hero_for_edit(&self, hero_id: i32) -> Result<HeroWithAbilities, HeroError> {
        self.store
            .get_hero_with_abilities(hero_id)
            .await
            .map_err(|e| database(&e))?
            .ok_or(HeroError::HeroNotFound)
    }

    async fn create_hero(&self, hero: NewHero) -> Result<Hero, HeroError> {
        validate_fields(&hero.fields)?;

        let name = &hero.fields.name;
        if self
            .store
            .get_hero_by_name(name)
            .await
            .map_err(|e| database(&e))?
            .is_some()
        {
            return Err(HeroError::DuplicateName(name.clone()));
        }

        self.store
            .add_hero(&hero)
            .await
            .map_err(|e| write_error(&e, name))
    }

    async fn update_hero(
        &self,
        hero_id: i32,
        changes: HeroChanges,
    ) -> Result<Updated<Hero>, HeroError> {
        validate_fields(&changes.fields)?;

        self.store
            .update_hero(hero_id, &changes)
            .await
            .map_err(|e| write_error(&e, &changes.fields.name))?
            .ok_or(HeroError::HeroNotFound)
    }

    async fn delete_hero(&self, hero_id: i32) -> Result<bool, HeroError> {
        self.store.remove_hero(hero_id).await.map_err(|e| database(&e))
    }

    async fn list_abilities(&self, hero_id: i32) -> Result<Vec<Ability>, HeroError> {
        self.store
            .list_abilities_for_hero(hero_id)
            .await
            .map_err(|e| database(&e))
    }

    async fn create_ability(&self, ability: NewAbility) -> Result<Ability, HeroError> {
        validate_ability_text(&ability.name, &ability.description)?;
        validate_specification(&ability.specification)?;
        self.require_hero(ability.hero_id).await?;

        self.store
            .add_ability(&ability)
            .await
            .map_err(|e| write_error(&e, &ability.name))
    }

    async fn update_ability(
        &self,
        ability_id: i32,
        changes: AbilityChanges,
    ) -> Result<Updated<Ability>, HeroError> {
        validate_specification(&changes.specification)?;
        validate_ability_text(&changes.name, &changes.description)?;
        self.require_hero(changes.hero_id).await?;

        self.store
            .update_ability(ability_id, &changes)
            .await
            .map_err(|e| write_error(&e, &changes.name))?
            .ok_or(HeroError::AbilityNotFound)
    }

    async fn delete_ability(&self, ability_id: i32) -> Result<bool, HeroError> {
        self.store
            .remove_ability(ability_id)
            .await
            .map_err(|e| database(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specification_must_parse() {
        assert!(validate_specification("{}").is_ok());
        assert!(validate_specification(r#"{"cooldown": [20, 16, 12], "mana": 100}"#).is_ok());
        assert!(validate_specification("[1, 2]").is_ok());
        assert!(matches!(
            validate_specification("{not json"),
            Err(HeroError::InvalidSpecification)
        ));
        assert!(validate_specification("").is_err());
    }

    #[test]
    fn test_required_hero_fields() {
        let mut fields = HeroFields {
            name: "Axe".to_string(),
            primary_attribute: "strength".to_string(),
            attack_type: "melee".to_string(),
            complexity: "1".to_string(),
            ..HeroFields::default()
        };
        assert!(validate_fields(&fields).is_ok());

        fields.attack_type = "   ".to_string();
        assert!(matches!(
            validate_fields(&fields),
            Err(HeroError::InvalidData(_))
        ));
    }
}
