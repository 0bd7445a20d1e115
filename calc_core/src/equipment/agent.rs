//! Agents: the playable character a loadout equips weapons and discs onto.

use std::collections::HashMap;

use crate::enums::{Element, Rarity, Speciality};
use crate::equipment::ability::Ability;
use crate::error::{CoreError, CoreResult};
use crate::stats::StatGrid;

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: u64,
    pub name: String,
    pub speciality: Speciality,
    pub element: Element,
    pub rarity: Rarity,
    pub stats: StatGrid,
    abilities: HashMap<String, Ability>,
}

impl Agent {
    pub fn ability(&self, name: &str) -> CoreResult<&Ability> {
        self.abilities
            .get(name)
            .ok_or_else(|| CoreError::MissingKey(format!("agent {} has no ability {name}", self.id)))
    }

    /// Build an agent from its on-disk tree: `id`, `name`, `speciality`,
    /// `element`, `rarity` (wire code 2/3/4), `stats`, and a named
    /// `abilities` map.
    pub fn from_json(value: &serde_json::Value) -> CoreResult<Agent> {
        let id = value
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CoreError::Parse("agent is missing 'id'".to_string()))?;
        let name = value
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::Parse("agent is missing 'name'".to_string()))?;
        let speciality = value
            .get("speciality")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::Parse("agent is missing 'speciality'".to_string()))
            .and_then(Speciality::parse)?;
        let element = value
            .get("element")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::Parse("agent is missing 'element'".to_string()))
            .and_then(Element::parse)?;
        let rarity_code = value
            .get("rarity")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CoreError::Parse("agent is missing 'rarity'".to_string()))?;
        let rarity = Rarity::from_code(rarity_code as u8)?;

        let mut builder = AgentBuilder::new()
            .set_id(id)
            .set_name(name)
            .set_speciality(speciality)
            .set_element(element)
            .set_rarity(rarity);

        if let Some(stats) = value.get("stats") {
            builder = builder.set_stats(StatGrid::from_json(stats)?);
        }

        if let Some(abilities) = value.get("abilities").and_then(serde_json::Value::as_object) {
            for (name, ability_value) in abilities {
                builder = builder.add_ability(Ability::from_json(name, ability_value)?);
            }
        }

        builder.get_product()
    }
}

/// Validating, single-use builder for [`Agent`]. Mirrors the
/// id/name/speciality/element/rarity required-field bitset the equipment
/// model's other builders use; `stats` defaults to empty and abilities
/// default to none, so neither is required for `is_built`.
#[derive(Debug, Default)]
pub struct AgentBuilder {
    id: Option<u64>,
    name: Option<String>,
    speciality: Option<Speciality>,
    element: Option<Element>,
    rarity: Option<Rarity>,
    stats: StatGrid,
    abilities: HashMap<String, Ability>,
}

impl AgentBuilder {
    pub fn new() -> AgentBuilder {
        AgentBuilder::default()
    }

    pub fn set_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_speciality(mut self, speciality: Speciality) -> Self {
        self.speciality = Some(speciality);
        self
    }

    pub fn set_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn set_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn set_stats(mut self, stats: StatGrid) -> Self {
        self.stats = stats;
        self
    }

    pub fn add_ability(mut self, ability: Ability) -> Self {
        self.abilities.insert(ability.name().to_string(), ability);
        self
    }

    pub fn is_built(&self) -> bool {
        self.id.is_some()
            && self.name.is_some()
            && self.speciality.is_some()
            && self.element.is_some()
            && self.rarity.is_some()
    }

    pub fn get_product(self) -> CoreResult<Agent> {
        let missing = [
            (self.id.is_none(), "id"),
            (self.name.is_none(), "name"),
            (self.speciality.is_none(), "speciality"),
            (self.element.is_none(), "element"),
            (self.rarity.is_none(), "rarity"),
        ]
        .into_iter()
        .filter(|(absent, _)| *absent)
        .map(|(_, field)| field)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(CoreError::BuilderIncomplete(missing.join(", ")));
        }

        Ok(Agent {
            id: self.id.expect("checked above"),
            name: self.name.expect("checked above"),
            speciality: self.speciality.expect("checked above"),
            element: self.element.expect("checked above"),
            rarity: self.rarity.expect("checked above"),
            stats: self.stats,
            abilities: self.abilities,
        })
    }
}
