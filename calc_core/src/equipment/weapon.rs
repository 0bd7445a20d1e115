//! Weapons: id/rarity/speciality plus a fixed main/sub stat pair and an
//! optional grid of passive stats.

use crate::enums::{Rarity, Speciality};
use crate::equipment::QualifiedStat;
use crate::error::{CoreError, CoreResult};
use crate::stats::StatGrid;

#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub id: u64,
    pub name: String,
    pub rarity: Rarity,
    pub speciality: Speciality,
    pub main_stat: QualifiedStat,
    pub sub_stat: QualifiedStat,
    pub passive_stats: StatGrid,
}

impl Weapon {
    /// Build a weapon from its on-disk tree: `id`, `name`, `rarity` (wire
    /// code), `speciality`, `main_stat`/`sub_stat` qualified-stat objects,
    /// and an optional `passive_stats` grid.
    pub fn from_json(value: &serde_json::Value) -> CoreResult<Weapon> {
        let id = value
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CoreError::Parse("weapon is missing 'id'".to_string()))?;
        let name = value
            .get("name")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::Parse("weapon is missing 'name'".to_string()))?;
        let rarity_code = value
            .get("rarity")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CoreError::Parse("weapon is missing 'rarity'".to_string()))?;
        let rarity = Rarity::from_code(rarity_code as u8)?;
        let speciality = value
            .get("speciality")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| CoreError::Parse("weapon is missing 'speciality'".to_string()))
            .and_then(Speciality::parse)?;
        let main_stat = value
            .get("main_stat")
            .ok_or_else(|| CoreError::Parse("weapon is missing 'main_stat'".to_string()))
            .and_then(QualifiedStat::from_json)?;
        let sub_stat = value
            .get("sub_stat")
            .ok_or_else(|| CoreError::Parse("weapon is missing 'sub_stat'".to_string()))
            .and_then(QualifiedStat::from_json)?;
        let passive_stats = crate::equipment::optional_grid(value, "passive_stats")?;

        WeaponBuilder::new()
            .set_id(id)
            .set_name(name)
            .set_rarity(rarity)
            .set_speciality(speciality)
            .set_main_stat(main_stat)
            .set_sub_stat(sub_stat)
            .set_passive_stats(passive_stats)
            .get_product()
    }
}

#[derive(Debug, Default)]
pub struct WeaponBuilder {
    id: Option<u64>,
    name: Option<String>,
    rarity: Option<Rarity>,
    speciality: Option<Speciality>,
    main_stat: Option<QualifiedStat>,
    sub_stat: Option<QualifiedStat>,
    passive_stats: StatGrid,
}

impl WeaponBuilder {
    pub fn new() -> WeaponBuilder {
        WeaponBuilder::default()
    }

    pub fn set_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn set_speciality(mut self, speciality: Speciality) -> Self {
        self.speciality = Some(speciality);
        self
    }

    pub fn set_main_stat(mut self, stat: QualifiedStat) -> Self {
        self.main_stat = Some(stat);
        self
    }

    pub fn set_sub_stat(mut self, stat: QualifiedStat) -> Self {
        self.sub_stat = Some(stat);
        self
    }

    pub fn set_passive_stats(mut self, stats: StatGrid) -> Self {
        self.passive_stats = stats;
        self
    }

    pub fn is_built(&self) -> bool {
        self.id.is_some()
            && self.name.is_some()
            && self.rarity.is_some()
            && self.speciality.is_some()
            && self.main_stat.is_some()
            && self.sub_stat.is_some()
    }

    pub fn get_product(self) -> CoreResult<Weapon> {
        let missing = [
            (self.id.is_none(), "id"),
            (self.name.is_none(), "name"),
            (self.rarity.is_none(), "rarity"),
            (self.speciality.is_none(), "speciality"),
            (self.main_stat.is_none(), "main_stat"),
            (self.sub_stat.is_none(), "sub_stat"),
        ]
        .into_iter()
        .filter(|(absent, _)| *absent)
        .map(|(_, field)| field)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(CoreError::BuilderIncomplete(missing.join(", ")));
        }

        Ok(Weapon {
            id: self.id.expect("checked above"),
            name: self.name.expect("checked above"),
            rarity: self.rarity.expect("checked above"),
            speciality: self.speciality.expect("checked above"),
            main_stat: self.main_stat.expect("checked above"),
            sub_stat: self.sub_stat.expect("checked above"),
            passive_stats: self.passive_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{StatId, Tag};
    use crate::stats::{Qualifier, Stat};

    fn qualified(id: StatId, base: f64) -> QualifiedStat {
        QualifiedStat {
            qualifier: Qualifier::new(id, Tag::Universal),
            stat: Stat::regular(base),
        }
    }

    #[test]
    fn incomplete_builder_is_rejected() {
        assert!(WeaponBuilder::new().set_id(1).get_product().is_err());
    }

    #[test]
    fn built_weapon_carries_main_and_sub_stat() {
        let weapon = WeaponBuilder::new()
            .set_id(1)
            .set_name("Steel Cushion")
            .set_rarity(Rarity::S)
            .set_speciality(Speciality::Attack)
            .set_main_stat(qualified(StatId::AtkBase, 100.0))
            .set_sub_stat(qualified(StatId::CritRate, 0.1))
            .get_product()
            .unwrap();

        assert_eq!(weapon.main_stat.stat.base(), 100.0);
        assert_eq!(weapon.sub_stat.stat.base(), 0.1);
    }

    #[test]
    fn from_json_builds_a_weapon() {
        let value = serde_json::json!({
            "id": 1, "name": "Steel Cushion", "rarity": 4, "speciality": "attack",
            "main_stat": {"id": "atk_base", "base": 100.0},
            "sub_stat": {"id": "crit_rate", "base": 0.1},
        });
        let weapon = Weapon::from_json(&value).unwrap();
        assert_eq!(weapon.main_stat.stat.base(), 100.0);
        assert!(weapon.passive_stats.is_empty());
    }
}
