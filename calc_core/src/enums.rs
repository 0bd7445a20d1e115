//! Closed enumerations shared across the stat grid, equipment model and
//! damage calculator: stat identifiers, ability tags, elements, specialities
//! and rarities.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The closed set of stat identifiers a [`crate::stats::StatGrid`] can hold.
///
/// Derives `Ord` from declaration order so that `StatGrid`'s backing map
/// iterates deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatId {
    None,
    HpTotal,
    HpBase,
    HpRatio,
    HpFlat,
    AtkTotal,
    AtkBase,
    AtkRatio,
    AtkFlat,
    DefTotal,
    DefBase,
    DefRatio,
    DefFlat,
    CritRate,
    CritDmg,
    DefPenRatio,
    DefPenFlat,
    Ap,
    AmTotal,
    AmBase,
    AmRatio,
    AbRate,
    AbPen,
    ImpactTotal,
    ImpactBase,
    ImpactRatio,
    ErTotal,
    ErBase,
    ErRatio,
    ShieldEffect,
    ReceivedDmgReduction,
    Vulnerability,
    DmgRatio,
    PhysRatio,
    FireRatio,
    IceRatio,
    ElectricRatio,
    EtherRatio,
    ResPen,
    PhysResPen,
    FireResPen,
    IceResPen,
    ElectricResPen,
    EtherResPen,
}

impl StatId {
    /// The per-element counterpart of `DmgRatio` or `ResPen`.
    ///
    /// Total function on `(StatId, Element)` restricted to those two ids,
    /// per the data model's definition of the `DmgRatio + <Element>` and
    /// `ResPen + <Element>` constants. Callers never invoke this with any
    /// other stat id.
    pub fn with_element(self, element: Element) -> StatId {
        match (self, element) {
            (StatId::DmgRatio, Element::Physical) => StatId::PhysRatio,
            (StatId::DmgRatio, Element::Fire) => StatId::FireRatio,
            (StatId::DmgRatio, Element::Ice) => StatId::IceRatio,
            (StatId::DmgRatio, Element::Electric) => StatId::ElectricRatio,
            (StatId::DmgRatio, Element::Ether) => StatId::EtherRatio,
            (StatId::ResPen, Element::Physical) => StatId::PhysResPen,
            (StatId::ResPen, Element::Fire) => StatId::FireResPen,
            (StatId::ResPen, Element::Ice) => StatId::IceResPen,
            (StatId::ResPen, Element::Electric) => StatId::ElectricResPen,
            (StatId::ResPen, Element::Ether) => StatId::EtherResPen,
            (other, _) => unreachable!(
                "with_element is only defined for DmgRatio/ResPen, got {other:?}"
            ),
        }
    }

    /// Parse a stat id from either its snake_case name or an on-disk alias.
    pub fn parse(s: &str) -> CoreResult<StatId> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| CoreError::Parse(format!("unknown stat id: {s}")))
    }
}

/// The closed set of ability tags. `Universal` means "applies regardless of
/// the ability's own tag".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Universal,
    Anomaly,
    Basic,
    Dash,
    Counter,
    QuickAssist,
    FollowupAssist,
    DefensiveAssist,
    EvasiveAssist,
    Special,
    ExSpecial,
    Chain,
    Ultimate,
}

impl Tag {
    pub fn parse(s: &str) -> CoreResult<Tag> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| CoreError::Parse(format!("unknown tag: {s}")))
    }
}

/// Agent speciality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speciality {
    Attack,
    Anomaly,
    Stun,
    Support,
    Defense,
}

impl Speciality {
    pub fn parse(s: &str) -> CoreResult<Speciality> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| CoreError::Parse(format!("unknown speciality: {s}")))
    }
}

/// Damage / resistance element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    #[serde(rename = "phys")]
    Physical,
    Fire,
    Ice,
    Electric,
    Ether,
}

impl Element {
    /// Index into a 5-entry per-element vector (e.g. `Enemy::res`), in
    /// enumeration order.
    pub fn index(self) -> usize {
        match self {
            Element::Physical => 0,
            Element::Fire => 1,
            Element::Ice => 2,
            Element::Electric => 3,
            Element::Ether => 4,
        }
    }

    pub fn parse(s: &str) -> CoreResult<Element> {
        serde_json::from_value(serde_json::Value::String(s.to_string()))
            .map_err(|_| CoreError::Parse(format!("unknown element: {s}")))
    }
}

/// Equipment rarity. `NotSet` is the builder's default before a rarity is
/// assigned; `B`/`A`/`S` index the fixed main-/sub-stat magnitude tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    NotSet,
    B,
    A,
    S,
}

impl Rarity {
    /// Construct from the integer rarity code used on the wire (2, 3, 4).
    pub fn from_code(code: u8) -> CoreResult<Rarity> {
        match code {
            2 => Ok(Rarity::B),
            3 => Ok(Rarity::A),
            4 => Ok(Rarity::S),
            other => Err(CoreError::DomainViolation(format!(
                "invalid rarity code: {other}"
            ))),
        }
    }

    /// 0-based index into the main-/sub-stat magnitude tables (B=0, A=1, S=2).
    pub fn table_index(self) -> CoreResult<usize> {
        match self {
            Rarity::B => Ok(0),
            Rarity::A => Ok(1),
            Rarity::S => Ok(2),
            Rarity::NotSet => Err(CoreError::DomainViolation(
                "rarity has not been set".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_id_round_trips_through_json() {
        let v = serde_json::to_value(StatId::AtkRatio).unwrap();
        assert_eq!(v, serde_json::json!("atk_ratio"));
        assert_eq!(StatId::parse("atk_ratio").unwrap(), StatId::AtkRatio);
    }

    #[test]
    fn element_physical_serializes_as_phys() {
        assert_eq!(
            serde_json::to_value(Element::Physical).unwrap(),
            serde_json::json!("phys")
        );
        assert_eq!(Element::parse("phys").unwrap(), Element::Physical);
    }

    #[test]
    fn with_element_is_total_for_dmg_ratio_and_res_pen() {
        assert_eq!(
            StatId::DmgRatio.with_element(Element::Fire),
            StatId::FireRatio
        );
        assert_eq!(
            StatId::ResPen.with_element(Element::Ether),
            StatId::EtherResPen
        );
    }

    #[test]
    fn rarity_table_index_matches_spec_mapping() {
        assert_eq!(Rarity::from_code(2).unwrap().table_index().unwrap(), 0);
        assert_eq!(Rarity::from_code(3).unwrap().table_index().unwrap(), 1);
        assert_eq!(Rarity::from_code(4).unwrap().table_index().unwrap(), 2);
    }
}
