//! Disc pieces: slot-restricted stat carriers. Main-stat choice is gated
//! by slot; magnitudes come from fixed per-rarity tables.

use crate::enums::{Rarity, StatId, Tag};
use crate::error::{CoreError, CoreResult};
use crate::stats::{Qualifier, Stat, StatGrid};

/// `main_stat_conversion_table`: stat id -> magnitude at rarity index
/// `[B, A, S]`. Sub-stat magnitude additionally scales by `level + 1`.
fn main_stat_table(id: StatId) -> Option<[f64; 3]> {
    Some(match id {
        StatId::HpFlat => [734.0, 1468.0, 2200.0],
        StatId::AtkFlat => [104.0, 212.0, 316.0],
        StatId::DefFlat => [60.0, 124.0, 184.0],
        StatId::AtkRatio => [0.1, 0.2, 0.3],
        StatId::HpRatio => [0.1, 0.2, 0.3],
        StatId::DefRatio => [0.16, 0.32, 0.48],
        StatId::Ap => [32.0, 60.0, 92.0],
        StatId::CritRate => [0.8, 0.16, 0.24],
        StatId::CritDmg => [0.16, 0.32, 0.48],
        StatId::DefPenRatio => [0.08, 0.16, 0.24],
        StatId::PhysRatio => [0.1, 0.2, 0.3],
        StatId::FireRatio => [0.1, 0.2, 0.3],
        StatId::IceRatio => [0.1, 0.2, 0.3],
        StatId::ElectricRatio => [0.1, 0.2, 0.3],
        StatId::EtherRatio => [0.1, 0.2, 0.3],
        StatId::AmRatio => [0.1, 0.2, 0.3],
        StatId::ErRatio => [0.2, 0.4, 0.6],
        StatId::ImpactRatio => [0.06, 0.12, 0.18],
        _ => return None,
    })
}

fn sub_stat_table(id: StatId) -> Option<[f64; 3]> {
    Some(match id {
        StatId::AtkFlat => [7.0, 15.0, 19.0],
        StatId::AtkRatio => [0.01, 0.02, 0.03],
        StatId::HpFlat => [39.0, 79.0, 112.0],
        StatId::HpRatio => [0.01, 0.02, 0.03],
        StatId::DefFlat => [5.0, 10.0, 15.0],
        StatId::DefRatio => [0.016, 0.032, 0.048],
        StatId::CritRate => [0.008, 0.016, 0.024],
        StatId::CritDmg => [0.016, 0.032, 0.048],
        StatId::DefPenFlat => [3.0, 6.0, 9.0],
        StatId::Ap => [3.0, 6.0, 9.0],
        _ => return None,
    })
}

/// Allowed main-stat ids for a given slot, per the fixed slot/main-stat table.
fn slot_allows_main_stat(slot: u8, id: StatId) -> bool {
    match slot {
        1 => id == StatId::HpFlat,
        2 => id == StatId::AtkFlat,
        3 => id == StatId::DefFlat,
        4 => matches!(
            id,
            StatId::AtkRatio
                | StatId::HpRatio
                | StatId::DefRatio
                | StatId::Ap
                | StatId::CritRate
                | StatId::CritDmg
        ),
        5 => matches!(
            id,
            StatId::AtkRatio
                | StatId::HpRatio
                | StatId::DefRatio
                | StatId::DefPenRatio
                | StatId::PhysRatio
                | StatId::FireRatio
                | StatId::IceRatio
                | StatId::ElectricRatio
                | StatId::EtherRatio
        ),
        6 => matches!(
            id,
            StatId::AtkRatio
                | StatId::HpRatio
                | StatId::DefRatio
                | StatId::AmRatio
                | StatId::ErRatio
                | StatId::ImpactRatio
        ),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscPiece {
    pub disc_id: u64,
    pub slot: u8,
    pub rarity: Rarity,
    pub stats: StatGrid,
}

/// Builder for a single disc piece. `set_slot`/`set_rarity` must precede
/// `set_main_stat`, which in turn must precede any `add_sub_stat`, mirroring
/// the source's "firstly set slot" ordering requirement.
#[derive(Debug, Default)]
pub struct DiscPieceBuilder {
    disc_id: Option<u64>,
    slot: Option<u8>,
    rarity: Option<Rarity>,
    main_stat_id: Option<StatId>,
    sub_stat_count: u8,
    stats: StatGrid,
}

impl DiscPieceBuilder {
    pub fn new() -> DiscPieceBuilder {
        DiscPieceBuilder::default()
    }

    pub fn set_disc_id(mut self, disc_id: u64) -> Self {
        self.disc_id = Some(disc_id);
        self
    }

    pub fn set_slot(mut self, slot: u8) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn set_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = Some(rarity);
        self
    }

    pub fn set_main_stat(mut self, id: StatId) -> CoreResult<Self> {
        let slot = self
            .slot
            .ok_or_else(|| CoreError::DomainViolation("slot must be set before main stat".into()))?;
        let rarity = self.rarity.ok_or_else(|| {
            CoreError::DomainViolation("rarity must be set before main stat".into())
        })?;

        if !slot_allows_main_stat(slot, id) {
            return Err(CoreError::DomainViolation(format!(
                "stat {id:?} is not a valid main stat for slot {slot}"
            )));
        }

        let rarity_index = rarity.table_index()?;
        let magnitude = main_stat_table(id)
            .ok_or_else(|| CoreError::DomainViolation(format!("no main-stat table entry for {id:?}")))?
            [rarity_index];

        self.stats
            .set(Qualifier::new(id, Tag::Universal), Stat::regular(magnitude));
        self.main_stat_id = Some(id);
        Ok(self)
    }

    pub fn add_sub_stat(mut self, id: StatId, level: u8) -> CoreResult<Self> {
        let rarity = self.rarity.ok_or_else(|| {
            CoreError::DomainViolation("rarity must be set before sub stats".into())
        })?;
        if self.main_stat_id.is_none() {
            return Err(CoreError::DomainViolation(
                "main stat must be set before sub stats".into(),
            ));
        }
        if self.main_stat_id == Some(id) {
            return Err(CoreError::DomainViolation(
                "sub stat must not repeat the main stat".into(),
            ));
        }

        let rarity_index = rarity.table_index()?;
        let magnitude = sub_stat_table(id)
            .ok_or_else(|| CoreError::DomainViolation(format!("no sub-stat table entry for {id:?}")))?
            [rarity_index]
            * (level as f64 + 1.0);

        self.stats.add_regular(id, Tag::Universal, magnitude);
        self.sub_stat_count += 1;
        Ok(self)
    }

    pub fn is_built(&self) -> bool {
        let Some(rarity) = self.rarity else { return false };
        let Ok(rarity_index) = rarity.table_index() else { return false };
        self.disc_id.is_some()
            && self.slot.is_some()
            && self.main_stat_id.is_some()
            && usize::from(self.sub_stat_count) >= rarity_index + 1
    }

    pub fn get_product(self) -> CoreResult<DiscPiece> {
        if !self.is_built() {
            return Err(CoreError::BuilderIncomplete(
                "slot, rarity, main stat, and enough sub stats".into(),
            ));
        }

        Ok(DiscPiece {
            disc_id: self.disc_id.expect("checked by is_built"),
            slot: self.slot.expect("checked by is_built"),
            rarity: self.rarity.expect("checked by is_built"),
            stats: self.stats,
        })
    }
}

impl DiscPiece {
    /// Build a disc piece from a damage request's inline shape:
    /// `{"id": <set id>, "rarity": <code>, "stats": [main, sub, sub, sub, sub], "levels": [_, lvl, lvl, lvl, lvl]}`.
    /// `slot` comes from the piece's position (1-indexed) in the request's `discs` array.
    pub fn from_request(slot: u8, value: &serde_json::Value) -> CoreResult<DiscPiece> {
        let disc_id = value
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CoreError::Parse("disc is missing 'id'".to_string()))?;
        let rarity_code = value
            .get("rarity")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CoreError::Parse("disc is missing 'rarity'".to_string()))?;
        let rarity = Rarity::from_code(rarity_code as u8)?;

        let stats = value
            .get("stats")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| CoreError::Parse("disc is missing 'stats'".to_string()))?;
        let levels = value
            .get("levels")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| CoreError::Parse("disc is missing 'levels'".to_string()))?;
        if stats.len() != 5 || levels.len() != 5 {
            return Err(CoreError::DomainViolation(
                "disc 'stats'/'levels' must each have exactly 5 entries (1 main + 4 sub)".to_string(),
            ));
        }

        let stat_id = |v: &serde_json::Value| -> CoreResult<StatId> {
            v.as_str()
                .ok_or_else(|| CoreError::Parse("disc stat entry must be a string".to_string()))
                .and_then(StatId::parse)
        };

        let main_id = stat_id(&stats[0])?;
        let mut builder = DiscPieceBuilder::new()
            .set_disc_id(disc_id)
            .set_slot(slot)
            .set_rarity(rarity)
            .set_main_stat(main_id)?;

        for i in 1..5 {
            let sub_id = stat_id(&stats[i])?;
            let level = levels[i]
                .as_u64()
                .ok_or_else(|| CoreError::Parse("disc sub-stat level must be an integer".to_string()))?
                as u8;
            builder = builder.add_sub_stat(sub_id, level)?;
        }

        builder.get_product()
    }
}
