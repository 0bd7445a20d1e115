//! Stat aggregation and the skill/anomaly damage formulas.

use tracing::debug;

use crate::enums::{StatId, Tag};
use crate::equipment::ability::{Ability, Anomaly, Scale, Skill};
use crate::equipment::enemy::{buff_level_mult, LEVEL_COEFFICIENT};
use crate::equipment::Enemy;
use crate::error::{CoreError, CoreResult};
use crate::stats::StatGrid;

use super::request::DamageRequest;

/// One rotation cell's resolved damage, for the detailed response shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageStep {
    pub damage: f64,
    pub tags: Vec<Tag>,
    pub ability_name: String,
}

/// Fold every equipped item's stats into one grid: agent, weapon
/// (main/sub/passive), each disc's stats, and any 2pc/4pc set bonuses.
pub fn aggregate_stats(request: &DamageRequest) -> StatGrid {
    let mut grid = request.agent.stats.clone();

    grid.add(
        request.weapon.main_stat.qualifier.clone(),
        request.weapon.main_stat.stat.clone(),
    );
    grid.add(
        request.weapon.sub_stat.qualifier.clone(),
        request.weapon.sub_stat.stat.clone(),
    );
    grid.add_grid(request.weapon.passive_stats.clone());

    for disc in &request.discs {
        grid.add_grid(disc.stats.clone());
    }

    for (set, count) in &request.set_counts {
        if *count >= 2 {
            grid.add_grid(set.p2.clone());
        }
        if *count >= 4 {
            grid.add_grid(set.p4.clone());
        }
    }

    grid
}

/// `AtkTotal = AtkBase * (1 + sum(AtkRatio, tag)) + AtkFlat`, written back
/// into `stats` under `(AtkTotal, Universal)` and returned.
fn resolve_atk_total(stats: &mut StatGrid, tag: Tag) -> CoreResult<f64> {
    let atk_base = stats.get(StatId::AtkBase, Tag::Universal)?;
    let atk_ratio = stats.get_summed(StatId::AtkRatio, tag)?;
    let atk_flat = stats.get(StatId::AtkFlat, Tag::Universal)?;
    let atk_total = atk_base * (1.0 + atk_ratio) + atk_flat;
    *stats.at(StatId::AtkTotal, Tag::Universal) = atk_total;
    Ok(atk_total)
}

fn stun_multiplier(enemy: &Enemy) -> f64 {
    // The second factor is `enemy.stun_mult` when stunned and a flat `1`
    // otherwise, rather than `1` in both branches — kept as-is.
    1.0 + if enemy.is_stunned { enemy.stun_mult } else { 1.0 }
}

fn defense_multiplier(enemy: &Enemy, def_pen_ratio: f64, def_pen_flat: f64) -> f64 {
    let mitigated = (enemy.defense * (1.0 - def_pen_ratio) - def_pen_flat).max(0.0);
    LEVEL_COEFFICIENT / (mitigated + LEVEL_COEFFICIENT)
}

pub fn skill_damage(stats: &StatGrid, skill: &Skill, scale: &Scale, enemy: &Enemy) -> CoreResult<f64> {
    let tag = *skill
        .tags
        .first()
        .ok_or_else(|| CoreError::DomainViolation(format!("skill {} has no tags", skill.name)))?;

    let mut stats = stats.clone();
    if let Some(buffs) = &skill.buffs {
        stats.add_grid(buffs.clone());
    }

    let atk_total = resolve_atk_total(&mut stats, tag)?;
    let base = scale.motion_value / 100.0 * atk_total;
    let crit = 1.0
        + stats.get_summed(StatId::CritRate, tag)? * stats.get_summed(StatId::CritDmg, tag)?;
    let dmg_ratio = 1.0
        + stats.get_summed(StatId::DmgRatio, tag)?
        + stats.get_summed(StatId::DmgRatio.with_element(scale.element), tag)?;
    let taken = 1.0 - enemy.dmg_reduction + stats.get_summed(StatId::Vulnerability, tag)?;
    let def_mult = defense_multiplier(
        enemy,
        stats.get_summed(StatId::DefPenRatio, tag)?,
        stats.get_summed(StatId::DefPenFlat, tag)?,
    );
    let res_mult = 1.0 - enemy.res[scale.element.index()]
        + stats.get_summed(StatId::ResPen, tag)?
        + stats.get_summed(StatId::ResPen.with_element(scale.element), tag)?;
    let stun = stun_multiplier(enemy);

    let result = base * crit * dmg_ratio * taken * def_mult * res_mult * stun;
    debug!(skill = %skill.name, result, "skill damage resolved");
    Ok(result)
}

pub fn anomaly_damage(
    stats: &StatGrid,
    agent_element: crate::enums::Element,
    anomaly: &Anomaly,
    enemy: &Enemy,
) -> CoreResult<f64> {
    let element = anomaly.element.unwrap_or(agent_element);
    let tag = Tag::Anomaly;

    let mut stats = stats.clone();
    if let Some(buffs) = &anomaly.buffs {
        stats.add_grid(buffs.clone());
    }

    let atk_total = resolve_atk_total(&mut stats, tag)?;
    let base = anomaly.scale / 100.0 * atk_total;

    let crit = if anomaly.can_crit {
        1.0 + stats.get(StatId::CritRate, Tag::Anomaly)? * stats.get(StatId::CritDmg, Tag::Anomaly)?
    } else {
        1.0
    };

    let dmg_ratio = 1.0
        + stats.get(StatId::DmgRatio, Tag::Universal)?
        + stats.get(StatId::DmgRatio.with_element(element), Tag::Universal)?;
    let anom_mult = 1.0
        + stats.get(StatId::DmgRatio, Tag::Anomaly)?
        + stats.get(StatId::DmgRatio.with_element(element), Tag::Anomaly)?;
    let ap_mult = stats.get(StatId::Ap, Tag::Universal)? / 100.0;

    let taken = 1.0 - enemy.dmg_reduction + stats.get_summed(StatId::Vulnerability, tag)?;
    let def_mult = defense_multiplier(
        enemy,
        stats.get_summed(StatId::DefPenRatio, tag)?,
        stats.get_summed(StatId::DefPenFlat, tag)?,
    );
    let res_mult = 1.0 - enemy.res[element.index()]
        + stats.get_summed(StatId::ResPen, tag)?
        + stats.get_summed(StatId::ResPen.with_element(element), tag)?;
    let stun = stun_multiplier(enemy);

    let result = base
        * crit
        * dmg_ratio
        * anom_mult
        * ap_mult
        * buff_level_mult()
        * taken
        * def_mult
        * res_mult
        * stun;
    debug!(anomaly = %anomaly.name, result, "anomaly damage resolved");
    Ok(result)
}

/// Run the full rotation against `request`, returning `(total, per-cell steps)`.
pub fn calculate(request: &DamageRequest) -> CoreResult<(f64, Vec<DamageStep>)> {
    let stats = aggregate_stats(request);
    let mut steps = Vec::with_capacity(request.rotation.cells.len());

    for cell in &request.rotation.cells {
        let ability = request.agent.ability(&cell.command)?;
        let (damage, tags) = match ability {
            Ability::Skill(skill) => {
                let scale_row = cell.index.checked_sub(1).and_then(|i| skill.scales.get(i as usize)).ok_or_else(|| {
                    CoreError::DomainViolation(format!(
                        "skill {} has no scale row at index {}",
                        skill.name, cell.index
                    ))
                })?;
                (skill_damage(&stats, skill, scale_row, &request.enemy)?, skill.tags.clone())
            }
            Ability::Anomaly(anomaly) => (
                anomaly_damage(&stats, request.agent.element, anomaly, &request.enemy)?,
                vec![Tag::Anomaly],
            ),
        };

        steps.push(DamageStep {
            damage,
            tags,
            ability_name: ability.name().to_string(),
        });
    }

    let total = steps.iter().map(|step| step.damage).sum();
    Ok((total, steps))
}
