//! Pins the worked numeric damage scenarios against the calculator's
//! formula implementations.

use std::sync::Arc;

use calc_core::damage::{calculate, DamageRequest};
use calc_core::enums::{Element, Rarity, Speciality, StatId, Tag};
use calc_core::equipment::ability::{Ability, Anomaly, Scale, Skill};
use calc_core::equipment::{AgentBuilder, Enemy, QualifiedStat, Rotation, WeaponBuilder};
use calc_core::stats::{Qualifier, Stat, StatGrid};
use calc_core::CoreError;

const EPSILON: f64 = 1e-2;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

fn zero_weapon() -> QualifiedStat {
    QualifiedStat {
        qualifier: Qualifier::new(StatId::AtkFlat, Tag::Universal),
        stat: Stat::regular(0.0),
    }
}

fn baseline_enemy(res: f64) -> Enemy {
    Enemy {
        dmg_reduction: 0.2,
        defense: 953.0,
        stun_mult: 1.5,
        res: [res; 5],
        is_stunned: false,
    }
}

fn baseline_weapon() -> Arc<calc_core::equipment::Weapon> {
    Arc::new(
        WeaponBuilder::new()
            .set_id(1)
            .set_name("Training Saber")
            .set_rarity(Rarity::S)
            .set_speciality(Speciality::Attack)
            .set_main_stat(zero_weapon())
            .set_sub_stat(zero_weapon())
            .get_product()
            .unwrap(),
    )
}

fn basic_skill(element: Element) -> Ability {
    Ability::Skill(Skill {
        name: "basic_1".to_string(),
        tags: vec![Tag::Basic],
        scales: vec![Scale {
            motion_value: 100.0,
            daze: 0.0,
            element,
        }],
        buffs: None,
    })
}

fn agent_with_stats(element: Element, stats: StatGrid) -> Arc<calc_core::equipment::Agent> {
    Arc::new(
        AgentBuilder::new()
            .set_id(1)
            .set_name("Test Subject")
            .set_speciality(Speciality::Attack)
            .set_element(element)
            .set_rarity(Rarity::S)
            .set_stats(stats)
            .add_ability(basic_skill(element))
            .get_product()
            .unwrap(),
    )
}

fn request_for(
    agent: Arc<calc_core::equipment::Agent>,
    enemy: Enemy,
    rotation_cell: &str,
) -> DamageRequest {
    DamageRequest {
        agent,
        weapon: baseline_weapon(),
        discs: Vec::new(),
        rotation: Rotation::parse(rotation_cell).unwrap(),
        set_counts: Vec::new(),
        enemy,
    }
}

#[test]
fn scenario_1_no_stats_no_buffs_baseline_enemy() {
    let mut stats = StatGrid::new();
    stats.add_regular(StatId::AtkBase, Tag::Universal, 100.0);

    let agent = agent_with_stats(Element::Physical, stats);
    let enemy = baseline_enemy(0.2);
    let request = request_for(agent, enemy, "basic_1 1");

    let (total, steps) = calculate(&request).unwrap();
    assert_eq!(steps.len(), 1);
    assert_close(total, 58.175);
}

#[test]
fn scenario_2_stunned_enemy() {
    let mut stats = StatGrid::new();
    stats.add_regular(StatId::AtkBase, Tag::Universal, 100.0);

    let agent = agent_with_stats(Element::Physical, stats);
    let mut enemy = baseline_enemy(0.2);
    enemy.is_stunned = true;
    let request = request_for(agent, enemy, "basic_1 1");

    let (total, _) = calculate(&request).unwrap();
    assert_close(total, 72.719);
}

#[test]
fn scenario_3_crit_contribution() {
    let mut stats = StatGrid::new();
    stats.add_regular(StatId::AtkBase, Tag::Universal, 100.0);
    stats.add_regular(StatId::CritRate, Tag::Universal, 0.5);
    stats.add_regular(StatId::CritDmg, Tag::Universal, 1.0);

    let agent = agent_with_stats(Element::Physical, stats);
    let enemy = baseline_enemy(0.2);
    let request = request_for(agent, enemy, "basic_1 1");

    let (total, _) = calculate(&request).unwrap();
    assert_close(total, 87.263);
}

#[test]
fn scenario_4_elemental_ratio_stacking() {
    let mut stats = StatGrid::new();
    stats.add_regular(StatId::AtkBase, Tag::Universal, 100.0);
    stats.add_regular(StatId::DmgRatio, Tag::Universal, 0.1);
    stats.add_regular(StatId::FireRatio, Tag::Universal, 0.2);

    let agent = agent_with_stats(Element::Fire, stats);
    let enemy = baseline_enemy(0.2);
    let request = request_for(agent, enemy, "basic_1 1");

    let (total, _) = calculate(&request).unwrap();
    assert_close(total, 75.628);
}

#[test]
fn scenario_5_anomaly_no_ap_default_scales() {
    let mut stats = StatGrid::new();
    stats.add_regular(StatId::AtkBase, Tag::Universal, 100.0);
    stats.add_regular(StatId::Ap, Tag::Universal, 100.0);

    let anomaly = Ability::Anomaly(Anomaly {
        name: "anomaly_proc".to_string(),
        scale: 500.0,
        element: None,
        buffs: None,
        can_crit: false,
    });

    let agent = Arc::new(
        AgentBuilder::new()
            .set_id(1)
            .set_name("Test Subject")
            .set_speciality(Speciality::Anomaly)
            .set_element(Element::Physical)
            .set_rarity(Rarity::S)
            .set_stats(stats)
            .add_ability(anomaly)
            .get_product()
            .unwrap(),
    );
    let enemy = baseline_enemy(0.2);
    let request = request_for(agent, enemy, "anomaly_proc");

    let (total, _) = calculate(&request).unwrap();
    assert_close(total, 581.75);
}

#[test]
fn scenario_6_missing_ability_is_fatal() {
    let agent = agent_with_stats(Element::Physical, StatGrid::new());
    let enemy = baseline_enemy(0.2);
    let request = request_for(agent, enemy, "nonexistent_ability 1");

    let err = calculate(&request).unwrap_err();
    assert!(matches!(err, CoreError::MissingKey(_)));
}
