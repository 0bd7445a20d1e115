//! The damage calculator: stat aggregation plus the skill/anomaly formulas
//! that turn a resolved loadout and rotation into numbers.

mod calculator;
mod request;

pub use calculator::{aggregate_stats, anomaly_damage, calculate, skill_damage, DamageStep};
pub use request::DamageRequest;
