//! The stat grid and its entry types.

mod grid;
mod stat;

pub use grid::StatGrid;
pub use stat::{Qualifier, RegularStat, RelativeStat, Stat};
