//! The resolved inputs a damage calculation runs against: everything the
//! caller's ids have already been turned into loaded definitions.

use std::sync::Arc;

use crate::equipment::{Agent, DiscPiece, DiscSet, Enemy, Rotation, Weapon};

/// A fully-resolved damage request. Building one is the server's job
/// (resolving `aid`/`wid`/disc ids through the cache); the calculator only
/// ever sees already-loaded definitions.
#[derive(Clone)]
pub struct DamageRequest {
    pub agent: Arc<Agent>,
    pub weapon: Arc<Weapon>,
    pub discs: Vec<Arc<DiscPiece>>,
    pub rotation: Rotation,
    /// Each equipped set's definition paired with how many of its pieces
    /// are present among `discs` (by matching `disc_id`).
    pub set_counts: Vec<(Arc<DiscSet>, usize)>,
    pub enemy: Enemy,
}
