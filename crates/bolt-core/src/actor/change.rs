//! Actor mutations
//!
//! Every change the engine makes to an actor is expressed as an
//! [`ActorChange`] and routed through [`crate::world::World::apply_change`],
//! so a real world and a tracer shadow apply them identically.

use serde::{Deserialize, Serialize};

use super::{Attitude, Status};
use crate::dungeon::Coord;

/// A single mutation of an actor record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorChange {
    Damage { amount: i32 },
    Heal { amount: i32 },
    SetHp(i32),
    AddStatus { status: Status, duration: i32 },
    RemoveStatus(Status),
    SetAttitude(Attitude),
    MoveTo(Coord),
    Banish,
    /// Become a new creature of the given power
    Polymorph { hit_dice: i32 },
    /// Life drain from negative energy
    Drain {
        max_hp: i32,
        hp: i32,
        lose_level: bool,
    },
}
