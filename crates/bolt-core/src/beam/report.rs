//! What a traversal did

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::explosion::ExplosionSummary;
use crate::actor::ActorId;
use crate::dungeon::Coord;

/// Why the propagation loop ended
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Termination {
    #[default]
    RangeExhausted = 0,
    /// A cell's effects used up the bolt
    Stopped = 1,
    /// Ended at the aimed cell
    ReachedTarget = 2,
    /// A wall it could neither pass nor bounce off
    Blocked = 3,
    OutOfBounds = 4,
    AimedAtFeet = 5,
    /// The caller declined a confirmation prompt
    Cancelled = 6,
}

/// Extra range a cell consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeCost {
    Extra(i32),
    /// Nothing continues past this cell
    Stop,
}

impl RangeCost {
    pub const NONE: RangeCost = RangeCost::Extra(0);

    pub const fn is_stop(&self) -> bool {
        matches!(self, RangeCost::Stop)
    }

    /// Combine two costs; a stop dominates
    pub const fn plus(self, other: RangeCost) -> RangeCost {
        match (self, other) {
            (RangeCost::Extra(a), RangeCost::Extra(b)) => RangeCost::Extra(a + b),
            _ => RangeCost::Stop,
        }
    }
}

/// One visited cell and the range left after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub pos: Coord,
    pub range_after: i32,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum HitOutcome {
    #[default]
    Hit = 0,
    Missed = 1,
    Blocked = 2,
}

/// How resistance changed the rolled damage
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum ResistOutcome {
    /// Reduced to zero
    Unharmed = 0,
    PartiallyResisted = 1,
    #[default]
    NotReduced = 2,
    Amplified = 3,
}

impl ResistOutcome {
    pub const fn classify(rolled: i32, resisted: i32) -> ResistOutcome {
        if rolled == 0 {
            ResistOutcome::NotReduced
        } else if resisted == 0 {
            ResistOutcome::Unharmed
        } else if resisted < rolled {
            ResistOutcome::PartiallyResisted
        } else if resisted == rolled {
            ResistOutcome::NotReduced
        } else {
            ResistOutcome::Amplified
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum EnchantResult {
    #[default]
    Affected = 0,
    Resisted = 1,
    Unaffected = 2,
    /// Reached the actor but had no enchantment-specific outcome
    Other = 3,
}

/// The outcome of a bolt meeting an actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub actor: ActorId,
    pub pos: Coord,
    pub hit: HitOutcome,
    pub rolled: i32,
    /// Damage after resistance, before armour
    pub resisted: i32,
    pub final_damage: i32,
    pub resist: ResistOutcome,
    pub enchantment: Option<EnchantResult>,
    pub explosion_phase: bool,
}

impl Resolution {
    pub(crate) fn new(actor: ActorId, pos: Coord, explosion_phase: bool) -> Self {
        Self {
            actor,
            pos,
            hit: HitOutcome::Hit,
            rolled: 0,
            resisted: 0,
            final_damage: 0,
            resist: ResistOutcome::NotReduced,
            enchantment: None,
            explosion_phase,
        }
    }
}

/// Everything observable about one traversal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalReport {
    pub termination: Termination,
    pub path: Vec<PathStep>,
    pub resolutions: Vec<Resolution>,
    pub killed: Vec<ActorId>,
    pub explosion: Option<ExplosionSummary>,
    pub final_pos: Coord,
    pub range_remaining: i32,
    pub bounces: i32,
}

impl TraversalReport {
    pub fn is_cancelled(&self) -> bool {
        self.termination == Termination::Cancelled
    }

    /// Resolutions that landed on a given actor
    pub fn resolutions_for(&self, actor: ActorId) -> impl Iterator<Item = &Resolution> {
        self.resolutions.iter().filter(move |r| r.actor == actor)
    }

    pub fn total_damage(&self) -> i32 {
        self.resolutions.iter().map(|r| r.final_damage).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_cost_plus() {
        assert_eq!(RangeCost::Extra(2).plus(RangeCost::Extra(3)), RangeCost::Extra(5));
        assert_eq!(RangeCost::Extra(2).plus(RangeCost::Stop), RangeCost::Stop);
        assert!(RangeCost::Stop.plus(RangeCost::NONE).is_stop());
    }

    #[test]
    fn test_resist_classification() {
        assert_eq!(ResistOutcome::classify(0, 0), ResistOutcome::NotReduced);
        assert_eq!(ResistOutcome::classify(10, 0), ResistOutcome::Unharmed);
        assert_eq!(ResistOutcome::classify(10, 4), ResistOutcome::PartiallyResisted);
        assert_eq!(ResistOutcome::classify(10, 10), ResistOutcome::NotReduced);
        assert_eq!(ResistOutcome::classify(10, 15), ResistOutcome::Amplified);
    }
}
