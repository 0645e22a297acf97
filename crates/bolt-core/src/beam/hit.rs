//! To-hit rolls and the range a hit consumes

use super::bolt::Bolt;
use super::flavour::{BoltTag, Flavour};
use super::report::RangeCost;
use crate::consts::AUTOMATIC_HIT;
use crate::rng::GameRng;

/// Whether an attack of accuracy `attack` lands against `defence` evasion
pub fn test_beam_hit(attack: i32, defence: i32, rng: &mut GameRng) -> bool {
    attack == AUTOMATIC_HIT || rng.random2(attack) >= rng.random2avg(defence, 2)
}

/// Shields can stop this bolt
pub(crate) fn is_blockable(bolt: &Bolt) -> bool {
    !bolt.is_beam && !bolt.is_explosion && bolt.flavour != Flavour::Electricity
}

/// Range used up when the bolt reaches an actor
pub fn range_used_on_hit(bolt: &Bolt) -> RangeCost {
    if !bolt.is_beam {
        return RangeCost::Stop;
    }
    if bolt.is_enchantment() {
        return if bolt.flavour == Flavour::Digging {
            RangeCost::NONE
        } else {
            RangeCost::Stop
        };
    }
    if bolt.has_tag(BoltTag::Hellfire) {
        return RangeCost::NONE;
    }
    if bolt.is_explosion || bolt.is_big_cloud {
        return RangeCost::Stop;
    }
    match bolt.flavour {
        Flavour::Acid => RangeCost::Stop,
        Flavour::Lava => RangeCost::Extra(1),
        Flavour::Electricity => RangeCost::NONE,
        _ => RangeCost::Extra(2),
    }
}
