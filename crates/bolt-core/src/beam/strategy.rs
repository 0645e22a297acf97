//! Flavour strategies
//!
//! Each flavour category resolves walls and actors its own way. The
//! dispatcher only ever talks to a [`FlavourStrategy`], picked by
//! [`Flavour::strategy`].

use super::bolt::Bolt;
use super::fire::Traversal;
use super::flavour::Flavour;
use super::report::RangeCost;
use super::{damage, enchant, resist, wall};
use crate::actor::{Actor, ActorId};
use crate::dungeon::{Coord, Terrain};

pub(crate) trait FlavourStrategy: Sync {
    /// Whether this bolt changes the given wall material
    fn affects_wall(&self, _bolt: &Bolt, _terrain: Terrain) -> bool {
        false
    }

    /// Change a wall; returns the extra range used
    fn resolve_wall(&self, _cx: &mut Traversal<'_, '_>, _pos: Coord) -> RangeCost {
        RangeCost::NONE
    }

    /// Whether a hit could not hurt this actor, so no prompt is needed
    fn is_harmless(&self, bolt: &Bolt, actor: &Actor) -> bool;

    /// Resolve the bolt against an actor; returns the extra range used
    fn resolve_actor(&self, cx: &mut Traversal<'_, '_>, id: ActorId) -> RangeCost;
}

/// Rolled damage, reduced by resistance and armour
struct DamageStrategy;

/// Side effects behind a saving throw
struct EnchantmentStrategy;

/// Tunnels through rock, ignores actors
struct WallStrategy;

/// Detection only
struct NullStrategy;

static DAMAGE: DamageStrategy = DamageStrategy;
static ENCHANTMENT: EnchantmentStrategy = EnchantmentStrategy;
static WALL: WallStrategy = WallStrategy;
static NULL: NullStrategy = NullStrategy;

impl Flavour {
    pub(crate) fn strategy(&self) -> &'static dyn FlavourStrategy {
        match self {
            Flavour::LineOfSight => &NULL,
            Flavour::Digging => &WALL,
            f if f.is_enchantment() => &ENCHANTMENT,
            _ => &DAMAGE,
        }
    }
}

impl FlavourStrategy for DamageStrategy {
    fn affects_wall(&self, bolt: &Bolt, terrain: Terrain) -> bool {
        (bolt.flavour.is_fiery() && terrain == Terrain::WaxWall) || bolt.flavour == Flavour::Nuke
    }

    fn resolve_wall(&self, cx: &mut Traversal<'_, '_>, pos: Coord) -> RangeCost {
        if cx.bolt.flavour == Flavour::Nuke {
            wall::disintegrate(cx, pos)
        } else {
            wall::melt_wax(cx, pos)
        }
    }

    fn is_harmless(&self, bolt: &Bolt, actor: &Actor) -> bool {
        resist::is_harmless(bolt, actor)
    }

    fn resolve_actor(&self, cx: &mut Traversal<'_, '_>, id: ActorId) -> RangeCost {
        damage::resolve(cx, id)
    }
}

impl FlavourStrategy for EnchantmentStrategy {
    fn affects_wall(&self, bolt: &Bolt, _terrain: Terrain) -> bool {
        bolt.flavour == Flavour::Disintegration && bolt.damage.num >= 3
    }

    fn resolve_wall(&self, cx: &mut Traversal<'_, '_>, pos: Coord) -> RangeCost {
        wall::disintegrate(cx, pos)
    }

    fn is_harmless(&self, bolt: &Bolt, actor: &Actor) -> bool {
        !enchant::nasty_beam(actor, bolt)
    }

    fn resolve_actor(&self, cx: &mut Traversal<'_, '_>, id: ActorId) -> RangeCost {
        enchant::resolve(cx, id)
    }
}

impl FlavourStrategy for WallStrategy {
    fn affects_wall(&self, _bolt: &Bolt, _terrain: Terrain) -> bool {
        true
    }

    fn resolve_wall(&self, cx: &mut Traversal<'_, '_>, pos: Coord) -> RangeCost {
        wall::dig(cx, pos)
    }

    fn is_harmless(&self, _bolt: &Bolt, _actor: &Actor) -> bool {
        true
    }

    fn resolve_actor(&self, _cx: &mut Traversal<'_, '_>, _id: ActorId) -> RangeCost {
        RangeCost::NONE
    }
}

impl FlavourStrategy for NullStrategy {
    fn is_harmless(&self, _bolt: &Bolt, _actor: &Actor) -> bool {
        true
    }

    fn resolve_actor(&self, _cx: &mut Traversal<'_, '_>, _id: ActorId) -> RangeCost {
        RangeCost::NONE
    }
}
