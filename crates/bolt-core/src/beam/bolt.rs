//! The bolt: configuration, in-flight geometry and tracer accumulators

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::dice::DiceDef;
use super::flavour::{BoltTag, Flavour};
use super::ray::Ray;
use crate::actor::{ActorId, Attitude};
use crate::dungeon::Coord;
use crate::world::World;

/// Display colour of a bolt
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Colour {
    #[default]
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGrey = 7,
    DarkGrey = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    LightMagenta = 13,
    Yellow = 14,
    White = 15,
}

/// How a bolt is drawn in flight
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum BoltGlyph {
    /// Invisible in flight
    #[default]
    Space = 0,
    Zap = 1,
    Bolt = 2,
    Missile = 3,
    Debug = 4,
}

impl BoltGlyph {
    pub const fn symbol(&self) -> char {
        match self {
            BoltGlyph::Space => ' ',
            BoltGlyph::Zap => '*',
            BoltGlyph::Bolt => '#',
            BoltGlyph::Missile => ')',
            BoltGlyph::Debug => 'X',
        }
    }
}

/// Who is responsible for a bolt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Thrower {
    /// Traps, clouds and other unowned sources
    #[default]
    Environment,
    Player,
    Monster(ActorId),
}

impl Thrower {
    pub const fn is_player(&self) -> bool {
        matches!(self, Thrower::Player)
    }

    /// Actor record of the thrower, if it has one
    pub fn actor_id(&self, world: &dyn World) -> Option<ActorId> {
        match self {
            Thrower::Environment => None,
            Thrower::Player => world.player(),
            Thrower::Monster(id) => Some(*id),
        }
    }
}

/// Exposure counts for one side of a tracer run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub count: i32,
    /// Sum of exposed hit dice
    pub power: i32,
    pub hurt: i32,
    pub helped: i32,
}

/// Prompt categories already confirmed during this traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DontStop {
    pub player: bool,
    pub friend: bool,
    pub foe: bool,
}

/// A projectile, beam or area effect in flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bolt {
    pub name: String,
    pub flavour: Flavour,
    pub tag: Option<BoltTag>,
    pub colour: Colour,
    pub glyph: BoltGlyph,

    pub damage: DiceDef,
    pub hit: i32,
    pub ench_power: i32,

    /// Passes through actors it hits
    pub is_beam: bool,
    pub is_explosion: bool,
    pub is_big_cloud: bool,
    pub affects_nothing: bool,
    /// Stops at the aimed cell instead of flying on
    pub aimed_at_spot: bool,
    pub ex_size: i32,

    pub source: Coord,
    pub target: Coord,
    pub pos: Coord,
    pub range: i32,
    pub chose_ray: Option<Ray>,

    pub thrower: Thrower,
    pub item: Option<String>,
    pub bounces: i32,
    pub reflections: i32,

    pub is_tracer: bool,
    pub aimed_at_feet: bool,
    pub effect_known: bool,
    pub in_explosion_phase: bool,

    pub can_see_invis: bool,
    pub smart_monster: bool,
    pub foe_ratio: i32,
    pub attitude: Attitude,

    pub friend_info: Tally,
    pub foe_info: Tally,
    pub cancelled: bool,
    pub dont_stop: DontStop,
    pub obvious_effect: bool,
    pub msg_generated: bool,
}

impl Default for Bolt {
    fn default() -> Self {
        Self {
            name: String::new(),
            flavour: Flavour::Magic,
            tag: None,
            colour: Colour::White,
            glyph: BoltGlyph::Zap,
            damage: DiceDef::new(0, 0),
            hit: 0,
            ench_power: 0,
            is_beam: false,
            is_explosion: false,
            is_big_cloud: false,
            affects_nothing: false,
            aimed_at_spot: false,
            ex_size: 0,
            source: Coord::ORIGIN,
            target: Coord::ORIGIN,
            pos: Coord::ORIGIN,
            range: 0,
            chose_ray: None,
            thrower: Thrower::Environment,
            item: None,
            bounces: 0,
            reflections: 0,
            is_tracer: false,
            aimed_at_feet: false,
            effect_known: true,
            in_explosion_phase: false,
            can_see_invis: false,
            smart_monster: false,
            foe_ratio: 0,
            attitude: Attitude::Hostile,
            friend_info: Tally::default(),
            foe_info: Tally::default(),
            cancelled: false,
            dont_stop: DontStop::default(),
            obvious_effect: false,
            msg_generated: false,
        }
    }
}

/// Configuration fields a tracer run may touch and must put back
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BoltConfig {
    hit: i32,
    flavour: Flavour,
    name: String,
    tag: Option<BoltTag>,
    ex_size: i32,
    target: Coord,
    damage: DiceDef,
}

impl Bolt {
    /// A bolt from `source` aimed at `target`
    pub fn new(name: &str, flavour: Flavour, source: Coord, target: Coord) -> Self {
        Self {
            name: name.to_string(),
            flavour,
            source,
            target,
            pos: source,
            ..Self::default()
        }
    }

    pub const fn is_enchantment(&self) -> bool {
        self.flavour.is_enchantment()
    }

    pub fn has_tag(&self, tag: BoltTag) -> bool {
        self.tag == Some(tag)
    }

    /// Engulfing effects cannot be dodged or blocked
    pub const fn engulfs(&self) -> bool {
        self.is_explosion || self.is_big_cloud
    }

    /// Zero the outcome accumulators before a fresh traversal
    pub fn reset_tally(&mut self) {
        self.friend_info = Tally::default();
        self.foe_info = Tally::default();
        self.cancelled = false;
        self.obvious_effect = false;
        self.msg_generated = false;
    }

    pub(crate) fn snapshot(&self) -> BoltConfig {
        BoltConfig {
            hit: self.hit,
            flavour: self.flavour,
            name: self.name.clone(),
            tag: self.tag,
            ex_size: self.ex_size,
            target: self.target,
            damage: self.damage,
        }
    }

    pub(crate) fn restore(&mut self, config: BoltConfig) {
        self.hit = config.hit;
        self.flavour = config.flavour;
        self.name = config.name;
        self.tag = config.tag;
        self.ex_size = config.ex_size;
        self.target = config.target;
        self.damage = config.damage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_tally() {
        let mut bolt = Bolt::new("zap", Flavour::Electricity, Coord::ORIGIN, Coord::new(3, 0));
        bolt.foe_info.count = 3;
        bolt.friend_info.power = 7;
        bolt.cancelled = true;
        bolt.reset_tally();
        assert_eq!(bolt.foe_info, Tally::default());
        assert_eq!(bolt.friend_info, Tally::default());
        assert!(!bolt.cancelled);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut bolt = Bolt::new("metal orb", Flavour::Frag, Coord::ORIGIN, Coord::new(4, 4));
        bolt.tag = Some(BoltTag::MetalOrb);
        bolt.hit = 20;
        let saved = bolt.snapshot();
        bolt.name = String::from("blast of shrapnel");
        bolt.tag = Some(BoltTag::BlastOfShrapnel);
        bolt.hit = 14;
        bolt.target = Coord::new(2, 2);
        bolt.restore(saved);
        assert_eq!(bolt.name, "metal orb");
        assert!(bolt.has_tag(BoltTag::MetalOrb));
        assert_eq!(bolt.hit, 20);
        assert_eq!(bolt.target, Coord::new(4, 4));
    }

    #[test]
    fn test_bolt_serde_roundtrip() {
        let bolt = Bolt::new("bolt of fire", Flavour::Fire, Coord::new(1, 1), Coord::new(5, 1));
        let json = serde_json::to_string(&bolt).unwrap();
        let back: Bolt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bolt);
    }
}
