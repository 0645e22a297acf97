//! Actors: the player and monsters share one record
//!
//! The engine addresses actors through opaque [`ActorId`] handles handed
//! out by the world; it never holds references into the actor table across
//! a mutation.

mod change;
mod status;

pub use change::ActorChange;
pub use status::{Status, StatusSet};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::beam::Flavour;
use crate::dungeon::Coord;

/// Stable handle for an actor record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Disposition toward the player
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Attitude {
    #[default]
    Hostile = 0,
    Neutral = 1,
    Friendly = 2,
}

impl Attitude {
    pub const fn wont_attack(&self) -> bool {
        matches!(self, Attitude::Friendly)
    }

    /// Whether two sides count as the same team for tracer bookkeeping
    pub const fn aligned_with(&self, other: Attitude) -> bool {
        (self.wont_attack() && other.wont_attack()) || *self as u8 == other as u8
    }
}

/// Spiritual nature, used by holy and necromantic effects
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Holiness {
    #[default]
    Natural = 0,
    Undead = 1,
    Demonic = 2,
    Holy = 3,
    Nonliving = 4,
}

bitflags! {
    /// Intrinsic actor properties
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ActorFlags: u32 {
        /// Made of ice; melts under fire
        const ICY            = 0x0001;
        const SEE_INVISIBLE  = 0x0002;
        const INVISIBLE      = 0x0004;
        /// Under water or lava; only spot-aimed bolts reach it
        const SUBMERGED      = 0x0008;
        const UNIQUE         = 0x0010;
        const SUMMONED       = 0x0020;
        /// Weighs friendly fire before casting
        const SMART          = 0x0040;
        /// Animated statue; disintegration shatters it
        const STATUE         = 0x0080;
        const NO_POLY        = 0x0100;
        /// Embedded in a wall that shields it from bolts
        const WALL_SHIELDED  = 0x0200;
        /// Thrower's aim is impaired
        const INACCURATE     = 0x0400;
        const UNCONFUSABLE   = 0x0800;
        const STATIONARY     = 0x1000;
    }
}

/// Resistance levels, each in -1..=3 (3 is immunity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Resistances {
    pub fire: i8,
    pub cold: i8,
    pub elec: i8,
    pub poison: i8,
    pub negative: i8,
    pub acid: i8,
    pub steam: i8,
}

impl Resistances {
    /// Resistance level that applies against a flavour (0 when none does)
    pub fn for_flavour(&self, flavour: Flavour) -> i32 {
        let level = match flavour {
            Flavour::Fire | Flavour::Lava | Flavour::Hellfire => self.fire,
            Flavour::Cold | Flavour::Ice => self.cold,
            Flavour::Electricity => self.elec,
            Flavour::Poison | Flavour::PoisonArrow => self.poison,
            Flavour::Negative | Flavour::Miasma => self.negative,
            Flavour::Acid => self.acid,
            Flavour::Steam => self.steam,
            _ => 0,
        };
        i32::from(level)
    }
}

/// A creature the engine can hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    pub name: String,
    pub is_player: bool,
    pub pos: Coord,
    pub attitude: Attitude,
    pub holiness: Holiness,
    pub hp: i32,
    pub max_hp: i32,
    /// Monster hit dice, or the player's experience level
    pub hit_dice: i32,
    pub ac: i32,
    pub ev: i32,
    pub shield: i32,
    pub shield_penalty: i32,
    pub magic_resistance: i32,
    pub resists: Resistances,
    pub flags: ActorFlags,
    pub statuses: StatusSet,
    pub banished: bool,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            name: String::from("monster"),
            is_player: false,
            pos: Coord::ORIGIN,
            attitude: Attitude::Hostile,
            holiness: Holiness::Natural,
            hp: 10,
            max_hp: 10,
            hit_dice: 1,
            ac: 0,
            ev: 0,
            shield: 0,
            shield_penalty: 0,
            magic_resistance: 0,
            resists: Resistances::default(),
            flags: ActorFlags::empty(),
            statuses: StatusSet::new(),
            banished: false,
        }
    }
}

impl Actor {
    /// A hostile monster
    pub fn monster(name: &str, pos: Coord) -> Self {
        Self {
            name: name.to_string(),
            pos,
            ..Self::default()
        }
    }

    /// The player character
    pub fn player(pos: Coord) -> Self {
        Self {
            name: String::from("you"),
            is_player: true,
            pos,
            attitude: Attitude::Friendly,
            hp: 20,
            max_hp: 20,
            ..Self::default()
        }
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self.max_hp = hp;
        self
    }

    pub fn with_hit_dice(mut self, hd: i32) -> Self {
        self.hit_dice = hd;
        self
    }

    pub fn with_attitude(mut self, attitude: Attitude) -> Self {
        self.attitude = attitude;
        self
    }

    pub fn with_holiness(mut self, holiness: Holiness) -> Self {
        self.holiness = holiness;
        self
    }

    pub fn with_defence(mut self, ac: i32, ev: i32) -> Self {
        self.ac = ac;
        self.ev = ev;
        self
    }

    pub fn with_resists(mut self, resists: Resistances) -> Self {
        self.resists = resists;
        self
    }

    pub fn with_flags(mut self, flags: ActorFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_magic_resistance(mut self, mr: i32) -> Self {
        self.magic_resistance = mr;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Alive and on the level
    pub fn is_present(&self) -> bool {
        self.is_alive() && !self.banished
    }

    pub fn is_invisible(&self) -> bool {
        self.flags.contains(ActorFlags::INVISIBLE) || self.statuses.has(Status::Invisible)
    }

    pub fn is_submerged(&self) -> bool {
        self.flags.contains(ActorFlags::SUBMERGED)
    }

    pub fn res(&self, flavour: Flavour) -> i32 {
        self.resists.for_flavour(flavour)
    }

    /// Definite name for narration: "you", a unique's name, or "the X"
    pub fn the_name(&self) -> String {
        if self.is_player {
            String::from("you")
        } else if self.flags.contains(ActorFlags::UNIQUE) {
            self.name.clone()
        } else {
            format!("the {}", self.name)
        }
    }

    /// [`Actor::the_name`] with a leading capital
    pub fn cap_name(&self) -> String {
        let name = self.the_name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => name,
        }
    }

    /// Conjugate a verb for this actor as the subject
    pub fn conj(&self, verb: &str) -> String {
        match (verb, self.is_player) {
            ("be", true) => String::from("are"),
            ("be", false) => String::from("is"),
            (_, true) => verb.to_string(),
            (v, false) if v.ends_with('s') || v.ends_with("sh") || v.ends_with("ch") => {
                format!("{v}es")
            }
            (v, false) => format!("{v}s"),
        }
    }

    /// Apply one change to this record
    pub fn apply(&mut self, change: &ActorChange) {
        match change {
            ActorChange::Damage { amount } => self.hp -= (*amount).max(0),
            ActorChange::Heal { amount } => {
                self.hp = (self.hp + (*amount).max(0)).min(self.max_hp);
            }
            ActorChange::SetHp(hp) => self.hp = (*hp).min(self.max_hp),
            ActorChange::AddStatus { status, duration } => self.statuses.add(*status, *duration),
            ActorChange::RemoveStatus(status) => {
                self.statuses.remove(*status);
            }
            ActorChange::SetAttitude(attitude) => self.attitude = *attitude,
            ActorChange::MoveTo(pos) => self.pos = *pos,
            ActorChange::Banish => self.banished = true,
            ActorChange::Polymorph { hit_dice } => {
                let old = self.hit_dice.max(1);
                let hd = (*hit_dice).max(1);
                self.max_hp = (self.max_hp * hd / old).max(1);
                self.hp = self.hp.min(self.max_hp).max(1);
                self.hit_dice = hd;
            }
            ActorChange::Drain {
                max_hp,
                hp,
                lose_level,
            } => {
                self.max_hp = (self.max_hp - max_hp).max(1);
                self.hp = (self.hp - hp).min(self.max_hp);
                if *lose_level {
                    self.hit_dice = (self.hit_dice - 1).max(1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        assert!(Attitude::Friendly.aligned_with(Attitude::Friendly));
        assert!(Attitude::Hostile.aligned_with(Attitude::Hostile));
        assert!(!Attitude::Neutral.aligned_with(Attitude::Hostile));
        assert!(!Attitude::Friendly.aligned_with(Attitude::Neutral));
    }

    #[test]
    fn test_resistance_lookup() {
        let res = Resistances {
            fire: 2,
            cold: -1,
            ..Resistances::default()
        };
        assert_eq!(res.for_flavour(Flavour::Fire), 2);
        assert_eq!(res.for_flavour(Flavour::Lava), 2);
        assert_eq!(res.for_flavour(Flavour::Ice), -1);
        assert_eq!(res.for_flavour(Flavour::Magic), 0);
    }

    #[test]
    fn test_names_and_verbs() {
        let orc = Actor::monster("orc", Coord::new(1, 1));
        assert_eq!(orc.the_name(), "the orc");
        assert_eq!(orc.cap_name(), "The orc");
        assert_eq!(orc.conj("resist"), "resists");
        assert_eq!(orc.conj("be"), "is");

        let you = Actor::player(Coord::ORIGIN);
        assert_eq!(you.cap_name(), "You");
        assert_eq!(you.conj("block"), "block");
        assert_eq!(you.conj("be"), "are");

        let boss = Actor::monster("Sigmund", Coord::ORIGIN).with_flags(ActorFlags::UNIQUE);
        assert_eq!(boss.the_name(), "Sigmund");
    }

    #[test]
    fn test_apply_damage_and_heal() {
        let mut orc = Actor::monster("orc", Coord::ORIGIN).with_hp(12);
        orc.apply(&ActorChange::Damage { amount: 5 });
        assert_eq!(orc.hp, 7);
        orc.apply(&ActorChange::Heal { amount: 50 });
        assert_eq!(orc.hp, 12);
        orc.apply(&ActorChange::Damage { amount: 20 });
        assert!(!orc.is_alive());
        assert!(!orc.is_present());
    }

    #[test]
    fn test_apply_polymorph_scales_hp() {
        let mut orc = Actor::monster("orc", Coord::ORIGIN)
            .with_hp(20)
            .with_hit_dice(4);
        orc.apply(&ActorChange::Polymorph { hit_dice: 2 });
        assert_eq!(orc.hit_dice, 2);
        assert_eq!(orc.max_hp, 10);
        assert_eq!(orc.hp, 10);
    }

    #[test]
    fn test_apply_drain() {
        let mut you = Actor::player(Coord::ORIGIN).with_hit_dice(5);
        you.apply(&ActorChange::Drain {
            max_hp: 3,
            hp: 2,
            lose_level: true,
        });
        assert_eq!(you.max_hp, 17);
        assert_eq!(you.hp, 17);
        assert_eq!(you.hit_dice, 4);
    }
}
