//! Bolt flavours and behaviour tags

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::{CloudKind, Terrain};

/// The kind of energy a bolt carries
///
/// Damage flavours come first; everything from [`Flavour::Slow`] on is an
/// enchantment that works through side effects and a saving throw.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Flavour {
    #[default]
    Magic = 0,
    Missile = 1,
    MagicMissile = 2,
    Fire = 3,
    Cold = 4,
    Electricity = 5,
    Poison = 6,
    Negative = 7,
    Acid = 8,
    Steam = 9,
    Energy = 10,
    Holy = 11,
    /// Shrapnel; armour applies twice
    Frag = 12,
    Lava = 13,
    Ice = 14,
    Hellfire = 15,
    PoisonArrow = 16,
    Miasma = 17,
    /// Wall-shattering blast
    Nuke = 18,
    /// Picks a damage flavour per cell
    Random = 19,
    /// Detection only; touches nothing
    LineOfSight = 20,

    Slow = 21,
    Haste = 22,
    Healing = 23,
    Paralysis = 24,
    Confusion = 25,
    Invisibility = 26,
    Digging = 27,
    Teleport = 28,
    Polymorph = 29,
    Charm = 30,
    Banish = 31,
    Degenerate = 32,
    EnslaveUndead = 33,
    EnslaveDemon = 34,
    Pain = 35,
    DispelUndead = 36,
    Disintegration = 37,
    Blink = 38,
    Sleep = 39,
    Backlight = 40,
    Petrify = 41,
}

impl Flavour {
    /// Flavours a [`Flavour::Random`] bolt chooses from at each cell
    pub const RANDOM_CHOICES: [Flavour; 7] = [
        Flavour::Fire,
        Flavour::Cold,
        Flavour::Magic,
        Flavour::Electricity,
        Flavour::Poison,
        Flavour::Negative,
        Flavour::Acid,
    ];

    pub const fn is_enchantment(&self) -> bool {
        (*self as u8) >= Flavour::Slow as u8
    }

    pub const fn is_fiery(&self) -> bool {
        matches!(self, Flavour::Fire | Flavour::Hellfire | Flavour::Lava)
    }

    /// Enchantments that target allies and never need a saving throw
    pub const fn is_nice(&self) -> bool {
        matches!(self, Flavour::Haste | Flavour::Healing | Flavour::Invisibility)
    }

    /// Whether a bolt of this flavour reflects off the given surface
    pub const fn is_bouncy(&self, terrain: Terrain) -> bool {
        if self.is_enchantment() {
            return false;
        }
        match self {
            Flavour::Electricity => !matches!(terrain, Terrain::MetalWall),
            Flavour::Fire | Flavour::Cold => matches!(terrain, Terrain::GreenCrystalWall),
            _ => false,
        }
    }
}

/// Special behaviour attached to a handful of named effects
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum BoltTag {
    /// Clinging flame that keeps burning after the hit
    #[default]
    StickyFlame = 0,
    /// Hot enough to melt wax walls outright
    SuperhotBolt = 1,
    Hellfire = 2,
    Fireball = 3,
    GoldenFlame = 4,
    OrbOfElectricity = 5,
    OrbOfEnergy = 6,
    MetalOrb = 7,
    BlastOfShrapnel = 8,
    GreatBlastOfCold = 9,
    IceStorm = 10,
    BallOfVapour = 11,
    StinkingCloud = 12,
    BlastOfPoison = 13,
    FoulVapour = 14,
    FreezingBlast = 15,
    BallOfSteam = 16,
    PoisonGas = 17,
    GreatBlastOfFire = 18,
    /// Pain that halves hit points instead of rolling damage
    Agony = 19,
}

impl BoltTag {
    /// Stops at the aimed cell even though it is not an explosion
    pub const fn terminates_on_target(&self) -> bool {
        matches!(
            self,
            BoltTag::BlastOfPoison | BoltTag::FoulVapour | BoltTag::BallOfVapour
        )
    }

    /// Explodes at the end of its path even without the explosion flag
    pub const fn detonates(&self) -> bool {
        matches!(
            self,
            BoltTag::OrbOfElectricity
                | BoltTag::MetalOrb
                | BoltTag::GreatBlastOfCold
                | BoltTag::BallOfVapour
        )
    }

    /// Cloud kind scattered by a big-cloud detonation
    pub fn big_cloud_kind(&self, flavour: Flavour) -> Option<CloudKind> {
        match self {
            BoltTag::BlastOfPoison => Some(CloudKind::Poison),
            BoltTag::FoulVapour if flavour == Flavour::Miasma => Some(CloudKind::Miasma),
            BoltTag::FoulVapour => Some(CloudKind::Stink),
            BoltTag::FreezingBlast => Some(CloudKind::Cold),
            _ => None,
        }
    }
}
