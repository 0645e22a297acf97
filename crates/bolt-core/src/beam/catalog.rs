//! Zap catalog: identifiers, entries and bolt configuration

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{error, warn};

use super::bolt::{Bolt, BoltGlyph, Colour};
use super::dice::{DamageFormula, DiceDef, ToHitFormula};
use super::flavour::{BoltTag, Flavour};
use crate::consts::AUTOMATIC_HIT;
use crate::error::{CatalogError, Result};
use crate::rng::GameRng;

/// Zap identifiers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum ZapType {
    #[default]
    Flame = 0,
    Frost,
    Slowing,
    Hasting,
    MagicDarts,
    Healing,
    Paralysis,
    Fire,
    Cold,
    Confusion,
    Invisibility,
    Digging,
    Fireball,
    Teleportation,
    Lightning,
    PolymorphOther,
    VenomBolt,
    NegativeEnergy,
    CrystalSpear,
    BeamOfEnergy,
    MysticBlast,
    Enslavement,
    Pain,
    StickyFlame,
    DispelUndead,
    CleansingFlame,
    BoneShards,
    Banishment,
    Degeneration,
    Sting,
    Hellfire,
    IronBolt,
    Striking,
    StoneArrow,
    Electricity,
    OrbOfElectricity,
    SpitPoison,
    DebuggingRay,
    BreatheFire,
    BreatheFrost,
    BreatheAcid,
    BreathePoison,
    BreathePower,
    EnslaveUndead,
    Agony,
    Disruption,
    Disintegration,
    BreatheSteam,
    ControlDemon,
    OrbOfFragmentation,
    IceBolt,
    IceStorm,
    Backlight,
    Sleep,
    FlameTongue,
    Sandblast,
    SmallSandblast,
    Magma,
    PoisonArrow,
    Petrify,
    Blink,
}

/// One row of the zap table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZapEntry {
    pub id: ZapType,
    /// `None` for effects that only apply a status and keep the caller's name
    pub name: Option<&'static str>,
    /// Power is clamped to this before formulas run; 0 means uncapped
    pub power_cap: i32,
    pub damage: DamageFormula,
    /// To-hit for damage zaps, enchantment power for enchantments
    pub tohit: ToHitFormula,
    pub colour: Colour,
    pub is_enchantment: bool,
    pub flavour: Flavour,
    pub glyph: BoltGlyph,
    pub always_obvious: bool,
    pub can_beam: bool,
    pub is_explosion: bool,
    pub tag: Option<BoltTag>,
}

/// Validated lookup table of zap entries
#[derive(Debug, Clone, Default)]
pub struct ZapCatalog {
    entries: HashMap<ZapType, ZapEntry>,
}

impl ZapCatalog {
    /// Build a catalog, rejecting duplicates and misclassified entries
    pub fn new(entries: impl IntoIterator<Item = ZapEntry>) -> Result<Self> {
        let mut map = HashMap::new();
        for entry in entries {
            if entry.is_enchantment != entry.flavour.is_enchantment() {
                let err = CatalogError::ClassificationMismatch {
                    zap: entry.id,
                    flavour: entry.flavour,
                    marked: entry.is_enchantment,
                    actual: entry.flavour.is_enchantment(),
                };
                error!("{err}");
                return Err(err);
            }
            if map.insert(entry.id, entry).is_some() {
                return Err(CatalogError::DuplicateEntry(entry.id));
            }
        }
        Ok(Self { entries: map })
    }

    pub fn lookup(&self, id: ZapType) -> Result<&ZapEntry> {
        self.entries.get(&id).ok_or(CatalogError::UnknownZap(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fill a bolt's fields for a zap at the given power
    ///
    /// An unknown id leaves a bolt that touches nothing and returns the
    /// error for the caller to report.
    pub fn configure(
        &self,
        id: ZapType,
        power: i32,
        bolt: &mut Bolt,
        inaccurate: bool,
        rng: &mut GameRng,
    ) -> Result<()> {
        let entry = match self.lookup(id) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("{err}; firing a no-op bolt");
                bolt.affects_nothing = true;
                bolt.damage = DiceDef::new(0, 0);
                bolt.hit = 0;
                bolt.flavour = Flavour::Magic;
                return Err(err);
            }
        };

        if let Some(name) = entry.name {
            bolt.name = name.to_string();
        }
        bolt.flavour = entry.flavour;
        bolt.colour = entry.colour;
        bolt.glyph = entry.glyph;
        bolt.obvious_effect = entry.always_obvious;
        bolt.is_beam = entry.can_beam;
        bolt.is_explosion = entry.is_explosion;
        bolt.tag = entry.tag;

        let power = if entry.power_cap > 0 {
            power.min(entry.power_cap)
        } else {
            power
        };

        debug_assert_eq!(entry.is_enchantment, bolt.is_enchantment());

        if entry.is_enchantment {
            bolt.ench_power = entry.tohit.evaluate(power).unwrap_or(power);
            bolt.hit = AUTOMATIC_HIT;
        } else {
            bolt.hit = entry.tohit.evaluate(power).unwrap_or(0);
            if inaccurate {
                bolt.hit = (bolt.hit - 5).max(0);
            }
        }

        if let Some(damage) = entry.damage.evaluate(power, rng) {
            bolt.damage = damage;
        }

        // ice storm radius scales with raw power
        if entry.tag == Some(BoltTag::GreatBlastOfCold) {
            bolt.ench_power = power;
        }
        Ok(())
    }
}
