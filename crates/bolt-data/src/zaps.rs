//! Zap definitions
//!
//! One row per [`ZapType`]. Damage rows carry a display name and a to-hit
//! formula; enchantment rows leave the name unset so the caster's own name
//! for the effect survives configuration.

use bolt_core::beam::{
    BoltGlyph, BoltTag, Colour, DamageFormula, Flavour, ToHitFormula, ZapCatalog, ZapEntry,
    ZapType,
};
use bolt_core::Result;
use BoltGlyph::{Bolt, Missile, Space, Zap};
use DamageFormula as D;
use ToHitFormula as H;

/// A damaging zap with the usual defaults: obvious, single target
#[allow(clippy::too_many_arguments)]
const fn zap(
    id: ZapType,
    name: &'static str,
    power_cap: i32,
    damage: DamageFormula,
    tohit: ToHitFormula,
    colour: Colour,
    flavour: Flavour,
    glyph: BoltGlyph,
) -> ZapEntry {
    ZapEntry {
        id,
        name: Some(name),
        power_cap,
        damage,
        tohit,
        colour,
        is_enchantment: false,
        flavour,
        glyph,
        always_obvious: true,
        can_beam: false,
        is_explosion: false,
        tag: None,
    }
}

/// An invisible enchantment capped at power 100
const fn ench(id: ZapType, flavour: Flavour, damage: DamageFormula, tohit: ToHitFormula) -> ZapEntry {
    ZapEntry {
        id,
        name: None,
        power_cap: 100,
        damage,
        tohit,
        colour: Colour::Black,
        is_enchantment: true,
        flavour,
        glyph: BoltGlyph::Space,
        always_obvious: false,
        can_beam: false,
        is_explosion: false,
        tag: None,
    }
}

const fn status(id: ZapType, flavour: Flavour) -> ZapEntry {
    ench(id, flavour, DamageFormula::None, ToHitFormula::None)
}

const fn beams(entry: ZapEntry) -> ZapEntry {
    ZapEntry {
        can_beam: true,
        ..entry
    }
}

const fn explodes(entry: ZapEntry) -> ZapEntry {
    ZapEntry {
        is_explosion: true,
        ..entry
    }
}

const fn subtle(entry: ZapEntry) -> ZapEntry {
    ZapEntry {
        always_obvious: false,
        ..entry
    }
}

const fn tagged(entry: ZapEntry, tag: BoltTag) -> ZapEntry {
    ZapEntry {
        tag: Some(tag),
        ..entry
    }
}

/// The zap table
pub static ZAP_DATA: &[ZapEntry] = &[
    zap(ZapType::Flame, "puff of flame", 50, D::dice(2, 4, 1, 10), H::linear(8, 1, 10), Colour::Red, Flavour::Fire, Zap),
    zap(ZapType::Frost, "puff of frost", 50, D::dice(2, 4, 1, 10), H::linear(8, 1, 10), Colour::White, Flavour::Cold, Zap),
    status(ZapType::Slowing, Flavour::Slow),
    status(ZapType::Hasting, Flavour::Haste),
    zap(ZapType::MagicDarts, "magic dart", 25, D::dice(1, 3, 1, 5), H::AUTOMATIC, Colour::LightMagenta, Flavour::MagicMissile, Zap),
    ench(ZapType::Healing, Flavour::Healing, D::dice(1, 7, 1, 3), H::None),
    status(ZapType::Paralysis, Flavour::Paralysis),
    tagged(
        beams(zap(ZapType::Fire, "bolt of fire", 200, D::calc(6, 18, 2, 3), H::linear(10, 1, 25), Colour::Red, Flavour::Fire, Zap)),
        BoltTag::SuperhotBolt,
    ),
    beams(zap(ZapType::Cold, "bolt of cold", 200, D::calc(6, 18, 2, 3), H::linear(10, 1, 25), Colour::White, Flavour::Cold, Zap)),
    status(ZapType::Confusion, Flavour::Confusion),
    status(ZapType::Invisibility, Flavour::Invisibility),
    beams(status(ZapType::Digging, Flavour::Digging)),
    tagged(
        subtle(explodes(zap(ZapType::Fireball, "fireball", 200, D::calc(3, 10, 1, 2), H::flat(40), Colour::Red, Flavour::Fire, Zap))),
        BoltTag::Fireball,
    ),
    status(ZapType::Teleportation, Flavour::Teleport),
    beams(zap(ZapType::Lightning, "bolt of lightning", 200, D::calc(1, 10, 3, 5), H::linear(7, 1, 40), Colour::LightCyan, Flavour::Electricity, Zap)),
    status(ZapType::PolymorphOther, Flavour::Polymorph),
    beams(zap(ZapType::VenomBolt, "bolt of poison", 200, D::calc(4, 15, 1, 2), H::linear(8, 1, 20), Colour::LightGreen, Flavour::Poison, Zap)),
    beams(zap(ZapType::NegativeEnergy, "bolt of negative energy", 200, D::calc(4, 15, 3, 5), H::linear(8, 1, 20), Colour::DarkGrey, Flavour::Negative, Zap)),
    zap(ZapType::CrystalSpear, "crystal spear", 200, D::calc(10, 23, 1, 1), H::linear(10, 1, 15), Colour::White, Flavour::MagicMissile, Missile),
    beams(zap(ZapType::BeamOfEnergy, "narrow beam of energy", 1000, D::calc(12, 40, 3, 2), H::flat(1), Colour::Yellow, Flavour::Energy, Zap)),
    tagged(
        zap(ZapType::MysticBlast, "orb of energy", 100, D::calc(2, 15, 2, 5), H::linear(10, 1, 7), Colour::LightMagenta, Flavour::MagicMissile, Zap),
        BoltTag::OrbOfEnergy,
    ),
    status(ZapType::Enslavement, Flavour::Charm),
    ench(ZapType::Pain, Flavour::Pain, D::dice(1, 4, 1, 5), H::linear(0, 7, 2)),
    tagged(
        zap(ZapType::StickyFlame, "sticky flame", 100, D::dice(2, 3, 1, 12), H::linear(11, 1, 10), Colour::Red, Flavour::Fire, Zap),
        BoltTag::StickyFlame,
    ),
    ench(ZapType::DispelUndead, Flavour::DispelUndead, D::calc(3, 20, 3, 4), H::linear(0, 3, 2)),
    tagged(
        beams(zap(ZapType::CleansingFlame, "golden flame", 200, D::calc(2, 20, 2, 3), H::flat(150), Colour::Yellow, Flavour::Holy, Zap)),
        BoltTag::GoldenFlame,
    ),
    // power arrives scaled by the mass of the bones
    beams(zap(ZapType::BoneShards, "spray of bone shards", 10000, D::dice(3, 2, 1, 250), H::linear(8, 1, 100), Colour::LightGrey, Flavour::Magic, Zap)),
    status(ZapType::Banishment, Flavour::Banish),
    status(ZapType::Degeneration, Flavour::Degenerate),
    zap(ZapType::Sting, "sting", 25, D::dice(1, 3, 1, 5), H::linear(8, 1, 5), Colour::Green, Flavour::Poison, Zap),
    tagged(
        explodes(zap(ZapType::Hellfire, "hellfire", 200, D::calc(3, 10, 3, 4), H::linear(20, 1, 10), Colour::Red, Flavour::Hellfire, Zap)),
        BoltTag::Hellfire,
    ),
    zap(ZapType::IronBolt, "iron bolt", 200, D::calc(9, 15, 3, 4), H::linear(7, 1, 15), Colour::LightCyan, Flavour::MagicMissile, Missile),
    zap(ZapType::Striking, "force bolt", 25, D::dice(1, 5, 0, 1), H::linear(8, 1, 10), Colour::Black, Flavour::MagicMissile, Space),
    zap(ZapType::StoneArrow, "stone arrow", 50, D::dice(2, 5, 1, 7), H::linear(8, 1, 10), Colour::LightGrey, Flavour::MagicMissile, Missile),
    beams(zap(ZapType::Electricity, "zap", 25, D::dice(1, 3, 1, 4), H::linear(8, 1, 7), Colour::LightCyan, Flavour::Electricity, Zap)),
    tagged(
        explodes(zap(ZapType::OrbOfElectricity, "orb of electricity", 200, D::calc(0, 15, 4, 5), H::flat(40), Colour::LightBlue, Flavour::Electricity, Zap)),
        BoltTag::OrbOfElectricity,
    ),
    zap(ZapType::SpitPoison, "splash of poison", 50, D::dice(1, 4, 1, 2), H::linear(5, 1, 6), Colour::Green, Flavour::Poison, Zap),
    zap(ZapType::DebuggingRay, "debugging ray", 10000, D::dice(1500, 1, 0, 1), H::flat(1500), Colour::White, Flavour::MagicMissile, BoltGlyph::Debug),
    beams(zap(ZapType::BreatheFire, "fiery breath", 50, D::dice(3, 4, 1, 3), H::linear(8, 1, 6), Colour::Red, Flavour::Fire, Zap)),
    beams(zap(ZapType::BreatheFrost, "freezing breath", 50, D::dice(3, 4, 1, 3), H::linear(8, 1, 6), Colour::White, Flavour::Cold, Zap)),
    beams(zap(ZapType::BreatheAcid, "acid", 50, D::dice(3, 3, 1, 3), H::linear(5, 1, 6), Colour::Yellow, Flavour::Acid, Zap)),
    beams(zap(ZapType::BreathePoison, "poison gas", 50, D::dice(3, 2, 1, 6), H::linear(6, 1, 6), Colour::Green, Flavour::Poison, Zap)),
    beams(zap(ZapType::BreathePower, "bolt of energy", 50, D::dice(3, 3, 1, 3), H::linear(5, 1, 6), Colour::Blue, Flavour::MagicMissile, Zap)),
    status(ZapType::EnslaveUndead, Flavour::EnslaveUndead),
    tagged(
        ench(ZapType::Agony, Flavour::Pain, D::None, H::linear(0, 5, 1)),
        BoltTag::Agony,
    ),
    ench(ZapType::Disruption, Flavour::Disintegration, D::dice(1, 4, 1, 5), H::linear(0, 3, 1)),
    beams(ench(ZapType::Disintegration, Flavour::Disintegration, D::calc(3, 15, 3, 4), H::linear(0, 5, 2))),
    beams(zap(ZapType::BreatheSteam, "ball of steam", 50, D::dice(3, 4, 1, 5), H::linear(10, 1, 10), Colour::LightGrey, Flavour::Steam, Zap)),
    ench(ZapType::ControlDemon, Flavour::EnslaveDemon, D::None, H::linear(0, 3, 2)),
    tagged(
        subtle(explodes(zap(ZapType::OrbOfFragmentation, "metal orb", 200, D::calc(3, 30, 3, 4), H::flat(20), Colour::Cyan, Flavour::Frag, Zap))),
        BoltTag::MetalOrb,
    ),
    subtle(zap(ZapType::IceBolt, "bolt of ice", 100, D::calc(3, 10, 1, 2), H::linear(9, 1, 12), Colour::White, Flavour::Ice, Zap)),
    // radius follows ench_power, which configuration sets from raw power
    tagged(
        explodes(zap(ZapType::IceStorm, "great blast of cold", 200, D::calc(7, 22, 1, 1), H::linear(20, 1, 10), Colour::Blue, Flavour::Ice, Zap)),
        BoltTag::GreatBlastOfCold,
    ),
    ZapEntry {
        colour: Colour::Blue,
        ..status(ZapType::Backlight, Flavour::Backlight)
    },
    status(ZapType::Sleep, Flavour::Sleep),
    zap(ZapType::FlameTongue, "flame", 25, D::dice(1, 8, 1, 4), H::linear(7, 1, 6), Colour::Red, Flavour::Fire, Bolt),
    zap(ZapType::Sandblast, "rocky blast", 50, D::dice(2, 4, 1, 3), H::linear(13, 1, 10), Colour::Brown, Flavour::Frag, Bolt),
    zap(ZapType::SmallSandblast, "blast of sand", 25, D::dice(1, 8, 1, 4), H::linear(8, 1, 5), Colour::Brown, Flavour::Frag, Bolt),
    tagged(
        beams(zap(ZapType::Magma, "bolt of magma", 200, D::calc(4, 10, 3, 5), H::linear(8, 1, 25), Colour::Red, Flavour::Lava, Zap)),
        BoltTag::SuperhotBolt,
    ),
    zap(ZapType::PoisonArrow, "poison arrow", 200, D::calc(4, 15, 1, 1), H::linear(5, 1, 10), Colour::LightGreen, Flavour::PoisonArrow, Missile),
    status(ZapType::Petrify, Flavour::Petrify),
    status(ZapType::Blink, Flavour::Blink),
];

/// Get the table row for a zap
pub fn get_zap(id: ZapType) -> Option<&'static ZapEntry> {
    ZAP_DATA.iter().find(|z| z.id == id)
}

/// Number of zaps in the table
pub const fn num_zaps() -> usize {
    ZAP_DATA.len()
}

/// Build a validated catalog from [`ZAP_DATA`]
pub fn standard_catalog() -> Result<ZapCatalog> {
    ZapCatalog::new(ZAP_DATA.iter().copied())
}
