//! Flavour-specific damage adjustment
//!
//! [`adjust_flavoured`] is pure in [`ResolveMode::DryRun`]: it draws no
//! randomness and produces no side effects, and the damage it returns is
//! always the same as [`ResolveMode::Apply`] returns for the same inputs.
//! The tracer relies on that to predict hits.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::bolt::Bolt;
use super::flavour::Flavour;
use super::report::ResistOutcome;
use crate::actor::{Actor, ActorChange, ActorFlags, Holiness, Status};
use crate::rng::GameRng;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum ResolveMode {
    /// Numbers only
    #[default]
    DryRun = 0,
    /// Numbers plus side effects and narration
    Apply = 1,
}

/// Damage after resistance, and what else the flavour does
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavourResolution {
    pub damage: i32,
    pub outcome: ResistOutcome,
    pub effects: Vec<ActorChange>,
    pub messages: Vec<String>,
}

/// Percentage of the damage that resistance can act on
fn resistible_percent(flavour: Flavour) -> i32 {
    match flavour {
        Flavour::Ice => 50,
        Flavour::Lava => 75,
        _ => 100,
    }
}

/// Scale raw damage by a resistance level
///
/// Level 3 removes the resistible part, positive levels divide it by
/// `1 + res²` (one more for electricity), negative levels multiply it
/// by 1.5.
pub fn resist_adjust_damage(flavour: Flavour, res: i32, raw: i32) -> i32 {
    if raw <= 0 || res == 0 {
        return raw.max(0);
    }
    let resistible = raw * resistible_percent(flavour) / 100;
    let fixed = raw - resistible;

    let adjusted = if res >= 3 {
        0
    } else if res > 0 {
        let bonus = if flavour == Flavour::Electricity { 1 } else { 0 };
        resistible / (1 + bonus + res * res)
    } else {
        resistible * 15 / 10
    };
    fixed + adjusted
}

fn verb_for(flavour: Flavour) -> &'static str {
    match flavour {
        Flavour::Fire | Flavour::Lava | Flavour::Hellfire => "burned",
        Flavour::Cold | Flavour::Ice => "frozen",
        Flavour::Electricity => "shocked",
        Flavour::Poison | Flavour::PoisonArrow => "poisoned",
        Flavour::Acid => "corroded",
        Flavour::Steam => "scalded",
        _ => "hurt",
    }
}

/// Apply `actor`'s resistances to `rolled` damage from `bolt`
pub fn adjust_flavoured(
    actor: &Actor,
    bolt: &Bolt,
    rolled: i32,
    mode: ResolveMode,
    rng: &mut GameRng,
) -> FlavourResolution {
    let flavour = bolt.flavour;
    let res = actor.res(flavour);
    let apply = mode == ResolveMode::Apply;
    let mut effects = Vec::new();
    let mut messages = Vec::new();

    let mut damage = match flavour {
        Flavour::Fire
        | Flavour::Cold
        | Flavour::Electricity
        | Flavour::Acid
        | Flavour::Steam
        | Flavour::Poison
        | Flavour::Ice
        | Flavour::Lava => resist_adjust_damage(flavour, res, rolled),
        Flavour::PoisonArrow => {
            if res > 0 {
                rolled / 2
            } else {
                rolled
            }
        }
        Flavour::Negative => {
            if res >= 3 {
                0
            } else {
                rolled
            }
        }
        Flavour::Miasma => {
            if actor.res(Flavour::Negative) >= 3 {
                0
            } else {
                rolled
            }
        }
        Flavour::Holy => match actor.holiness {
            Holiness::Holy => 0,
            Holiness::Undead | Holiness::Demonic => rolled * 3 / 2,
            Holiness::Natural | Holiness::Nonliving => rolled / 2,
        },
        Flavour::Hellfire => {
            let fire = actor.res(Flavour::Fire);
            if fire > 2 {
                0
            } else if fire > 0 {
                rolled / 2
            } else if fire < 0 {
                rolled * 12 / 10
            } else {
                rolled
            }
        }
        _ => rolled,
    };

    // ice creatures melt
    let melts = actor.flags.contains(ActorFlags::ICY) && flavour.is_fiery() && damage > 0;
    if melts {
        damage = damage * 3 / 2;
    }
    let outcome = ResistOutcome::classify(rolled, damage);

    if apply {
        match flavour {
            Flavour::PoisonArrow => effects.push(ActorChange::AddStatus {
                status: Status::Poisoned,
                duration: if res > 0 { 2 } else { 4 },
            }),
            Flavour::Poison if res <= 0 && !rng.one_chance_in(3) => {
                effects.push(ActorChange::AddStatus {
                    status: Status::Poisoned,
                    duration: 1,
                });
            }
            Flavour::Negative if res < 3 => {
                let lose_level = rng.one_chance_in(5);
                let max_hp = 2 + rng.random2(3);
                let hp = 2 + rng.random2(3);
                effects.push(ActorChange::Drain {
                    max_hp,
                    hp,
                    lose_level,
                });
                effects.push(ActorChange::AddStatus {
                    status: Status::Drained,
                    duration: 1,
                });
            }
            Flavour::Miasma => {
                let res_neg = actor.res(Flavour::Negative);
                if res_neg < 3 {
                    if actor.res(Flavour::Poison) <= 0 {
                        effects.push(ActorChange::AddStatus {
                            status: Status::Poisoned,
                            duration: 1,
                        });
                    }
                    if rng.one_chance_in(3 + 2 * res_neg.max(0)) {
                        effects.push(ActorChange::AddStatus {
                            status: Status::Slow,
                            duration: 5 + rng.random2(5),
                        });
                    }
                }
            }
            Flavour::Holy if matches!(actor.holiness, Holiness::Undead | Holiness::Demonic) => {
                messages.push(format!("{} {} in agony!", actor.cap_name(), actor.conj("writhe")));
            }
            _ => {}
        }

        if melts {
            messages.push(format!("{} {}!", actor.cap_name(), actor.conj("melt")));
        } else if rolled > 0 && !flavour.is_enchantment() {
            match outcome {
                ResistOutcome::Unharmed => {
                    messages.push(format!("{} {} unharmed.", actor.cap_name(), actor.conj("be")));
                }
                ResistOutcome::PartiallyResisted if res > 0 => {
                    messages.push(format!("{} {}.", actor.cap_name(), actor.conj("resist")));
                }
                ResistOutcome::Amplified => {
                    messages.push(format!(
                        "{} {} {} terribly!",
                        actor.cap_name(),
                        actor.conj("be"),
                        verb_for(flavour)
                    ));
                }
                _ => {}
            }
        }
    }

    FlavourResolution {
        damage,
        outcome,
        effects,
        messages,
    }
}

/// Whether a damage bolt could not hurt `actor` at all
pub(crate) fn is_harmless(bolt: &Bolt, actor: &Actor) -> bool {
    match bolt.flavour {
        // ICY melting multiplies what resistance left, so full resistance
        // is still harmless
        Flavour::Fire
        | Flavour::Cold
        | Flavour::Steam
        | Flavour::Electricity
        | Flavour::Poison
        | Flavour::Acid => actor.res(bolt.flavour) >= 3,
        Flavour::Negative | Flavour::Miasma => actor.res(Flavour::Negative) == 3,
        Flavour::Holy => actor.holiness == Holiness::Holy,
        Flavour::Digging | Flavour::LineOfSight => true,
        _ => false,
    }
}
