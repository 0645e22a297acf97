//! Enchantments cast on everything in view at once

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::enchant::{check_resist_magic, status_duration};
use super::flavour::Flavour;
use crate::actor::{Actor, ActorChange, ActorId, Attitude, Holiness, Status};
use crate::consts::MAG_IMMUNE;
use crate::world::{Env, MsgChannel, World};

/// Mass enchantment power never exceeds this
const MASS_POWER_CAP: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MassEnchantResult {
    pub affected: i32,
    pub resisted: i32,
}

/// Apply an enchantment to every visible actor that is not friendly
///
/// `caster` is never affected by its own spell.
pub fn mass_enchantment(
    world: &mut dyn World,
    env: &mut Env<'_>,
    flavour: Flavour,
    power: i32,
    caster: Option<ActorId>,
) -> MassEnchantResult {
    let power = power.min(MASS_POWER_CAP);
    let mut result = MassEnchantResult::default();

    for id in world.actor_ids() {
        if Some(id) == caster {
            continue;
        }
        let Some(actor) = world.actor(id).cloned() else {
            continue;
        };
        if actor.is_player
            || !actor.is_present()
            || actor.attitude == Attitude::Friendly
            || !world.observer_sees(actor.pos)
            || actor.magic_resistance >= MAG_IMMUNE
        {
            continue;
        }

        if check_resist_magic(&actor, power, env.rng) {
            env.narration
                .emit(MsgChannel::Plain, &format!("{} resists.", actor.cap_name()));
            result.resisted += 1;
            continue;
        }

        if let Some(text) = enchant_one(world, env, id, &actor, flavour, power) {
            env.narration.emit(MsgChannel::Plain, &text);
            result.affected += 1;
        }
    }

    debug!(
        flavour = %flavour,
        power,
        affected = result.affected,
        resisted = result.resisted,
        "mass enchantment"
    );
    if result.affected == 0 && result.resisted == 0 {
        env.narration.emit(MsgChannel::Plain, "Nothing happens.");
    }
    result
}

/// Returns the narration when the actor was affected
fn enchant_one(
    world: &mut dyn World,
    env: &mut Env<'_>,
    id: ActorId,
    actor: &Actor,
    flavour: Flavour,
    power: i32,
) -> Option<String> {
    let name = actor.cap_name();
    let (status, text) = match flavour {
        Flavour::Charm => (Status::Charmed, format!("{name} is charmed.")),
        Flavour::Confusion => (Status::Confused, format!("{name} appears confused.")),
        Flavour::Slow => (Status::Slow, format!("{name} seems to slow down.")),
        Flavour::Paralysis => (Status::Paralysed, format!("{name} suddenly stops moving!")),
        Flavour::Sleep => {
            if actor.holiness != Holiness::Natural
                || actor.res(Flavour::Cold) > 0
                || actor.statuses.has(Status::Asleep)
            {
                return None;
            }
            (Status::Asleep, format!("{name} falls asleep!"))
        }
        Flavour::EnslaveUndead => {
            if actor.holiness != Holiness::Undead {
                return None;
            }
            world.apply_change(id, ActorChange::SetAttitude(Attitude::Friendly));
            return Some(format!("{name} is enslaved."));
        }
        Flavour::DispelUndead => {
            if actor.holiness != Holiness::Undead {
                return None;
            }
            let amount = env.rng.roll_dice(1, power / 2);
            world.apply_change(id, ActorChange::Damage { amount });
            if world.actor(id).is_some_and(|a| !a.is_alive()) {
                return Some(format!("{name} is destroyed!"));
            }
            return Some(format!("{name} convulses!"));
        }
        _ => return None,
    };
    let duration = status_duration(power, env.rng);
    world.apply_change(id, ActorChange::AddStatus { status, duration });
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Coord, Level};
    use crate::options::EngineOptions;
    use crate::rng::GameRng;
    use crate::world::{MessageLog, Unattended};

    fn cast(level: &mut Level, flavour: Flavour, power: i32) -> (MassEnchantResult, MessageLog) {
        let mut rng = GameRng::new(12);
        let mut log = MessageLog::new();
        let mut prompter = Unattended;
        let options = EngineOptions::default();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        let caster = level.player();
        let result = mass_enchantment(level, &mut env, flavour, power, caster);
        (result, log)
    }

    #[test]
    fn test_skips_friends_and_the_immune() {
        let mut level = Level::new(10, 10);
        level.add_actor(Actor::player(Coord::new(5, 5)));
        let dog = level.add_actor(
            Actor::monster("dog", Coord::new(6, 5)).with_attitude(Attitude::Friendly),
        );
        let golem = level.add_actor(
            Actor::monster("golem", Coord::new(4, 5)).with_magic_resistance(MAG_IMMUNE),
        );
        let orc = level.add_actor(Actor::monster("orc", Coord::new(5, 6)));

        let (result, log) = cast(&mut level, Flavour::Confusion, 1000);
        assert_eq!(result, MassEnchantResult { affected: 1, resisted: 0 });
        assert!(level.actor(orc).unwrap().statuses.has(Status::Confused));
        assert!(!level.actor(dog).unwrap().statuses.has(Status::Confused));
        assert!(!level.actor(golem).unwrap().statuses.has(Status::Confused));
        assert!(log.contains("The orc appears confused."));
    }

    #[test]
    fn test_unseen_actors_are_spared() {
        let mut level = Level::new(10, 10);
        let orc = level.add_actor(Actor::monster("orc", Coord::new(2, 2)));
        level.hide(Coord::new(2, 2));
        let (result, log) = cast(&mut level, Flavour::Slow, 1000);
        assert_eq!(result.affected, 0);
        assert!(!level.actor(orc).unwrap().statuses.has(Status::Slow));
        assert!(log.contains("Nothing happens."));
    }

    #[test]
    fn test_mass_sleep_needs_natural_warm_blooded() {
        let mut level = Level::new(10, 10);
        let zombie = level.add_actor(
            Actor::monster("zombie", Coord::new(1, 1)).with_holiness(Holiness::Undead),
        );
        let rat = level.add_actor(Actor::monster("rat", Coord::new(2, 1)));
        let (result, _) = cast(&mut level, Flavour::Sleep, 1000);
        assert_eq!(result.affected, 1);
        assert!(level.actor(rat).unwrap().statuses.has(Status::Asleep));
        assert!(!level.actor(zombie).unwrap().statuses.has(Status::Asleep));
    }

    #[test]
    fn test_mass_enslave_undead() {
        let mut level = Level::new(10, 10);
        let mummy = level.add_actor(
            Actor::monster("mummy", Coord::new(1, 1)).with_holiness(Holiness::Undead),
        );
        let (result, log) = cast(&mut level, Flavour::EnslaveUndead, 1000);
        assert_eq!(result.affected, 1);
        assert_eq!(level.actor(mummy).unwrap().attitude, Attitude::Friendly);
        assert!(log.contains("The mummy is enslaved."));
    }

    #[test]
    fn test_dispel_undead_damage_is_bounded_by_power() {
        let mut level = Level::new(10, 10);
        let ghoul = level.add_actor(
            Actor::monster("ghoul", Coord::new(1, 1))
                .with_holiness(Holiness::Undead)
                .with_hp(500),
        );
        // power is capped at 200, so at most 1d100
        cast(&mut level, Flavour::DispelUndead, 1000);
        let hp = level.actor(ghoul).unwrap().hp;
        assert!((400..500).contains(&hp));
    }
}
