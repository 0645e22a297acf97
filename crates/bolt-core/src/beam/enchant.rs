//! Enchantments against actors
//!
//! An enchantment first checks whether it can work on the actor at all,
//! then (for most flavours) offers a magic-resistance saving throw, then
//! applies its effect as one or more [`ActorChange`]s.

use super::bolt::{Bolt, Thrower};
use super::fire::Traversal;
use super::flavour::{BoltTag, Flavour};
use super::hit::range_used_on_hit;
use super::ray::check_line_of_sight;
use super::report::{EnchantResult, RangeCost, Resolution};
use crate::actor::{Actor, ActorChange, ActorFlags, ActorId, Attitude, Holiness, Status};
use crate::consts::{BLINK_RADIUS, MAG_IMMUNE, RELOCATE_TRIES};
use crate::dungeon::Coord;
use crate::rng::GameRng;

/// Squash `base` above `first_step`: every `stepping` up to `last_step`,
/// the excess over the step is halved. A negative `ceiling` means no cap.
pub fn stepdown_value(base: i32, stepping: i32, first_step: i32, last_step: i32, ceiling: i32) -> i32 {
    let mut value = base;
    if value <= first_step {
        return value;
    }
    let mut step = first_step;
    while step <= last_step && stepping > 0 {
        if value > step {
            value = (value - step) / 2 + step;
        } else {
            break;
        }
        step += stepping;
    }
    if ceiling >= 0 && value > ceiling {
        ceiling
    } else {
        value
    }
}

/// Saving throw against an enchantment of the given power; true if resisted
pub fn check_resist_magic(actor: &Actor, power: i32, rng: &mut GameRng) -> bool {
    let mr = actor.magic_resistance;
    if mr >= MAG_IMMUNE {
        return true;
    }
    // weak monsters often just fail
    if !actor.is_player && mr < 6 && rng.coinflip() {
        return false;
    }
    let power = stepdown_value(power, 30, 40, 100, 120);
    let chance = 100 + mr - power;
    let roll = rng.random2(100) + rng.random2(101);
    roll < chance
}

/// Whether the bolt would do something unwelcome to this actor
pub fn nasty_beam(actor: &Actor, bolt: &Bolt) -> bool {
    if !bolt.is_enchantment() {
        return true;
    }
    match bolt.flavour {
        Flavour::Degenerate | Flavour::Sleep => actor.holiness == Holiness::Natural,
        Flavour::DispelUndead | Flavour::EnslaveUndead => actor.holiness == Holiness::Undead,
        Flavour::Pain => actor.res(Flavour::Negative) <= 0,
        Flavour::EnslaveDemon => actor.holiness == Holiness::Demonic,
        Flavour::Haste | Flavour::Healing | Flavour::Invisibility => false,
        _ => true,
    }
}

/// Whether the bolt helps whoever it hits
pub fn nice_beam(_actor: &Actor, bolt: &Bolt) -> bool {
    bolt.flavour.is_nice()
}

/// Preconditions an enchantment needs before it can work at all
fn affects(actor: &Actor, bolt: &Bolt) -> bool {
    match bolt.flavour {
        Flavour::Polymorph => !actor.flags.contains(ActorFlags::NO_POLY),
        Flavour::Degenerate => actor.holiness == Holiness::Natural,
        Flavour::DispelUndead => actor.holiness == Holiness::Undead,
        Flavour::EnslaveUndead => actor.holiness == Holiness::Undead && !actor.is_player,
        Flavour::EnslaveDemon => actor.holiness == Holiness::Demonic && !actor.is_player,
        Flavour::Pain => actor.res(Flavour::Negative) <= 0,
        Flavour::Sleep => {
            actor.holiness == Holiness::Natural
                && !actor.statuses.has(Status::Asleep)
                && !actor.statuses.has(Status::SleepWary)
                && actor.res(Flavour::Cold) <= 0
        }
        Flavour::Teleport | Flavour::Blink => !actor.flags.contains(ActorFlags::STATIONARY),
        Flavour::Confusion => !actor.flags.contains(ActorFlags::UNCONFUSABLE),
        _ => true,
    }
}

/// No saving throw for these
fn skips_saving_throw(flavour: Flavour) -> bool {
    matches!(
        flavour,
        Flavour::Haste
            | Flavour::Healing
            | Flavour::Invisibility
            | Flavour::DispelUndead
            | Flavour::EnslaveDemon
    )
}

/// Timed status length at a given enchantment power
pub(super) fn status_duration(power: i32, rng: &mut GameRng) -> i32 {
    (power / 10).max(2) + rng.random2(5)
}

/// "You feel confused." or "The orc appears confused."
fn about(actor: &Actor, you: &str, them: &str) -> String {
    if actor.is_player {
        format!("You {you}.")
    } else {
        format!("{} {them}.", actor.cap_name())
    }
}

/// What the effect stage did
struct Effect {
    result: EnchantResult,
    damage: i32,
    stop: bool,
}

impl Effect {
    const AFFECTED: Effect = Effect {
        result: EnchantResult::Affected,
        damage: 0,
        stop: false,
    };
    const OTHER: Effect = Effect {
        result: EnchantResult::Other,
        damage: 0,
        stop: false,
    };

    fn damaged(damage: i32) -> Self {
        Self {
            damage,
            ..Self::AFFECTED
        }
    }
}

/// Resolve an enchantment meeting an actor
pub(super) fn resolve(cx: &mut Traversal<'_, '_>, id: ActorId) -> RangeCost {
    let Some(actor) = cx.actor(id).cloned() else {
        return RangeCost::NONE;
    };
    let mut resolution = Resolution::new(id, actor.pos, cx.bolt.in_explosion_phase);
    cx.tally_effect(&actor);

    let flavour = cx.bolt.flavour;
    let verdict = if !affects(&actor, cx.bolt) {
        Some(EnchantResult::Unaffected)
    } else if !cx.bolt.aimed_at_feet && !skips_saving_throw(flavour) {
        if actor.magic_resistance >= MAG_IMMUNE {
            Some(EnchantResult::Unaffected)
        } else if check_resist_magic(&actor, cx.bolt.ench_power, cx.env.rng) {
            Some(EnchantResult::Resisted)
        } else {
            None
        }
    } else {
        None
    };

    let effect = match verdict {
        Some(EnchantResult::Resisted) => {
            let text = format!("{} {}.", actor.cap_name(), actor.conj("resist"));
            cx.say_about(&actor, &text);
            cx.bolt.msg_generated = true;
            Effect {
                result: EnchantResult::Resisted,
                ..Effect::OTHER
            }
        }
        Some(result) => {
            let text = format!("{} {} unaffected.", actor.cap_name(), actor.conj("be"));
            cx.say_about(&actor, &text);
            cx.bolt.msg_generated = true;
            Effect {
                result,
                ..Effect::OTHER
            }
        }
        None => apply_effect(cx, id, &actor),
    };

    if effect.result == EnchantResult::Affected {
        cx.bolt.obvious_effect = true;
    }
    resolution.enchantment = Some(effect.result);
    resolution.final_damage = effect.damage;
    resolution.rolled = effect.damage;
    resolution.resisted = effect.damage;
    cx.report.resolutions.push(resolution);

    cx.check_death(id, &actor);
    if effect.stop {
        RangeCost::Stop
    } else {
        range_used_on_hit(cx.bolt)
    }
}

fn change(cx: &mut Traversal<'_, '_>, id: ActorId, change: ActorChange) {
    cx.world.apply_change(id, change);
}

fn add_status(cx: &mut Traversal<'_, '_>, id: ActorId, status: Status) {
    let duration = status_duration(cx.bolt.ench_power, cx.env.rng);
    change(cx, id, ActorChange::AddStatus { status, duration });
}

fn hurt(cx: &mut Traversal<'_, '_>, id: ActorId, amount: i32) -> Effect {
    if amount > 0 {
        change(cx, id, ActorChange::Damage { amount });
    }
    Effect::damaged(amount.max(0))
}

/// A random open, unoccupied cell accepted by `ok`
fn find_destination(
    cx: &mut Traversal<'_, '_>,
    mut candidate: impl FnMut(&mut GameRng) -> Coord,
    ok: impl Fn(Coord) -> bool,
) -> Option<Coord> {
    for _ in 0..RELOCATE_TRIES {
        let c = candidate(cx.env.rng);
        if cx.world.in_bounds(c) && !cx.world.is_solid(c) && cx.world.actor_at(c).is_none() && ok(c) {
            return Some(c);
        }
    }
    None
}

fn apply_effect(cx: &mut Traversal<'_, '_>, id: ActorId, actor: &Actor) -> Effect {
    let power = cx.bolt.ench_power;
    match cx.bolt.flavour {
        Flavour::Teleport => {
            let (w, h) = cx.world.dimensions();
            let from = actor.pos;
            let dest = find_destination(
                cx,
                |rng| Coord::new(rng.random2(w), rng.random2(h)),
                |c| c != from,
            );
            match dest {
                Some(c) => {
                    cx.say_about(actor, &about(actor, "suddenly disappear", "suddenly disappears!"));
                    change(cx, id, ActorChange::MoveTo(c));
                    Effect::AFFECTED
                }
                None => Effect::OTHER,
            }
        }
        Flavour::Blink => {
            let from = actor.pos;
            let world = &*cx.world;
            let visible: Vec<Coord> = (-BLINK_RADIUS..=BLINK_RADIUS)
                .flat_map(|dy| (-BLINK_RADIUS..=BLINK_RADIUS).map(move |dx| from + Coord::new(dx, dy)))
                .filter(|c| *c != from && check_line_of_sight(from, *c, world))
                .collect();
            let dest = find_destination(
                cx,
                |rng| from + Coord::new(rng.random_range(-BLINK_RADIUS, BLINK_RADIUS), rng.random_range(-BLINK_RADIUS, BLINK_RADIUS)),
                |c| visible.contains(&c),
            );
            match dest {
                Some(c) => {
                    cx.say_about(actor, &about(actor, "blink", "blinks!"));
                    change(cx, id, ActorChange::MoveTo(c));
                    Effect::AFFECTED
                }
                None => Effect::OTHER,
            }
        }
        Flavour::Polymorph => {
            if actor.is_player {
                if matches!(cx.bolt.thrower, Thrower::Monster(_)) {
                    cx.say_about(actor, "Your body twists and changes.");
                    change(
                        cx,
                        id,
                        ActorChange::AddStatus {
                            status: Status::Mutated,
                            duration: 1,
                        },
                    );
                    Effect::AFFECTED
                } else {
                    cx.say_about(actor, "Nothing happens.");
                    cx.bolt.msg_generated = true;
                    Effect::OTHER
                }
            } else {
                let hit_dice = (actor.hit_dice - 2 + cx.env.rng.random2(5)).max(1);
                cx.say_about(actor, &format!("{} changes form!", actor.cap_name()));
                change(cx, id, ActorChange::Polymorph { hit_dice });
                Effect::AFFECTED
            }
        }
        Flavour::Banish => {
            if actor.is_player && cx.bolt.thrower.is_player() {
                cx.say_about(actor, "This spell isn't strong enough to banish yourself.");
                cx.bolt.msg_generated = true;
                Effect::OTHER
            } else {
                cx.say_about(actor, &about(actor, "are banished", "vanishes!"));
                change(cx, id, ActorChange::Banish);
                Effect::AFFECTED
            }
        }
        Flavour::Degenerate => {
            cx.say_about(actor, &about(actor, "feel very weak", "degenerates into a pulsating lump!"));
            change(cx, id, ActorChange::Polymorph { hit_dice: 1 });
            Effect::AFFECTED
        }
        Flavour::DispelUndead => {
            cx.say_about(actor, &about(actor, "convulse", "convulses!"));
            let amount = cx.bolt.damage.roll(cx.env.rng);
            hurt(cx, id, amount)
        }
        Flavour::EnslaveUndead => {
            cx.say_about(actor, &format!("{} is enslaved.", actor.cap_name()));
            change(cx, id, ActorChange::SetAttitude(Attitude::Friendly));
            Effect::AFFECTED
        }
        Flavour::EnslaveDemon => {
            let unique = actor.flags.contains(ActorFlags::UNIQUE);
            if unique || actor.hit_dice * 11 / 2 >= cx.env.rng.random2(power) {
                cx.say_about(actor, &format!("{} resists.", actor.cap_name()));
                cx.bolt.msg_generated = true;
                return Effect {
                    result: EnchantResult::Resisted,
                    ..Effect::OTHER
                };
            }
            if cx.env.rng.one_chance_in(2 + actor.hit_dice / 4) {
                cx.say_about(actor, &format!("{} is enslaved.", actor.cap_name()));
                change(cx, id, ActorChange::SetAttitude(Attitude::Friendly));
            } else {
                cx.say_about(actor, &format!("{} is charmed.", actor.cap_name()));
                add_status(cx, id, Status::Charmed);
            }
            Effect::AFFECTED
        }
        Flavour::Pain => {
            cx.say_about(actor, &about(actor, "writhe in agony", "convulses in agony!"));
            if cx.bolt.has_tag(BoltTag::Agony) {
                let hp = (actor.hp / 2).max(1);
                change(cx, id, ActorChange::SetHp(hp));
                Effect::damaged(actor.hp - hp)
            } else {
                let amount = cx.bolt.damage.roll(cx.env.rng);
                hurt(cx, id, amount)
            }
        }
        Flavour::Disintegration => {
            cx.say_about(actor, &about(actor, "are blasted", "is blasted."));
            if actor.flags.contains(ActorFlags::STATUE) {
                let mut effect = hurt(cx, id, actor.hp);
                effect.stop = true;
                effect
            } else {
                let amount = cx.bolt.damage.roll(cx.env.rng);
                hurt(cx, id, amount)
            }
        }
        Flavour::Sleep => {
            cx.say_about(actor, &about(actor, "fall asleep", "falls asleep!"));
            add_status(cx, id, Status::Asleep);
            Effect::AFFECTED
        }
        Flavour::Backlight => {
            let cap = cx.env.options.max_backlight;
            let current = actor.statuses.duration(Status::Backlit);
            let wanted = cx.env.rng.random_range(15, 35);
            let duration = wanted.min(cap - current);
            if duration <= 0 {
                return Effect::OTHER;
            }
            cx.say_about(actor, &about(actor, "are outlined in light", "is outlined in light."));
            change(
                cx,
                id,
                ActorChange::AddStatus {
                    status: Status::Backlit,
                    duration,
                },
            );
            Effect::AFFECTED
        }
        Flavour::Slow => {
            if actor.statuses.has(Status::Haste) {
                cx.say_about(actor, &about(actor, "feel yourself slow down", "is no longer moving quickly."));
                change(cx, id, ActorChange::RemoveStatus(Status::Haste));
            } else {
                cx.say_about(actor, &about(actor, "feel yourself slow down", "seems to slow down."));
                add_status(cx, id, Status::Slow);
            }
            Effect::AFFECTED
        }
        Flavour::Haste => {
            if actor.statuses.has(Status::Slow) {
                cx.say_about(actor, &about(actor, "feel yourself speed up", "is no longer moving slowly."));
                change(cx, id, ActorChange::RemoveStatus(Status::Slow));
            } else {
                cx.say_about(actor, &about(actor, "feel yourself speed up", "seems to speed up."));
                add_status(cx, id, Status::Haste);
            }
            Effect::AFFECTED
        }
        Flavour::Healing => {
            let amount = 5 + cx.bolt.damage.roll(cx.env.rng);
            if actor.hp >= actor.max_hp {
                return Effect::OTHER;
            }
            cx.say_about(actor, &about(actor, "feel better", "looks healthier."));
            change(cx, id, ActorChange::Heal { amount });
            Effect::AFFECTED
        }
        Flavour::Paralysis => {
            if actor.statuses.has(Status::Paralysed) {
                return Effect::OTHER;
            }
            cx.say_about(actor, &about(actor, "suddenly stop moving", "suddenly stops moving!"));
            add_status(cx, id, Status::Paralysed);
            Effect::AFFECTED
        }
        Flavour::Petrify => {
            if actor.statuses.has(Status::Petrifying) {
                cx.say_about(actor, &about(actor, "turn to stone", "turns to stone!"));
                add_status(cx, id, Status::Petrified);
            } else {
                cx.say_about(actor, &about(actor, "are moving more slowly", "is moving more slowly."));
                add_status(cx, id, Status::Petrifying);
            }
            Effect::AFFECTED
        }
        Flavour::Confusion => {
            cx.say_about(actor, &about(actor, "feel confused", "appears confused."));
            add_status(cx, id, Status::Confused);
            Effect::AFFECTED
        }
        Flavour::Invisibility => {
            cx.say_about(actor, &about(actor, "fade into invisibility", "flickers and vanishes!"));
            add_status(cx, id, Status::Invisible);
            change(cx, id, ActorChange::RemoveStatus(Status::Backlit));
            Effect::AFFECTED
        }
        Flavour::Charm => {
            if actor.is_player {
                cx.say_about(actor, "You feel confused.");
                add_status(cx, id, Status::Confused);
            } else {
                cx.say_about(actor, &format!("{} is charmed.", actor.cap_name()));
                add_status(cx, id, Status::Charmed);
            }
            Effect::AFFECTED
        }
        _ => Effect::OTHER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::{DiceDef, Termination, TraversalReport, fire_beam};
    use crate::consts::AUTOMATIC_HIT;
    use crate::dungeon::Level;
    use crate::options::EngineOptions;
    use crate::world::{Env, MessageLog, Unattended, World};

    fn zap(bolt: &mut Bolt, level: &mut Level, seed: u64) -> (TraversalReport, MessageLog) {
        let mut rng = GameRng::new(seed);
        let mut log = MessageLog::new();
        let mut prompter = Unattended;
        let options = EngineOptions::default();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        let report = fire_beam(bolt, level, &mut env);
        (report, log)
    }

    fn ench(flavour: Flavour, power: i32) -> Bolt {
        let mut bolt = Bolt::new("spell", flavour, Coord::new(0, 1), Coord::new(6, 1));
        bolt.range = 8;
        bolt.hit = AUTOMATIC_HIT;
        bolt.ench_power = power;
        bolt.thrower = Thrower::Player;
        bolt
    }

    #[test]
    fn test_stepdown() {
        assert_eq!(stepdown_value(30, 30, 40, 100, 120), 30);
        assert_eq!(stepdown_value(50, 30, 40, 100, 120), 45);
        assert_eq!(stepdown_value(100, 30, 40, 100, 120), 70);
        assert_eq!(stepdown_value(1000, 30, 40, 100, 120), 120);
        assert_eq!(stepdown_value(1000, 30, 40, 100, -1), 187);
    }

    #[test]
    fn test_magic_immunity_always_resists() {
        let mut rng = GameRng::new(1);
        let golem = Actor::monster("golem", Coord::ORIGIN).with_magic_resistance(MAG_IMMUNE);
        for _ in 0..100 {
            assert!(check_resist_magic(&golem, 1000, &mut rng));
        }
    }

    #[test]
    fn test_huge_power_overwhelms_low_resistance() {
        let mut rng = GameRng::new(1);
        let player = Actor::player(Coord::ORIGIN);
        // chance = 100 + 0 - 120 < 0
        for _ in 0..100 {
            assert!(!check_resist_magic(&player, 1000, &mut rng));
        }
    }

    #[test]
    fn test_nasty_and_nice() {
        let orc = Actor::monster("orc", Coord::ORIGIN);
        let zombie = Actor::monster("zombie", Coord::ORIGIN).with_holiness(Holiness::Undead);
        let b = |f| Bolt::new("x", f, Coord::ORIGIN, Coord::ORIGIN);
        assert!(nasty_beam(&orc, &b(Flavour::Fire)));
        assert!(nasty_beam(&orc, &b(Flavour::Sleep)));
        assert!(!nasty_beam(&zombie, &b(Flavour::Sleep)));
        assert!(nasty_beam(&zombie, &b(Flavour::DispelUndead)));
        assert!(!nasty_beam(&orc, &b(Flavour::DispelUndead)));
        assert!(!nasty_beam(&orc, &b(Flavour::Haste)));
        assert!(nice_beam(&orc, &b(Flavour::Healing)));
        assert!(!nice_beam(&orc, &b(Flavour::Slow)));
    }

    #[test]
    fn test_slow_lands_on_weak_monster() {
        let mut level = Level::new(10, 3);
        let orc = level.add_actor(Actor::monster("orc", Coord::new(3, 1)));
        let mut bolt = ench(Flavour::Slow, 1000);
        let (report, log) = zap(&mut bolt, &mut level, 3);
        let res = report.resolutions_for(orc).next().unwrap();
        assert_eq!(res.enchantment, Some(EnchantResult::Affected));
        assert!(level.actor(orc).unwrap().statuses.has(Status::Slow));
        assert!(log.contains("The orc seems to slow down."));
        assert!(!log.contains("Nothing happens."));
        assert_eq!(report.termination, Termination::Stopped);
    }

    #[test]
    fn test_magic_immune_is_unaffected() {
        let mut level = Level::new(10, 3);
        let golem = level.add_actor(
            Actor::monster("iron golem", Coord::new(3, 1)).with_magic_resistance(MAG_IMMUNE),
        );
        let mut bolt = ench(Flavour::Paralysis, 100);
        let (report, log) = zap(&mut bolt, &mut level, 3);
        let res = report.resolutions_for(golem).next().unwrap();
        assert_eq!(res.enchantment, Some(EnchantResult::Unaffected));
        assert!(log.contains("The iron golem is unaffected."));
        assert!(!level.actor(golem).unwrap().statuses.has(Status::Paralysed));
    }

    #[test]
    fn test_sleep_needs_a_living_target() {
        let mut level = Level::new(10, 3);
        let zombie = level.add_actor(
            Actor::monster("zombie", Coord::new(3, 1)).with_holiness(Holiness::Undead),
        );
        let mut bolt = ench(Flavour::Sleep, 1000);
        let (report, _) = zap(&mut bolt, &mut level, 3);
        assert_eq!(
            report.resolutions_for(zombie).next().unwrap().enchantment,
            Some(EnchantResult::Unaffected)
        );
    }

    #[test]
    fn test_haste_cancels_slow_without_saving_throw() {
        let mut level = Level::new(10, 3);
        let mut ally = Actor::monster("dog", Coord::new(3, 1)).with_magic_resistance(MAG_IMMUNE - 1);
        ally.statuses.add(Status::Slow, 10);
        let ally = level.add_actor(ally);
        let mut bolt = ench(Flavour::Haste, 10);
        zap(&mut bolt, &mut level, 3);
        let dog = level.actor(ally).unwrap();
        assert!(!dog.statuses.has(Status::Slow));
        assert!(!dog.statuses.has(Status::Haste));
    }

    #[test]
    fn test_agony_halves_hit_points() {
        let mut level = Level::new(10, 3);
        let orc = level.add_actor(Actor::monster("orc", Coord::new(3, 1)).with_hp(40));
        let mut bolt = ench(Flavour::Pain, 1000);
        bolt.tag = Some(BoltTag::Agony);
        let (report, _) = zap(&mut bolt, &mut level, 3);
        assert_eq!(level.actor(orc).unwrap().hp, 20);
        assert_eq!(report.resolutions_for(orc).next().unwrap().final_damage, 20);
    }

    #[test]
    fn test_teleport_moves_target() {
        let mut level = Level::new(20, 20);
        let orc = level.add_actor(Actor::monster("orc", Coord::new(3, 1)));
        let mut bolt = ench(Flavour::Teleport, 1000);
        zap(&mut bolt, &mut level, 9);
        let pos = level.actor(orc).unwrap().pos;
        assert_ne!(pos, Coord::new(3, 1));
        assert_eq!(level.actor_at(pos), Some(orc));
    }

    #[test]
    fn test_disintegration_shatters_statue() {
        let mut level = Level::new(10, 3);
        let statue = level.add_actor(
            Actor::monster("ice statue", Coord::new(3, 1))
                .with_flags(ActorFlags::STATUE)
                .with_hp(80),
        );
        let mut bolt = ench(Flavour::Disintegration, 1000);
        bolt.damage = DiceDef::new(3, 15);
        let (report, log) = zap(&mut bolt, &mut level, 3);
        assert_eq!(report.killed, vec![statue]);
        assert!(log.contains("The ice statue dies!"));
    }

    #[test]
    fn test_banishing_yourself_fails() {
        let mut level = Level::new(10, 3);
        let you = level.add_actor(Actor::player(Coord::new(3, 1)));
        let mut bolt = ench(Flavour::Banish, 1000);
        bolt.source = Coord::new(3, 1);
        bolt.target = Coord::new(3, 1);
        let (_, log) = zap(&mut bolt, &mut level, 3);
        assert!(log.contains("This spell isn't strong enough to banish yourself."));
        assert!(!level.actor(you).unwrap().banished);
    }

}
