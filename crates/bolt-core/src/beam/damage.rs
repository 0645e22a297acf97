//! Damage flavours against actors

use tracing::trace;

use super::fire::Traversal;
use super::flavour::{BoltTag, Flavour};
use super::hit::{is_blockable, range_used_on_hit, test_beam_hit};
use super::report::{HitOutcome, RangeCost, Resolution};
use super::resist::{ResolveMode, adjust_flavoured};
use crate::actor::{Actor, ActorChange, ActorId, Status};
use crate::consts::AUTOMATIC_HIT;

/// Effective accuracy against this actor, after invisibility and missile
/// protection
fn effective_hit(cx: &mut Traversal<'_, '_>, actor: &Actor) -> i32 {
    let mut hit = cx.bolt.hit;
    if actor.is_invisible() && !cx.bolt.can_see_invis && hit != AUTOMATIC_HIT {
        hit /= 2;
    }
    let rng = &mut *cx.env.rng;
    if cx.bolt.is_beam {
        if actor.statuses.has(Status::DeflectMissiles) {
            hit = rng.random2(hit * 2) / 3;
        } else if actor.statuses.has(Status::RepelMissiles) {
            hit -= rng.random2(hit / 2);
        }
    } else if actor.statuses.has(Status::DeflectMissiles) {
        hit = rng.random2(hit / 2);
    } else if actor.statuses.has(Status::RepelMissiles) {
        hit = rng.random2(hit);
    }
    hit
}

/// Whether the actor's shield stops a blockable bolt
fn shield_blocks(cx: &mut Traversal<'_, '_>, actor: &Actor) -> bool {
    if actor.shield <= 0 {
        return false;
    }
    let roll = cx
        .env
        .rng
        .random2(cx.bolt.hit * 130 / 100 + actor.shield_penalty);
    roll < actor.shield
}

/// Resolve a damage bolt meeting an actor
pub(super) fn resolve(cx: &mut Traversal<'_, '_>, id: ActorId) -> RangeCost {
    let Some(actor) = cx.actor(id).cloned() else {
        return RangeCost::NONE;
    };
    let engulfs = cx.bolt.engulfs();
    let mut resolution = Resolution::new(id, actor.pos, cx.bolt.in_explosion_phase);

    if actor.is_submerged() && cx.bolt.flavour == Flavour::Electricity {
        let text = format!("The {} arcs harmlessly into the water.", cx.bolt.name);
        cx.say_at(actor.pos, &text);
        resolution.hit = HitOutcome::Missed;
        cx.report.resolutions.push(resolution);
        return RangeCost::Stop;
    }

    if !engulfs && !cx.bolt.aimed_at_feet {
        if is_blockable(cx.bolt) && shield_blocks(cx, &actor) {
            let text = format!("{} {} the {}.", actor.cap_name(), actor.conj("block"), cx.bolt.name);
            cx.say_about(&actor, &text);
            resolution.hit = HitOutcome::Blocked;
            cx.report.resolutions.push(resolution);
            return RangeCost::Stop;
        }
        let hit = effective_hit(cx, &actor);
        if !test_beam_hit(hit, actor.ev, cx.env.rng) {
            let text = format!("The {} misses {}.", cx.bolt.name, actor.the_name());
            cx.say_about(&actor, &text);
            resolution.hit = HitOutcome::Missed;
            cx.report.resolutions.push(resolution);
            return RangeCost::NONE;
        }
    }

    let verb = if engulfs { "engulfs" } else { "hits" };
    let text = if actor.is_player {
        format!("The {} {verb} you!", cx.bolt.name)
    } else {
        format!("The {} {verb} {}.", cx.bolt.name, actor.the_name())
    };
    cx.say_about(&actor, &text);
    cx.bolt.obvious_effect = true;

    let rolled = cx.bolt.damage.roll(cx.env.rng);
    let predicted = adjust_flavoured(&actor, cx.bolt, rolled, ResolveMode::DryRun, cx.env.rng);
    let applied = adjust_flavoured(&actor, cx.bolt, rolled, ResolveMode::Apply, cx.env.rng);
    debug_assert_eq!(predicted.damage, applied.damage);

    let ac = actor.ac.max(0);
    let mut absorbed = cx.env.rng.random2(1 + ac);
    if cx.bolt.flavour == Flavour::Electricity {
        absorbed /= 2;
    }
    if cx.bolt.flavour == Flavour::Frag {
        absorbed += cx.env.rng.random2(1 + ac);
    }
    let mut final_damage = (predicted.damage - absorbed).max(0);
    if actor.is_submerged() {
        final_damage = final_damage * 2 / 3;
    }

    resolution.rolled = rolled;
    resolution.resisted = predicted.damage;
    resolution.final_damage = final_damage;
    resolution.resist = predicted.outcome;
    trace!(actor = %id, rolled, resisted = predicted.damage, final_damage, "damage");
    cx.report.resolutions.push(resolution);

    for message in &applied.messages {
        cx.say_about(&actor, message);
    }
    for effect in applied.effects {
        cx.world.apply_change(id, effect);
    }
    if final_damage > 0 {
        cx.world.apply_change(
            id,
            ActorChange::Damage {
                amount: final_damage,
            },
        );
        if cx.bolt.has_tag(BoltTag::StickyFlame) {
            let duration = (1 + cx.env.rng.random2(final_damage) / 2).min(4);
            cx.world.apply_change(
                id,
                ActorChange::AddStatus {
                    status: Status::StickyFlame,
                    duration,
                },
            );
        }
    }

    cx.tally_effect(&actor);
    cx.check_death(id, &actor);
    range_used_on_hit(cx.bolt)
}

impl Traversal<'_, '_> {
    /// Narrate and record an actor the bolt just killed
    pub(crate) fn check_death(&mut self, id: ActorId, before: &Actor) {
        if self.actor(id).is_some_and(|a| a.is_alive()) || !before.is_alive() {
            return;
        }
        let text = if before.is_player {
            String::from("You die...")
        } else {
            format!("{} dies!", before.cap_name())
        };
        self.say_about(before, &text);
        self.report.killed.push(id);
    }
}

#[cfg(test)]
mod tests {
    use crate::actor::{Actor, ActorFlags, Resistances, Status};
    use crate::beam::{
        Bolt, BoltTag, DiceDef, Flavour, HitOutcome, ResistOutcome, Termination, TraversalReport,
        fire_beam,
    };
    use crate::consts::AUTOMATIC_HIT;
    use crate::dungeon::{Coord, Level};
    use crate::options::EngineOptions;
    use crate::rng::GameRng;
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

    fn bolt(name: &str, flavour: Flavour, damage: DiceDef) -> Bolt {
        let mut bolt = Bolt::new(name, flavour, Coord::new(0, 1), Coord::new(6, 1));
        bolt.range = 8;
        bolt.hit = AUTOMATIC_HIT;
        bolt.damage = damage;
        bolt
    }

    #[test]
    fn test_damage_lands_and_is_recorded() {
        let mut level = Level::new(10, 3);
        let orc = level.add_actor(Actor::monster("orc", Coord::new(3, 1)).with_hp(100));
        let mut b = bolt("bolt of fire", Flavour::Fire, DiceDef::new(3, 6));
        let (report, _) = zap(&mut b, &mut level, 4);
        let hit = report.resolutions_for(orc).next().unwrap();
        assert_eq!(hit.hit, HitOutcome::Hit);
        assert!((3..=18).contains(&hit.rolled));
        assert_eq!(hit.resisted, hit.rolled);
        assert_eq!(hit.final_damage, hit.rolled);
        assert_eq!(level.actor(orc).unwrap().hp, 100 - hit.final_damage);
    }

    #[test]
    fn test_immune_actor_is_unharmed() {
        let mut level = Level::new(10, 3);
        let imp = level.add_actor(
            Actor::monster("fire elemental", Coord::new(3, 1)).with_resists(Resistances {
                fire: 3,
                ..Resistances::default()
            }),
        );
        let mut b = bolt("bolt of fire", Flavour::Fire, DiceDef::new(3, 6));
        let (report, log) = zap(&mut b, &mut level, 4);
        let hit = report.resolutions_for(imp).next().unwrap();
        assert_eq!(hit.final_damage, 0);
        assert_eq!(hit.resist, ResistOutcome::Unharmed);
        assert!(log.contains("The fire elemental is unharmed."));
        assert_eq!(level.actor(imp).unwrap().hp, 10);
    }

    #[test]
    fn test_kill_is_narrated_and_reported() {
        let mut level = Level::new(10, 3);
        let rat = level.add_actor(Actor::monster("rat", Coord::new(2, 1)).with_hp(1));
        let mut b = bolt("magic dart", Flavour::MagicMissile, DiceDef::new(3, 4));
        let (report, log) = zap(&mut b, &mut level, 2);
        assert_eq!(report.killed, vec![rat]);
        assert!(log.contains("The rat dies!"));
        assert!(level.actor_at(Coord::new(2, 1)).is_none());
        assert_eq!(report.termination, Termination::Stopped);
    }

    #[test]
    fn test_player_is_addressed_directly() {
        let mut level = Level::new(10, 3);
        level.add_actor(Actor::player(Coord::new(3, 1)).with_hp(50));
        let mut b = bolt("bolt of cold", Flavour::Cold, DiceDef::new(1, 4));
        let (_, log) = zap(&mut b, &mut level, 2);
        assert!(log.contains("The bolt of cold hits you!"));
    }

    #[test]
    fn test_shield_blocks_missile() {
        let mut level = Level::new(10, 3);
        let mut knight = Actor::monster("knight", Coord::new(3, 1)).with_hp(40);
        knight.shield = 1000;
        let knight = level.add_actor(knight);
        let mut b = bolt("magic dart", Flavour::MagicMissile, DiceDef::new(3, 4));
        b.hit = 10;
        let (report, log) = zap(&mut b, &mut level, 2);
        assert_eq!(report.resolutions_for(knight).next().unwrap().hit, HitOutcome::Blocked);
        assert!(log.contains("The knight blocks the magic dart."));
        assert_eq!(report.termination, Termination::Stopped);
    }

    #[test]
    fn test_sticky_flame_clings() {
        let mut level = Level::new(10, 3);
        let orc = level.add_actor(Actor::monster("orc", Coord::new(3, 1)).with_hp(200));
        let mut b = bolt("sticky flame", Flavour::Fire, DiceDef::new(4, 6));
        b.tag = Some(BoltTag::StickyFlame);
        zap(&mut b, &mut level, 6);
        let duration = level.actor(orc).unwrap().statuses.duration(Status::StickyFlame);
        assert!((1..=4).contains(&duration));
    }

    #[test]
    fn test_submerged_eel_shrugs_off_lightning() {
        let mut level = Level::from_rows(&["..........", "...~......", ".........."]).unwrap();
        let eel = level.add_actor(
            Actor::monster("electric eel", Coord::new(3, 1)).with_flags(ActorFlags::SUBMERGED),
        );
        let mut b = bolt("lightning bolt", Flavour::Electricity, DiceDef::new(3, 10));
        b.target = Coord::new(3, 1);
        b.aimed_at_spot = true;
        b.is_beam = true;
        let (report, log) = zap(&mut b, &mut level, 2);
        assert!(log.contains("The lightning bolt arcs harmlessly into the water."));
        assert_eq!(level.actor(eel).unwrap().hp, 10);
        assert_eq!(report.final_pos, Coord::new(3, 1));
    }

    #[test]
    fn test_invisible_target_halves_accuracy() {
        let mut level = Level::new(10, 3);
        let ghost = level.add_actor(
            Actor::monster("ghost", Coord::new(3, 1))
                .with_flags(ActorFlags::INVISIBLE)
                .with_defence(0, 1000),
        );
        let mut b = bolt("magic dart", Flavour::MagicMissile, DiceDef::new(3, 4));
        b.hit = 20;
        b.is_beam = true;
        let (report, log) = zap(&mut b, &mut level, 2);
        assert_eq!(report.resolutions_for(ghost).next().unwrap().hit, HitOutcome::Missed);
        assert!(log.contains("The magic dart misses the ghost."));
        assert_eq!(level.actor(ghost).unwrap().hp, 10);
    }
}
