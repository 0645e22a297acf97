//! Bolts that change walls

use super::fire::Traversal;
use super::flavour::{BoltTag, Flavour};
use super::report::RangeCost;
use crate::dungeon::{Cloud, CloudKind, Coord, Terrain};
use crate::world::MsgChannel;

const GRINDING: &str = "You hear a grinding noise.";

/// Hot enough to burn through wax
fn is_superhot(cx: &Traversal<'_, '_>) -> bool {
    cx.bolt.flavour.is_fiery()
        && (cx.bolt.has_tag(BoltTag::SuperhotBolt)
            || (cx.bolt.flavour == Flavour::Hellfire && cx.bolt.in_explosion_phase))
}

/// Digging turns rock into floor and lets the beam carry on
pub(super) fn dig(cx: &mut Traversal<'_, '_>, pos: Coord) -> RangeCost {
    if !cx.world.in_bounds(pos) || !cx.world.terrain(pos).is_diggable() {
        return RangeCost::NONE;
    }
    cx.world.set_terrain(pos, Terrain::Floor);
    if !cx.bolt.msg_generated {
        cx.say_once(MsgChannel::Sound, GRINDING);
        cx.bolt.obvious_effect = true;
        cx.bolt.msg_generated = true;
    }
    RangeCost::NONE
}

/// Fire against a wax wall; always stops the bolt
pub(super) fn melt_wax(cx: &mut Traversal<'_, '_>, pos: Coord) -> RangeCost {
    if cx.world.terrain(pos) != Terrain::WaxWall {
        return RangeCost::NONE;
    }
    let seen = cx.world.observer_sees(pos);

    if !is_superhot(cx) {
        if cx.bolt.flavour != Flavour::Hellfire {
            if seen {
                cx.say_once(MsgChannel::Plain, "The wax appears to soften slightly.");
            } else {
                cx.say_once(MsgChannel::Plain, "You smell warm wax.");
            }
        }
        return RangeCost::Stop;
    }

    cx.world.set_terrain(pos, Terrain::Floor);
    if seen {
        cx.say_once(MsgChannel::Plain, "The wax bubbles and burns!");
    } else {
        cx.say_once(MsgChannel::Plain, "You smell burning wax.");
    }
    let duration = cx.env.rng.random2(10) + 15;
    let source = cx.bolt.thrower.actor_id(&*cx.world);
    cx.world
        .place_cloud(pos, Cloud::new(CloudKind::Fire, duration).with_source(source));
    cx.bolt.obvious_effect = true;
    RangeCost::Stop
}

/// Disintegration and nukes crumble soft walls and statues; always stops
pub(super) fn disintegrate(cx: &mut Traversal<'_, '_>, pos: Coord) -> RangeCost {
    if !cx.world.in_bounds(pos) {
        return RangeCost::Stop;
    }
    match cx.world.terrain(pos) {
        Terrain::RockWall | Terrain::WaxWall | Terrain::ClearRockWall => {
            cx.world.set_terrain(pos, Terrain::Floor);
            cx.say(MsgChannel::Sound, GRINDING);
            cx.bolt.obvious_effect = true;
        }
        Terrain::OrcishIdol | Terrain::GraniteStatue => {
            cx.world.set_terrain(pos, Terrain::Floor);
            if cx.world.observer_sees(pos) {
                cx.say(
                    MsgChannel::Sound,
                    "The statue screams as its substance crumbles away!",
                );
            } else {
                cx.say(MsgChannel::Sound, "You hear a hideous screaming!");
            }
            cx.bolt.obvious_effect = true;
        }
        _ => {}
    }
    RangeCost::Stop
}

#[cfg(test)]
mod tests {
    use crate::beam::{Bolt, BoltTag, DiceDef, Flavour, Termination, fire_beam};
    use crate::consts::AUTOMATIC_HIT;
    use crate::dungeon::{CloudKind, Coord, Level, Terrain};
    use crate::options::EngineOptions;
    use crate::rng::GameRng;
    use crate::world::{Env, MessageLog, Unattended, World};

    fn zap(bolt: &mut Bolt, level: &mut Level) -> (Termination, MessageLog) {
        let mut rng = GameRng::new(4);
        let mut log = MessageLog::new();
        let mut prompter = Unattended;
        let options = EngineOptions::default();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        let report = fire_beam(bolt, level, &mut env);
        (report.termination, log)
    }

    fn bolt(name: &str, flavour: Flavour) -> Bolt {
        let mut bolt = Bolt::new(name, flavour, Coord::new(0, 0), Coord::new(5, 0));
        bolt.range = 8;
        bolt.is_beam = true;
        bolt.hit = AUTOMATIC_HIT;
        bolt
    }

    #[test]
    fn test_weak_fire_softens_wax() {
        let mut level = Level::from_rows(&["..W...", "......"]).unwrap();
        let mut flame = bolt("puff of flame", Flavour::Fire);
        let (termination, log) = zap(&mut flame, &mut level);
        assert_eq!(level.terrain(Coord::new(2, 0)), Terrain::WaxWall);
        assert!(log.contains("The wax appears to soften slightly."));
        assert_eq!(termination, Termination::Blocked);
    }

    #[test]
    fn test_superhot_fire_burns_wax() {
        let mut level = Level::from_rows(&["..W...", "......"]).unwrap();
        let mut fire = bolt("bolt of fire", Flavour::Fire);
        fire.tag = Some(BoltTag::SuperhotBolt);
        let (termination, log) = zap(&mut fire, &mut level);
        assert_eq!(level.terrain(Coord::new(2, 0)), Terrain::Floor);
        let cloud = level.cloud_at(Coord::new(2, 0)).unwrap();
        assert_eq!(cloud.kind, CloudKind::Fire);
        assert!((15..25).contains(&cloud.duration));
        assert!(log.contains("The wax bubbles and burns!"));
        assert_eq!(termination, Termination::Stopped);
        assert!(fire.obvious_effect);
    }

    #[test]
    fn test_unseen_wax_is_smelled() {
        let mut level = Level::from_rows(&["..W...", "......"]).unwrap();
        level.hide(Coord::new(2, 0));
        let mut flame = bolt("puff of flame", Flavour::Fire);
        let (_, log) = zap(&mut flame, &mut level);
        assert!(log.contains("You smell warm wax."));
    }

    #[test]
    fn test_disintegration_crumbles_statue() {
        let mut level = Level::from_rows(&["..8...", "......"]).unwrap();
        let mut dis = bolt("disintegration", Flavour::Disintegration);
        dis.damage = DiceDef::new(3, 15);
        let (termination, log) = zap(&mut dis, &mut level);
        assert_eq!(level.terrain(Coord::new(2, 0)), Terrain::Floor);
        assert!(log.contains("The statue screams as its substance crumbles away!"));
        assert_eq!(termination, Termination::Stopped);
    }

    #[test]
    fn test_weak_disruption_leaves_walls() {
        let mut level = Level::from_rows(&["..#...", "......"]).unwrap();
        let mut dis = bolt("disruption", Flavour::Disintegration);
        dis.damage = DiceDef::new(1, 9);
        let (termination, _) = zap(&mut dis, &mut level);
        assert_eq!(level.terrain(Coord::new(2, 0)), Terrain::RockWall);
        assert_eq!(termination, Termination::Blocked);
    }

    #[test]
    fn test_digging_stops_at_stone() {
        let mut level = Level::from_rows(&["..#X..", "......"]).unwrap();
        let mut dig = bolt("digging", Flavour::Digging);
        let (termination, log) = zap(&mut dig, &mut level);
        assert_eq!(level.terrain(Coord::new(2, 0)), Terrain::Floor);
        assert_eq!(level.terrain(Coord::new(3, 0)), Terrain::StoneWall);
        assert_eq!(termination, Termination::Blocked);
        assert_eq!(log.len(), 1);
    }
}
