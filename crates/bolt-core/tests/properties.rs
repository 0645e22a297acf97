//! Property tests for the traversal engine

use bolt_core::actor::{Actor, Resistances};
use bolt_core::beam::{
    Bolt, DiceDef, ExplosionMap, Flavour, ResolveMode, Thrower, TraversalReport, adjust_flavoured,
    fire_beam, resist_adjust_damage,
};
use bolt_core::dungeon::{Coord, Level, Terrain};
use bolt_core::world::{Env, MessageLog, ShadowWorld, Unattended, World};
use bolt_core::{AUTOMATIC_HIT, EngineOptions, GameRng};
use proptest::prelude::*;

const WIDTH: i32 = 14;
const HEIGHT: i32 = 7;

const FLAVOURS: [Flavour; 9] = [
    Flavour::Fire,
    Flavour::Cold,
    Flavour::Electricity,
    Flavour::Acid,
    Flavour::Poison,
    Flavour::Negative,
    Flavour::Slow,
    Flavour::Paralysis,
    Flavour::Confusion,
];

fn arb_flavour() -> impl Strategy<Value = Flavour> {
    (0..FLAVOURS.len()).prop_map(|i| FLAVOURS[i])
}

fn arb_cell() -> impl Strategy<Value = Coord> {
    (1..WIDTH - 1, 1..HEIGHT - 1).prop_map(|(x, y)| Coord::new(x, y))
}

/// Actor positions and hit points
fn arb_actors() -> impl Strategy<Value = Vec<(Coord, i32)>> {
    proptest::collection::vec((arb_cell(), 1..40i32), 0..6)
}

#[derive(Debug, Clone)]
struct Shot {
    flavour: Flavour,
    target: Coord,
    range: i32,
    is_beam: bool,
    hit: i32,
    dice: (i32, i32),
}

fn arb_shot() -> impl Strategy<Value = Shot> {
    (
        arb_flavour(),
        arb_cell(),
        1..16i32,
        any::<bool>(),
        prop_oneof![Just(AUTOMATIC_HIT), 0..40i32],
        (1..4i32, 1..12i32),
    )
        .prop_map(|(flavour, target, range, is_beam, hit, dice)| Shot {
            flavour,
            target,
            range,
            is_beam,
            hit,
            dice,
        })
}

fn populated_level(actors: &[(Coord, i32)]) -> Level {
    let mut level = Level::new(WIDTH, HEIGHT);
    for (i, (pos, hp)) in actors.iter().enumerate() {
        if level.actor_at(*pos).is_none() && *pos != Coord::new(0, 3) {
            level.add_actor(Actor::monster(&format!("monster {i}"), *pos).with_hp(*hp));
        }
    }
    level
}

fn bolt_for(shot: &Shot) -> Bolt {
    let mut bolt = Bolt::new("test bolt", shot.flavour, Coord::new(0, 3), shot.target);
    bolt.range = shot.range;
    bolt.is_beam = shot.is_beam;
    bolt.hit = shot.hit;
    bolt.ench_power = 60;
    bolt.damage = DiceDef::new(shot.dice.0, shot.dice.1);
    bolt.thrower = Thrower::Environment;
    bolt
}

fn run(bolt: &mut Bolt, world: &mut dyn World, seed: u64) -> TraversalReport {
    let mut rng = GameRng::new(seed);
    let mut log = MessageLog::new();
    let mut prompter = Unattended;
    let options = EngineOptions::default();
    let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
    fire_beam(bolt, world, &mut env)
}

proptest! {
    #[test]
    fn prop_tracer_predicts_real_run(actors in arb_actors(), shot in arb_shot(), seed in any::<u64>()) {
        let mut level = populated_level(&actors);

        let mut tracer = bolt_for(&shot);
        tracer.is_tracer = true;
        let predicted = {
            let mut shadow = ShadowWorld::new(&level);
            run(&mut tracer, &mut shadow, seed)
        };

        let mut real = bolt_for(&shot);
        let actual = run(&mut real, &mut level, seed);

        prop_assert_eq!(&predicted.path, &actual.path);
        prop_assert_eq!(&predicted.resolutions, &actual.resolutions);
        prop_assert_eq!(&predicted.killed, &actual.killed);
        prop_assert_eq!(predicted.termination, actual.termination);
    }

    #[test]
    fn prop_tracer_leaves_world_untouched(actors in arb_actors(), shot in arb_shot(), seed in any::<u64>()) {
        let level = populated_level(&actors);
        let actors_before = level.actors().to_vec();
        let rows_before = level.to_rows();

        let mut bolt = bolt_for(&shot);
        bolt.is_tracer = true;
        let mut shadow = ShadowWorld::new(&level);
        run(&mut bolt, &mut shadow, seed);
        drop(shadow);

        prop_assert_eq!(level.actors(), actors_before.as_slice());
        prop_assert_eq!(level.to_rows(), rows_before);
        prop_assert_eq!(bolt.hit, shot.hit);
        prop_assert_eq!(bolt.flavour, shot.flavour);
    }

    #[test]
    fn prop_range_bounds_the_path(actors in arb_actors(), shot in arb_shot(), seed in any::<u64>()) {
        let mut level = populated_level(&actors);
        let mut bolt = bolt_for(&shot);
        let report = run(&mut bolt, &mut level, seed);

        prop_assert!(report.path.len() as i32 <= shot.range);
        prop_assert!(report.range_remaining >= 0);
        for pair in report.path.windows(2) {
            prop_assert!(pair[1].range_after <= pair[0].range_after);
        }
    }

    #[test]
    fn prop_bounces_stay_in_open_cells(width in 3..10i32, height in 3..8i32, range in 1..30i32, tx in -6..12i32, ty in -6..12i32) {
        let rows: Vec<String> = (0..height + 2)
            .map(|y| {
                (0..width + 2)
                    .map(|x| if x == 0 || y == 0 || x == width + 1 || y == height + 1 { '#' } else { '.' })
                    .collect()
            })
            .collect();
        let mut level = Level::from_rows(&rows).unwrap();
        let source = Coord::new(1, 1);
        let target = Coord::new(tx, ty);
        prop_assume!(target != source);

        let mut bolt = Bolt::new("lightning", Flavour::Electricity, source, target);
        bolt.range = range;
        bolt.is_beam = true;
        bolt.hit = AUTOMATIC_HIT;
        let report = run(&mut bolt, &mut level, 7);

        prop_assert!(report.path.len() as i32 <= range);
        for step in &report.path {
            prop_assert!(!level.terrain(step.pos).is_solid());
        }
        prop_assert!(!level.terrain(report.final_pos).is_solid());
    }

    #[test]
    fn prop_explosion_is_symmetric(radius in 0..=9i32) {
        let level = Level::new(30, 30);
        let map = ExplosionMap::discover_with(&level, Coord::new(15, 15), radius, |_| false);
        for y in -radius..=radius {
            for x in -radius..=radius {
                let reached = map.contains(Coord::new(x, y));
                prop_assert_eq!(reached, map.contains(Coord::new(-x, y)));
                prop_assert_eq!(reached, map.contains(Coord::new(x, -y)));
                prop_assert_eq!(reached, map.contains(Coord::new(y, x)));
            }
        }
        prop_assert!(map.contains(Coord::ORIGIN));
    }

    #[test]
    fn prop_full_resistance_blocks_resistible_damage(raw in 0..500i32, res in 3..=5i32, flavour in arb_flavour()) {
        prop_assume!(!flavour.is_enchantment());
        prop_assert_eq!(resist_adjust_damage(flavour, res, raw), 0);
        prop_assert_eq!(resist_adjust_damage(Flavour::Ice, res, raw), raw - raw / 2);
        prop_assert_eq!(resist_adjust_damage(Flavour::Lava, res, raw), raw - raw * 75 / 100);
    }

    #[test]
    fn prop_resistance_never_amplifies(raw in 0..500i32, res in 0..3i32) {
        for flavour in [Flavour::Fire, Flavour::Cold, Flavour::Electricity, Flavour::Acid] {
            let lower = resist_adjust_damage(flavour, res + 1, raw);
            let higher = resist_adjust_damage(flavour, res, raw);
            prop_assert!(lower <= higher);
            prop_assert!(higher <= raw);
        }
    }

    #[test]
    fn prop_dry_run_matches_apply(raw in 0..200i32, fire in -1..=3i8, seed in any::<u64>()) {
        let actor = Actor::monster("salamander", Coord::ORIGIN).with_resists(Resistances {
            fire,
            ..Resistances::default()
        });
        let bolt = Bolt::new("bolt of fire", Flavour::Fire, Coord::ORIGIN, Coord::new(3, 0));
        let mut rng = GameRng::new(seed);
        let dry = adjust_flavoured(&actor, &bolt, raw, ResolveMode::DryRun, &mut rng);
        let applied = adjust_flavoured(&actor, &bolt, raw, ResolveMode::Apply, &mut rng);
        prop_assert_eq!(dry.damage, applied.damage);
        prop_assert_eq!(dry.outcome, applied.outcome);
        prop_assert!(dry.effects.is_empty());
        if fire >= 3 {
            prop_assert_eq!(dry.damage, 0);
        }
    }
}

#[test]
fn explosion_terrain_stops_the_fill() {
    let level = Level::from_rows(&[
        ".......", ".......", "...#...", ".......", ".......", ".......", ".......",
    ])
    .unwrap();
    let map = ExplosionMap::discover_with(&level, Coord::new(3, 3), 1, |t| t != Terrain::RockWall);
    assert!(map.contains(Coord::ORIGIN));
    assert!(!map.contains(Coord::new(0, -1)));
}

#[test]
fn adjacent_two_d_four_hit_stops_after_one_cell() {
    for seed in 0..50u64 {
        let mut level = Level::new(6, 3);
        let ogre = level.add_actor(Actor::monster("ogre", Coord::new(2, 1)).with_hp(100));
        let mut bolt = Bolt::new("stone", Flavour::Missile, Coord::new(1, 1), Coord::new(5, 1));
        bolt.range = 6;
        bolt.hit = AUTOMATIC_HIT;
        bolt.damage = DiceDef::new(2, 4);
        let report = run(&mut bolt, &mut level, seed);

        let hits: Vec<_> = report.resolutions_for(ogre).collect();
        assert_eq!(hits.len(), 1);
        assert!((2..=8).contains(&hits[0].final_damage));
        assert_eq!(report.path.len(), 1);
        assert_eq!(report.range_remaining, 5);
        assert_eq!(level.actor(ogre).map(|a| a.hp), Some(100 - hits[0].final_damage));
    }
}

#[test]
fn report_survives_json() {
    let mut level = Level::new(8, 3);
    level.add_actor(Actor::monster("kobold", Coord::new(3, 1)));
    let mut bolt = Bolt::new("bolt of cold", Flavour::Cold, Coord::new(0, 1), Coord::new(7, 1));
    bolt.range = 8;
    bolt.is_beam = true;
    bolt.hit = AUTOMATIC_HIT;
    bolt.damage = DiceDef::new(3, 6);
    let report = run(&mut bolt, &mut level, 3);

    let json = serde_json::to_string(&report).unwrap();
    let back: TraversalReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
