//! Explosions
//!
//! An explosion first works out which cells the blast reaches from its
//! centre (a cost-bounded fill that wraps around corners but not through
//! walls), then affects every reached cell ring by ring, innermost first.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bolt::{Bolt, Colour};
use super::fire::Traversal;
use super::flavour::{BoltTag, Flavour};
use super::ray::Ray;
use super::report::TraversalReport;
use crate::consts::{EXPLOSION_MAP_SIZE, MAX_EXPLOSION_RADIUS};
use crate::dungeon::{CloudKind, Coord, Terrain};
use crate::world::{Env, MsgChannel, ShadowWorld, World};

/// Cost of a step away from the centre
const STEP_COST: i32 = 5;

/// Cost of a step back toward the centre's axis
const TURN_COST: i32 = 17;

/// Knobs for one explosion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionOptions {
    /// Leave the centre cell alone
    pub hole: bool,
    /// Go off inside a wall rather than in front of it
    pub explode_in_wall: bool,
    pub stop_at_statues: bool,
    pub stop_at_walls: bool,
    pub affect_items: bool,
}

impl Default for ExplosionOptions {
    fn default() -> Self {
        Self {
            hole: false,
            explode_in_wall: false,
            stop_at_statues: true,
            stop_at_walls: true,
            affect_items: true,
        }
    }
}

/// Where an explosion went off and what it covered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplosionSummary {
    pub centre: Coord,
    pub radius: i32,
    /// Affected cells in ring order
    pub cells: Vec<Coord>,
    /// Reached cells the observer could see
    pub seen: usize,
}

/// Cells a blast reaches, as offsets from its centre
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplosionMap {
    radius: i32,
    cost: [[Option<i32>; EXPLOSION_MAP_SIZE]; EXPLOSION_MAP_SIZE],
}

impl ExplosionMap {
    /// Fill outward from `centre` for a bolt of radius `radius`
    ///
    /// The centre cell itself only blocks when the bolt cannot change its
    /// material.
    pub fn discover(world: &dyn World, bolt: &Bolt, centre: Coord, radius: i32) -> Self {
        let strategy = bolt.flavour.strategy();
        Self::discover_with(world, centre, radius, |terrain| {
            strategy.affects_wall(bolt, terrain)
        })
    }

    /// [`ExplosionMap::discover`] with an explicit test for whether the
    /// centre's material lets the blast out
    pub fn discover_with(
        world: &dyn World,
        centre: Coord,
        radius: i32,
        centre_passable: impl Fn(Terrain) -> bool,
    ) -> Self {
        let mut map = Self {
            radius: radius.clamp(0, MAX_EXPLOSION_RADIUS),
            cost: [[None; EXPLOSION_MAP_SIZE]; EXPLOSION_MAP_SIZE],
        };
        let opens = centre_passable(world.terrain(centre));
        map.spread(world, centre, Coord::ORIGIN, 0, None, opens);
        map
    }

    fn slot(offset: Coord) -> Option<(usize, usize)> {
        let x = offset.x + MAX_EXPLOSION_RADIUS;
        let y = offset.y + MAX_EXPLOSION_RADIUS;
        let range = 0..EXPLOSION_MAP_SIZE as i32;
        if range.contains(&x) && range.contains(&y) {
            Some((x as usize, y as usize))
        } else {
            None
        }
    }

    fn spread(
        &mut self,
        world: &dyn World,
        centre: Coord,
        p: Coord,
        count: i32,
        came_from: Option<usize>,
        centre_opens: bool,
    ) {
        let r = self.radius;
        if p.abs() > r * (r + 1) || count > 10 * r {
            return;
        }
        let cell = centre + p;
        if !world.in_bounds(cell) {
            return;
        }
        if world.terrain(cell).blocks_explosion() && !(p.is_origin() && centre_opens) {
            return;
        }
        let Some((sx, sy)) = Self::slot(p) else {
            return;
        };
        // a cheaper route already went on from here
        if self.cost[sy][sx].is_some_and(|best| best <= count) {
            return;
        }
        self.cost[sy][sx] = Some(count);

        for (i, dir) in Coord::COMPASS.iter().enumerate() {
            if came_from.is_some_and(|from| Coord::COMPASS[from] == -*dir) {
                continue;
            }
            let step = if p.x * dir.x < 0 || p.y * dir.y < 0 {
                TURN_COST
            } else {
                STEP_COST
            };
            self.spread(world, centre, p + *dir, count + step, Some(i), centre_opens);
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Whether the blast reaches this offset
    pub fn contains(&self, offset: Coord) -> bool {
        Self::slot(offset).is_some_and(|(x, y)| self.cost[y][x].is_some())
    }

    /// Number of reached cells
    pub fn len(&self) -> usize {
        self.cost.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reached offsets ring by ring: the centre, then for each radius the
    /// side columns, then the top and bottom rows
    pub fn ring_order(&self, hole: bool) -> Vec<Coord> {
        let mut order = Vec::new();
        if !hole && self.contains(Coord::ORIGIN) {
            order.push(Coord::ORIGIN);
        }
        for rad in 1..=self.radius {
            for ay in (1 - rad)..rad {
                for p in [Coord::new(-rad, ay), Coord::new(rad, ay)] {
                    if self.contains(p) {
                        order.push(p);
                    }
                }
            }
            for ax in -rad..=rad {
                for p in [Coord::new(ax, -rad), Coord::new(ax, rad)] {
                    if self.contains(p) {
                        order.push(p);
                    }
                }
            }
        }
        order
    }

    /// ASCII picture of the reached area, `*` for reached cells
    pub fn render(&self) -> Vec<String> {
        let r = self.radius;
        (-r..=r)
            .map(|y| {
                (-r..=r)
                    .map(|x| {
                        if self.contains(Coord::new(x, y)) {
                            '*'
                        } else {
                            '.'
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

impl Traversal<'_, '_> {
    /// Explosion from `bolt.target` with the bolt's `ex_size` as radius
    pub(crate) fn explode(&mut self, options: ExplosionOptions) -> ExplosionSummary {
        let source = self.bolt.source;
        if self.world.in_bounds(source)
            && source != self.bolt.target
            && (!options.explode_in_wall || options.stop_at_statues || options.stop_at_walls)
        {
            self.retrace(options);
        }

        let radius = self.bolt.ex_size.clamp(0, MAX_EXPLOSION_RADIUS);
        let centre = self.bolt.target;
        self.bolt.in_explosion_phase = true;
        self.affect_items = options.affect_items;

        debug!(
            name = %self.bolt.name,
            flavour = %self.bolt.flavour,
            radius,
            tracer = self.bolt.is_tracer,
            "explosion at {}",
            centre
        );

        let map = ExplosionMap::discover(&*self.world, self.bolt, centre, radius);
        let seen = (-radius..=radius)
            .flat_map(|y| (-radius..=radius).map(move |x| Coord::new(x, y)))
            .filter(|p| map.contains(*p) && self.world.observer_sees(centre + *p))
            .count();

        let mut cells = Vec::new();
        for offset in map.ring_order(options.hole) {
            let pos = centre + offset;
            if !self.world.in_bounds(pos) {
                continue;
            }
            let random = self.bolt.flavour == Flavour::Random;
            if random {
                let pick = self.env.rng.random2(Flavour::RANDOM_CHOICES.len() as i32);
                self.bolt.flavour = Flavour::RANDOM_CHOICES[pick as usize];
            }
            self.affect(pos);
            if random {
                self.bolt.flavour = Flavour::Random;
            }
            cells.push(pos);
            if self.bolt.cancelled {
                break;
            }
        }

        let summary = ExplosionSummary {
            centre,
            radius,
            cells,
            seen,
        };
        self.report.explosion = Some(summary.clone());
        summary
    }

    /// Walk the source-to-target line again so the blast goes off in
    /// front of whatever stopped the bolt
    fn retrace(&mut self, options: ExplosionOptions) {
        let source = self.bolt.source;
        let target = self.bolt.target;
        let mut ray = Ray::new(source, target);
        let max_dist = source.distance(target) - 1;
        ray.advance();

        let mut dist = 0;
        while dist <= max_dist && ray.pos() != target {
            dist += 1;
            let pos = ray.pos();
            if self.world.is_solid(pos) {
                let is_wall = self.world.is_wall(pos);
                let passes = (is_wall && !options.stop_at_walls)
                    || (!is_wall && !options.stop_at_statues);
                if !passes {
                    break;
                }
            }
            ray.advance();
        }

        if !options.explode_in_wall && self.world.is_wall(ray.pos()) {
            ray.regress();
        }
        self.bolt.target = ray.pos();
    }

    /// Set up and narrate a named blast, then run it
    pub(crate) fn explosion1(&mut self) {
        let pos = self.bolt.target;
        self.bolt.msg_generated = true;

        let mut size = 1;
        let (seen, heard) = match self.bolt.tag {
            Some(BoltTag::Hellfire) => {
                self.bolt.flavour = Flavour::Hellfire;
                (
                    "The hellfire explodes!",
                    "You hear a strangely unpleasant explosion.",
                )
            }
            Some(BoltTag::GoldenFlame) => {
                self.bolt.flavour = Flavour::Holy;
                size = 2;
                ("The flame explodes!", "You feel a deep, resonant explosion.")
            }
            Some(BoltTag::Fireball) => {
                self.bolt.flavour = Flavour::Fire;
                ("The fireball explodes!", "You hear an explosion.")
            }
            Some(BoltTag::OrbOfElectricity) => {
                self.bolt.flavour = Flavour::Electricity;
                self.bolt.colour = Colour::LightCyan;
                self.bolt.damage.num = 1;
                size = 2;
                ("The orb of electricity explodes!", "You hear a clap of thunder!")
            }
            Some(BoltTag::OrbOfEnergy) => ("The orb of energy explodes.", "You hear an explosion."),
            Some(BoltTag::MetalOrb) => {
                self.bolt.name = String::from("blast of shrapnel");
                self.bolt.tag = Some(BoltTag::BlastOfShrapnel);
                self.bolt.flavour = Flavour::Frag;
                (
                    "The orb explodes into a blast of deadly shrapnel!",
                    "You hear an explosion!",
                )
            }
            Some(BoltTag::GreatBlastOfCold) => {
                self.bolt.name = String::from("ice storm");
                self.bolt.tag = Some(BoltTag::IceStorm);
                self.bolt.flavour = Flavour::Ice;
                self.bolt.colour = Colour::White;
                if self.env.rng.random2(self.bolt.ench_power) > 75 {
                    size = 3;
                } else {
                    size = 2;
                }
                (
                    "The blast explodes into a great storm of ice!",
                    "You hear a raging storm!",
                )
            }
            Some(BoltTag::BallOfVapour) => {
                self.bolt.name = String::from("stinking cloud");
                self.bolt.tag = Some(BoltTag::StinkingCloud);
                ("The ball expands into a vile cloud!", "You hear a gentle 'poof'.")
            }
            _ => {
                size = self.bolt.ex_size.max(1);
                ("", "You hear an explosion.")
            }
        };

        if !self.is_tracer() {
            let player_here = self
                .world
                .player()
                .and_then(|id| self.world.actor(id))
                .is_some_and(|p| p.pos == pos);
            if self.world.observer_sees(pos) || player_here {
                let text = if seen.is_empty() {
                    format!("The {} explodes!", self.bolt.name)
                } else {
                    seen.to_string()
                };
                self.say(MsgChannel::Plain, &text);
            } else {
                self.say(MsgChannel::Sound, heard);
            }
        }

        self.bolt.ex_size = size;
        self.explode(ExplosionOptions::default());
    }

    /// End-of-path detonation, if the bolt has one
    pub(crate) fn beam_explodes(&mut self, pos: Coord) {
        self.bolt.target = pos;

        if self.bolt.is_explosion {
            self.explosion1();
            return;
        }

        let Some(tag) = self.bolt.tag else {
            return;
        };
        if let Some(kind) = tag.big_cloud_kind(self.bolt.flavour) {
            let (pow, size) = match tag {
                BoltTag::BlastOfPoison => (0, 7 + self.env.rng.random2(5)),
                BoltTag::FreezingBlast => (self.env.rng.random_range(10, 15), 9),
                _ => (0, 9),
            };
            self.scatter_big_cloud(kind, pos, pow, size);
            return;
        }
        if tag.detonates() {
            self.explosion1();
        }
    }

    fn scatter_big_cloud(&mut self, kind: CloudKind, centre: Coord, pow: i32, size: i32) {
        let cells = self.big_cloud(kind, centre, pow, size);
        self.report.explosion = Some(ExplosionSummary {
            centre,
            radius: cells
                .iter()
                .map(|c| c.distance(centre))
                .max()
                .unwrap_or(0),
            seen: cells
                .iter()
                .filter(|c| self.world.observer_sees(**c))
                .count(),
            cells,
        });
    }
}

/// Run a stand-alone explosion of `bolt` centred on `bolt.target`
///
/// The bolt's `ex_size` is the radius. The report carries the resolutions
/// and the [`ExplosionSummary`]. Tracer bolts only touch a shadow of
/// `world`.
pub fn explosion(
    bolt: &mut Bolt,
    world: &mut dyn World,
    env: &mut Env<'_>,
    options: ExplosionOptions,
) -> TraversalReport {
    let saved = bolt.snapshot();
    let report = if bolt.is_tracer {
        let mut shadow = ShadowWorld::new(&*world);
        blast(bolt, &mut shadow, env, options)
    } else {
        blast(bolt, world, env, options)
    };
    bolt.in_explosion_phase = false;
    if bolt.is_tracer {
        bolt.restore(saved);
    }
    report
}

fn blast(
    bolt: &mut Bolt,
    world: &mut dyn World,
    env: &mut Env<'_>,
    options: ExplosionOptions,
) -> TraversalReport {
    let mut cx = Traversal::new(bolt, world, env);
    cx.explode(options);
    let mut report = cx.report;
    report.final_pos = cx.bolt.target;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use crate::beam::{DiceDef, Termination, fire_beam};
    use crate::consts::AUTOMATIC_HIT;
    use crate::dungeon::Level;
    use crate::options::EngineOptions;
    use crate::rng::GameRng;
    use crate::world::{MessageLog, Unattended};

    fn open_map(radius: i32) -> ExplosionMap {
        let level = Level::new(21, 21);
        let bolt = Bolt::new("blast", Flavour::Fire, Coord::new(10, 10), Coord::new(10, 10));
        ExplosionMap::discover(&level, &bolt, Coord::new(10, 10), radius)
    }

    #[test]
    fn test_radius_one_is_a_plus_and_corners() {
        let map = open_map(1);
        assert_eq!(map.len(), 9);
        assert!(map.contains(Coord::new(1, 1)));
        assert!(!map.contains(Coord::new(2, 0)));
    }

    #[test]
    fn test_radius_zero_is_the_centre() {
        let map = open_map(0);
        assert_eq!(map.len(), 1);
        assert_eq!(map.ring_order(false), vec![Coord::ORIGIN]);
        assert!(map.ring_order(true).is_empty());
    }

    #[test]
    fn test_open_shape_is_symmetric() {
        for radius in 1..=5 {
            let map = open_map(radius);
            for y in -radius..=radius {
                for x in -radius..=radius {
                    let p = Coord::new(x, y);
                    let reached = map.contains(p);
                    assert_eq!(reached, map.contains(Coord::new(-x, y)), "{p}");
                    assert_eq!(reached, map.contains(Coord::new(x, -y)), "{p}");
                    assert_eq!(reached, map.contains(Coord::new(y, x)), "{p}");
                }
            }
        }
    }

    #[test]
    fn test_ring_order_goes_outward() {
        let map = open_map(3);
        let order = map.ring_order(false);
        assert_eq!(order[0], Coord::ORIGIN);
        assert_eq!(order[1], Coord::new(-1, 0));
        assert_eq!(order[2], Coord::new(1, 0));
        let rings: Vec<i32> = order.iter().map(|p| p.distance(Coord::ORIGIN)).collect();
        assert!(rings.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(order.len(), map.len());
    }

    #[test]
    fn test_walls_block_but_statues_do_not() {
        let level = Level::from_rows(&[
            ".....", //
            ".....", //
            "..#..", //
            ".....", //
            ".....",
        ])
        .unwrap();
        let bolt = Bolt::new("blast", Flavour::Fire, Coord::new(2, 3), Coord::new(2, 3));
        let map = ExplosionMap::discover(&level, &bolt, Coord::new(2, 3), 2);
        assert!(!map.contains(Coord::new(0, -1)));

        let level = Level::from_rows(&[".....", ".....", "..8..", ".....", "....."]).unwrap();
        let map = ExplosionMap::discover(&level, &bolt, Coord::new(2, 3), 2);
        assert!(map.contains(Coord::new(0, -1)));
    }

    #[test]
    fn test_render_shape() {
        let rows = open_map(1).render();
        assert_eq!(rows, vec!["***", "***", "***"]);
    }

    fn env_parts() -> (GameRng, MessageLog, Unattended, EngineOptions) {
        (
            GameRng::new(11),
            MessageLog::new(),
            Unattended,
            EngineOptions::default(),
        )
    }

    #[test]
    fn test_fireball_explodes_at_target() {
        let mut level = Level::new(15, 15);
        let orc = level.add_actor(Actor::monster("orc", Coord::new(8, 7)).with_hp(100));
        let mut bolt = Bolt::new("fireball", Flavour::Fire, Coord::new(2, 7), Coord::new(7, 7));
        bolt.is_explosion = true;
        bolt.tag = Some(BoltTag::Fireball);
        bolt.range = 8;
        bolt.hit = AUTOMATIC_HIT;
        bolt.damage = DiceDef::new(3, 6);

        let (mut rng, mut log, mut prompter, options) = env_parts();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        let report = fire_beam(&mut bolt, &mut level, &mut env);

        assert_eq!(report.termination, Termination::ReachedTarget);
        let summary = report.explosion.as_ref().unwrap();
        assert_eq!(summary.centre, Coord::new(7, 7));
        assert_eq!(summary.radius, 1);
        assert_eq!(summary.cells.len(), 9);
        assert!(log.contains("The fireball explodes!"));
        let hits: Vec<_> = report.resolutions_for(orc).collect();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].explosion_phase);
    }

    #[test]
    fn test_explosion_backs_out_of_wall() {
        let mut level = Level::from_rows(&["........", "......#.", "........"]).unwrap();
        let mut bolt = Bolt::new("fireball", Flavour::Fire, Coord::new(0, 1), Coord::new(6, 1));
        bolt.ex_size = 1;
        let (mut rng, mut log, mut prompter, options) = env_parts();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        let report = explosion(&mut bolt, &mut level, &mut env, ExplosionOptions::default());
        let summary = report.explosion.unwrap();
        assert_eq!(summary.centre, Coord::new(5, 1));
        assert!(!summary.cells.contains(&Coord::new(6, 1)));
    }

    #[test]
    fn test_hole_spares_the_centre() {
        let mut level = Level::new(9, 9);
        let mut bolt = Bolt::new("ring", Flavour::Cold, Coord::new(4, 4), Coord::new(4, 4));
        bolt.ex_size = 1;
        let options = ExplosionOptions {
            hole: true,
            ..ExplosionOptions::default()
        };
        let (mut rng, mut log, mut prompter, engine) = env_parts();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &engine);
        let report = explosion(&mut bolt, &mut level, &mut env, options);
        let summary = report.explosion.unwrap();
        assert_eq!(summary.cells.len(), 8);
        assert!(!summary.cells.contains(&Coord::new(4, 4)));
    }

    #[test]
    fn test_metal_orb_becomes_shrapnel() {
        let mut level = Level::new(12, 5);
        let mut bolt = Bolt::new("metal orb", Flavour::Magic, Coord::new(1, 2), Coord::new(6, 2));
        bolt.tag = Some(BoltTag::MetalOrb);
        bolt.range = 8;
        bolt.aimed_at_spot = true;
        let (mut rng, mut log, mut prompter, options) = env_parts();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        let report = fire_beam(&mut bolt, &mut level, &mut env);
        assert_eq!(bolt.name, "blast of shrapnel");
        assert_eq!(bolt.flavour, Flavour::Frag);
        assert!(report.explosion.is_some());
        assert!(log.contains("The orb explodes into a blast of deadly shrapnel!"));
    }

    #[test]
    fn test_unseen_blast_is_heard() {
        let mut level = Level::new(12, 5);
        level.hide(Coord::new(6, 2));
        let mut bolt = Bolt::new("fireball", Flavour::Fire, Coord::new(1, 2), Coord::new(6, 2));
        bolt.is_explosion = true;
        bolt.tag = Some(BoltTag::Fireball);
        bolt.range = 8;
        let (mut rng, mut log, mut prompter, options) = env_parts();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        fire_beam(&mut bolt, &mut level, &mut env);
        assert!(log.contains("You hear an explosion."));
        assert!(!log.contains("The fireball explodes!"));
    }

    #[test]
    fn test_poison_blast_scatters_cloud() {
        let mut level = Level::new(15, 9);
        let mut bolt = Bolt::new("blast of poison", Flavour::Poison, Coord::new(1, 4), Coord::new(7, 4));
        bolt.tag = Some(BoltTag::BlastOfPoison);
        bolt.is_big_cloud = true;
        bolt.range = 8;
        let (mut rng, mut log, mut prompter, options) = env_parts();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        let report = fire_beam(&mut bolt, &mut level, &mut env);
        assert_eq!(report.termination, Termination::ReachedTarget);
        let summary = report.explosion.unwrap();
        assert!((7..12).contains(&summary.cells.len()));
        assert_eq!(summary.cells[0], Coord::new(7, 4));
        for cell in &summary.cells {
            assert_eq!(level.cloud_at(*cell).map(|c| c.kind), Some(CloudKind::Poison));
        }
    }

    #[test]
    fn test_tracer_blast_spares_the_level() {
        let mut level = Level::new(9, 9);
        let orc = level.add_actor(Actor::monster("orc", Coord::new(4, 5)).with_hp(100));
        let mut bolt = Bolt::new("fireball", Flavour::Fire, Coord::new(4, 4), Coord::new(4, 4));
        bolt.ex_size = 1;
        bolt.hit = AUTOMATIC_HIT;
        bolt.damage = DiceDef::new(3, 6);
        bolt.is_tracer = true;
        let (mut rng, mut log, mut prompter, options) = env_parts();
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        let report = explosion(&mut bolt, &mut level, &mut env, ExplosionOptions::default());

        assert_eq!(report.resolutions_for(orc).count(), 1);
        assert_eq!(level.actor(orc).unwrap().hp, 100);
        assert!(log.is_empty());
    }
}
