//! The propagation loop
//!
//! [`fire_beam`] walks a bolt cell by cell along its ray, spending one
//! unit of range per cell plus whatever the cell's effects cost, until the
//! range runs out, a wall blocks it, a cell stops it, it reaches a target
//! it terminates on, or a tracer prompt is declined.

use tracing::{debug, trace};

use super::bolt::Bolt;
use super::flavour::Flavour;
use super::ray::Ray;
use super::report::{PathStep, RangeCost, Termination, TraversalReport};
use crate::actor::{Actor, ActorId};
use crate::consts::{AUTOMATIC_HIT, BOUNCE_COST};
use crate::dungeon::Coord;
use crate::world::{Env, MessageCache, MsgChannel, ShadowWorld, World};

/// State scoped to one traversal
pub(crate) struct Traversal<'a, 'e> {
    pub(crate) bolt: &'a mut Bolt,
    pub(crate) world: &'a mut dyn World,
    pub(crate) env: &'a mut Env<'e>,
    pub(crate) cache: MessageCache,
    pub(crate) report: TraversalReport,
    pub(crate) affect_items: bool,
}

impl<'a, 'e> Traversal<'a, 'e> {
    pub(crate) fn new(bolt: &'a mut Bolt, world: &'a mut dyn World, env: &'a mut Env<'e>) -> Self {
        Self {
            bolt,
            world,
            env,
            cache: MessageCache::new(),
            report: TraversalReport::default(),
            affect_items: true,
        }
    }

    pub(crate) fn is_tracer(&self) -> bool {
        self.bolt.is_tracer
    }

    /// Emit a message; tracers are silent
    pub(crate) fn say(&mut self, channel: MsgChannel, text: &str) {
        if !self.bolt.is_tracer {
            self.env.narration.emit(channel, text);
        }
    }

    /// Emit a message unless the same text already went out this traversal
    pub(crate) fn say_once(&mut self, channel: MsgChannel, text: &str) {
        if !self.bolt.is_tracer && self.cache.first_time(text) {
            self.env.narration.emit(channel, text);
        }
    }

    /// Emit a message about something happening at `pos`, if the observer
    /// can see it
    pub(crate) fn say_at(&mut self, pos: Coord, text: &str) {
        if self.world.observer_sees(pos) || self.env.options.narrate_unseen {
            self.say(MsgChannel::Plain, text);
        }
    }

    /// Emit a message about an actor; the player always notices
    pub(crate) fn say_about(&mut self, actor: &Actor, text: &str) {
        if actor.is_player {
            self.say(MsgChannel::Plain, text);
        } else {
            self.say_at(actor.pos, text);
        }
    }

    pub(crate) fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.world.actor(id)
    }

    /// Whether the bolt's thrower is this actor
    pub(crate) fn is_thrower(&self, id: ActorId) -> bool {
        self.bolt.thrower.actor_id(&*self.world) == Some(id)
    }

    /// Object name for a hit message: "you" or "the goblin"
    pub(crate) fn target_name(&self, id: ActorId) -> String {
        self.actor(id)
            .map(|a| a.the_name())
            .unwrap_or_else(|| String::from("something"))
    }

    fn run(&mut self) {
        let source = self.bolt.source;
        let target = self.bolt.target;
        let mut range = self.bolt.range;

        if range <= 0 && !self.bolt.aimed_at_feet {
            self.report.termination = Termination::RangeExhausted;
            self.report.final_pos = source;
            return;
        }

        let mut ray = self
            .bolt
            .chose_ray
            .clone()
            .unwrap_or_else(|| Ray::new(source, target));
        if !self.bolt.aimed_at_feet {
            ray.advance_through(target);
        }

        let mut did_bounce = false;
        let mut last_pos = source;

        let termination = loop {
            let mut pos = ray.pos();
            self.bolt.pos = pos;

            if !self.world.in_bounds(pos) {
                self.bolt.pos = last_pos;
                break Termination::OutOfBounds;
            }

            if self.world.cloud_at(pos).is_some() && self.bolt.hit != AUTOMATIC_HIT {
                self.bolt.hit = (self.bolt.hit - 2).max(0);
            }

            let mut last_cell = false;

            if self.world.is_solid(pos) {
                let terrain = self.world.terrain(pos);
                if self.bolt.flavour.strategy().affects_wall(self.bolt, terrain) {
                    match self.wall_stage(pos) {
                        RangeCost::Stop => last_cell = true,
                        RangeCost::Extra(n) => range -= n,
                    }
                    if self.bolt.cancelled {
                        break Termination::Cancelled;
                    }
                    if self.world.is_solid(pos) {
                        break Termination::Blocked;
                    }
                } else if !self.bolt.flavour.is_bouncy(terrain) {
                    // an actor embedded in the wall may still be hit
                    self.wall_stage(pos);
                    if self.bolt.cancelled {
                        break Termination::Cancelled;
                    }
                    let world = &*self.world;
                    ray.regress_while(|c| world.is_solid(c));
                    self.bolt.pos = ray.pos();
                    break Termination::Blocked;
                } else {
                    did_bounce = true;
                    loop {
                        let world = &*self.world;
                        ray.regress_while(|c| world.is_solid(c));
                        ray.advance_and_bounce(|c| world.is_solid(c));
                        range -= BOUNCE_COST;
                        self.report.bounces += 1;
                        trace!(pos = %ray.pos(), range, "bounce");
                        if range <= 0 || !world.is_solid(ray.pos()) {
                            break;
                        }
                    }
                    if range < 1 {
                        let world = &*self.world;
                        ray.regress_while(|c| world.is_solid(c));
                        self.bolt.pos = ray.pos();
                        break Termination::RangeExhausted;
                    }
                    pos = ray.pos();
                    self.bolt.pos = pos;
                }
            }

            let mut terminate = false;
            if pos == target {
                terminate = term_on_target(self.bolt, pos);
                if self.bolt.flavour == Flavour::LineOfSight && !self.bolt.thrower.is_player() {
                    self.bolt.foe_info.count += 1;
                }
            }

            let mut cost = RangeCost::NONE;
            if !terminate || !self.bolt.is_explosion {
                let random = self.bolt.flavour == Flavour::Random;
                if random {
                    let pick = self.env.rng.random2(Flavour::RANDOM_CHOICES.len() as i32);
                    self.bolt.flavour = Flavour::RANDOM_CHOICES[pick as usize];
                }
                if !self.bolt.affects_nothing {
                    cost = self.affect(pos);
                }
                if random {
                    self.bolt.flavour = Flavour::Random;
                    self.bolt.effect_known = false;
                }
            }

            if self.bolt.cancelled {
                debug!(pos = %pos, "traversal cancelled");
                break Termination::Cancelled;
            }

            range -= 1;
            match cost {
                RangeCost::Stop => last_cell = true,
                RangeCost::Extra(n) => range -= n,
            }

            self.report.path.push(PathStep {
                pos,
                range_after: range.max(0),
            });
            trace!(pos = %pos, range, "step");
            last_pos = pos;

            if self.bolt.aimed_at_feet {
                break Termination::AimedAtFeet;
            }
            if terminate {
                break Termination::ReachedTarget;
            }
            if last_cell {
                break Termination::Stopped;
            }
            if range <= 0 {
                break Termination::RangeExhausted;
            }

            if did_bounce {
                ray.advance();
            } else {
                ray.advance_through(target);
            }
        };

        self.report.termination = termination;
        self.report.final_pos = self.bolt.pos;
        self.report.range_remaining = range.max(0);

        if termination == Termination::Cancelled {
            return;
        }

        if !self.report.path.is_empty() || self.world.in_bounds(self.bolt.pos) {
            let at = self.bolt.pos;
            self.beam_explodes(at);
        }

        if self.bolt.is_enchantment()
            && !self.bolt.is_tracer
            && !self.bolt.msg_generated
            && !self.bolt.obvious_effect
            && self.bolt.thrower.is_player()
        {
            self.say(MsgChannel::Plain, "Nothing happens.");
        }
    }
}

/// Whether a bolt ends at `pos` without hitting what is there
///
/// Area effects and spot-aimed shots go off at the aimed cell, so anything
/// standing there gets no chance to dodge or block.
pub fn term_on_target(bolt: &Bolt, pos: Coord) -> bool {
    bolt.flavour == Flavour::LineOfSight
        || bolt.is_explosion
        || bolt.is_big_cloud
        || bolt.tag.is_some_and(|t| t.terminates_on_target())
        || (bolt.aimed_at_spot && pos == bolt.target)
}

/// Run one traversal of `bolt` through `world`
///
/// Tracer bolts run against a [`ShadowWorld`] over `world` and get their
/// configuration back afterwards, so the same descriptor can be fired for
/// real with identical inputs.
pub fn fire_beam(bolt: &mut Bolt, world: &mut dyn World, env: &mut Env<'_>) -> TraversalReport {
    bolt.reset_tally();
    bolt.in_explosion_phase = false;
    bolt.aimed_at_feet = bolt.target == bolt.source;
    bolt.pos = bolt.source;

    debug!(
        name = %bolt.name,
        flavour = %bolt.flavour,
        hit = bolt.hit,
        damage = %bolt.damage,
        range = bolt.range,
        tracer = bolt.is_tracer,
        "fire beam from {} to {}",
        bolt.source,
        bolt.target
    );

    let saved = bolt.snapshot();
    if bolt.is_tracer {
        let report = {
            let mut shadow = ShadowWorld::new(&*world);
            traverse(bolt, &mut shadow, env)
        };
        bolt.restore(saved);
        report
    } else {
        traverse(bolt, world, env)
    }
}

fn traverse(bolt: &mut Bolt, world: &mut dyn World, env: &mut Env<'_>) -> TraversalReport {
    let mut cx = Traversal::new(bolt, world, env);
    cx.run();
    cx.report
}
