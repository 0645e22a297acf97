//! Per-cell effect dispatch
//!
//! Order matters: the wall first, then an actor embedded in it, then
//! items and clouds on an open cell, then whoever stands there. The first
//! actor interaction that meets the termination predicate stops the bolt.

use super::fire::{Traversal, term_on_target};
use super::flavour::Flavour;
use super::report::RangeCost;
use crate::actor::{ActorFlags, ActorId};
use crate::dungeon::{Coord, Terrain};

impl Traversal<'_, '_> {
    /// Resolve everything a bolt does to one cell
    pub(crate) fn affect(&mut self, pos: Coord) -> RangeCost {
        if self.bolt.flavour == Flavour::LineOfSight {
            return RangeCost::NONE;
        }

        let mut cost = RangeCost::NONE;

        if self.world.is_solid(pos) {
            cost = self.wall_stage(pos);
            if self.world.is_solid(pos) {
                return cost;
            }
        }

        if self.affect_items {
            let burn_power = if self.bolt.is_explosion {
                5
            } else if self.bolt.is_beam {
                3
            } else {
                2
            };
            self.world.expose_items(pos, self.bolt.flavour, burn_power);
        }
        cost = cost.plus(self.place_path_clouds(pos));

        let Some(id) = self.world.actor_at(pos) else {
            return cost;
        };
        let reachable = match self.world.actor(id) {
            Some(actor) => {
                actor.is_player
                    || !actor.is_submerged()
                    || (self.bolt.aimed_at_spot && self.bolt.target == pos)
            }
            None => false,
        };
        if !reachable {
            return cost;
        }

        if !self.bolt.is_big_cloud && (!self.bolt.is_explosion || self.bolt.in_explosion_phase) {
            cost = cost.plus(self.affect_actor(id));
        }
        if term_on_target(self.bolt, pos) {
            return RangeCost::Stop;
        }
        cost
    }

    /// Resolve a solid cell: the wall itself, then anyone inside it
    pub(crate) fn wall_stage(&mut self, pos: Coord) -> RangeCost {
        let strategy = self.bolt.flavour.strategy();
        let mut cost = RangeCost::NONE;

        if strategy.affects_wall(self.bolt, self.world.terrain(pos)) {
            cost = strategy.resolve_wall(self, pos);
        }

        if self.world.is_solid(pos) {
            if let Some(id) = self.world.actor_at(pos) {
                if self.mon_in_wall_affectable(id, self.world.terrain(pos)) {
                    cost = cost.plus(self.affect_actor(id));
                } else {
                    let text = format!(
                        "The {} protects {} from harm.",
                        self.world.terrain(pos).describe(),
                        self.target_name(id)
                    );
                    self.say_at(pos, &text);
                }
            }
        }
        cost
    }

    /// Whether a bolt reaches an actor standing inside a wall
    pub(crate) fn mon_in_wall_affectable(&self, id: ActorId, wall: Terrain) -> bool {
        let Some(actor) = self.world.actor(id) else {
            return false;
        };
        if actor.flags.contains(ActorFlags::WALL_SHIELDED) {
            return false;
        }
        if self.bolt.is_enchantment() {
            return true;
        }
        !self.bolt.is_explosion
            && !self.bolt.is_big_cloud
            && self.bolt.is_beam
            && (wall == Terrain::MetalWall || self.bolt.flavour != Flavour::Electricity)
    }

    /// Hand an actor to the flavour's resolver, predicting first when tracing
    pub(crate) fn affect_actor(&mut self, id: ActorId) -> RangeCost {
        if self.bolt.is_tracer && self.expose(id) {
            return RangeCost::Stop;
        }
        let strategy = self.bolt.flavour.strategy();
        strategy.resolve_actor(self, id)
    }
}
