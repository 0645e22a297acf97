//! Copy-on-write view of a world for tracer runs
//!
//! A tracer needs to see its own simulated consequences (a dug tunnel, a
//! quenched cloud, a monster that was already killed) so that it follows
//! the same path a real run would. Those changes land in overlays here and
//! the borrowed base world is never written.

use hashbrown::HashMap;

use super::World;
use crate::actor::{Actor, ActorChange, ActorId};
use crate::beam::Flavour;
use crate::dungeon::{Cloud, Coord, Terrain};

pub struct ShadowWorld<'w> {
    base: &'w dyn World,
    terrain: HashMap<Coord, Terrain>,
    clouds: HashMap<Coord, Option<Cloud>>,
    actors: HashMap<ActorId, Actor>,
    exposures: usize,
}

impl<'w> ShadowWorld<'w> {
    pub fn new(base: &'w dyn World) -> Self {
        Self {
            base,
            terrain: HashMap::new(),
            clouds: HashMap::new(),
            actors: HashMap::new(),
            exposures: 0,
        }
    }

    /// Number of simulated changes recorded against the base
    pub fn overlay_len(&self) -> usize {
        self.terrain.len() + self.clouds.len() + self.actors.len()
    }

    /// Item exposures that were simulated instead of performed
    pub fn exposures(&self) -> usize {
        self.exposures
    }
}

impl World for ShadowWorld<'_> {
    fn in_bounds(&self, c: Coord) -> bool {
        self.base.in_bounds(c)
    }

    fn dimensions(&self) -> (i32, i32) {
        self.base.dimensions()
    }

    fn terrain(&self, c: Coord) -> Terrain {
        match self.terrain.get(&c) {
            Some(t) => *t,
            None => self.base.terrain(c),
        }
    }

    fn set_terrain(&mut self, c: Coord, terrain: Terrain) {
        if self.in_bounds(c) {
            self.terrain.insert(c, terrain);
        }
    }

    fn cloud_at(&self, c: Coord) -> Option<Cloud> {
        match self.clouds.get(&c) {
            Some(cloud) => *cloud,
            None => self.base.cloud_at(c),
        }
    }

    fn place_cloud(&mut self, c: Coord, cloud: Cloud) {
        if self.in_bounds(c) {
            self.clouds.insert(c, Some(cloud));
        }
    }

    fn remove_cloud(&mut self, c: Coord) {
        self.clouds.insert(c, None);
    }

    fn actor_at(&self, c: Coord) -> Option<ActorId> {
        if let Some((id, _)) = self
            .actors
            .iter()
            .find(|(_, a)| a.pos == c && a.is_present())
        {
            return Some(*id);
        }
        // an overlaid actor has moved away or died
        self.base
            .actor_at(c)
            .filter(|id| !self.actors.contains_key(id))
    }

    fn actor(&self, id: ActorId) -> Option<&Actor> {
        match self.actors.get(&id) {
            Some(a) => Some(a),
            None => self.base.actor(id),
        }
    }

    fn actor_ids(&self) -> Vec<ActorId> {
        self.base.actor_ids()
    }

    fn apply_change(&mut self, id: ActorId, change: ActorChange) {
        if !self.actors.contains_key(&id) {
            match self.base.actor(id) {
                Some(a) => {
                    self.actors.insert(id, a.clone());
                }
                None => return,
            }
        }
        if let Some(actor) = self.actors.get_mut(&id) {
            actor.apply(&change);
        }
    }

    fn player(&self) -> Option<ActorId> {
        self.base.player()
    }

    fn observer_sees(&self, c: Coord) -> bool {
        self.base.observer_sees(c)
    }

    fn expose_items(&mut self, _c: Coord, _flavour: Flavour, _burn_power: i32) {
        self.exposures += 1;
    }
}
