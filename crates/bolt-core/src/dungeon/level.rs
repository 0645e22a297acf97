//! In-memory reference world

use hashbrown::{HashMap, HashSet};

use super::{Cloud, Coord, Terrain};
use crate::actor::{Actor, ActorChange, ActorId};
use crate::beam::Flavour;
use crate::error::MapError;
use crate::world::World;

/// A rectangular level holding terrain, clouds and an actor arena
#[derive(Debug, Clone)]
pub struct Level {
    width: i32,
    height: i32,
    terrain: Vec<Terrain>,
    clouds: Vec<Option<Cloud>>,
    actors: Vec<Actor>,
    /// Derived cell index over present actors
    index: HashMap<Coord, ActorId>,
    player: Option<ActorId>,
    hidden: HashSet<Coord>,
    exposures: Vec<(Coord, Flavour, i32)>,
}

impl Level {
    /// An all-floor level
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let cells = (width * height) as usize;
        Self {
            width,
            height,
            terrain: vec![Terrain::Floor; cells],
            clouds: vec![None; cells],
            actors: Vec::new(),
            index: HashMap::new(),
            player: None,
            hidden: HashSet::new(),
            exposures: Vec::new(),
        }
    }

    /// Build a level from glyph rows (see [`Terrain::glyph`])
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }
        let mut level = Level::new(width as i32, height as i32);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != width {
                return Err(MapError::Ragged {
                    row: y,
                    expected: width,
                    found: len,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let terrain = Terrain::from_glyph(ch).ok_or(MapError::UnknownGlyph {
                    glyph: ch,
                    x,
                    y,
                })?;
                level.set_terrain(Coord::new(x as i32, y as i32), terrain);
            }
        }
        Ok(level)
    }

    /// Render terrain back to glyph rows
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.terrain(Coord::new(x, y)).glyph())
                    .collect()
            })
            .collect()
    }

    fn idx(&self, c: Coord) -> Option<usize> {
        if self.in_bounds(c) {
            Some((c.y * self.width + c.x) as usize)
        } else {
            None
        }
    }

    /// Place an actor; the first player added becomes the level's player
    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        let id = ActorId(self.actors.len() as u32);
        if actor.is_player && self.player.is_none() {
            self.player = Some(id);
        }
        if actor.is_present() {
            self.index.insert(actor.pos, id);
        }
        self.actors.push(actor);
        id
    }

    /// Mark a cell as invisible to the observer
    pub fn hide(&mut self, c: Coord) {
        self.hidden.insert(c);
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Item exposures received, in order
    pub fn exposures(&self) -> &[(Coord, Flavour, i32)] {
        &self.exposures
    }
}

impl World for Level {
    fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    fn dimensions(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn terrain(&self, c: Coord) -> Terrain {
        self.idx(c)
            .map(|i| self.terrain[i])
            .unwrap_or(Terrain::PermarockWall)
    }

    fn set_terrain(&mut self, c: Coord, terrain: Terrain) {
        if let Some(i) = self.idx(c) {
            self.terrain[i] = terrain;
        }
    }

    fn cloud_at(&self, c: Coord) -> Option<Cloud> {
        self.idx(c).and_then(|i| self.clouds[i])
    }

    fn place_cloud(&mut self, c: Coord, cloud: Cloud) {
        if let Some(i) = self.idx(c) {
            self.clouds[i] = Some(cloud);
        }
    }

    fn remove_cloud(&mut self, c: Coord) {
        if let Some(i) = self.idx(c) {
            self.clouds[i] = None;
        }
    }

    fn actor_at(&self, c: Coord) -> Option<ActorId> {
        self.index.get(&c).copied()
    }

    fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0 as usize)
    }

    fn actor_ids(&self) -> Vec<ActorId> {
        (0..self.actors.len() as u32).map(ActorId).collect()
    }

    fn apply_change(&mut self, id: ActorId, change: ActorChange) {
        let Some(actor) = self.actors.get_mut(id.0 as usize) else {
            return;
        };
        let old_pos = actor.pos;
        actor.apply(&change);
        let new_pos = actor.pos;
        let present = actor.is_present();

        if self.index.get(&old_pos) == Some(&id) {
            self.index.remove(&old_pos);
        }
        if present {
            self.index.insert(new_pos, id);
        }
    }

    fn player(&self) -> Option<ActorId> {
        self.player
    }

    fn observer_sees(&self, c: Coord) -> bool {
        self.in_bounds(c) && !self.hidden.contains(&c)
    }

    fn expose_items(&mut self, c: Coord, flavour: Flavour, burn_power: i32) {
        self.exposures.push((c, flavour, burn_power));
    }
}
