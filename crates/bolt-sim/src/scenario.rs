//! JSON scenarios for the simulator

use serde::Deserialize;
use thiserror::Error;

use bolt_core::MapError;
use bolt_core::actor::Actor;
use bolt_core::beam::{Bolt, Thrower, ZapType};
use bolt_core::dungeon::{Coord, Level};
use bolt_core::world::{Decision, World};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("actor '{name}' at ({x}, {y}) is outside the map")]
    ActorOutOfBounds { name: String, x: i32, y: i32 },

    #[error("actors '{first}' and '{second}' share ({x}, {y})")]
    Occupied {
        first: String,
        second: String,
        x: i32,
        y: i32,
    },

    #[error("scenario has more than one player")]
    DuplicatePlayer,

    #[error("monster thrower #{0} is not one of the scenario's actors")]
    UnknownThrower(u32),

    #[error("player thrower needs a player actor")]
    MissingPlayer,
}

/// One shot on one map
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Terrain rows, one glyph per cell
    pub map: Vec<String>,
    #[serde(default)]
    pub actors: Vec<Actor>,
    /// Cells the observer cannot see
    #[serde(default)]
    pub hidden: Vec<Coord>,
    /// Catalog entry to configure the bolt from
    #[serde(default)]
    pub zap: Option<ZapType>,
    /// Explicit bolt, used as-is when no zap is given
    #[serde(default)]
    pub bolt: Option<Bolt>,
    #[serde(default)]
    pub power: i32,
    pub source: Coord,
    pub target: Coord,
    #[serde(default)]
    pub range: i32,
    #[serde(default)]
    pub thrower: Thrower,
    /// Replies to fire-confirmation prompts, in order
    #[serde(default)]
    pub answers: Vec<Decision>,
}

impl Scenario {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Build the level, checking actor placement
    pub fn level(&self) -> Result<Level, ScenarioError> {
        let mut level = Level::from_rows(self.map.as_slice())?;
        let mut has_player = false;
        for actor in &self.actors {
            if !level.in_bounds(actor.pos) {
                return Err(ScenarioError::ActorOutOfBounds {
                    name: actor.name.clone(),
                    x: actor.pos.x,
                    y: actor.pos.y,
                });
            }
            if actor.is_player {
                if has_player {
                    return Err(ScenarioError::DuplicatePlayer);
                }
                has_player = true;
            }
            if let Some(other) = level.actor_at(actor.pos).and_then(|id| level.actor(id)) {
                return Err(ScenarioError::Occupied {
                    first: other.name.clone(),
                    second: actor.name.clone(),
                    x: actor.pos.x,
                    y: actor.pos.y,
                });
            }
            level.add_actor(actor.clone());
        }
        for &c in &self.hidden {
            level.hide(c);
        }

        match self.thrower {
            Thrower::Monster(id) if level.actor(id).is_none() => {
                Err(ScenarioError::UnknownThrower(id.0))
            }
            Thrower::Player if !has_player => Err(ScenarioError::MissingPlayer),
            _ => Ok(level),
        }
    }

    /// The bolt to fire, before any catalog configuration
    pub fn bolt(&self) -> Bolt {
        let mut bolt = self.bolt.clone().unwrap_or_default();
        bolt.source = self.source;
        bolt.target = self.target;
        bolt.thrower = self.thrower;
        if self.range > 0 {
            bolt.range = self.range;
        }
        bolt
    }
}
