//! Collaborator interfaces between the engine and the game state
//!
//! The engine never owns terrain, clouds or actors. It reads and mutates
//! them through [`World`], writes narration through [`NarrationSink`],
//! asks for confirmation through [`Prompter`] and draws randomness from
//! [`GameRng`]. [`Env`] bundles the non-world collaborators so entry points
//! take one argument for all of them.

mod narration;
mod prompt;
mod shadow;

pub use narration::{MessageCache, MessageLog, MsgChannel, NarrationSink, Silent};
pub use prompt::{Decision, FirePrompt, PromptKind, Prompter, Scripted, Unattended};
pub use shadow::ShadowWorld;

use crate::actor::{Actor, ActorChange, ActorId};
use crate::beam::Flavour;
use crate::dungeon::{Cloud, Coord, Terrain};
use crate::options::EngineOptions;
use crate::rng::GameRng;

/// Terrain, cloud and actor access for one level
pub trait World {
    fn in_bounds(&self, c: Coord) -> bool;

    /// Width and height of the level
    fn dimensions(&self) -> (i32, i32);

    /// Terrain at a cell; out of bounds reads as permanent rock
    fn terrain(&self, c: Coord) -> Terrain;

    fn set_terrain(&mut self, c: Coord, terrain: Terrain);

    fn cloud_at(&self, c: Coord) -> Option<Cloud>;

    fn place_cloud(&mut self, c: Coord, cloud: Cloud);

    fn remove_cloud(&mut self, c: Coord);

    /// Living, present actor at a cell
    fn actor_at(&self, c: Coord) -> Option<ActorId>;

    fn actor(&self, id: ActorId) -> Option<&Actor>;

    /// Every actor on the level, present or not
    fn actor_ids(&self) -> Vec<ActorId>;

    /// The only way actors are mutated
    fn apply_change(&mut self, id: ActorId, change: ActorChange);

    fn player(&self) -> Option<ActorId>;

    /// Whether the observer can see a cell; gates narration only
    fn observer_sees(&self, c: Coord) -> bool;

    /// Items on a cell are exposed to a flavour
    fn expose_items(&mut self, _c: Coord, _flavour: Flavour, _burn_power: i32) {}

    fn is_solid(&self, c: Coord) -> bool {
        self.terrain(c).is_solid()
    }

    fn is_wall(&self, c: Coord) -> bool {
        self.terrain(c).is_wall()
    }
}

/// Non-world collaborators for one engine call
pub struct Env<'a> {
    pub rng: &'a mut GameRng,
    pub narration: &'a mut dyn NarrationSink,
    pub prompter: &'a mut dyn Prompter,
    pub options: &'a EngineOptions,
}

impl<'a> Env<'a> {
    pub fn new(
        rng: &'a mut GameRng,
        narration: &'a mut dyn NarrationSink,
        prompter: &'a mut dyn Prompter,
        options: &'a EngineOptions,
    ) -> Self {
        Self {
            rng,
            narration,
            prompter,
            options,
        }
    }

    /// Ask the prompter, falling back to the unattended policy
    pub fn confirm(&mut self, prompt: &FirePrompt) -> Decision {
        self.prompter
            .confirm(prompt)
            .unwrap_or(self.options.unattended_decision)
    }
}
