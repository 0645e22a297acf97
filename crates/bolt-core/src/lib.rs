//! bolt-core: ranged-effect simulation engine
//!
//! Traces bolts, beams and explosions through a grid world, dispatches
//! per-cell effects against walls, clouds and actors, and resolves
//! flavoured damage and enchantments. A tracer mode predicts the outcome
//! of a traversal against a copy-on-write shadow of the world so that
//! callers can confirm before committing to a real cast.
//!
//! The engine owns no world state: terrain, clouds and actors are reached
//! through the [`world::World`] collaborator trait. [`dungeon::Level`] is a
//! reference in-memory implementation used by tests and the simulator.

pub mod actor;
pub mod beam;
pub mod dungeon;
pub mod world;

mod consts;
mod error;
mod options;
mod rng;

pub use consts::*;
pub use error::{CatalogError, MapError, Result};
pub use options::EngineOptions;
pub use rng::GameRng;
