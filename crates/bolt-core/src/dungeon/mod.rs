//! Level geometry: coordinates, terrain, clouds and a reference level

mod cloud;
mod coord;
mod level;
mod terrain;

pub use cloud::{Cloud, CloudKind};
pub use coord::Coord;
pub use level::Level;
pub use terrain::Terrain;
