//! Terrain kinds and their physical classification

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Terrain occupying a single cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Terrain {
    #[default]
    Floor = 0,
    ShallowWater = 1,
    DeepWater = 2,
    Lava = 3,
    OpenDoor = 4,
    ClosedDoor = 5,
    SecretDoor = 6,
    RockWall = 7,
    ClearRockWall = 8,
    StoneWall = 9,
    ClearStoneWall = 10,
    MetalWall = 11,
    GreenCrystalWall = 12,
    WaxWall = 13,
    PermarockWall = 14,
    ClearPermarockWall = 15,
    OrcishIdol = 16,
    GraniteStatue = 17,
}

impl Terrain {
    /// Blocks movement and projectiles
    pub const fn is_solid(&self) -> bool {
        !matches!(
            self,
            Terrain::Floor
                | Terrain::ShallowWater
                | Terrain::DeepWater
                | Terrain::Lava
                | Terrain::OpenDoor
        )
    }

    /// Real wall material (doors and statues excluded)
    pub const fn is_wall(&self) -> bool {
        (*self as u8) >= Terrain::RockWall as u8 && (*self as u8) <= Terrain::ClearPermarockWall as u8
    }

    pub const fn is_statue(&self) -> bool {
        matches!(self, Terrain::OrcishIdol | Terrain::GraniteStatue)
    }

    /// Stops an explosion from spreading (statues let it wrap around)
    pub const fn blocks_explosion(&self) -> bool {
        self.is_wall() || matches!(self, Terrain::ClosedDoor | Terrain::SecretDoor)
    }

    /// Blocks line of sight
    pub const fn is_opaque(&self) -> bool {
        self.is_solid()
            && !self.is_statue()
            && !matches!(
                self,
                Terrain::ClearRockWall | Terrain::ClearStoneWall | Terrain::ClearPermarockWall
            )
    }

    pub const fn is_watery(&self) -> bool {
        matches!(self, Terrain::ShallowWater | Terrain::DeepWater)
    }

    /// Rock that a digging bolt can turn into floor
    pub const fn is_diggable(&self) -> bool {
        matches!(self, Terrain::RockWall | Terrain::ClearRockWall)
    }

    /// Name used in narration
    pub const fn describe(&self) -> &'static str {
        match self {
            Terrain::Floor => "floor",
            Terrain::ShallowWater => "shallow water",
            Terrain::DeepWater => "deep water",
            Terrain::Lava => "lava",
            Terrain::OpenDoor => "open door",
            Terrain::ClosedDoor => "door",
            Terrain::SecretDoor => "rock wall",
            Terrain::RockWall => "rock wall",
            Terrain::ClearRockWall => "translucent rock wall",
            Terrain::StoneWall => "stone wall",
            Terrain::ClearStoneWall => "translucent stone wall",
            Terrain::MetalWall => "metal wall",
            Terrain::GreenCrystalWall => "crystal wall",
            Terrain::WaxWall => "wax wall",
            Terrain::PermarockWall => "permanent rock wall",
            Terrain::ClearPermarockWall => "translucent permanent rock wall",
            Terrain::OrcishIdol => "orcish idol",
            Terrain::GraniteStatue => "granite statue",
        }
    }

    /// Map glyph used by text maps
    pub const fn glyph(&self) -> char {
        match self {
            Terrain::Floor => '.',
            Terrain::ShallowWater => '=',
            Terrain::DeepWater => '~',
            Terrain::Lava => '^',
            Terrain::OpenDoor => '\'',
            Terrain::ClosedDoor => '+',
            Terrain::SecretDoor => 'S',
            Terrain::RockWall => '#',
            Terrain::ClearRockWall => ':',
            Terrain::StoneWall => 'X',
            Terrain::ClearStoneWall => ';',
            Terrain::MetalWall => 'M',
            Terrain::GreenCrystalWall => 'G',
            Terrain::WaxWall => 'W',
            Terrain::PermarockWall => '%',
            Terrain::ClearPermarockWall => '!',
            Terrain::OrcishIdol => 'I',
            Terrain::GraniteStatue => '8',
        }
    }

    /// Inverse of [`Terrain::glyph`]
    pub fn from_glyph(ch: char) -> Option<Terrain> {
        Terrain::iter().find(|t| t.glyph() == ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_classification() {
        assert!(Terrain::RockWall.is_wall());
        assert!(Terrain::ClearPermarockWall.is_wall());
        assert!(!Terrain::GraniteStatue.is_wall());
        assert!(!Terrain::ClosedDoor.is_wall());
        assert!(Terrain::GraniteStatue.is_solid());
        assert!(Terrain::ClosedDoor.is_solid());
        assert!(!Terrain::ShallowWater.is_solid());
    }

    #[test]
    fn test_explosion_blockers() {
        assert!(Terrain::SecretDoor.blocks_explosion());
        assert!(Terrain::WaxWall.blocks_explosion());
        assert!(!Terrain::OrcishIdol.blocks_explosion());
        assert!(!Terrain::Lava.blocks_explosion());
    }

    #[test]
    fn test_opacity() {
        assert!(Terrain::RockWall.is_opaque());
        assert!(!Terrain::ClearRockWall.is_opaque());
        assert!(!Terrain::GraniteStatue.is_opaque());
        assert!(!Terrain::Floor.is_opaque());
    }

    #[test]
    fn test_glyphs_are_unique() {
        for t in Terrain::iter() {
            assert_eq!(Terrain::from_glyph(t.glyph()), Some(t));
        }
    }
}
