//! Error types
//!
//! The traversal itself never fails: geometric anomalies are clamped and
//! configuration problems degrade to a no-op bolt. These errors surface
//! from catalog construction and lookup, and from building levels out of
//! text maps, so callers can log or reject them.

use thiserror::Error;

use crate::beam::{Flavour, ZapType};

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No entry for this identifier
    #[error("no catalog entry for zap '{0}'")]
    UnknownZap(ZapType),

    /// Two entries share an identifier
    #[error("zap '{0}' appears more than once in the catalog")]
    DuplicateEntry(ZapType),

    /// Entry's enchantment flag disagrees with its flavour
    #[error(
        "zap '{zap}' is marked enchantment={marked} but flavour {flavour} is enchantment={actual}"
    )]
    ClassificationMismatch {
        zap: ZapType,
        flavour: Flavour,
        marked: bool,
        actual: bool,
    },
}

/// Problems building a [`crate::dungeon::Level`] from glyph rows
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown terrain glyph '{glyph}' at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}
