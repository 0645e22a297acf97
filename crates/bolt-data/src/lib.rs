//! bolt-data: Static data for the bolt engine
//!
//! Contains the zap table every wand, spell and breath weapon is configured from.

pub mod zaps;

pub use zaps::{ZAP_DATA, get_zap, num_zaps, standard_catalog};
