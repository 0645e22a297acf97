//! Bolts, beams and explosions
//!
//! A [`Bolt`] is configured from the [`ZapCatalog`], then driven through
//! the world by [`fire_beam`]. Each visited cell goes through the effect
//! dispatcher (wall, then embedded actor, then clouds, then actors) and
//! reports how much extra range it consumed. Area effects finish with an
//! [`explosion`]. [`player_tracer`] and [`fire_tracer`] run the same
//! traversal against a [`crate::world::ShadowWorld`] to predict what a
//! real cast would do.

mod affect;
mod bolt;
mod catalog;
mod cloud;
mod damage;
mod dice;
mod enchant;
mod explosion;
mod fire;
mod flavour;
mod hit;
mod mass;
mod ray;
mod report;
mod resist;
mod strategy;
mod tracer;
mod wall;

pub use bolt::{Bolt, BoltGlyph, Colour, DontStop, Tally, Thrower};
pub use catalog::{ZapCatalog, ZapEntry, ZapType};
pub use dice::{DamageFormula, DiceDef, ToHitFormula, calc_dice};
pub use enchant::{check_resist_magic, nasty_beam, nice_beam, stepdown_value};
pub use explosion::{ExplosionMap, ExplosionOptions, ExplosionSummary, explosion};
pub use fire::{fire_beam, term_on_target};
pub use flavour::{BoltTag, Flavour};
pub use hit::{range_used_on_hit, test_beam_hit};
pub use mass::{MassEnchantResult, mass_enchantment};
pub use ray::{Ray, check_line_of_sight};
pub use report::{
    EnchantResult, HitOutcome, PathStep, RangeCost, Resolution, ResistOutcome, Termination,
    TraversalReport,
};
pub use resist::{FlavourResolution, ResolveMode, adjust_flavoured, resist_adjust_damage};
pub use tracer::{TracerOutcome, ZapOutcome, fire_tracer, mons_should_fire, player_tracer, zapping};
