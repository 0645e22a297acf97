//! Engine-wide constants

/// Default bolt range and the reach of line-of-sight checks
pub const LOS_RADIUS: i32 = 8;

/// Largest radius an explosion may be given; larger values are clamped
pub const MAX_EXPLOSION_RADIUS: i32 = 9;

/// Side length of the explosion scratch map
pub const EXPLOSION_MAP_SIZE: usize = (2 * MAX_EXPLOSION_RADIUS + 1) as usize;

/// To-hit value that never misses and skips the dodge roll
pub const AUTOMATIC_HIT: i32 = 1500;

/// Magic resistance at or above this is total immunity
pub const MAG_IMMUNE: i32 = 5000;

/// Extra range consumed when a bolt quenches an opposed cloud
pub const CLOUD_QUENCH_COST: i32 = 5;

/// Range consumed by one bounce attempt
pub const BOUNCE_COST: i32 = 2;

/// Attempts made when looking for a teleport or blink destination
pub const RELOCATE_TRIES: u32 = 20;

/// Reach of a blink
pub const BLINK_RADIUS: i32 = 4;
