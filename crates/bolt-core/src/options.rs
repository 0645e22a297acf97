//! Engine options
//!
//! Tunables a host can override from a config file. Everything has a
//! default, so a partial JSON object is enough.

use serde::{Deserialize, Serialize};

use crate::consts::LOS_RADIUS;
use crate::world::Decision;

/// User-configurable engine behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Range given to bolts configured with a non-positive range
    pub default_range: i32,
    /// Answer used when a fire-confirmation prompt gets no reply
    pub unattended_decision: Decision,
    /// Share of exposed power that must be foes before a monster fires
    pub monster_foe_ratio: i32,
    /// Foe ratio for hostile summons casting won't-attack bolts
    pub summoned_foe_ratio: i32,
    /// Upper bound on a backlight duration
    pub max_backlight: i32,
    /// Emit actor messages for cells the observer cannot see
    pub narrate_unseen: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            default_range: LOS_RADIUS,
            unattended_decision: Decision::Cancel,
            monster_foe_ratio: 80,
            summoned_foe_ratio: 25,
            max_backlight: 250,
            narrate_unseen: false,
        }
    }
}

impl EngineOptions {
    /// Parse options from JSON, filling gaps with defaults
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = EngineOptions::default();
        assert_eq!(opts.default_range, 8);
        assert_eq!(opts.unattended_decision, Decision::Cancel);
        assert_eq!(opts.monster_foe_ratio, 80);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let opts = EngineOptions::from_json(r#"{"default_range": 12}"#).unwrap();
        assert_eq!(opts.default_range, 12);
        assert_eq!(opts.summoned_foe_ratio, 25);
        assert_eq!(opts.max_backlight, 250);
    }

    #[test]
    fn test_unattended_decision_parses() {
        let opts = EngineOptions::from_json(r#"{"unattended_decision": "Proceed"}"#).unwrap();
        assert_eq!(opts.unattended_decision, Decision::Proceed);
    }
}
