//! Timed actor statuses

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A timed condition on an actor
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Status {
    #[default]
    Slow = 0,
    Haste = 1,
    Paralysed = 2,
    Confused = 3,
    Invisible = 4,
    Charmed = 5,
    Asleep = 6,
    SleepWary = 7,
    Backlit = 8,
    Petrifying = 9,
    Petrified = 10,
    Poisoned = 11,
    StickyFlame = 12,
    DeflectMissiles = 13,
    RepelMissiles = 14,
    Drained = 15,
    Mutated = 16,
}

impl Status {
    /// Statuses whose durations stack instead of taking the longer one
    pub const fn is_cumulative(&self) -> bool {
        matches!(
            self,
            Status::Poisoned | Status::StickyFlame | Status::Backlit | Status::Drained
        )
    }
}

/// Statuses currently on an actor, with remaining durations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSet {
    durations: HashMap<Status, i32>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, status: Status) -> bool {
        self.durations.contains_key(&status)
    }

    /// Remaining duration, 0 when absent
    pub fn duration(&self, status: Status) -> i32 {
        self.durations.get(&status).copied().unwrap_or(0)
    }

    /// Add a status; cumulative statuses stack, others keep the longer duration
    pub fn add(&mut self, status: Status, duration: i32) {
        let duration = duration.max(1);
        let entry = self.durations.entry(status).or_insert(0);
        if status.is_cumulative() {
            *entry += duration;
        } else {
            *entry = (*entry).max(duration);
        }
    }

    pub fn remove(&mut self, status: Status) -> bool {
        self.durations.remove(&status).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Status, i32)> + '_ {
        self.durations.iter().map(|(s, d)| (*s, *d))
    }
}
