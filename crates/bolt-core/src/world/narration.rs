//! User-facing narration

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Presentation channel for a message
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum MsgChannel {
    #[default]
    Plain = 0,
    /// Something heard rather than seen
    Sound = 1,
    Warning = 2,
    Prompt = 3,
}

/// Write-only destination for narration
pub trait NarrationSink {
    fn emit(&mut self, channel: MsgChannel, text: &str);
}

/// Sink that keeps every message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    pub entries: Vec<(MsgChannel, String)>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message texts in emission order
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, t)| t.as_str()).collect()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|(_, t)| t == text)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl NarrationSink for MessageLog {
    fn emit(&mut self, channel: MsgChannel, text: &str) {
        self.entries.push((channel, text.to_string()));
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl NarrationSink for Silent {
    fn emit(&mut self, _channel: MsgChannel, _text: &str) {}
}

/// Per-traversal duplicate suppression
#[derive(Debug, Clone, Default)]
pub struct MessageCache {
    seen: HashSet<String>,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time a text is offered
    pub fn first_time(&mut self, text: &str) -> bool {
        if self.seen.contains(text) {
            false
        } else {
            self.seen.insert(text.to_string());
            true
        }
    }
}
