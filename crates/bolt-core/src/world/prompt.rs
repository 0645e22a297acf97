//! Friendly-fire confirmation

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Answer to a fire-confirmation prompt
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Decision {
    Proceed = 0,
    #[default]
    Cancel = 1,
}

/// Why the tracer is asking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptKind {
    /// The bolt would hit its own thrower
    SelfHit,
    Ally { name: String },
    Neutral { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirePrompt {
    pub kind: PromptKind,
    pub text: String,
}

/// Source of answers to fire-confirmation prompts
pub trait Prompter {
    /// `None` means nobody answered
    fn confirm(&mut self, prompt: &FirePrompt) -> Option<Decision>;
}

/// Never answers; the configured unattended policy applies
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl Prompter for Unattended {
    fn confirm(&mut self, _prompt: &FirePrompt) -> Option<Decision> {
        None
    }
}

/// Replays queued answers and records every prompt asked
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    answers: VecDeque<Decision>,
    asked: Vec<FirePrompt>,
}

impl Scripted {
    pub fn new(answers: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[FirePrompt] {
        &self.asked
    }
}

impl Prompter for Scripted {
    fn confirm(&mut self, prompt: &FirePrompt) -> Option<Decision> {
        self.asked.push(prompt.clone());
        self.answers.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_replays_in_order() {
        let mut p = Scripted::new([Decision::Proceed, Decision::Cancel]);
        let prompt = FirePrompt {
            kind: PromptKind::SelfHit,
            text: String::from("That beam is likely to hit you. Continue anyway?"),
        };
        assert_eq!(p.confirm(&prompt), Some(Decision::Proceed));
        assert_eq!(p.confirm(&prompt), Some(Decision::Cancel));
        assert_eq!(p.confirm(&prompt), None);
        assert_eq!(p.asked().len(), 3);
    }

    #[test]
    fn test_unattended_never_answers() {
        let prompt = FirePrompt {
            kind: PromptKind::Ally {
                name: String::from("the dog"),
            },
            text: String::from("Really fire at the dog?"),
        };
        assert_eq!(Unattended.confirm(&prompt), None);
    }
}
