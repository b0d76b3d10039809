//! Synchronous yes/no decision points.
//!
//! Clearing the canvas and revealing the answer both go through a
//! [`Confirm`] implementation, so any UI mechanism can be plugged in,
//! including the always-yes implementation used by automated tests.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// The questions the game asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    /// Erase the whole canvas.
    ClearCanvas,
    /// Show the correct image, ending the round.
    RevealAnswer,
}

impl Prompt {
    /// The text shown to the player.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ClearCanvas => "This erases the entire canvas.\nAre you sure?",
            Self::RevealAnswer => {
                "Show the answer?\nYou will not be able to draw after seeing it.\nYour current drawing will be saved to the gallery."
            }
        }
    }
}

/// What came out of a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// The player said yes and the action ran.
    Accepted,
    /// The player said no; nothing changed.
    Declined,
}

/// A yes/no decision point.
pub trait Confirm {
    /// Ask the question, returning `true` for yes.
    fn confirm(&mut self, prompt: &Prompt) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Prompt) -> bool,
{
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        self(prompt)
    }
}

/// Says yes to everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &Prompt) -> bool {
        true
    }
}

/// Says no to everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDecline;

impl Confirm for AlwaysDecline {
    fn confirm(&mut self, _prompt: &Prompt) -> bool {
        false
    }
}

/// Replays a fixed list of answers, then declines.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    asked: Vec<Prompt>,
}

impl ScriptedConfirm {
    /// Create from answers in the order they will be given.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Every prompt asked so far.
    #[must_use]
    pub fn asked(&self) -> &[Prompt] {
        &self.asked
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        self.asked.push(*prompt);
        self.answers.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_then_declines() {
        let mut confirm = ScriptedConfirm::new([true, false]);
        assert!(confirm.confirm(&Prompt::ClearCanvas));
        assert!(!confirm.confirm(&Prompt::RevealAnswer));
        assert!(!confirm.confirm(&Prompt::RevealAnswer));
        assert_eq!(
            confirm.asked(),
            &[
                Prompt::ClearCanvas,
                Prompt::RevealAnswer,
                Prompt::RevealAnswer
            ]
        );
    }

    #[test]
    fn test_reveal_message_names_consequences() {
        let message = Prompt::RevealAnswer.message();
        assert!(message.contains("not be able to draw"));
        assert!(message.contains("gallery"));
    }
}
