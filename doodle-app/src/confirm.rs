//! Interactive yes/no confirmation on a terminal.

use std::io::{self, BufRead, Write};

use doodle_core::{AlwaysConfirm, AlwaysDecline, Confirm, Prompt};

/// How prompts without a scripted answer are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmPolicy {
    /// Ask on the terminal.
    #[default]
    Ask,
    /// Answer yes to everything.
    AssumeYes,
    /// Answer no to everything.
    AssumeNo,
}

impl ConfirmPolicy {
    /// Build the confirmation capability for this policy.
    #[must_use]
    pub fn into_confirm(self) -> Box<dyn Confirm> {
        match self {
            Self::Ask => Box::new(TerminalConfirm::stdio()),
            Self::AssumeYes => Box::new(AlwaysConfirm),
            Self::AssumeNo => Box::new(AlwaysDecline),
        }
    }
}

/// Asks each prompt on `output` and reads a `y`/`yes` answer from `input`.
///
/// Anything else, including a read error or end of input, counts as no.
pub struct TerminalConfirm<R, W> {
    input: R,
    output: W,
}

impl TerminalConfirm<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    /// Confirm over arbitrary streams.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &Prompt) -> io::Result<bool> {
        write!(self.output, "{} [y/N] ", prompt.message())?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let answer = line.trim().to_ascii_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        match self.ask(prompt) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Could not read confirmation, declining: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let accepted =
            TerminalConfirm::new(input.as_bytes(), &mut output).confirm(&Prompt::ClearCanvas);
        (accepted, String::from_utf8(output).expect("utf8"))
    }

    #[test]
    fn test_yes_answers() {
        assert!(answer("y\n").0);
        assert!(answer("  YES \n").0);
    }

    #[test]
    fn test_anything_else_declines() {
        assert!(!answer("n\n").0);
        assert!(!answer("\n").0);
        assert!(!answer("").0);
        assert!(!answer("maybe\n").0);
    }

    #[test]
    fn test_prompt_is_written() {
        let (_, output) = answer("y\n");
        assert!(output.starts_with(Prompt::ClearCanvas.message()));
        assert!(output.ends_with("[y/N] "));
    }

    #[test]
    fn test_policies() {
        assert!(ConfirmPolicy::AssumeYes
            .into_confirm()
            .confirm(&Prompt::RevealAnswer));
        assert!(!ConfirmPolicy::AssumeNo
            .into_confirm()
            .confirm(&Prompt::RevealAnswer));
    }
}
