//! Async round driver.
//!
//! The session itself is synchronous. The driver owns it, spawns one tokio
//! task per catalog fetch and feeds the results back through an mpsc channel
//! tagged with the fetch ticket, so late answers for superseded rounds are
//! dropped by the panel. A fetch task that panics or is cancelled still
//! reports back, as a fetch failure.

use std::sync::Arc;

use doodle_core::{
    Confirm, Decision, DoodleError, DoodleResult, EntityRecord, FetchTicket, GameSession,
    IdSource, LoadOutcome, Prompt, RevealOutcome,
};
use tokio::sync::mpsc;

use crate::catalog::Catalog;
use crate::script::Command;

struct Completion {
    ticket: FetchTicket,
    result: DoodleResult<EntityRecord>,
}

/// Drives a [`GameSession`] against an async catalog.
pub struct RoundDriver {
    session: GameSession,
    catalog: Arc<dyn Catalog>,
    ids: Box<dyn IdSource + Send>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl RoundDriver {
    /// Wrap a session.
    #[must_use]
    pub fn new(
        session: GameSession,
        catalog: Arc<dyn Catalog>,
        ids: Box<dyn IdSource + Send>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session,
            catalog,
            ids,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// The driven session.
    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Mutable access for direct input handling.
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// Fetches spawned but not yet applied.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start a round for the next id from the id source.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new_round(&mut self) -> FetchTicket {
        let id = self.ids.next_id();
        self.load_id(id)
    }

    /// Start a round for `id` and spawn its fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn load_id(&mut self, id: u32) -> FetchTicket {
        let ticket = self.session.begin_load(id);
        let catalog = Arc::clone(&self.catalog);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { catalog.fetch(id).await });
            let result = match fetch.await {
                Ok(result) => result.map_err(DoodleError::from),
                Err(e) => {
                    tracing::error!("Fetch task for id {} did not finish: {}", id, e);
                    Err(DoodleError::FetchFailure(format!(
                        "Catalog fetch task failed: {e}"
                    )))
                }
            };
            // The driver may have been dropped; nothing left to update then
            let _ = tx.send(Completion { ticket, result });
        });

        self.in_flight += 1;
        ticket
    }

    /// Apply completions that have already arrived, without waiting.
    pub fn poll_ready(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<LoadOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Wait until every spawned fetch has been applied.
    pub async fn settle(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.next_completion().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    fn apply(&mut self, completion: Completion) -> LoadOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Completion { ticket, result } = completion;
        let outcome = self.session.complete_load(ticket, result);
        tracing::debug!(
            "Fetch #{} for id {} applied: {:?}",
            ticket.seq,
            ticket.id,
            outcome
        );
        outcome
    }

    /// Run one scripted command.
    ///
    /// Prompts without a scripted answer go to `fallback`.
    ///
    /// # Errors
    ///
    /// Fails on an unparsable color, a zero-sized resize or a snapshot that
    /// cannot be encoded.
    pub async fn execute(
        &mut self,
        command: &Command,
        fallback: &mut dyn Confirm,
    ) -> DoodleResult<()> {
        if let Some(event) = command.input_event()? {
            self.session.process_event(&event)?;
            self.poll_ready();
            return Ok(());
        }

        match command {
            Command::NewRound => {
                self.new_round();
            }
            Command::LoadId { id } => {
                self.load_id(*id);
            }
            Command::Clear { confirm } => {
                let mut ask = answer_or(*confirm, fallback);
                if self.session.clear(&mut ask) == Decision::Accepted {
                    tracing::info!("Canvas cleared");
                }
            }
            Command::Reveal { confirm } => {
                let mut ask = answer_or(*confirm, fallback);
                if self.session.request_reveal(&mut ask)? == RevealOutcome::Refused {
                    tracing::debug!("Reveal not available");
                }
            }
            Command::Settle => {
                self.settle().await;
            }
            // Plain input was handled above
            _ => {}
        }
        // Keep the panel current between commands
        self.poll_ready();
        Ok(())
    }

    /// Run a whole script, then wait for outstanding fetches.
    ///
    /// A command that fails is logged and skipped; the rest of the script
    /// still runs.
    ///
    /// # Errors
    ///
    /// Stops only when a snapshot cannot be encoded.
    pub async fn run(
        &mut self,
        commands: &[Command],
        fallback: &mut dyn Confirm,
    ) -> DoodleResult<()> {
        for command in commands {
            match self.execute(command, fallback).await {
                Ok(()) => {}
                Err(e @ DoodleError::Snapshot(_)) => return Err(e),
                Err(e) => tracing::warn!("Skipping command {:?}: {}", command, e),
            }
        }
        self.settle().await;
        Ok(())
    }
}

fn answer_or<'a>(
    answer: Option<bool>,
    fallback: &'a mut dyn Confirm,
) -> impl FnMut(&Prompt) -> bool + 'a {
    move |prompt: &Prompt| answer.unwrap_or_else(|| fallback.confirm(prompt))
}
