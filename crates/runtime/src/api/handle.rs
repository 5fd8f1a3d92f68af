//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting player commands, previewing moves, or streaming events from
//! specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use tactics_core::{Encounter, PathPreview, PlayerCommand, Position, TurnHistory, TurnState};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Submit the player's action for the current turn.
    ///
    /// Returns once the command is accepted and playback has started; use
    /// [`Self::wait_for_player_turn`] to await the end of the exchange.
    /// Commands sent while a sequence is playing fail with
    /// [`tactics_core::Rejection::Busy`].
    pub async fn submit(&self, command: PlayerCommand) -> Result<()> {
        self.request(|reply| Command::Submit { command, reply })
            .await?
    }

    /// Path to `destination` and whether the player can afford it
    pub async fn preview_path(&self, destination: Position) -> Result<Option<PathPreview>> {
        self.request(|reply| Command::PreviewPath { destination, reply })
            .await
    }

    /// Query the current encounter (read-only snapshot)
    pub async fn query_state(&self) -> Result<Encounter> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Copy of the turn history so far
    pub async fn history(&self) -> Result<TurnHistory> {
        self.request(|reply| Command::History { reply }).await
    }

    /// Resolves once no sequence is playing, i.e. the player may act again
    /// (or the encounter is over).
    pub async fn wait_for_player_turn(&self) -> Result<TurnState> {
        self.request(|reply| Command::WaitIdle { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use tactics_runtime::Topic;
    ///
    /// let mut history_rx = handle.subscribe(Topic::History);
    /// while let Ok(event) = history_rx.recv().await {
    ///     // Persist the record
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
