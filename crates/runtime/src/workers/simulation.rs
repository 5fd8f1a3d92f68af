//! Simulation worker that owns the authoritative [`tactics_core::Encounter`].
//!
//! Receives commands from [`crate::RuntimeHandle`], drives the
//! [`TurnEngine`], sleeps out each pacing point, and publishes events to the
//! [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, trace};

use tactics_core::{
    Encounter, PathPreview, PlayerCommand, Position, TurnEngine, TurnHistory, TurnState,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus};
use crate::runtime::PacingConfig;

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Validate and start playing a player command.
    Submit {
        command: PlayerCommand,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Path and affordability of a prospective player move.
    PreviewPath {
        destination: Position,
        reply: oneshot::Sender<Option<PathPreview>>,
    },
    /// Query the current encounter (read-only clone).
    QueryState { reply: oneshot::Sender<Encounter> },
    /// Copy of the turn history.
    History { reply: oneshot::Sender<TurnHistory> },
    /// Resolves once no sequence is playing.
    WaitIdle { reply: oneshot::Sender<TurnState> },
}

/// Background task that plays the turn state machine in real time.
///
/// Between pacing points the worker keeps answering queries; submits that
/// arrive mid-sequence are turned away by the engine as busy.
pub struct SimulationWorker {
    encounter: Encounter,
    pacing: PacingConfig,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    deadline: Option<Instant>,
    idle_waiters: Vec<oneshot::Sender<TurnState>>,
}

impl SimulationWorker {
    pub fn new(
        encounter: Encounter,
        pacing: PacingConfig,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            actors = encounter.actors().len(),
            movement = %encounter.config().movement,
            death_policy = %encounter.config().death_policy,
            "SimulationWorker initialized"
        );

        Self {
            encounter,
            pacing,
            command_rx,
            event_bus,
            deadline: None,
            idle_waiters: Vec::new(),
        }
    }

    /// Main worker loop. Exits when every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            let deadline = self.deadline;
            let pacing = async move {
                match deadline {
                    Some(deadline) => sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = pacing => {
                    self.deadline = None;
                    self.advance();
                }
            }
        }

        if self.encounter.is_busy() {
            debug!(target: "runtime::worker", "Worker stopped with a sequence still pending");
        }
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit { command, reply } => {
                let result = self.handle_submit(command);
                if reply.send(result).is_err() {
                    debug!("Submit reply channel closed (caller dropped)");
                }
            }
            Command::PreviewPath { destination, reply } => {
                if reply.send(self.encounter.preview_path(destination)).is_err() {
                    debug!("PreviewPath reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.encounter.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::History { reply } => {
                if reply.send(self.encounter.history().clone()).is_err() {
                    debug!("History reply channel closed (caller dropped)");
                }
            }
            Command::WaitIdle { reply } => {
                if self.encounter.is_busy() {
                    self.idle_waiters.push(reply);
                } else if reply.send(self.encounter.turn().clone()).is_err() {
                    debug!("WaitIdle reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_submit(&mut self, command: PlayerCommand) -> Result<()> {
        let label = command_label(&command);
        if let Err(rejection) = TurnEngine::new(&mut self.encounter).submit(command) {
            debug!(
                target: "runtime::worker",
                command = label,
                reason = %rejection,
                "Command rejected"
            );
            return Err(RuntimeError::Rejected(rejection));
        }

        info!(target: "runtime::worker", command = label, "Command accepted");
        self.advance();
        Ok(())
    }

    /// Runs the engine to its next pacing point and arms the timer for it.
    fn advance(&mut self) {
        let advance = TurnEngine::new(&mut self.encounter).advance();
        for signal in advance.signals {
            let event = Event::from_signal(signal, &self.encounter);
            trace!(target: "runtime::worker", ?event, "Publishing event");
            self.event_bus.publish(event);
        }

        match advance.pause {
            Some(pause) => {
                let delay = self.pacing.delay(pause);
                trace!(target: "runtime::worker", %pause, ?delay, "Pacing");
                self.deadline = Some(Instant::now() + delay);
            }
            None => {
                self.deadline = None;
                let turn = self.encounter.turn().clone();
                debug!(
                    target: "runtime::worker",
                    round = turn.round,
                    history = self.encounter.history().len(),
                    "Sequence finished"
                );
                for waiter in self.idle_waiters.drain(..) {
                    let _ = waiter.send(turn.clone());
                }
            }
        }
    }
}

fn command_label(command: &PlayerCommand) -> &'static str {
    match command {
        PlayerCommand::Skip => "skip",
        PlayerCommand::MoveTo(_) => "move_to",
        PlayerCommand::FollowPath(_) => "follow_path",
        PlayerCommand::Attack(_) => "attack",
    }
}
