//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the encounter.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use tactics_core::{Encounter, GameError, Pause, PlayerCommand, TurnState};

use crate::api::{PlayerController, Result, RuntimeError, RuntimeHandle};
use crate::events::{Event, EventBus, Topic};
use crate::scenario::Scenario;
use crate::workers::{Command, SimulationWorker};

/// Real-time length of each pacing point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    /// After each waypoint of a traversal.
    pub step: Duration,
    /// Attack and hit animations.
    pub attack: Duration,
    /// Death animation before the defeat is applied.
    pub death: Duration,
    /// Between the player's turn and the enemy sweep.
    pub handoff: Duration,
}

impl PacingConfig {
    pub const DEFAULT_STEP: Duration = Duration::from_millis(200);
    pub const DEFAULT_ATTACK: Duration = Duration::from_millis(400);
    pub const DEFAULT_DEATH: Duration = Duration::from_millis(600);
    pub const DEFAULT_HANDOFF: Duration = Duration::from_millis(300);

    /// Zero delays, for headless runs and tests.
    pub const fn instant() -> Self {
        Self {
            step: Duration::ZERO,
            attack: Duration::ZERO,
            death: Duration::ZERO,
            handoff: Duration::ZERO,
        }
    }

    pub fn delay(&self, pause: Pause) -> Duration {
        match pause {
            Pause::Step => self.step,
            Pause::Attack => self.attack,
            Pause::Death => self.death,
            Pause::Handoff => self.handoff,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            step: Self::DEFAULT_STEP,
            attack: Self::DEFAULT_ATTACK,
            death: Self::DEFAULT_DEATH,
            handoff: Self::DEFAULT_HANDOFF,
        }
    }
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub pacing: PacingConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that plays an encounter.
///
/// Runtime owns the worker and asks the player controller for input.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    controller: Option<Box<dyn PlayerController>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to events from one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Plays one full exchange: the player's action and the enemy sweep.
    ///
    /// Waits for any running sequence first. A command the engine rejects is
    /// logged and replaced with a skip so the exchange always completes.
    pub async fn play_turn(&mut self) -> Result<TurnState> {
        let controller = self
            .controller
            .as_ref()
            .ok_or(RuntimeError::ControllerNotSet)?;

        self.handle.wait_for_player_turn().await?;
        let snapshot = self.handle.query_state().await?;
        if snapshot.is_over() {
            return Err(RuntimeError::EncounterOver);
        }

        let command = controller.next_command(&snapshot).await?;
        match self.handle.submit(command).await {
            Ok(()) => {}
            Err(RuntimeError::Rejected(rejection)) if !rejection.severity().is_recoverable() => {
                warn!(
                    target: "runtime",
                    code = rejection.error_code(),
                    reason = %rejection,
                    "Controller command rejected, skipping turn"
                );
                self.handle.submit(PlayerCommand::Skip).await?;
            }
            Err(error) => return Err(error),
        }

        self.handle.wait_for_player_turn().await
    }

    /// Plays up to `max_rounds` exchanges, stopping early once the encounter
    /// is over. Returns the number of exchanges played.
    pub async fn run(&mut self, max_rounds: u64) -> Result<u64> {
        let mut played = 0;
        while played < max_rounds {
            match self.play_turn().await {
                Ok(turn) => {
                    played += 1;
                    info!(target: "runtime", round = turn.round, "Exchange complete");
                }
                Err(RuntimeError::EncounterOver) => break,
                Err(error) => return Err(error),
            }
        }
        Ok(played)
    }

    /// Set the player controller
    pub fn set_controller(&mut self, controller: impl PlayerController + 'static) {
        self.controller = Some(Box::new(controller));
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    encounter: Option<Encounter>,
    controller: Option<Box<dyn PlayerController>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            encounter: None,
            controller: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override only the pacing delays
    pub fn pacing(mut self, pacing: PacingConfig) -> Self {
        self.config.pacing = pacing;
        self
    }

    /// Provide the encounter to play
    pub fn encounter(mut self, encounter: Encounter) -> Self {
        self.encounter = Some(encounter);
        self
    }

    /// Build the encounter from a scenario
    pub fn scenario(mut self, scenario: &Scenario) -> Result<Self> {
        self.encounter = Some(scenario.build_encounter()?);
        Ok(self)
    }

    /// Set player controller (optional; required by [`Runtime::play_turn`])
    pub fn controller(mut self, controller: impl PlayerController + 'static) -> Self {
        self.controller = Some(Box::new(controller));
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let encounter = self.encounter.ok_or(RuntimeError::MissingEncounter)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sim_worker = SimulationWorker::new(encounter, self.config.pacing, command_rx, event_bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            controller: self.controller,
            sim_worker_handle,
        })
    }
}
