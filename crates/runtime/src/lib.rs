//! Async runtime that plays a tactics encounter in real time.
//!
//! This crate wraps the pure turn engine from `tactics-core` in a worker task
//! that sleeps out each pacing point, a command channel, and a topic-based
//! event bus. Consumers embed [`Runtime`] to play turns with a
//! [`PlayerController`] or drive the worker directly through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder, and pacing configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`scenario`] loads encounters from RON files
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod scenario;

mod workers;

pub use api::{
    AggressiveController, PlayerController, Result, RuntimeError, RuntimeHandle,
    ScriptedController, SkipController,
};
pub use events::{Event, EventBus, Topic};
pub use runtime::{PacingConfig, Runtime, RuntimeBuilder, RuntimeConfig};
pub use scenario::{EnemyPlacement, ExitPlacement, PlayerPlacement, Scenario};
