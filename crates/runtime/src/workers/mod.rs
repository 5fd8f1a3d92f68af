//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the encounter and plays the turn state machine
//! with real-time pacing.

mod simulation;

pub use simulation::{Command, SimulationWorker};
