//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, scenario loading, and player
//! controllers so clients can bubble them up with consistent context.
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::oneshot;

use tactics_core::{EncounterError, MapError, Rejection};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires an encounter before building")]
    MissingEncounter,

    #[error("player controller not set")]
    ControllerNotSet,

    #[error("player controller failed: {0}")]
    Controller(String),

    #[error("the encounter is over")]
    EncounterOver,

    #[error("command rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("failed to read scenario file {}", path.display())]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    ScenarioParse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Encounter(#[from] EncounterError),
}
