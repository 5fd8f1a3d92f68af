//! Deterministic tactics rules shared by the runtime and offline tools.
//!
//! `tactics-core` owns the grid cost model, the A* pathfinder, the movement
//! budget checks, the actor model, and the turn state machine. It performs no
//! I/O and never sleeps: pacing points are reported as [`engine::Pause`]
//! values and the caller decides how long to wait. All encounter mutation
//! flows through [`engine::TurnEngine`].
pub mod actor;
pub mod budget;
pub mod config;
pub mod encounter;
pub mod engine;
pub mod env;
pub mod error;
pub mod grid;
pub mod pathfinding;
pub mod state;

pub use actor::{
    Actor, ActorStats, AttackOutcome, Defeat, PatrolRoute, Pose, Role, attack, is_adjacent,
    is_adjacent_px,
};
pub use budget::{is_path_in_range, truncate_to_budget};
pub use config::{DeathPolicy, GameConfig};
pub use encounter::{Encounter, EncounterError, PathPreview};
pub use engine::{Advance, Pause, PlayerCommand, Playback, Rejection, Signal, TurnEngine};
pub use env::{GridMap, MapDimensions, MapError, MapOracle, StaticTile, TerrainKind};
pub use error::{ErrorSeverity, GameError};
pub use grid::{DIAGONAL_STEP_COST, MovementMode, ORTHOGONAL_STEP_COST, path_cost, step_cost};
pub use pathfinding::{Pathfinder, Route, find_path};
pub use state::{EntityId, Path, Position, Side, TurnAction, TurnHistory, TurnRecord, TurnState};
