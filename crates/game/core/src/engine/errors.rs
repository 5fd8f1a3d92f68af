//! Reasons a player command is turned away.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, Position};

/// A rejected command. The encounter is left exactly as it was: no state
/// mutation and no history entry.
#[derive(Clone, Debug, PartialEq, thiserror::Error, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("a move or attack is still resolving")]
    Busy,

    #[error("it is not the player's turn")]
    NotPlayerTurn,

    #[error("the player has been defeated")]
    PlayerDefeated,

    #[error("path must contain at least one step")]
    EmptyPath,

    #[error("path starts at {found}, actor stands on {expected}")]
    WrongStart { expected: Position, found: Position },

    #[error("{from} -> {to} is not a single step")]
    InvalidStep { from: Position, to: Position },

    #[error("tile {0} is not walkable")]
    Blocked(Position),

    #[error("no path to {0}")]
    Unreachable(Position),

    #[error("path costs {cost:.3} but only {budget:.3} move points remain")]
    OutOfRange { cost: f64, budget: f64 },

    #[error("unknown actor {0}")]
    UnknownTarget(EntityId),

    #[error("actor {0} is not a live enemy")]
    InvalidTarget(EntityId),
}

impl GameError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Rejection::Busy | Rejection::NotPlayerTurn => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        self.into()
    }
}
