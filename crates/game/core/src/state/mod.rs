//! Plain data shared by every layer: identifiers, tile coordinates, turn
//! bookkeeping and the append-only turn history.
mod common;
mod history;
mod turn;

pub use common::{EntityId, Path, Position};
pub use history::{TurnAction, TurnHistory, TurnRecord};
pub use turn::{Side, TurnState};
