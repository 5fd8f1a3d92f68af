/// Which side currently owns the turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    #[default]
    Player,
    Enemies,
}

/// Turn bookkeeping for a single encounter.
///
/// `current_turn` crossed with `is_moving` is the whole externally visible
/// state machine; the pending step queue lives in the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub current_turn: Side,

    /// True while an actor is being stepped through a path or an attack
    /// window is open. Blocks new move and attack commands.
    pub is_moving: bool,

    /// Number of completed player/enemy exchanges.
    pub round: u64,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_player_turn(&self) -> bool {
        self.current_turn == Side::Player
    }
}
