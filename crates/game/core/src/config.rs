use crate::grid::MovementMode;

/// What happens to the protagonist when its health reaches zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DeathPolicy {
    /// Restore health and return to the spawn tile.
    #[default]
    Respawn,
    /// Deactivate like an enemy; the encounter is over.
    Deactivate,
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Neighbor topology for movement and pathfinding.
    pub movement: MovementMode,

    /// Chebyshev radius within which enemies chase the player.
    /// Enemies farther away follow their patrol route instead.
    pub aggro_radius: u32,

    pub death_policy: DeathPolicy,

    /// Pixel size of one tile, used only for pixel conversions.
    pub tile_size: u32,

    /// Upper bound on nodes expanded per search; `None` means unbounded.
    pub max_search_expansions: Option<usize>,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_AGGRO_RADIUS: u32 = 10;
    pub const DEFAULT_TILE_SIZE: u32 = 8;

    pub fn new() -> Self {
        Self {
            movement: MovementMode::Orthogonal,
            aggro_radius: Self::DEFAULT_AGGRO_RADIUS,
            death_policy: DeathPolicy::Respawn,
            tile_size: Self::DEFAULT_TILE_SIZE,
            max_search_expansions: None,
        }
    }

    pub fn with_movement(mut self, movement: MovementMode) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_aggro_radius(mut self, aggro_radius: u32) -> Self {
        self.aggro_radius = aggro_radius;
        self
    }

    pub fn with_death_policy(mut self, death_policy: DeathPolicy) -> Self {
        self.death_policy = death_policy;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
