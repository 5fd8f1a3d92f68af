//! Combat entities.
//!
//! There is a single [`Actor`] type. The [`Role`] tag decides who controls it
//! and what happens when it is defeated; there is no per-role type.

use crate::config::DeathPolicy;
use crate::state::{EntityId, Position};

/// Animation intent exposed to the rendering layer.
///
/// Set by the engine as a side effect; turn logic never reads it back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Pose {
    #[default]
    Idle,
    Run,
    Attack,
    Hit,
    Dead,
}

/// Cyclic list of waypoints an enemy walks when it is not chasing the player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatrolRoute {
    pub waypoints: Vec<Position>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cursor: usize,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Position>) -> Self {
        Self {
            waypoints,
            cursor: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn current(&self) -> Option<Position> {
        if self.waypoints.is_empty() {
            return None;
        }
        self.waypoints.get(self.cursor % self.waypoints.len()).copied()
    }

    /// Moves the cursor to the next waypoint, wrapping around.
    pub fn advance(&mut self) {
        if !self.waypoints.is_empty() {
            self.cursor = (self.cursor + 1) % self.waypoints.len();
        }
    }
}

/// Who drives an actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    /// Player-controlled protagonist.
    Player,
    /// AI-controlled enemy with an optional patrol route.
    Enemy { patrol: PatrolRoute },
}

/// Static numbers an actor is created from.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorStats {
    pub max_health: u32,
    pub damage: u32,
    /// Movement budget granted at the start of each of the actor's turns.
    pub move_allowance: f64,
}

impl ActorStats {
    pub const PLAYER: Self = Self {
        max_health: 10,
        damage: 3,
        move_allowance: 25.0,
    };

    pub const ENEMY: Self = Self {
        max_health: 5,
        damage: 2,
        move_allowance: 3.0,
    };
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: EntityId,
    pub role: Role,
    pub position: Position,
    /// Where a respawning actor returns to.
    pub spawn: Position,
    pub health: u32,
    pub max_health: u32,
    pub damage: u32,
    /// Remaining budget for the current turn.
    pub move_points: f64,
    pub move_allowance: f64,
    pub is_active: bool,
    pub pose: Pose,
}

impl Actor {
    pub fn new(id: EntityId, role: Role, position: Position, stats: ActorStats) -> Self {
        Self {
            id,
            role,
            position,
            spawn: position,
            health: stats.max_health,
            max_health: stats.max_health,
            damage: stats.damage,
            move_points: stats.move_allowance,
            move_allowance: stats.move_allowance,
            is_active: true,
            pose: Pose::Idle,
        }
    }

    pub fn player(position: Position, stats: ActorStats) -> Self {
        Self::new(EntityId::PLAYER, Role::Player, position, stats)
    }

    pub fn enemy(id: EntityId, position: Position, stats: ActorStats, patrol: Vec<Position>) -> Self {
        Self::new(
            id,
            Role::Enemy {
                patrol: PatrolRoute::new(patrol),
            },
            position,
            stats,
        )
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player)
    }

    pub fn patrol(&self) -> Option<&PatrolRoute> {
        match &self.role {
            Role::Enemy { patrol } => Some(patrol),
            Role::Player => None,
        }
    }

    pub fn patrol_mut(&mut self) -> Option<&mut PatrolRoute> {
        match &mut self.role {
            Role::Enemy { patrol } => Some(patrol),
            Role::Player => None,
        }
    }

    /// Restores the per-turn movement budget.
    pub fn reset_move_points(&mut self) {
        self.move_points = self.move_allowance;
    }

    pub fn is_adjacent(&self, other: &Actor) -> bool {
        is_adjacent(self.position, other.position)
    }

    pub fn pixel_position(&self, tile_size: u32) -> (i32, i32) {
        self.position.to_pixels(tile_size)
    }

    /// Resolves a defeat according to role and policy.
    ///
    /// Enemies always deactivate. The player respawns or deactivates depending
    /// on `policy`.
    pub fn apply_defeat(&mut self, policy: DeathPolicy) -> Defeat {
        match (&self.role, policy) {
            (Role::Player, DeathPolicy::Respawn) => {
                self.position = self.spawn;
                self.health = self.max_health;
                self.pose = Pose::Idle;
                self.reset_move_points();
                Defeat::Respawned
            }
            _ => {
                self.is_active = false;
                self.pose = Pose::Dead;
                Defeat::Deactivated
            }
        }
    }
}

/// What [`Actor::apply_defeat`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Defeat {
    Deactivated,
    Respawned,
}

/// Result of one melee exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackOutcome {
    pub damage: u32,
    pub remaining_health: u32,
    /// Health reached zero and the defender is not the attacker.
    pub defeated: bool,
}

/// Melee range test: Manhattan tile distance exactly 1.
///
/// Diagonal neighbors are never adjacent, even with 8-directional movement.
pub fn is_adjacent(a: Position, b: Position) -> bool {
    a.manhattan_distance(b) == 1
}

/// [`is_adjacent`] for pixel coordinates; each point is floored to its tile.
pub fn is_adjacent_px(a: (i32, i32), b: (i32, i32), tile_size: u32) -> bool {
    is_adjacent(
        Position::from_pixels(a.0, a.1, tile_size),
        Position::from_pixels(b.0, b.1, tile_size),
    )
}

/// Applies `damage` from `attacker` to `defender`, clamping health at zero.
///
/// A defender brought to zero enters the dead pose and is reported as
/// defeated, unless it attacked itself. Deactivation or respawn is left to
/// [`Actor::apply_defeat`] so the caller can pace the death animation.
pub fn attack(attacker: EntityId, damage: u32, defender: &mut Actor) -> AttackOutcome {
    defender.health = defender.health.saturating_sub(damage);
    let defeated = defender.health == 0 && defender.id != attacker;
    if defeated {
        defender.pose = Pose::Dead;
    }
    AttackOutcome {
        damage,
        remaining_health: defender.health,
        defeated,
    }
}
