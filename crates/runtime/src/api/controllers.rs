//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`PlayerController`] implementations so an
//! encounter can run with human input, scripted fixtures, or a simple AI.
use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tactics_core::{Encounter, EntityId, PlayerCommand, is_path_in_range, truncate_to_budget};

use super::errors::Result;

/// Trait for choosing the player's action based on the current encounter.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Scripted/replayed commands
/// - Testing fixtures
#[async_trait]
pub trait PlayerController: Send + Sync {
    /// Choose the player's action for this turn.
    ///
    /// `encounter` is a read-only snapshot taken while the player is idle.
    async fn next_command(&self, encounter: &Encounter) -> Result<PlayerCommand>;
}

/// Always skips. Useful for testing or as a fallback.
pub struct SkipController;

#[async_trait]
impl PlayerController for SkipController {
    async fn next_command(&self, _encounter: &Encounter) -> Result<PlayerCommand> {
        Ok(PlayerCommand::Skip)
    }
}

/// Replays a fixed list of commands, then skips.
pub struct ScriptedController {
    commands: Mutex<VecDeque<PlayerCommand>>,
}

impl ScriptedController {
    pub fn new(commands: impl IntoIterator<Item = PlayerCommand>) -> Self {
        Self {
            commands: Mutex::new(commands.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.commands.lock().await.len()
    }
}

#[async_trait]
impl PlayerController for ScriptedController {
    async fn next_command(&self, _encounter: &Encounter) -> Result<PlayerCommand> {
        Ok(self
            .commands
            .lock()
            .await
            .pop_front()
            .unwrap_or(PlayerCommand::Skip))
    }
}

/// Goes after the first live enemy in declaration order.
///
/// Attacks when the enemy is adjacent or the approach is affordable,
/// otherwise walks as far along the approach as move points allow.
pub struct AggressiveController;

#[async_trait]
impl PlayerController for AggressiveController {
    async fn next_command(&self, encounter: &Encounter) -> Result<PlayerCommand> {
        let player = encounter.player();
        let Some(target) = encounter.enemies().find(|enemy| enemy.is_active) else {
            return Ok(PlayerCommand::Skip);
        };
        if player.is_adjacent(target) {
            return Ok(PlayerCommand::Attack(target.id));
        }

        let Some(approach) = encounter.approach_path(EntityId::PLAYER, target.position) else {
            return Ok(PlayerCommand::Skip);
        };
        if is_path_in_range(Some(approach.as_slice()), player.move_points) {
            return Ok(PlayerCommand::Attack(target.id));
        }

        let partial = truncate_to_budget(&approach, player.move_points);
        if partial.len() > 1 {
            Ok(PlayerCommand::FollowPath(partial))
        } else {
            Ok(PlayerCommand::Skip)
        }
    }
}
