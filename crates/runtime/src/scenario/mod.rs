//! Scenario files: a map plus the actors placed on it.
//!
//! Scenarios are written in RON. Map rows use one glyph per tile (`.` or `,`
//! floor, `#` wall, `~` water, `o` stone); exits, the player, enemies with
//! their patrol routes, and config overrides are listed alongside. Loading a
//! scenario always yields a fresh [`Encounter`].

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tactics_core::{Actor, ActorStats, Encounter, EntityId, GameConfig, GridMap, Position};

use crate::api::{Result, RuntimeError};

/// Map exit placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitPlacement {
    pub position: Position,
    /// Identifier handed to the map loader.
    pub target: String,
}

/// Player placement; stats default to [`ActorStats::PLAYER`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerPlacement {
    pub position: Position,
    #[serde(default)]
    pub stats: Option<ActorStats>,
}

/// Enemy placement; stats default to [`ActorStats::ENEMY`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyPlacement {
    pub id: EntityId,
    pub position: Position,
    #[serde(default)]
    pub stats: Option<ActorStats>,
    #[serde(default)]
    pub patrol: Vec<Position>,
}

/// Scenario configuration for encounter initialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub map: Vec<String>,
    #[serde(default)]
    pub exits: Vec<ExitPlacement>,
    #[serde(default)]
    pub config: GameConfig,
    pub player: PlayerPlacement,
    /// Enemies act in this order during the sweep.
    #[serde(default)]
    pub enemies: Vec<EnemyPlacement>,
}

impl Scenario {
    /// Parse a scenario from RON text.
    pub fn from_ron_str(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Load scenario from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;

        let scenario = Self::from_ron_str(&content)?;
        tracing::info!(
            name = %scenario.name,
            enemies = scenario.enemies.len(),
            "Loaded scenario from {}",
            path.display()
        );
        Ok(scenario)
    }

    /// Build a fresh encounter from this scenario.
    pub fn build_encounter(&self) -> Result<Encounter> {
        let mut map = GridMap::from_rows(self.map.as_slice())?;
        for exit in &self.exits {
            map.add_exit(exit.position, exit.target.clone())?;
        }

        let player = Actor::player(
            self.player.position,
            self.player.stats.unwrap_or(ActorStats::PLAYER),
        );
        let enemies = self
            .enemies
            .iter()
            .map(|enemy| {
                Actor::enemy(
                    enemy.id,
                    enemy.position,
                    enemy.stats.unwrap_or(ActorStats::ENEMY),
                    enemy.patrol.clone(),
                )
            })
            .collect();

        Ok(Encounter::new(
            Arc::new(map),
            self.config.clone(),
            player,
            enemies,
        )?)
    }
}
