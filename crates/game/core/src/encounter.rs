//! The externally owned aggregate the turn engine operates on.
//!
//! An [`Encounter`] bundles the map, the actors in declaration order, turn
//! bookkeeping, the history, and the pending step queue. Every scenario load
//! builds a fresh one; nothing here is global.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use crate::actor::{Actor, Role, is_adjacent};
use crate::budget::is_path_in_range;
use crate::config::GameConfig;
use crate::engine::Step;
use crate::env::MapOracle;
use crate::grid::{MovementMode, path_cost};
use crate::pathfinding::Pathfinder;
use crate::state::{EntityId, Path, Position, TurnHistory, TurnState};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncounterError {
    #[error("player must use id {} and the player role", EntityId::PLAYER)]
    InvalidPlayer,

    #[error("actor {0} must have the enemy role")]
    NotAnEnemy(EntityId),

    #[error("duplicate actor id {0}")]
    DuplicateId(EntityId),

    #[error("actor {actor} placed on impassable tile {position}")]
    Impassable { actor: EntityId, position: Position },

    #[error("actors {first} and {second} share tile {position}")]
    Overlap {
        first: EntityId,
        second: EntityId,
        position: Position,
    },
}

/// What the input layer shows before committing a move.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPreview {
    pub path: Path,
    pub cost: f64,
    pub in_range: bool,
}

#[derive(Clone)]
pub struct Encounter {
    map: Arc<dyn MapOracle>,
    config: GameConfig,
    /// Player first, then enemies in declaration order.
    actors: Vec<Actor>,
    pub(crate) turn: TurnState,
    pub(crate) history: TurnHistory,
    pub(crate) pending: VecDeque<Step>,
}

impl Encounter {
    pub fn new(
        map: Arc<dyn MapOracle>,
        config: GameConfig,
        player: Actor,
        enemies: Vec<Actor>,
    ) -> Result<Self, EncounterError> {
        if player.id != EntityId::PLAYER || !player.is_player() {
            return Err(EncounterError::InvalidPlayer);
        }

        let mut actors = Vec::with_capacity(enemies.len() + 1);
        actors.push(player);
        for enemy in enemies {
            if !matches!(enemy.role, Role::Enemy { .. }) {
                return Err(EncounterError::NotAnEnemy(enemy.id));
            }
            actors.push(enemy);
        }

        let mut ids = HashSet::new();
        for actor in &actors {
            if !ids.insert(actor.id) {
                return Err(EncounterError::DuplicateId(actor.id));
            }
            if !map.is_passable(actor.position) {
                return Err(EncounterError::Impassable {
                    actor: actor.id,
                    position: actor.position,
                });
            }
        }
        for (i, first) in actors.iter().enumerate() {
            if let Some(second) = actors[i + 1..]
                .iter()
                .find(|other| other.position == first.position)
            {
                return Err(EncounterError::Overlap {
                    first: first.id,
                    second: second.id,
                    position: first.position,
                });
            }
        }

        Ok(Self {
            map,
            config,
            actors,
            turn: TurnState::new(),
            history: TurnHistory::new(),
            pending: VecDeque::new(),
        })
    }

    pub fn map(&self) -> &dyn MapOracle {
        self.map.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn history(&self) -> &TurnHistory {
        &self.history
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn player(&self) -> &Actor {
        &self.actors[0]
    }

    /// Enemies in declaration order, including inactive ones.
    pub fn enemies(&self) -> impl Iterator<Item = &Actor> {
        self.actors[1..].iter()
    }

    pub fn actor(&self, id: EntityId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub(crate) fn actor_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub(crate) fn actor_at_index(&self, index: usize) -> Option<&Actor> {
        self.actors.get(index)
    }

    pub(crate) fn actor_at_index_mut(&mut self, index: usize) -> Option<&mut Actor> {
        self.actors.get_mut(index)
    }

    /// True once the player has been deactivated.
    pub fn is_over(&self) -> bool {
        !self.player().is_active
    }

    /// True while steps are pending (movement, combat, or turn handoff).
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pathfinder(&self) -> Pathfinder {
        let finder = Pathfinder::new(self.config.movement);
        match self.config.max_search_expansions {
            Some(limit) => finder.with_max_expansions(limit),
            None => finder,
        }
    }

    /// Live actor standing on `position`, other than `except`.
    pub fn occupant(&self, position: Position, except: EntityId) -> Option<&Actor> {
        self.actors
            .iter()
            .find(|actor| actor.is_active && actor.id != except && actor.position == position)
    }

    /// Walkability for `mover`: passable terrain not held by another live actor.
    ///
    /// `allow` marks one tile walkable regardless of occupancy, used when the
    /// goal of a search is the tile of the actor being approached.
    pub fn is_walkable_for(&self, mover: EntityId, position: Position, allow: Option<Position>) -> bool {
        if !self.map.is_passable(position) {
            return false;
        }
        allow == Some(position) || self.occupant(position, mover).is_none()
    }

    /// Searches a path for `mover` using the encounter's walkability.
    pub fn find_path_for(
        &self,
        mover: EntityId,
        goal: Position,
        allow: Option<Position>,
    ) -> Option<Path> {
        let start = self.actor(mover)?.position;
        self.pathfinder().find_path(start, goal, |x, y| {
            self.is_walkable_for(mover, Position::new(x, y), allow)
        })
    }

    /// Path for `mover` ending orthogonally adjacent to `target`.
    ///
    /// Searches to the target's tile and drops the final waypoint. If that
    /// leaves the mover diagonal to the target (8-directional movement only),
    /// falls back to the cheapest path to one of the target's orthogonal
    /// neighbors.
    pub fn approach_path(&self, mover: EntityId, target: Position) -> Option<Path> {
        let start = self.actor(mover)?.position;
        if is_adjacent(start, target) {
            return Some(vec![start]);
        }

        if let Some(mut path) = self.find_path_for(mover, target, Some(target)) {
            if path.last() == Some(&target) {
                path.pop();
            }
            if path.last().is_some_and(|&end| is_adjacent(end, target)) {
                return Some(path);
            }
        }

        MovementMode::Orthogonal
            .neighbors(target)
            .filter(|&tile| self.is_walkable_for(mover, tile, None))
            .filter_map(|tile| {
                let path = self.find_path_for(mover, tile, None)?;
                let cost = path_cost(&path)?;
                Some((cost, path))
            })
            .fold(None, |best: Option<(f64, Path)>, candidate| match best {
                Some(current) if current.0 <= candidate.0 => Some(current),
                _ => Some(candidate),
            })
            .map(|(_, path)| path)
    }

    /// Nearest free tile to `mover`'s spawn point.
    ///
    /// Breadth-first over passable terrain in orthogonal scan order, so only
    /// tiles held by other live actors are expanded. Falls back to the mover's
    /// current tile when no free tile is connected to the spawn.
    pub fn respawn_tile(&self, mover: EntityId) -> Option<Position> {
        let actor = self.actor(mover)?;
        let mut queue = VecDeque::from([actor.spawn]);
        let mut seen = HashSet::from([actor.spawn]);

        while let Some(tile) = queue.pop_front() {
            if self.is_walkable_for(mover, tile, None) {
                return Some(tile);
            }
            if !self.map.is_passable(tile) {
                continue;
            }
            for next in MovementMode::Orthogonal.neighbors(tile) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        Some(actor.position)
    }

    /// Path and affordability of moving the player to `destination`.
    pub fn preview_path(&self, destination: Position) -> Option<PathPreview> {
        let path = self.find_path_for(EntityId::PLAYER, destination, None)?;
        let cost = path_cost(&path)?;
        let in_range = is_path_in_range(Some(path.as_slice()), self.player().move_points);
        Some(PathPreview {
            path,
            cost,
            in_range,
        })
    }
}

impl fmt::Debug for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encounter")
            .field("dimensions", &self.map.dimensions())
            .field("config", &self.config)
            .field("actors", &self.actors)
            .field("turn", &self.turn)
            .field("history_len", &self.history.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorStats;
    use crate::env::GridMap;

    fn encounter(config: GameConfig, enemies: Vec<Actor>) -> Encounter {
        Encounter::new(
            Arc::new(GridMap::open(10, 10)),
            config,
            Actor::player(Position::new(0, 0), ActorStats::PLAYER),
            enemies,
        )
        .unwrap()
    }

    fn goblin(id: u32, x: i32, y: i32) -> Actor {
        Actor::enemy(EntityId(id), Position::new(x, y), ActorStats::ENEMY, Vec::new())
    }

    #[test]
    fn rejects_overlapping_and_duplicate_actors() {
        let map: Arc<dyn MapOracle> = Arc::new(GridMap::open(4, 4));
        let player = Actor::player(Position::new(0, 0), ActorStats::PLAYER);

        let err = Encounter::new(
            map.clone(),
            GameConfig::default(),
            player.clone(),
            vec![goblin(1, 0, 0)],
        )
        .unwrap_err();
        assert!(matches!(err, EncounterError::Overlap { .. }));

        let err = Encounter::new(
            map.clone(),
            GameConfig::default(),
            player.clone(),
            vec![goblin(1, 1, 0), goblin(1, 2, 0)],
        )
        .unwrap_err();
        assert_eq!(err, EncounterError::DuplicateId(EntityId(1)));

        let err = Encounter::new(map, GameConfig::default(), player, vec![goblin(2, 9, 9)])
            .unwrap_err();
        assert!(matches!(err, EncounterError::Impassable { .. }));
    }

    #[test]
    fn occupied_goal_is_unreachable_but_adjacent_tile_is_not() {
        let enc = encounter(GameConfig::default(), vec![goblin(1, 4, 0)]);

        assert_eq!(enc.find_path_for(EntityId::PLAYER, Position::new(4, 0), None), None);

        let beside = enc
            .find_path_for(EntityId::PLAYER, Position::new(3, 0), None)
            .expect("adjacent tile is free");
        assert!(is_path_in_range(Some(beside.as_slice()), enc.player().move_points));
    }

    #[test]
    fn inactive_actors_do_not_block() {
        let mut enc = encounter(GameConfig::default(), vec![goblin(1, 4, 0)]);
        enc.actor_mut(EntityId(1)).unwrap().is_active = false;
        assert!(enc.find_path_for(EntityId::PLAYER, Position::new(4, 0), None).is_some());
    }

    #[test]
    fn approach_path_ends_orthogonally_adjacent_in_diagonal_mode() {
        let config = GameConfig::default().with_movement(MovementMode::Diagonal);
        let enc = encounter(config, vec![goblin(1, 5, 5)]);

        let path = enc
            .approach_path(EntityId::PLAYER, Position::new(5, 5))
            .expect("target reachable");
        let end = *path.last().unwrap();
        assert!(is_adjacent(end, Position::new(5, 5)));
        assert_eq!(path[0], Position::new(0, 0));
    }

    #[test]
    fn respawn_tile_skips_occupied_spawn() {
        let mut enc = encounter(GameConfig::default(), vec![goblin(1, 2, 0), goblin(2, 0, 1)]);
        assert_eq!(enc.respawn_tile(EntityId::PLAYER), Some(Position::ORIGIN));

        enc.actor_mut(EntityId::PLAYER).unwrap().position = Position::new(5, 5);
        enc.actor_mut(EntityId(1)).unwrap().position = Position::ORIGIN;
        enc.actor_mut(EntityId(2)).unwrap().position = Position::new(0, 1);
        // (0, 1) is taken, so the first free orthogonal neighbor wins.
        assert_eq!(enc.respawn_tile(EntityId::PLAYER), Some(Position::new(1, 0)));
    }

    #[test]
    fn preview_reports_range() {
        let mut enc = encounter(GameConfig::default(), Vec::new());
        enc.actor_mut(EntityId::PLAYER).unwrap().move_points = 3.0;

        let near = enc.preview_path(Position::new(3, 0)).unwrap();
        assert!(near.in_range);
        assert_eq!(near.cost, 3.0);

        let far = enc.preview_path(Position::new(4, 0)).unwrap();
        assert!(!far.in_range);
    }
}
