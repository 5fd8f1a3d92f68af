//! Validation of player commands and their expansion into steps.

use super::{PlayerCommand, Rejection, Step};
use crate::budget::is_path_in_range;
use crate::encounter::Encounter;
use crate::grid::path_cost;
use crate::state::{EntityId, Path, Position};

/// Checks `command` against the current encounter and returns the steps that
/// play it out. Never mutates the encounter.
pub(super) fn plan(enc: &Encounter, command: PlayerCommand) -> Result<Vec<Step>, Rejection> {
    if enc.is_busy() || enc.turn().is_moving {
        return Err(Rejection::Busy);
    }
    if !enc.turn().is_player_turn() {
        return Err(Rejection::NotPlayerTurn);
    }
    if !enc.player().is_active {
        return Err(Rejection::PlayerDefeated);
    }

    let steps = match command {
        PlayerCommand::Skip => vec![
            Step::Skip {
                actor: EntityId::PLAYER,
            },
            Step::EndPlayerTurn,
        ],
        PlayerCommand::MoveTo(destination) => {
            let path = enc
                .find_path_for(EntityId::PLAYER, destination, None)
                .ok_or(Rejection::Unreachable(destination))?;
            validate_path(enc, &path)?;
            vec![walk(path), Step::EndPlayerTurn]
        }
        PlayerCommand::FollowPath(path) => {
            validate_path(enc, &path)?;
            vec![walk(path), Step::EndPlayerTurn]
        }
        PlayerCommand::Attack(target) => {
            let defender = enc.actor(target).ok_or(Rejection::UnknownTarget(target))?;
            if defender.is_player() || !defender.is_active {
                return Err(Rejection::InvalidTarget(target));
            }
            let strike = Step::Strike {
                attacker: EntityId::PLAYER,
                defender: target,
            };

            if enc.player().is_adjacent(defender) {
                vec![strike, Step::EndPlayerTurn]
            } else {
                let path = enc
                    .approach_path(EntityId::PLAYER, defender.position)
                    .ok_or(Rejection::Unreachable(defender.position))?;
                validate_path(enc, &path)?;
                vec![walk(path), strike, Step::EndPlayerTurn]
            }
        }
    };
    Ok(steps)
}

fn walk(path: Path) -> Step {
    Step::Walk {
        actor: EntityId::PLAYER,
        path,
        next: 1,
    }
}

/// A player path must start on the player's tile, take at least one legal
/// step, cross only walkable tiles, and fit the remaining move points.
fn validate_path(enc: &Encounter, path: &[Position]) -> Result<(), Rejection> {
    let player = enc.player();
    let Some(&start) = path.first() else {
        return Err(Rejection::EmptyPath);
    };
    if start != player.position {
        return Err(Rejection::WrongStart {
            expected: player.position,
            found: start,
        });
    }
    if path.len() < 2 {
        return Err(Rejection::EmptyPath);
    }

    let mode = enc.config().movement;
    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if !mode.permits_step(from, to) {
            return Err(Rejection::InvalidStep { from, to });
        }
        if !enc.is_walkable_for(EntityId::PLAYER, to, None) {
            return Err(Rejection::Blocked(to));
        }
    }

    if !is_path_in_range(Some(path), player.move_points) {
        return Err(Rejection::OutOfRange {
            cost: path_cost(path).unwrap_or(f64::INFINITY),
            budget: player.move_points,
        });
    }
    Ok(())
}
