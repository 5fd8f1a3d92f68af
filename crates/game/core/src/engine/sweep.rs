//! Enemy decision making for the sweep.

use super::Step;
use crate::actor::is_adjacent;
use crate::budget::truncate_to_budget;
use crate::encounter::Encounter;
use crate::state::{EntityId, Path};

/// Plans one enemy's turn and returns the steps to play it.
///
/// An adjacent enemy attacks in place. Otherwise it chases the player when
/// within aggro radius and reachable, falls back to its patrol route, and
/// walks as far as its move points allow before re-checking adjacency. An
/// enemy with nothing to do yields no steps and leaves no history entry.
pub(super) fn plan_enemy(enc: &mut Encounter, index: usize) -> Vec<Step> {
    let Some(enemy) = enc.actor_at_index_mut(index) else {
        return Vec::new();
    };
    enemy.reset_move_points();
    let position = enemy.position;
    if let Some(patrol) = enemy.patrol_mut()
        && patrol.current() == Some(position)
    {
        patrol.advance();
    }

    let (id, budget) = (enemy.id, enemy.move_points);
    let player = enc.player();
    if !player.is_active {
        return Vec::new();
    }
    let target = player.position;

    if is_adjacent(position, target) {
        return vec![Step::Strike {
            attacker: id,
            defender: EntityId::PLAYER,
        }];
    }

    let chase = (position.chebyshev_distance(target) <= enc.config().aggro_radius)
        .then(|| enc.approach_path(id, target))
        .flatten()
        .filter(|path| path.len() > 1);
    let Some(path) = chase.or_else(|| patrol_path(enc, id)) else {
        return Vec::new();
    };

    let mut path = truncate_to_budget(&path, budget);
    if path.last() == Some(&target) {
        path.pop();
    }
    if path.len() < 2 {
        return Vec::new();
    }

    vec![
        Step::Walk {
            actor: id,
            path,
            next: 1,
        },
        Step::Strike {
            attacker: id,
            defender: EntityId::PLAYER,
        },
    ]
}

/// Path from the enemy's tile toward its current patrol waypoint.
fn patrol_path(enc: &Encounter, id: EntityId) -> Option<Path> {
    let actor = enc.actor(id)?;
    let waypoint = actor.patrol()?.current()?;
    if waypoint == actor.position {
        return None;
    }
    enc.find_path_for(id, waypoint, None).filter(|path| path.len() > 1)
}
