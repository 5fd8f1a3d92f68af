//! Movement budget checks.
//!
//! Costs come from [`crate::grid::path_cost`] and [`crate::grid::step_cost`],
//! the same functions the pathfinder accumulates with. Never re-derive a step
//! cost here.

use crate::grid::{path_cost, step_cost};
use crate::state::{Path, Position};

/// Returns true iff `path` exists, is contiguous, and costs at most `move_points`.
///
/// The boundary is inclusive. An empty or missing path is never in range.
pub fn is_path_in_range(path: Option<&[Position]>, move_points: f64) -> bool {
    match path {
        Some(path) if !path.is_empty() => {
            path_cost(path).is_some_and(|cost| cost <= move_points)
        }
        _ => false,
    }
}

/// Longest prefix of `path` whose cost fits within `move_points`.
///
/// The start tile is always kept, so the result is empty only if `path` is.
/// Truncation stops at the first non-unit step.
pub fn truncate_to_budget(path: &[Position], move_points: f64) -> Path {
    let Some((&start, rest)) = path.split_first() else {
        return Vec::new();
    };

    let mut kept = vec![start];
    let mut spent = 0.0;
    let mut previous = start;
    for &tile in rest {
        let Some(step) = step_cost(previous, tile) else {
            break;
        };
        if spent + step > move_points {
            break;
        }
        spent += step;
        kept.push(tile);
        previous = tile;
    }
    kept
}
