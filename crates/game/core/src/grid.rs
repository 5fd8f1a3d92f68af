//! Grid cost model shared by the pathfinder and the budget validator.
//!
//! Every movement cost in the crate goes through [`step_cost`]. The
//! pathfinder accumulates `g` by adding step costs from the start tile
//! outwards, and [`path_cost`] folds the same steps in the same order, so the
//! two always agree bit for bit on the cost of a returned path.

use crate::state::Position;

/// Cost of one orthogonal step.
pub const ORTHOGONAL_STEP_COST: f64 = 1.0;

/// Cost of one diagonal step. The single diagonal constant in the crate.
pub const DIAGONAL_STEP_COST: f64 = core::f64::consts::SQRT_2;

const ORTHOGONAL_OFFSETS: [(i32, i32); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

const ALL_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Neighbor topology used for movement.
///
/// Melee range is always orthogonal regardless of this setting; see
/// [`crate::actor::is_adjacent`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MovementMode {
    /// 4-directional movement.
    #[default]
    Orthogonal,
    /// 8-directional movement.
    Diagonal,
}

impl MovementMode {
    /// Neighbor offsets in scan order (dx outer, dy inner, both ascending).
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            MovementMode::Orthogonal => &ORTHOGONAL_OFFSETS,
            MovementMode::Diagonal => &ALL_OFFSETS,
        }
    }

    pub fn neighbors(self, origin: Position) -> impl Iterator<Item = Position> {
        self.offsets()
            .iter()
            .filter_map(move |&(dx, dy)| origin.offset(dx, dy))
    }

    /// Returns true if `from -> to` is a single step in this topology.
    pub fn permits_step(self, from: Position, to: Position) -> bool {
        match step_cost(from, to) {
            Some(cost) if cost == ORTHOGONAL_STEP_COST => true,
            Some(_) => self == MovementMode::Diagonal,
            None => false,
        }
    }

    /// Admissible estimate of the remaining cost from `from` to `goal`.
    ///
    /// Manhattan for 4-directional movement, Euclidean for 8-directional.
    pub fn heuristic(self, from: Position, goal: Position) -> f64 {
        let dx = f64::from(from.x.abs_diff(goal.x));
        let dy = f64::from(from.y.abs_diff(goal.y));
        match self {
            MovementMode::Orthogonal => dx + dy,
            MovementMode::Diagonal => (dx * dx + dy * dy).sqrt(),
        }
    }
}

/// Cost of moving from `from` to an adjacent `to`.
///
/// Returns `None` when the tiles are identical or more than one step apart.
pub fn step_cost(from: Position, to: Position) -> Option<f64> {
    match (from.x.abs_diff(to.x), from.y.abs_diff(to.y)) {
        (1, 0) | (0, 1) => Some(ORTHOGONAL_STEP_COST),
        (1, 1) => Some(DIAGONAL_STEP_COST),
        _ => None,
    }
}

/// Total traversal cost of `path`, summed start to goal.
///
/// A single-tile path costs nothing. Returns `None` if any consecutive pair is
/// not a unit step.
pub fn path_cost(path: &[Position]) -> Option<f64> {
    path.windows(2)
        .try_fold(0.0, |total, pair| Some(total + step_cost(pair[0], pair[1])?))
}
