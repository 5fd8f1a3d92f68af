//! A* search over a tile grid.
//!
//! Nodes live in a per-search arena indexed by insertion order, with a
//! coordinate map for lookup and a closed flag on each node. The open set is a
//! binary heap with lazy deletion: improving a node pushes a fresh entry and
//! the stale one is skipped when popped.
//!
//! Ties on `f` are broken by the node's first insertion index, so for a fixed
//! walkability predicate the search is fully deterministic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::grid::{MovementMode, step_cost};
use crate::state::{Path, Position};

type NodeIndex = usize;

#[derive(Clone, Copy, Debug)]
struct Node {
    position: Position,
    g: f64,
    h: f64,
    f: f64,
    parent: Option<NodeIndex>,
    closed: bool,
}

/// Heap entry. Ordered so that `BinaryHeap` pops the lowest `f`, then the
/// earliest inserted node.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f64,
    g: f64,
    node: NodeIndex,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// A found path together with the accumulated cost of reaching its goal.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub path: Path,
    pub cost: f64,
}

/// Configured A* search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pathfinder {
    mode: MovementMode,
    max_expansions: Option<usize>,
}

impl Pathfinder {
    pub const fn new(mode: MovementMode) -> Self {
        Self {
            mode,
            max_expansions: None,
        }
    }

    /// Gives up (returns `None`) after expanding `limit` nodes.
    ///
    /// Only needed when the walkability predicate describes an unbounded grid.
    pub const fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    /// Finds a minimal-cost path from `start` to `goal`.
    ///
    /// `is_walkable` is never consulted for `start`. It is consulted for
    /// `goal` like any other tile: an unwalkable goal yields `None`.
    pub fn find_path<F>(&self, start: Position, goal: Position, is_walkable: F) -> Option<Path>
    where
        F: FnMut(i32, i32) -> bool,
    {
        self.search(start, goal, is_walkable).map(|route| route.path)
    }

    /// Like [`Pathfinder::find_path`], also returning the goal's accumulated cost.
    pub fn search<F>(&self, start: Position, goal: Position, mut is_walkable: F) -> Option<Route>
    where
        F: FnMut(i32, i32) -> bool,
    {
        let mut nodes: Vec<Node> = Vec::new();
        let mut index: HashMap<Position, NodeIndex> = HashMap::new();
        let mut open = BinaryHeap::new();

        let h = self.mode.heuristic(start, goal);
        nodes.push(Node {
            position: start,
            g: 0.0,
            h,
            f: h,
            parent: None,
            closed: false,
        });
        index.insert(start, 0);
        open.push(OpenEntry { f: h, g: 0.0, node: 0 });

        let mut expansions = 0usize;

        while let Some(entry) = open.pop() {
            let current = nodes[entry.node];
            if current.closed || entry.g != current.g {
                continue;
            }

            if current.position == goal {
                return Some(Route {
                    path: reconstruct(&nodes, entry.node),
                    cost: current.g,
                });
            }

            if let Some(limit) = self.max_expansions
                && expansions >= limit
            {
                return None;
            }
            expansions += 1;
            nodes[entry.node].closed = true;

            for neighbor in self.mode.neighbors(current.position) {
                let seen = index.get(&neighbor).copied();
                if seen.is_some_and(|id| nodes[id].closed) {
                    continue;
                }
                if !is_walkable(neighbor.x, neighbor.y) {
                    continue;
                }

                let Some(step) = step_cost(current.position, neighbor) else {
                    continue;
                };
                let tentative_g = current.g + step;

                match seen {
                    Some(existing) => {
                        let node = &mut nodes[existing];
                        if tentative_g < node.g {
                            node.g = tentative_g;
                            node.f = tentative_g + node.h;
                            node.parent = Some(entry.node);
                            open.push(OpenEntry {
                                f: node.f,
                                g: node.g,
                                node: existing,
                            });
                        }
                    }
                    None => {
                        let h = self.mode.heuristic(neighbor, goal);
                        let id = nodes.len();
                        nodes.push(Node {
                            position: neighbor,
                            g: tentative_g,
                            h,
                            f: tentative_g + h,
                            parent: Some(entry.node),
                            closed: false,
                        });
                        index.insert(neighbor, id);
                        open.push(OpenEntry {
                            f: tentative_g + h,
                            g: tentative_g,
                            node: id,
                        });
                    }
                }
            }
        }

        None
    }
}

fn reconstruct(nodes: &[Node], goal: NodeIndex) -> Path {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(id) = cursor {
        path.push(nodes[id].position);
        cursor = nodes[id].parent;
    }
    path.reverse();
    path
}

/// Convenience wrapper around [`Pathfinder::find_path`].
pub fn find_path<F>(
    start: Position,
    goal: Position,
    mode: MovementMode,
    is_walkable: F,
) -> Option<Path>
where
    F: FnMut(i32, i32) -> bool,
{
    Pathfinder::new(mode).find_path(start, goal, is_walkable)
}
