//! Read-only world data supplied by collaborators outside the engine.
mod map;

pub use map::{GridMap, MapDimensions, MapError, MapOracle, StaticTile, TerrainKind};
