use std::collections::HashMap;

use crate::state::Position;

/// Static map oracle exposing immutable layout information.
///
/// Implemented by the map-loading collaborator; [`GridMap`] is the in-crate
/// implementation used by scenarios and tests.
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;
    fn tile(&self, position: Position) -> Option<StaticTile>;

    /// Map transition triggered by settling on `position`, if any.
    fn exit_at(&self, _position: Position) -> Option<&str> {
        None
    }

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// Terrain collision only; actor occupancy is layered on by the encounter.
    /// Positions outside the map are never passable.
    fn is_passable(&self, position: Position) -> bool {
        self.contains(position)
            && self
                .tile(position)
                .is_some_and(|tile| tile.is_passable())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && i64::from(position.x) < i64::from(self.width)
            && i64::from(position.y) < i64::from(self.height)
    }

    /// Number of tiles, computed in `usize` so wide maps cannot wrap.
    pub const fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Immutable descriptor for a tile in the static layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticTile {
    terrain: TerrainKind,
}

impl StaticTile {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self { terrain }
    }

    pub fn terrain(self) -> TerrainKind {
        self.terrain
    }

    pub fn is_passable(self) -> bool {
        self.terrain.is_passable()
    }
}

/// Canonical terrain classes for static map tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Floor,
    Wall,
    Water,
    Stone,
}

impl TerrainKind {
    pub fn is_passable(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }

    /// Glyph used by text map layouts.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' | ',' => Some(TerrainKind::Floor),
            '#' => Some(TerrainKind::Wall),
            '~' => Some(TerrainKind::Water),
            'o' => Some(TerrainKind::Stone),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: Position },

    #[error("exit at {0} lies outside the map")]
    ExitOutOfBounds(Position),
}

/// Dense row-major tile grid with optional exit triggers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    dimensions: MapDimensions,
    tiles: Vec<TerrainKind>,
    exits: HashMap<Position, String>,
}

impl GridMap {
    /// A map where every tile is floor.
    pub fn open(width: u32, height: u32) -> Self {
        let dimensions = MapDimensions::new(width, height);
        Self {
            dimensions,
            tiles: vec![TerrainKind::Floor; dimensions.tile_count()],
            exits: HashMap::new(),
        }
    }

    /// Parses a text layout, one string per row, `y` growing downwards.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let first = rows.first().ok_or(MapError::Empty)?;
        let width = first.as_ref().chars().count();

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let terrain = TerrainKind::from_glyph(glyph).ok_or(MapError::UnknownGlyph {
                    glyph,
                    position: Position::new(x as i32, y as i32),
                })?;
                tiles.push(terrain);
            }
        }

        Ok(Self {
            dimensions: MapDimensions::new(width as u32, rows.len() as u32),
            tiles,
            exits: HashMap::new(),
        })
    }

    pub fn set_terrain(&mut self, position: Position, terrain: TerrainKind) {
        if let Some(index) = self.index(position) {
            self.tiles[index] = terrain;
        }
    }

    /// Registers a map transition at `position` leading to `target`.
    pub fn add_exit(
        &mut self,
        position: Position,
        target: impl Into<String>,
    ) -> Result<(), MapError> {
        if !self.dimensions.contains(position) {
            return Err(MapError::ExitOutOfBounds(position));
        }
        self.exits.insert(position, target.into());
        Ok(())
    }

    pub fn with_exit(mut self, position: Position, target: impl Into<String>) -> Result<Self, MapError> {
        self.add_exit(position, target)?;
        Ok(self)
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions.contains(position).then(|| {
            position.y as usize * self.dimensions.width as usize + position.x as usize
        })
    }
}

impl MapOracle for GridMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        self.index(position)
            .map(|index| StaticTile::new(self.tiles[index]))
    }

    fn exit_at(&self, position: Position) -> Option<&str> {
        self.exits.get(&position).map(String::as_str)
    }
}
