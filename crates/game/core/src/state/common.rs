use std::fmt;

/// Unique identifier for any actor tracked in an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Returns true if this entity represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
///
/// Logical turn resolution only ever deals in whole tiles; pixel coordinates
/// exist purely at the rendering boundary (see [`Position::to_pixels`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the tile containing the pixel `(px, py)`.
    ///
    /// Uses floor division so negative pixel coordinates map to negative tiles.
    pub fn from_pixels(px: i32, py: i32, tile_size: u32) -> Self {
        let size = tile_size.max(1) as i32;
        Self::new(px.div_euclid(size), py.div_euclid(size))
    }

    /// Top-left pixel of this tile.
    pub fn to_pixels(self, tile_size: u32) -> (i32, i32) {
        let size = tile_size as i32;
        (self.x * size, self.y * size)
    }

    /// Neighboring tile, or `None` past the edge of the `i32` plane.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// 4-directional tile distance, saturating at `u32::MAX`.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// 8-directional tile distance (king moves).
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Ordered sequence of tiles from start to goal, both inclusive.
pub type Path = Vec<Position>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_round_trip_floors_to_tile() {
        assert_eq!(Position::from_pixels(17, 8, 8), Position::new(2, 1));
        assert_eq!(Position::from_pixels(-1, 0, 8), Position::new(-1, 0));
        assert_eq!(Position::new(3, 4).to_pixels(8), (24, 32));
    }

    #[test]
    fn distances() {
        let a = Position::new(1, 1);
        let b = Position::new(4, -1);
        assert_eq!(a.manhattan_distance(b), 5);
        assert_eq!(a.chebyshev_distance(b), 3);

        let far = Position::new(i32::MIN, i32::MIN);
        let near = Position::new(i32::MAX, i32::MAX);
        assert_eq!(far.manhattan_distance(near), u32::MAX);
    }

    #[test]
    fn offset_stops_at_plane_edge() {
        let edge = Position::new(i32::MAX, 0);
        assert_eq!(edge.offset(-1, 0), Some(Position::new(i32::MAX - 1, 0)));
        assert_eq!(edge.offset(1, 0), None);
        assert_eq!(Position::new(0, i32::MIN).offset(0, -1), None);
    }
}
