//! Compass directions for tile edges and 4-neighbor grid adjacency.

use std::fmt;

/// One of the four compass directions, in the canonical edge order
/// `[N, E, S, W]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    /// Number of directions.
    pub const COUNT: usize = 4;

    /// All directions in edge-tuple order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Index into a `[T; 4]` edge tuple.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The opposite direction (the side a neighbor presents back to us).
    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Row/column delta of the adjacent cell in this direction.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        };
        write!(f, "{name}")
    }
}
