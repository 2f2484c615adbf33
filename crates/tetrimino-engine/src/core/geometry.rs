use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point on the integer lattice of the grid.
///
/// # Coordinate System
///
/// - (0, 0) is the bottom-left cell of the grid
/// - X increases rightward (columns)
/// - Y increases upward (rows)
///
/// Points are also used as offsets (piece shapes, translations, wall-kick
/// corrections), so negative coordinates are valid values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Rotates the point by a quarter turn around `origin`.
    ///
    /// The rotation is exact: quarter turns map lattice points onto lattice
    /// points, so no trigonometry or rounding is involved.
    ///
    /// # Example
    ///
    /// ```
    /// use tetrimino_engine::{Point, Turn};
    ///
    /// let p = Point::new(1, 0);
    /// assert_eq!(p.rotated(Turn::Left, Point::ORIGIN), Point::new(0, 1));
    /// assert_eq!(p.rotated(Turn::Left, Point::new(0, 1)), Point::new(1, 2));
    /// ```
    #[must_use]
    pub const fn rotated(self, turn: Turn, origin: Self) -> Self {
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;
        let (rx, ry) = match turn {
            Turn::Left => (-dy, dx),
            Turn::Right => (dy, -dx),
        };
        Self::new(origin.x + rx, origin.y + ry)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Turn {
    /// +90° (counterclockwise).
    #[display("left")]
    Left,
    /// −90° (clockwise).
    #[display("right")]
    Right,
}

impl Turn {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Turn::Left => Turn::Right,
            Turn::Right => Turn::Left,
        }
    }
}

/// Returns the argument with the greatest magnitude.
///
/// On ties `b` wins, so folding corrections with `absmax(candidate, current)`
/// keeps the first correction found.
#[must_use]
pub const fn absmax(a: i32, b: i32) -> i32 {
    if a.abs() > b.abs() { a } else { b }
}
