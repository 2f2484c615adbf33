use serde::{Deserialize, Serialize};

use super::{
    catalog::TetriminoKind,
    geometry::{Point, Turn},
};

/// Identifier of a piece instance.
///
/// Pieces are numbered by the turn in which they were created, so ids are
/// unique for the lifetime of a game.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("#{_0}")]
pub struct PieceId(pub u64);

/// Opaque identity of a single cell, stable from piece creation until the
/// cell is cleared from the grid.
///
/// Renderers use tokens to tell which visual cell to move or remove.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("{_0}")]
pub struct CellToken(pub u64);

impl CellToken {
    const PER_PIECE: u64 = 4;

    #[must_use]
    pub const fn new(piece: PieceId, index: usize) -> Self {
        Self(piece.0 * Self::PER_PIECE + index as u64)
    }

    /// Returns the id of the piece this cell was created with.
    #[must_use]
    pub const fn piece_id(self) -> PieceId {
        PieceId(self.0 / Self::PER_PIECE)
    }
}

/// One of the four cells of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub token: CellToken,
    pub position: Point,
}

/// A live tetrimino: four tokened cells plus a root point.
///
/// The root is the rotation pivot. It always coincides with the first cell
/// as long as the piece is only translated and rotated, but is tracked
/// separately because it survives wall-kick corrections.
///
/// Pieces are plain values. Moving or rotating returns a new `Piece`; callers
/// decide whether to commit it.
///
/// # Example
///
/// ```
/// use tetrimino_engine::{Catalog, PieceId, Point, TetriminoKind, Turn};
///
/// let piece = Catalog::standard().make(TetriminoKind::I, PieceId(0));
/// let moved = piece.translated(4, 19);
/// assert_eq!(moved.root(), Point::new(4, 19));
///
/// let turned = moved.rotated(Turn::Left);
/// assert!(turned.positions().all(|p| p.x == 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    kind: TetriminoKind,
    root: Point,
    shape: [Point; 4],
    cells: [Cell; 4],
}

impl Piece {
    /// Creates a piece with its root at the origin and cells at `shape`.
    #[must_use]
    pub fn new(id: PieceId, kind: TetriminoKind, shape: [Point; 4]) -> Self {
        let cells = std::array::from_fn(|i| Cell {
            token: CellToken::new(id, i),
            position: shape[i],
        });
        Self {
            id,
            kind,
            root: Point::ORIGIN,
            shape,
            cells,
        }
    }

    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub const fn kind(&self) -> TetriminoKind {
        self.kind
    }

    #[must_use]
    pub const fn root(&self) -> Point {
        self.root
    }

    #[must_use]
    pub const fn cells(&self) -> &[Cell; 4] {
        &self.cells
    }

    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().map(|c| c.position)
    }

    pub fn tokens(&self) -> impl Iterator<Item = CellToken> + '_ {
        self.cells.iter().map(|c| c.token)
    }

    #[must_use]
    pub fn owns(&self, token: CellToken) -> bool {
        self.cells.iter().any(|c| c.token == token)
    }

    /// Returns this piece moved by `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        let mut piece = *self;
        piece.root = piece.root.translated(dx, dy);
        for cell in &mut piece.cells {
            cell.position = cell.position.translated(dx, dy);
        }
        piece
    }

    /// Returns this piece moved so that its root lands on `anchor`.
    #[must_use]
    pub fn placed_at(&self, anchor: Point) -> Self {
        let delta = anchor - self.root;
        self.translated(delta.x, delta.y)
    }

    /// Returns this piece turned a quarter around its root.
    ///
    /// No bounds or occupancy checks are made.
    #[must_use]
    pub fn rotated(&self, turn: Turn) -> Self {
        let mut piece = *self;
        for cell in &mut piece.cells {
            cell.position = cell.position.rotated(turn, self.root);
        }
        piece
    }

    /// Returns this piece back in its spawn orientation with the root at the
    /// origin, keeping every token.
    #[must_use]
    pub fn restaged(&self) -> Self {
        let mut piece = *self;
        piece.root = Point::ORIGIN;
        for (cell, offset) in piece.cells.iter_mut().zip(self.shape) {
            cell.position = offset;
        }
        piece
    }
}

#[cfg(test)]
mod tests {
    use crate::Catalog;

    use super::*;

    fn make(kind: TetriminoKind, id: u64) -> Piece {
        Catalog::standard().make(kind, PieceId(id))
    }

    #[test]
    fn test_tokens_derive_from_piece_id() {
        let piece = make(TetriminoKind::L, 5);
        let tokens: Vec<_> = piece.tokens().collect();
        assert_eq!(
            tokens,
            [CellToken(20), CellToken(21), CellToken(22), CellToken(23)]
        );
        assert!(tokens.iter().all(|t| t.piece_id() == PieceId(5)));
    }

    #[test]
    fn test_translate_moves_cells_and_root() {
        let piece = make(TetriminoKind::T, 0).translated(3, 7);
        assert_eq!(piece.root(), Point::new(3, 7));
        let positions: Vec<_> = piece.positions().collect();
        assert_eq!(
            positions,
            [
                Point::new(3, 7),
                Point::new(4, 7),
                Point::new(2, 7),
                Point::new(3, 6)
            ]
        );
    }

    #[test]
    fn test_rotation_is_exact_about_root() {
        let piece = make(TetriminoKind::T, 0).placed_at(Point::new(5, 10));
        let turned = piece.rotated(Turn::Left);
        assert_eq!(turned.root(), piece.root());
        let positions: Vec<_> = turned.positions().collect();
        assert_eq!(
            positions,
            [
                Point::new(5, 10),
                Point::new(5, 11),
                Point::new(5, 9),
                Point::new(6, 10)
            ]
        );
        assert_eq!(turned.rotated(Turn::Right), piece);
    }

    #[test]
    fn test_restaged_keeps_tokens() {
        let piece = make(TetriminoKind::S, 9);
        let moved = piece.placed_at(Point::new(2, 3)).rotated(Turn::Right);
        let restaged = moved.restaged();
        assert_eq!(restaged, piece);
        assert!(piece.tokens().all(|t| restaged.owns(t)));
    }
}
