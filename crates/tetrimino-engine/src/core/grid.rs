use std::{iter, mem};

use super::{
    catalog::TetriminoKind,
    geometry::{Point, Turn, absmax},
    piece::{CellToken, Piece},
};

pub const ROWS: usize = 20;
pub const COLS: usize = 10;

pub const TOP: i32 = ROWS as i32 - 1;
pub const BOTTOM: i32 = 0;
pub const LEFT: i32 = 0;
pub const RIGHT: i32 = COLS as i32 - 1;

/// Where a piece root is placed when it becomes active.
pub const SPAWN_ANCHOR: Point = Point::new(COLS as i32 / 2 - 1, TOP);

/// Horizontal nudges tried, in order, when a rotated piece is blocked.
pub const JIGGLE_OFFSETS: [i32; 4] = [-1, 1, -2, 2];

/// A cell of a piece that has been locked into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockedCell {
    pub token: CellToken,
    pub kind: TetriminoKind,
}

/// Outcome of [`Grid::hold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum HoldResult {
    /// Hold was already used since the last lock, or there is no active piece.
    Cant,
    /// The active piece went to the hold slot, which was empty.
    Push,
    /// The active piece and the held piece were exchanged.
    Swap,
}

type Row = [Option<LockedCell>; COLS];

const EMPTY_ROW: Row = [None; COLS];

/// The playfield.
///
/// Owns the locked cells plus the three piece slots (active, next, held).
/// The active piece lives outside the occupancy grid until it is locked with
/// [`Grid::lock_active`]; collision checks therefore never see it.
///
/// Row 0 is the bottom of the field and row [`TOP`] the top.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: [Row; ROWS],
    active: Option<Piece>,
    next: Option<Piece>,
    held: Option<Piece>,
    can_hold: bool,
    completed_rows: Vec<usize>,
    removed_cells: Vec<CellToken>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; ROWS],
            active: None,
            next: None,
            held: None,
            can_hold: true,
            completed_rows: vec![],
            removed_cells: vec![],
        }
    }

    fn index(p: Point) -> Option<(usize, usize)> {
        if !Self::inside_bounds(p) {
            return None;
        }
        Some((usize::try_from(p.x).ok()?, usize::try_from(p.y).ok()?))
    }

    /// Returns whether `p` lies on the playfield.
    ///
    /// ```
    /// use tetrimino_engine::{Grid, Point};
    ///
    /// assert!(Grid::inside_bounds(Point::new(0, 0)));
    /// assert!(Grid::inside_bounds(Point::new(9, 19)));
    /// assert!(!Grid::inside_bounds(Point::new(10, 0)));
    /// assert!(!Grid::inside_bounds(Point::new(0, -1)));
    /// ```
    #[must_use]
    pub const fn inside_bounds(p: Point) -> bool {
        LEFT <= p.x && p.x <= RIGHT && BOTTOM <= p.y && p.y <= TOP
    }

    /// Returns the locked cell at `p`, if any.
    #[must_use]
    pub fn cell(&self, p: Point) -> Option<LockedCell> {
        let (x, y) = Self::index(p)?;
        self.rows[y][x]
    }

    /// Returns the row at height `y` (0 is the bottom).
    #[must_use]
    pub fn row(&self, y: usize) -> &[Option<LockedCell>; COLS] {
        &self.rows[y]
    }

    pub fn locked_cells(&self) -> impl Iterator<Item = (Point, LockedCell)> + '_ {
        self.rows.iter().zip(0..).flat_map(|(row, y)| {
            row.iter()
                .zip(0..)
                .filter_map(move |(cell, x)| cell.map(|c| (Point::new(x, y), c)))
        })
    }

    /// Returns whether a piece could occupy `p`.
    ///
    /// Out-of-bounds cells are never available. A locked cell is available
    /// only when its token is in `ignore`.
    #[must_use]
    pub fn cell_available(&self, p: Point, ignore: &[CellToken]) -> bool {
        let Some((x, y)) = Self::index(p) else {
            return false;
        };
        self.rows[y][x].is_none_or(|cell| ignore.contains(&cell.token))
    }

    /// Returns whether `piece` moved by `(dx, dy)` fits on the grid.
    #[must_use]
    pub fn can_place(&self, piece: &Piece, dx: i32, dy: i32) -> bool {
        let own: [CellToken; 4] = piece.cells().map(|c| c.token);
        piece
            .positions()
            .all(|p| self.cell_available(p.translated(dx, dy), &own))
    }

    #[must_use]
    pub fn in_place_collision(&self, piece: &Piece) -> bool {
        !self.can_place(piece, 0, 0)
    }

    /// Moves `piece` by `(dx, dy)` if it fits. Leaves it untouched otherwise.
    pub fn move_piece(&self, piece: &mut Piece, dx: i32, dy: i32) -> bool {
        if !self.can_place(piece, dx, dy) {
            return false;
        }
        *piece = piece.translated(dx, dy);
        true
    }

    /// Rotates `piece` a quarter turn around its root, correcting its
    /// position if needed.
    ///
    /// Cells that leave the field push the piece back in, one axis at a time;
    /// per axis the largest correction wins. If the corrected placement is
    /// occupied, the horizontal nudges in [`JIGGLE_OFFSETS`] are tried in
    /// order. The O piece never rotates.
    ///
    /// On failure `piece` is left untouched and `false` is returned.
    pub fn rotate_piece(&self, piece: &mut Piece, turn: Turn) -> bool {
        if piece.kind() == TetriminoKind::O {
            return false;
        }

        let rotated = piece.rotated(turn);
        let (mut cx, mut cy) = (0, 0);
        for p in rotated.positions() {
            cx = absmax(clamp_correction(p.x, LEFT, RIGHT), cx);
            cy = absmax(clamp_correction(p.y, BOTTOM, TOP), cy);
        }

        for nudge in iter::once(0).chain(JIGGLE_OFFSETS) {
            if self.can_place(&rotated, cx + nudge, cy) {
                *piece = rotated.translated(cx + nudge, cy);
                return true;
            }
        }
        false
    }

    /// Returns where `piece` would land if dropped straight down.
    #[must_use]
    pub fn drop_position(&self, piece: &Piece) -> Piece {
        let mut dropped = *piece;
        while self.move_piece(&mut dropped, 0, -1) {}
        dropped
    }

    #[must_use]
    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn next(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    #[must_use]
    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn move_active(&mut self, dx: i32, dy: i32) -> bool {
        let Some(mut piece) = self.active else {
            return false;
        };
        let moved = self.move_piece(&mut piece, dx, dy);
        self.active = Some(piece);
        moved
    }

    pub fn rotate_active(&mut self, turn: Turn) -> bool {
        let Some(mut piece) = self.active else {
            return false;
        };
        let rotated = self.rotate_piece(&mut piece, turn);
        self.active = Some(piece);
        rotated
    }

    #[must_use]
    pub fn active_in_place_collision(&self) -> bool {
        self.active.is_some_and(|p| self.in_place_collision(&p))
    }

    /// Places `piece` at the spawn anchor and makes it the active piece.
    pub fn set_active(&mut self, piece: Piece) {
        self.active = Some(piece.placed_at(SPAWN_ANCHOR));
    }

    /// Stages `piece` in the next slot.
    ///
    /// The piece previously staged, if any, becomes active at the spawn
    /// anchor. Returns whether that happened.
    pub fn put_to_next(&mut self, piece: Piece) -> bool {
        match self.next.replace(piece.restaged()) {
            Some(previous) => {
                self.set_active(previous);
                true
            }
            None => false,
        }
    }

    /// Moves the active piece to the hold slot.
    ///
    /// The held piece is stored in its spawn orientation. If a piece was
    /// already held it becomes active at the spawn anchor. Holding is
    /// refused until [`Grid::reset_hold`] is called.
    pub fn hold(&mut self) -> HoldResult {
        if !self.can_hold {
            return HoldResult::Cant;
        }
        let Some(active) = self.active.take() else {
            return HoldResult::Cant;
        };
        self.can_hold = false;
        match self.held.replace(active.restaged()) {
            Some(previous) => {
                self.set_active(previous);
                HoldResult::Swap
            }
            None => HoldResult::Push,
        }
    }

    pub fn reset_hold(&mut self) {
        self.can_hold = true;
    }

    /// Writes the cells of `piece` into the grid.
    pub fn update_cells(&mut self, piece: &Piece) {
        let kind = piece.kind();
        for cell in piece.cells() {
            if let Some((x, y)) = Self::index(cell.position) {
                self.rows[y][x] = Some(LockedCell {
                    token: cell.token,
                    kind,
                });
            }
        }
    }

    /// Locks the active piece into the grid and empties the active slot.
    pub fn lock_active(&mut self) -> Option<Piece> {
        let piece = self.active.take()?;
        self.update_cells(&piece);
        Some(piece)
    }

    /// Removes every complete row and compacts the grid downwards.
    ///
    /// Rows are scanned from the bottom. Each removal shifts all rows above
    /// down by one and empties the top row; the same height is then examined
    /// again since it now holds the row that was above. Tokens of removed
    /// cells and the original heights of removed rows are recorded until
    /// drained with [`Grid::take_removed_cells`] and
    /// [`Grid::take_completed_rows`].
    ///
    /// Returns the number of rows removed by this call.
    pub fn process_completed_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = 0;
        while y < ROWS {
            if !self.rows[y].iter().all(Option::is_some) {
                y += 1;
                continue;
            }

            self.removed_cells
                .extend(self.rows[y].iter().flatten().map(|c| c.token));
            self.completed_rows.push(y + cleared);
            cleared += 1;

            let shifted = self.rows[y + 1..]
                .iter()
                .any(|row| row.iter().any(Option::is_some));
            self.rows.copy_within(y + 1.., y);
            self.rows[ROWS - 1] = EMPTY_ROW;
            if !shifted {
                y += 1;
            }
        }
        cleared
    }

    pub fn take_completed_rows(&mut self) -> Vec<usize> {
        mem::take(&mut self.completed_rows)
    }

    pub fn take_removed_cells(&mut self) -> Vec<CellToken> {
        mem::take(&mut self.removed_cells)
    }
}

/// Offset that brings `v` back into `min..=max`, or 0 when already inside.
fn clamp_correction(v: i32, min: i32, max: i32) -> i32 {
    if v < min {
        min - v
    } else if v > max {
        max - v
    } else {
        0
    }
}
