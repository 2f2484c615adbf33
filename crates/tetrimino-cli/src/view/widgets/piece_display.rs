use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetrimino_engine::{Point, TetriminoType};

use super::{BlockDisplay, CellView};

/// Largest piece footprint, in cells.
const MAX_WIDTH: u16 = 4;
const MAX_HEIGHT: u16 = 2;

/// A single tetrimino in its spawn orientation, as shown in the hold and next
/// panels.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<&'a TetriminoType>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: Option<&'a TetriminoType>) -> Self {
        Self { piece, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        MAX_WIDTH * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        MAX_HEIGHT * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Returns the bounding box of `offsets` as (min corner, width, height).
fn bounds(offsets: &[Point]) -> (Point, u16, u16) {
    let min_x = offsets.iter().map(|p| p.x).min().unwrap_or(0);
    let max_x = offsets.iter().map(|p| p.x).max().unwrap_or(-1);
    let min_y = offsets.iter().map(|p| p.y).min().unwrap_or(0);
    let max_y = offsets.iter().map(|p| p.y).max().unwrap_or(-1);
    let width = u16::try_from(max_x - min_x + 1).unwrap_or(0);
    let height = u16::try_from(max_y - min_y + 1).unwrap_or(0);
    (Point::new(min_x, min_y), width, height)
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let offsets = piece.offsets();
        let (min, width, height) = bounds(offsets);
        let piece_area = area.centered(
            Constraint::Length(width * BlockDisplay::width()),
            Constraint::Length(height * BlockDisplay::height()),
        );

        let col_constraints = (0..width).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..height).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let filled = BlockDisplay::from_cell(CellView::Filled(piece.color()), false);
        let empty = BlockDisplay::from_cell(CellView::Empty, false);
        let top = min.y + i32::from(height) - 1;
        for (grid_row, y) in iter::zip(grid_rows, (min.y..=top).rev()) {
            for (grid_cell, x) in iter::zip(grid_row, min.x..) {
                let block = if offsets.contains(&Point::new(x, y)) {
                    &filled
                } else {
                    &empty
                };
                block.render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tetrimino_engine::{Catalog, TetriminoKind};

    use super::*;

    #[test]
    fn test_every_piece_fits_the_panel() {
        for ty in Catalog::standard().get_all() {
            let (_, width, height) = bounds(ty.offsets());
            assert!(width <= MAX_WIDTH, "{}", ty.kind());
            assert!(height <= MAX_HEIGHT, "{}", ty.kind());
        }
    }

    #[test]
    fn test_bounds() {
        let ty = TetriminoType::standard(TetriminoKind::T);
        assert_eq!(bounds(ty.offsets()), (Point::new(-1, -1), 3, 2));
        let ty = TetriminoType::standard(TetriminoKind::I);
        assert_eq!(bounds(ty.offsets()), (Point::new(-1, 0), 4, 1));
    }
}
