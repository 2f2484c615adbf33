use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetrimino_engine::{COLS, Game, Piece, Point, ROWS, TOP};

use super::{BlockDisplay, CellView};

/// Board size in cells, for layout arithmetic.
const BOARD_COLS: u16 = 10;
const BOARD_ROWS: u16 = 20;

/// The playfield: locked cells, the falling piece and optionally its ghost.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    game: &'a Game,
    show_ghost: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self {
            game,
            show_ghost: false,
            block: None,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        BOARD_COLS * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        BOARD_ROWS * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_view(&self, p: Point, active: Option<&Piece>, ghost: Option<&Piece>) -> CellView {
        let color = |kind| self.game.catalog().get(kind).color();
        if let Some(piece) = active
            && piece.positions().any(|q| q == p)
        {
            return CellView::Filled(color(piece.kind()));
        }
        if let Some(cell) = self.game.grid().cell(p) {
            return CellView::Filled(color(cell.kind));
        }
        if ghost.is_some_and(|piece| piece.positions().any(|q| q == p)) {
            return CellView::Ghost;
        }
        CellView::Empty
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let active = self.game.active_piece();
        let ghost = self
            .show_ghost
            .then(|| self.game.ghost_piece())
            .flatten();

        let col_constraints = (0..COLS).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..ROWS).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<ROWS>(&vertical)
            .into_iter()
            .map(|row| row.layout::<COLS>(&horizontal));

        // screen rows run top-down, grid rows bottom-up
        for (grid_row, y) in iter::zip(grid_cells, (0..=TOP).rev()) {
            for (grid_cell, x) in iter::zip(grid_row, 0..) {
                let view = self.cell_view(Point::new(x, y), active, ghost.as_ref());
                BlockDisplay::from_cell(view, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tetrimino_engine::GameConfig;

    use super::*;

    #[test]
    fn test_layout_size_matches_grid() {
        assert_eq!(usize::from(BOARD_COLS), COLS);
        assert_eq!(usize::from(BOARD_ROWS), ROWS);

        let game = Game::new(GameConfig::default()).unwrap();
        let display = BoardDisplay::new(&game).block(BlockWidget::bordered());
        assert_eq!(display.width(), 22);
        assert_eq!(display.height(), 22);
    }
}
