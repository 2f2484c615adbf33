use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};
use tetrimino_engine::Rgb;

use super::{color, style};

/// What a single grid cell shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellView {
    Empty,
    Ghost,
    Filled(Rgb),
}

/// One grid cell, two terminal columns wide.
#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn width() -> u16 {
        2
    }

    pub const fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: CellView, show_dots: bool) -> Self {
        let (style, symbol) = match cell {
            CellView::Empty if show_dots => (style::EMPTY_DOT, "."),
            CellView::Empty => (style::EMPTY, ""),
            CellView::Ghost => (style::GHOST, "[]"),
            CellView::Filled(rgb) => (style::bg_only(color::from_rgb(rgb)), ""),
        };
        Self { style, symbol }
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // a Paragraph fills the whole area with the style, not only the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
