use std::iter;

use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use tetrimino_engine::{Game, TetriminoType};

use super::{BlockDisplay, BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Message shown over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Countdown(u64),
    GameOver,
}

/// Whole game screen: hold and stats on the left, the board in the middle,
/// upcoming pieces on the right.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    game: &'a Game,
    banner: Option<Banner>,
    highlight: bool,
    next_pieces: usize,
}

impl<'a> GameDisplay<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self {
            game,
            banner: None,
            highlight: false,
            next_pieces: 5,
        }
    }

    pub fn banner(self, banner: Option<Banner>) -> Self {
        Self { banner, ..self }
    }

    /// Draws the borders in the highlight color, used right after a clear.
    pub fn highlight(self, highlight: bool) -> Self {
        Self { highlight, ..self }
    }

    fn upcoming(&self) -> Vec<&'a TetriminoType> {
        let catalog = self.game.catalog();
        let staged = self.game.grid().next().map(|piece| piece.kind());
        staged
            .into_iter()
            .chain(self.game.next_kinds())
            .take(self.next_pieces)
            .map(|kind| catalog.get(kind))
            .collect()
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game_over = self.game.is_game_over() || self.banner == Some(Banner::GameOver);
        let border_color = if game_over {
            color::RED
        } else if self.highlight {
            color::YELLOW
        } else {
            color::WHITE
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(Padding::symmetric(1, 0))
                .border_style(border_color)
                .style(style::DEFAULT)
        };

        let board = BoardDisplay::new(self.game)
            .show_ghost(true)
            .block(Block::bordered().border_style(border_color).style(style::DEFAULT));
        let held = self
            .game
            .grid()
            .held()
            .map(|piece| self.game.catalog().get(piece.kind()));
        let hold_panel = PieceDisplay::new().piece(held).block(panel("HOLD"));
        let stats_panel = StatsDisplay::new(self.game.stats()).block(panel("STATS"));

        let upcoming = self.upcoming();
        let next_block = panel("NEXT");
        let next_inner_width = PieceDisplay::new().width();
        let next_count = u16::try_from(upcoming.len()).unwrap_or(0);
        let next_width = next_inner_width + super::block_horizontal_margin(Some(&next_block));
        let next_height = next_count * 2 * BlockDisplay::height()
            + next_count.saturating_sub(1)
            + super::block_vertical_margin(Some(&next_block));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats_panel.width())),
            Constraint::Length(board.width()),
            Constraint::Length(next_width),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats_panel.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(stats_panel.width())]).flex(Flex::End),
        )[0];
        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(center_column);
        let [next_area] = Layout::vertical([Constraint::Length(next_height)]).areas(right_column);

        let board_width = board.width();
        hold_panel.render(hold_area, buf);
        stats_panel.render(stats_area, buf);
        board.render(board_area, buf);

        let next_inner = next_block.inner(next_area);
        next_block.render(next_area, buf);
        let slots = next_inner.layout_vec(
            &Layout::vertical(
                upcoming
                    .iter()
                    .map(|_| Constraint::Length(2 * BlockDisplay::height())),
            )
            .spacing(1),
        );
        for (slot, piece) in iter::zip(slots, upcoming) {
            PieceDisplay::new().piece(Some(piece)).render(slot, buf);
        }

        let popup = match self.banner {
            None => None,
            Some(Banner::Countdown(remaining)) => Some((
                remaining.to_string(),
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            Some(Banner::GameOver) => Some((
                "GAME OVER!!".to_owned(),
                Style::new().fg(color::WHITE).bg(color::RED),
            )),
        };
        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area = board_area.centered(Constraint::Length(board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

/// One-line key help shown under the game.
pub fn help_line(game_over: bool) -> Text<'static> {
    let text = if game_over {
        "Controls: Esc / Q (Quit)"
    } else {
        "Controls: ← → (Move) | ↓ (Soft Drop) | Space (Hard Drop) | Z ↑ X (Rotate) | C (Hold) | Esc / Q (Quit)"
    };
    Text::from(text).style(style::HELP).centered()
}
