use crate::CellToken;

use super::{game::Game, game_stats::GameStats};

/// Presentation side of a running game.
///
/// The game loop calls these from its own thread, in the order things
/// happen. Only [`Renderer::draw`] is required.
pub trait Renderer {
    /// Shows the current state of the game.
    fn draw(&mut self, game: &Game);

    /// Cells with these tokens were cleared from the grid.
    fn remove_cells(&mut self, _tokens: &[CellToken]) {}

    /// Seconds left before the first piece spawns, `None` once the count
    /// reaches zero.
    fn countdown(&mut self, _remaining: Option<u64>) {}

    fn game_over(&mut self, _stats: &GameStats) {}
}

/// A renderer that shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw(&mut self, _game: &Game) {}
}
