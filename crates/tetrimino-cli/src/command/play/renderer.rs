use std::sync::mpsc::Sender;

use tetrimino_engine::{CellToken, Game, GameStats, Renderer};

/// What the game loop tells the terminal UI.
#[derive(Debug)]
pub enum UiUpdate {
    /// A snapshot of the game after something visible changed.
    Draw(Box<Game>),
    RemoveCells(Vec<CellToken>),
    Countdown(Option<u64>),
    GameOver(GameStats),
}

/// Renderer that forwards everything to the UI thread.
///
/// The UI may exit before the game loop does, so send failures are ignored.
#[derive(Debug)]
pub struct ChannelRenderer {
    tx: Sender<UiUpdate>,
}

impl ChannelRenderer {
    pub fn new(tx: Sender<UiUpdate>) -> Self {
        Self { tx }
    }

    fn send(&self, update: UiUpdate) {
        _ = self.tx.send(update);
    }
}

impl Renderer for ChannelRenderer {
    fn draw(&mut self, game: &Game) {
        self.send(UiUpdate::Draw(Box::new(game.clone())));
    }

    fn remove_cells(&mut self, tokens: &[CellToken]) {
        self.send(UiUpdate::RemoveCells(tokens.to_vec()));
    }

    fn countdown(&mut self, remaining: Option<u64>) {
        self.send(UiUpdate::Countdown(remaining));
    }

    fn game_over(&mut self, stats: &GameStats) {
        self.send(UiUpdate::GameOver(stats.clone()));
    }
}
