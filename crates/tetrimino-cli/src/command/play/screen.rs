use std::sync::mpsc::{Receiver, TryRecvError};

use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use tetrimino_engine::{Game, GameStats, InputSender};

use crate::view::widgets::{Banner, GameDisplay, help_line};

use super::{
    keymap::{self, KeyCommand},
    renderer::UiUpdate,
};

/// Ticks the borders stay highlighted after rows are cleared.
const FLASH_TICKS: u32 = 12;

/// Terminal side of a game: shows the latest snapshot from the game loop and
/// forwards key presses to it.
#[derive(Debug)]
pub struct PlayScreen {
    input: InputSender,
    updates: Receiver<UiUpdate>,
    game: Box<Game>,
    countdown: Option<u64>,
    final_stats: Option<GameStats>,
    flash_ticks: u32,
    is_exiting: bool,
}

impl PlayScreen {
    pub fn new(game: Game, input: InputSender, updates: Receiver<UiUpdate>) -> Self {
        Self {
            input,
            updates,
            game: Box::new(game),
            countdown: None,
            final_stats: None,
            flash_ticks: 0,
            is_exiting: false,
        }
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub fn is_game_over(&self) -> bool {
        self.final_stats.is_some()
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let banner = if self.is_game_over() {
            Some(Banner::GameOver)
        } else {
            self.countdown.map(Banner::Countdown)
        };
        let game_display = GameDisplay::new(&self.game)
            .banner(banner)
            .highlight(self.flash_ticks > 0);

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(22), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(game_display, main_area);
        frame.render_widget(help_line(self.is_game_over()), help_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        match keymap::command_for(&key) {
            Some(KeyCommand::Exit) => {
                self.is_exiting = true;
                if self.input.send_exit().is_err() {
                    log::debug!("game loop already stopped");
                }
            }
            Some(KeyCommand::Game(action)) if !self.is_game_over() => {
                if self.input.send_action(action).is_err() {
                    log::debug!("game loop stopped, dropping {action}");
                }
            }
            Some(KeyCommand::Game(_)) | None => {}
        }
    }

    /// Applies everything the game loop sent since the last tick.
    pub fn update(&mut self) {
        self.flash_ticks = self.flash_ticks.saturating_sub(1);
        loop {
            match self.updates.try_recv() {
                Ok(update) => self.apply(update),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply(&mut self, update: UiUpdate) {
        match update {
            UiUpdate::Draw(game) => self.game = game,
            UiUpdate::RemoveCells(tokens) => {
                log::trace!("{} cells removed", tokens.len());
                self.flash_ticks = FLASH_TICKS;
            }
            UiUpdate::Countdown(countdown) => self.countdown = countdown,
            UiUpdate::GameOver(stats) => self.final_stats = Some(stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Sender};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tetrimino_engine::{GameConfig, GameLoop, NullRenderer};

    use super::*;

    fn screen() -> (PlayScreen, Sender<UiUpdate>) {
        let game = Game::new(GameConfig::default()).unwrap();
        let game_loop = GameLoop::new(game.clone(), NullRenderer);
        let (tx, rx) = mpsc::channel();
        (PlayScreen::new(game, game_loop.sender(), rx), tx)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_updates_are_applied_on_tick() {
        let (mut screen, tx) = screen();
        tx.send(UiUpdate::Countdown(Some(2))).unwrap();
        assert_eq!(screen.countdown, None);
        screen.update();
        assert_eq!(screen.countdown, Some(2));

        let mut game = Game::new(GameConfig::default()).unwrap();
        game.spawn_next();
        tx.send(UiUpdate::Countdown(None)).unwrap();
        tx.send(UiUpdate::Draw(Box::new(game))).unwrap();
        screen.update();
        assert_eq!(screen.countdown, None);
        assert!(screen.game.active_piece().is_some());

        tx.send(UiUpdate::GameOver(GameStats::new())).unwrap();
        screen.update();
        assert!(screen.is_game_over());
        assert!(!screen.is_exiting());
    }

    #[test]
    fn test_clear_flash_fades() {
        let (mut screen, tx) = screen();
        tx.send(UiUpdate::RemoveCells(Vec::new())).unwrap();
        screen.update();
        assert_eq!(screen.flash_ticks, FLASH_TICKS);
        for _ in 0..FLASH_TICKS {
            screen.update();
        }
        assert_eq!(screen.flash_ticks, 0);
    }

    #[test]
    fn test_exit_key() {
        let (mut screen, _tx) = screen();
        screen.handle_event(&key(KeyCode::Left));
        assert!(!screen.is_exiting());
        screen.handle_event(&key(KeyCode::Esc));
        assert!(screen.is_exiting());
    }
}
