use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    time::{Duration, Instant},
};

use super::{
    clock::{Clock, ClockSignal},
    game::{Action, Game},
    game_stats::GameStats,
    renderer::Renderer,
};

/// Message handled by a [`GameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMessage {
    Clock {
        generation: u64,
        signal: ClockSignal,
    },
    Input(Action),
    Exit,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("game loop has stopped")]
pub struct LoopClosedError;

/// Handle for feeding player input into a running [`GameLoop`].
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<LoopMessage>,
}

impl InputSender {
    pub fn send_action(&self, action: Action) -> Result<(), LoopClosedError> {
        self.tx
            .send(LoopMessage::Input(action))
            .map_err(|_| LoopClosedError)
    }

    pub fn send_exit(&self) -> Result<(), LoopClosedError> {
        self.tx.send(LoopMessage::Exit).map_err(|_| LoopClosedError)
    }
}

/// Drives a [`Game`] in real time.
///
/// The loop is the only owner of the game. Gravity clock signals, player
/// actions and exit requests all arrive on one channel and are handled one at
/// a time, so the game is never mutated concurrently.
///
/// A turn runs as follows: a [`Clock`] is started with the current gravity
/// interval and moves the piece down on each step. When the piece lands the
/// clock is stopped; its `Finished` signal settles the turn and a new clock
/// is started for the next piece. Inputs that replace the active piece (hard
/// drop, hold) cancel the running clock and start a fresh one.
///
/// # Example
///
/// ```
/// use std::thread;
///
/// use tetrimino_engine::{Game, GameConfig, GameLoop, NullRenderer};
///
/// let config = GameConfig {
///     countdown_secs: 0,
///     ..GameConfig::default()
/// };
/// let game_loop = GameLoop::new(Game::new(config).unwrap(), NullRenderer);
/// let input = game_loop.sender();
/// let handle = thread::spawn(move || game_loop.run());
///
/// input.send_exit().unwrap();
/// let stats = handle.join().unwrap();
/// assert_eq!(stats.completed_pieces(), 0);
/// ```
#[derive(Debug)]
pub struct GameLoop<R> {
    game: Game,
    renderer: R,
    tx: Sender<LoopMessage>,
    rx: Receiver<LoopMessage>,
    clock: Option<Clock>,
    generation: u64,
}

impl<R> GameLoop<R>
where
    R: Renderer,
{
    pub fn new(game: Game, renderer: R) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            game,
            renderer,
            tx,
            rx,
            clock: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn sender(&self) -> InputSender {
        InputSender {
            tx: self.tx.clone(),
        }
    }

    /// Runs the game until it is over or an exit is requested, and returns
    /// the final statistics.
    pub fn run(mut self) -> GameStats {
        log::info!("game started");
        if self.countdown() {
            self.game.spawn_next();
            self.renderer.draw(&self.game);
            if !self.game.is_game_over() {
                self.restart_clock();
                self.pump();
            }
        } else {
            self.game.quit();
        }

        self.clock = None;
        let stats = self.game.stats().clone();
        self.renderer.game_over(&stats);
        stats
    }

    /// Counts down before the game starts. Returns `false` on an exit request.
    fn countdown(&mut self) -> bool {
        for remaining in (1..=self.game.config().countdown()).rev() {
            self.renderer.countdown(Some(remaining));
            let deadline = Instant::now() + Duration::from_secs(1);
            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match self.rx.recv_timeout(timeout) {
                    Ok(LoopMessage::Exit) => return false,
                    Ok(_) => {}
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => return false,
                }
            }
        }
        self.renderer.countdown(None);
        true
    }

    fn pump(&mut self) {
        while let Ok(message) = self.rx.recv() {
            match message {
                LoopMessage::Exit => {
                    log::info!("exit requested");
                    self.game.quit();
                }
                LoopMessage::Input(action) => self.handle_action(action),
                LoopMessage::Clock { generation, signal } if generation == self.generation => {
                    self.handle_clock(signal);
                }
                LoopMessage::Clock { generation, signal } => {
                    log::trace!("ignoring {signal:?} from stale clock {generation}");
                }
            }
            if self.game.is_game_over() {
                break;
            }
        }
    }

    fn restart_clock(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.cancel();
        }
        self.generation += 1;
        let generation = self.generation;
        let interval = self.game.gravity_interval();
        log::trace!("clock {generation} started, interval {interval:?}");

        let tx = self.tx.clone();
        self.clock = Some(Clock::start(generation, interval, move |signal| {
            tx.send(LoopMessage::Clock { generation, signal }).is_ok()
        }));
    }

    fn handle_action(&mut self, action: Action) {
        let before = self.game.active_piece_id();
        if !self.game.apply(action) {
            return;
        }
        log::trace!("applied {action}");
        self.flush_removed_cells();
        self.renderer.draw(&self.game);
        if self.game.phase().is_falling() && self.game.active_piece_id() != before {
            self.restart_clock();
        }
    }

    fn handle_clock(&mut self, signal: ClockSignal) {
        log::trace!("clock {}: {signal:?}", self.generation);
        match signal {
            ClockSignal::Step => {
                if self.game.gravity_step() {
                    self.renderer.draw(&self.game);
                }
                if self.game.phase().is_locking()
                    && let Some(clock) = &self.clock
                {
                    clock.stop();
                }
            }
            ClockSignal::Finished => {
                self.game.settle();
                self.flush_removed_cells();
                self.renderer.draw(&self.game);
                if self.game.phase().is_falling() {
                    self.restart_clock();
                }
            }
            ClockSignal::Canceled => {}
        }
    }

    fn flush_removed_cells(&mut self) {
        let rows = self.game.take_completed_rows();
        if !rows.is_empty() {
            log::debug!("completed rows {rows:?}");
        }
        let removed = self.game.take_removed_cells();
        if !removed.is_empty() {
            self.renderer.remove_cells(&removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        thread,
    };

    use crate::{Catalog, CellToken, GameConfig, PieceQueue, PieceSeed, TetriminoKind};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Draw,
        Remove(usize),
        Countdown(Option<u64>),
        GameOver(usize),
    }

    #[derive(Debug, Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Event>>>);

    impl Recorder {
        fn events(&self) -> Vec<Event> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Renderer for Recorder {
        fn draw(&mut self, _game: &Game) {
            self.0.lock().unwrap().push(Event::Draw);
        }

        fn remove_cells(&mut self, tokens: &[CellToken]) {
            self.0.lock().unwrap().push(Event::Remove(tokens.len()));
        }

        fn countdown(&mut self, remaining: Option<u64>) {
            self.0.lock().unwrap().push(Event::Countdown(remaining));
        }

        fn game_over(&mut self, stats: &GameStats) {
            self.0
                .lock()
                .unwrap()
                .push(Event::GameOver(stats.completed_pieces()));
        }
    }

    fn config(base_step_ms: u64, countdown_secs: i64) -> GameConfig {
        GameConfig {
            base_step_ms,
            countdown_secs,
            seed: Some(PieceSeed::from_bytes([5; 16])),
            ..GameConfig::default()
        }
    }

    fn spawn_loop(game: Game) -> (Recorder, InputSender, thread::JoinHandle<GameStats>) {
        let recorder = Recorder::default();
        let game_loop = GameLoop::new(game, recorder.clone());
        let input = game_loop.sender();
        let handle = thread::spawn(move || game_loop.run());
        (recorder, input, handle)
    }

    #[test]
    fn test_exit_request_ends_the_game() {
        let (recorder, input, handle) = spawn_loop(Game::new(config(60_000, 0)).unwrap());
        input.send_exit().unwrap();
        let stats = handle.join().unwrap();

        assert_eq!(stats.completed_pieces(), 0);
        let events = recorder.events();
        assert_eq!(events.first(), Some(&Event::Countdown(None)));
        assert_eq!(events.last(), Some(&Event::GameOver(0)));
        assert!(input.send_exit().is_err());
    }

    #[test]
    fn test_exit_during_countdown() {
        let (recorder, input, handle) = spawn_loop(Game::new(config(60_000, 5)).unwrap());
        input.send_action(Action::HardDrop).unwrap();
        input.send_exit().unwrap();
        handle.join().unwrap();

        assert_eq!(
            recorder.events(),
            [Event::Countdown(Some(5)), Event::GameOver(0)]
        );
    }

    #[test]
    fn test_hard_drops_top_out() {
        let (recorder, input, handle) = spawn_loop(Game::new(config(60_000, 0)).unwrap());
        for _ in 0..30 {
            input.send_action(Action::HardDrop).unwrap();
        }
        let _ = input.send_exit();
        let stats = handle.join().unwrap();

        assert!(stats.completed_pieces() <= 20);
        assert_eq!(stats.total_cleared_lines(), 0);
        let events = recorder.events();
        assert_eq!(
            events.last(),
            Some(&Event::GameOver(stats.completed_pieces()))
        );
        let draws = events.iter().filter(|e| **e == Event::Draw).count();
        assert_eq!(draws, stats.completed_pieces() + 1);
    }

    #[test]
    fn test_gravity_runs_until_top_out() {
        let (recorder, _input, handle) = spawn_loop(Game::new(config(1, 0)).unwrap());
        let stats = handle.join().unwrap();

        assert!(stats.completed_pieces() > 0);
        assert_eq!(stats.drop_bonus(), 0);
        assert!(matches!(recorder.events().last(), Some(Event::GameOver(_))));
    }

    #[test]
    fn test_cleared_cells_are_reported() {
        let queue = PieceQueue::with_prefix(
            PieceSeed::from_bytes([9; 16]),
            [TetriminoKind::I, TetriminoKind::I, TetriminoKind::O],
        );
        let game = Game::with_queue(config(60_000, 0), Catalog::standard(), queue).unwrap();
        let (recorder, input, handle) = spawn_loop(game);

        // I: x 3..=6 -> 0..=3
        for _ in 0..3 {
            input.send_action(Action::MoveLeft).unwrap();
        }
        input.send_action(Action::HardDrop).unwrap();
        // I: x 3..=6 -> 4..=7
        input.send_action(Action::MoveRight).unwrap();
        input.send_action(Action::HardDrop).unwrap();
        // O: x 4..=5 -> 8..=9
        for _ in 0..4 {
            input.send_action(Action::MoveRight).unwrap();
        }
        input.send_action(Action::HardDrop).unwrap();
        input.send_exit().unwrap();
        let stats = handle.join().unwrap();

        assert_eq!(stats.total_cleared_lines(), 1);
        assert!(recorder.events().contains(&Event::Remove(10)));
    }
}
