use std::time::Duration;

use crate::{
    Catalog, CellToken, ConfigError, Grid, HoldResult, Piece, PieceId, TetriminoKind, Turn,
};

use super::{config::GameConfig, game_stats::GameStats, piece_queue::PieceQueue};

/// Where a game is within its turn.
///
/// ```text
/// Spawning -> Falling -> Locking -> Clearing -> Spawning -> ...
///                 \                                 \
///                  +-- (swap collision) ---------+   +-- (spawn collision)
///                                                v   v
///                                               GameOver
/// ```
///
/// `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    Clearing,
    #[display("game over")]
    GameOver,
}

/// A player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateLeft,
    RotateRight,
    Hold,
}

/// The rules of a single game.
///
/// `Game` owns the grid, the piece queue and the statistics, and drives the
/// turn through its [`Phase`]s. It is purely synchronous: time is supplied by
/// whoever calls [`Game::gravity_step`] / [`Game::tick`], usually a
/// [`GameLoop`](crate::GameLoop).
///
/// Player inputs only have an effect while a piece is falling. Once the game
/// is over every mutating call is a no-op.
///
/// # Example
///
/// ```
/// use tetrimino_engine::{Action, Game, GameConfig, Phase};
///
/// let mut game = Game::new(GameConfig::default()).unwrap();
/// assert_eq!(game.phase(), Phase::Spawning);
///
/// game.spawn_next();
/// assert_eq!(game.phase(), Phase::Falling);
///
/// game.apply(Action::MoveLeft);
/// game.apply(Action::HardDrop);
/// assert_eq!(game.stats().completed_pieces(), 1);
/// assert_eq!(game.score(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    catalog: Catalog,
    grid: Grid,
    queue: PieceQueue,
    stats: GameStats,
    phase: Phase,
    loop_counter: u64,
    piece_steps: usize,
    gravity_interval: Duration,
}

impl Game {
    /// Creates a game with the standard catalog.
    ///
    /// Pieces come from `config.seed` when set, from a random seed otherwise.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(config, Catalog::standard())
    }

    pub fn with_catalog(config: GameConfig, catalog: Catalog) -> Result<Self, ConfigError> {
        let queue = config
            .seed
            .map_or_else(PieceQueue::new, PieceQueue::with_seed);
        Self::with_queue(config, catalog, queue)
    }

    pub fn with_queue(
        config: GameConfig,
        catalog: Catalog,
        queue: PieceQueue,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let gravity_interval = config.gravity_interval(0);
        Ok(Self {
            config,
            catalog,
            grid: Grid::new(),
            queue,
            stats: GameStats::new(),
            phase: Phase::Spawning,
            loop_counter: 0,
            piece_steps: 0,
            gravity_interval,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn display_level(&self) -> usize {
        self.stats.display_level()
    }

    /// Time between two gravity steps at the current level.
    #[must_use]
    pub fn gravity_interval(&self) -> Duration {
        self.gravity_interval
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.grid.active()
    }

    #[must_use]
    pub fn active_piece_id(&self) -> Option<PieceId> {
        self.grid.active().map(Piece::id)
    }

    /// Where the active piece would land on a hard drop.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        self.grid.active().map(|p| self.grid.drop_position(p))
    }

    /// Kinds waiting in the queue, after the piece staged in the next slot.
    pub fn next_kinds(&self) -> impl Iterator<Item = TetriminoKind> + '_ {
        self.queue.next_kinds()
    }

    /// Number of gravity steps taken by the active piece.
    #[must_use]
    pub fn piece_steps(&self) -> usize {
        self.piece_steps
    }

    pub fn take_completed_rows(&mut self) -> Vec<usize> {
        self.grid.take_completed_rows()
    }

    pub fn take_removed_cells(&mut self) -> Vec<CellToken> {
        self.grid.take_removed_cells()
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::debug!("phase {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn game_over(&mut self) {
        self.set_phase(Phase::GameOver);
        log::info!(
            "game over: score {}, lines {}, pieces {}",
            self.stats.score(),
            self.stats.total_cleared_lines(),
            self.stats.completed_pieces()
        );
    }

    fn make_piece(&mut self) -> Piece {
        let kind = self.queue.pop_next();
        let piece = self.catalog.make(kind, PieceId(self.loop_counter));
        self.loop_counter += 1;
        piece
    }

    /// Brings the staged piece into play and stages a new one.
    ///
    /// The first spawn fills both the next slot and the active slot. If the
    /// new active piece collides where it spawns, the game is over.
    ///
    /// Returns whether a piece is now falling.
    pub fn spawn_next(&mut self) -> bool {
        if !self.phase.is_spawning() {
            return false;
        }
        loop {
            let piece = self.make_piece();
            if self.grid.put_to_next(piece) {
                break;
            }
        }
        self.piece_steps = 0;

        if let Some(piece) = self.grid.active() {
            log::debug!("spawned {} {}", piece.kind(), piece.id());
        }
        if self.grid.active_in_place_collision() {
            self.game_over();
            return false;
        }
        self.set_phase(Phase::Falling);
        true
    }

    pub fn move_piece(&mut self, dx: i32, dy: i32) -> bool {
        self.phase.is_falling() && self.grid.move_active(dx, dy)
    }

    /// Moves the piece down one row, earning the soft drop bonus on success.
    pub fn soft_drop(&mut self) -> bool {
        if !self.move_piece(0, -1) {
            return false;
        }
        self.stats.add_drop_bonus(self.config.soft_drop_bonus);
        true
    }

    pub fn rotate(&mut self, turn: Turn) -> bool {
        self.phase.is_falling() && self.grid.rotate_active(turn)
    }

    /// Puts the active piece on hold.
    ///
    /// On [`HoldResult::Push`] a new piece is spawned; on
    /// [`HoldResult::Swap`] the previously held piece starts falling from the
    /// top with a fresh step budget.
    pub fn hold(&mut self) -> HoldResult {
        if !self.phase.is_falling() {
            return HoldResult::Cant;
        }
        let result = self.grid.hold();
        log::debug!("hold: {result:?}");
        match result {
            HoldResult::Cant => {}
            HoldResult::Push => {
                self.set_phase(Phase::Spawning);
                self.spawn_next();
            }
            HoldResult::Swap => {
                self.piece_steps = 0;
                if self.grid.active_in_place_collision() {
                    self.game_over();
                }
            }
        }
        result
    }

    /// Drops the piece as far as it goes and locks it at once.
    pub fn hard_drop(&mut self) -> bool {
        if !self.phase.is_falling() {
            return false;
        }
        while self.grid.move_active(0, -1) {}
        self.stats.add_drop_bonus(self.config.hard_drop_bonus);
        self.set_phase(Phase::Locking);
        self.settle();
        true
    }

    /// Moves the piece down one row under gravity.
    ///
    /// When the piece cannot move the game moves to [`Phase::Locking`]; call
    /// [`Game::settle`] to finish the turn. A piece that has used up its step
    /// budget drops straight to its landing position and locks there, so a
    /// piece never locks with room left below it.
    pub fn gravity_step(&mut self) -> bool {
        if !self.phase.is_falling() {
            return false;
        }
        let moved = self.grid.move_active(0, -1);
        if moved {
            self.piece_steps += 1;
            if self.piece_steps >= self.config.steps_per_piece {
                while self.grid.move_active(0, -1) {}
                self.set_phase(Phase::Locking);
            }
        } else {
            self.set_phase(Phase::Locking);
        }
        moved
    }

    /// Runs one gravity step and settles the turn if the piece landed.
    pub fn tick(&mut self) -> bool {
        let moved = self.gravity_step();
        if self.phase.is_locking() {
            self.settle();
        }
        moved
    }

    /// Finishes the turn: locks the piece, clears complete rows, updates
    /// score and speed, then spawns the next piece.
    ///
    /// Returns the number of rows cleared.
    pub fn settle(&mut self) -> usize {
        if !self.phase.is_locking() {
            return 0;
        }
        if let Some(piece) = self.grid.lock_active() {
            log::debug!("locked {} {} at {:?}", piece.kind(), piece.id(), piece.root());
        }
        self.grid.reset_hold();
        self.set_phase(Phase::Clearing);

        let cleared = self.grid.process_completed_rows();
        self.stats.complete_piece_drop(cleared);
        if cleared > 0 {
            log::debug!(
                "cleared {cleared} rows, {} lines in total",
                self.stats.total_cleared_lines()
            );
        }
        self.gravity_interval = self.config.gravity_interval(self.stats.level());

        self.set_phase(Phase::Spawning);
        self.spawn_next();
        cleared
    }

    /// Ends the game on the player's request.
    pub fn quit(&mut self) {
        if !self.is_game_over() {
            self.game_over();
        }
    }

    /// Applies a player input. Returns whether it changed anything.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_piece(-1, 0),
            Action::MoveRight => self.move_piece(1, 0),
            Action::SoftDrop => self.soft_drop(),
            Action::HardDrop => self.hard_drop(),
            Action::RotateLeft => self.rotate(Turn::Left),
            Action::RotateRight => self.rotate(Turn::Right),
            Action::Hold => !self.hold().is_cant(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{PieceSeed, Point, SPAWN_ANCHOR};

    use super::*;

    fn game_with(prefix: &[TetriminoKind]) -> Game {
        let queue = PieceQueue::with_prefix(PieceSeed::from_bytes([7; 16]), prefix.iter().copied());
        Game::with_queue(GameConfig::default(), Catalog::standard(), queue).unwrap()
    }

    fn started(prefix: &[TetriminoKind]) -> Game {
        let mut game = game_with(prefix);
        assert!(game.spawn_next());
        game
    }

    fn fill_row_except(game: &mut Game, y: i32, gap: &[i32]) {
        for x in 0..10 {
            if gap.contains(&x) {
                continue;
            }
            let id = PieceId(1000 + u64::try_from(y * 10 + x).unwrap());
            let cell = Piece::new(id, TetriminoKind::I, [Point::ORIGIN; 4]);
            game.grid.update_cells(&cell.placed_at(Point::new(x, y)));
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GameConfig {
            decay: 2.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::new(config),
            Err(ConfigError::DecayOutOfRange { .. })
        ));
    }

    #[test]
    fn test_first_spawn_fills_both_slots() {
        let game = started(&[TetriminoKind::T, TetriminoKind::S]);
        let active = game.active_piece().unwrap();
        assert_eq!(active.kind(), TetriminoKind::T);
        assert_eq!(active.id(), PieceId(0));
        assert_eq!(active.root(), SPAWN_ANCHOR);
        let next = game.grid().next().unwrap();
        assert_eq!(next.kind(), TetriminoKind::S);
        assert_eq!(next.id(), PieceId(1));
        assert_eq!(game.phase(), Phase::Falling);
    }

    #[test]
    fn test_i_piece_falls_to_the_floor_and_locks() {
        let mut game = started(&[TetriminoKind::I, TetriminoKind::O]);
        for step in 0..19 {
            assert!(game.tick(), "step {step}");
        }
        assert_eq!(game.active_piece().unwrap().root(), Point::new(4, 0));
        assert!(!game.tick());

        let bottom: Vec<_> = game.grid().row(0).iter().map(Option::is_some).collect();
        assert_eq!(
            bottom,
            [false, false, false, true, true, true, true, false, false, false]
        );
        assert_eq!(game.lines(), 0);
        assert_eq!(game.score(), 0);
        assert_eq!(game.stats().completed_pieces(), 1);
        assert_eq!(game.phase(), Phase::Falling);
        assert_eq!(game.active_piece().unwrap().kind(), TetriminoKind::O);
    }

    #[test]
    fn test_gravity_step_leaves_locking_to_settle() {
        let mut game = started(&[TetriminoKind::I]);
        while game.gravity_step() {}
        assert_eq!(game.phase(), Phase::Locking);
        assert!(!game.apply(Action::MoveLeft));
        assert_eq!(game.settle(), 0);
        assert_eq!(game.phase(), Phase::Falling);
    }

    #[test]
    fn test_step_budget_lands_piece() {
        let config = GameConfig {
            steps_per_piece: 3,
            ..GameConfig::default()
        };
        let queue = PieceQueue::with_prefix(PieceSeed::from_bytes([1; 16]), [TetriminoKind::T]);
        let mut game = Game::with_queue(config, Catalog::standard(), queue).unwrap();
        game.spawn_next();

        assert!(game.gravity_step());
        assert!(game.gravity_step());
        assert_eq!(game.phase(), Phase::Falling);
        assert!(game.gravity_step());
        assert_eq!(game.phase(), Phase::Locking);
        assert_eq!(game.active_piece().unwrap().root(), Point::new(4, 1));
        game.settle();
        assert!(game.grid().cell(Point::new(4, 0)).is_some());
        assert!(game.grid().cell(Point::new(4, 16)).is_none());
    }

    #[test]
    fn test_piece_lifted_by_rotation_never_locks_in_the_air() {
        let mut game = started(&[TetriminoKind::I, TetriminoKind::O]);
        for _ in 0..19 {
            assert!(game.gravity_step());
        }
        // wall corrections push the piece up off the floor
        for _ in 0..10 {
            game.rotate(Turn::Left);
        }
        game.tick();

        assert_eq!(game.stats().completed_pieces(), 1);
        let locked: Vec<_> = game.grid().locked_cells().map(|(p, _)| p).collect();
        assert_eq!(locked.len(), 4);
        for p in locked {
            assert!(
                p.y == 0 || game.grid().cell(p.translated(0, -1)).is_some(),
                "{p:?} has nothing below it"
            );
        }
    }

    #[test]
    fn test_soft_and_hard_drop_bonus() {
        let mut game = started(&[TetriminoKind::O]);
        assert!(game.soft_drop());
        assert!(game.soft_drop());
        assert_eq!(game.score(), 2);
        assert!(game.hard_drop());
        assert_eq!(game.score(), 22);
        assert_eq!(game.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_line_clear_scores_and_speeds_up() {
        let mut game = started(&[TetriminoKind::I]);
        let slow = game.gravity_interval();
        for y in 0..4 {
            fill_row_except(&mut game, y, &[4]);
        }
        assert!(game.rotate(Turn::Left));
        assert!(game.hard_drop());

        assert_eq!(game.lines(), 4);
        assert_eq!(game.score(), 820);
        assert_eq!(game.take_completed_rows(), [0, 1, 2, 3]);
        assert_eq!(game.take_removed_cells().len(), 40);
        assert_eq!(game.grid().locked_cells().count(), 0);

        for y in 0..6 {
            fill_row_except(&mut game, y, &[]);
        }
        game.hard_drop();
        assert_eq!(game.level(), 1);
        assert_eq!(game.display_level(), 2);
        assert!(game.gravity_interval() < slow);
    }

    #[test]
    fn test_hold_push_cant_swap() {
        let mut game = started(&[TetriminoKind::J, TetriminoKind::L, TetriminoKind::Z]);
        assert_eq!(game.hold(), HoldResult::Push);
        assert_eq!(game.active_piece().unwrap().kind(), TetriminoKind::L);
        assert_eq!(game.grid().held().unwrap().id(), PieceId(0));
        assert_eq!(game.phase(), Phase::Falling);

        assert_eq!(game.hold(), HoldResult::Cant);
        assert!(!game.apply(Action::Hold));

        game.hard_drop();
        let z = game.active_piece_id().unwrap();
        assert_eq!(game.hold(), HoldResult::Swap);
        assert_eq!(game.active_piece_id(), Some(PieceId(0)));
        assert_eq!(game.grid().held().unwrap().id(), z);
        assert_eq!(game.piece_steps(), 0);
    }

    #[test]
    fn test_spawn_collision_ends_the_game() {
        let mut game = started(&[TetriminoKind::T, TetriminoKind::T, TetriminoKind::T]);
        assert!(game.soft_drop());
        assert!(game.soft_drop());
        fill_row_except(&mut game, 19, &[0]);

        // the lock scores, then the next T has no room at the spawn anchor
        assert!(game.hard_drop());
        assert!(game.is_game_over());
        let after_lock = game.stats().clone();
        assert_eq!(after_lock.score(), 22);
        assert_eq!(after_lock.completed_pieces(), 1);

        for action in [
            Action::MoveLeft,
            Action::SoftDrop,
            Action::HardDrop,
            Action::RotateLeft,
            Action::Hold,
        ] {
            assert!(!game.apply(action));
        }
        assert!(!game.tick());
        assert!(!game.spawn_next());
        assert_eq!(game.settle(), 0);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.stats(), &after_lock);
        assert_eq!(game.level(), 0);
    }

    #[test]
    fn test_first_spawn_collision_keeps_empty_stats() {
        let mut game = game_with(&[TetriminoKind::T, TetriminoKind::T]);
        fill_row_except(&mut game, 19, &[0]);

        assert!(!game.spawn_next());
        assert!(game.is_game_over());
        assert_eq!(game.stats(), &GameStats::new());
    }

    #[test]
    fn test_stacking_tops_out() {
        let mut game = started(&[]);
        let mut drops = 0;
        while !game.is_game_over() {
            assert!(game.hard_drop());
            drops += 1;
            assert!(drops <= 20);
        }
        assert_eq!(game.lines(), 0);
    }

    #[test]
    fn test_quit() {
        let mut game = started(&[]);
        game.quit();
        assert!(game.is_game_over());
        assert!(!game.apply(Action::MoveRight));
    }
}
