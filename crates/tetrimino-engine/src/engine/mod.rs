//! Turn logic and real-time driving of a game.
//!
//! - [`Game`] - Rules of a single game: spawning, inputs, gravity, locking, clearing
//! - [`GameConfig`] - Tunable rules (speed curve, drop bonuses, countdown, seed)
//! - [`GameStats`] - Score, lines, level
//! - [`PieceQueue`] - 7-bag piece generation
//! - [`GameLoop`] - Real-time driver owning a [`Game`], fed by a [`Clock`] and an [`InputSender`]
//! - [`Renderer`] - Presentation callbacks invoked by the loop
//!
//! # Game Flow
//!
//! 1. The loop counts down, then spawns the first piece
//! 2. A [`Clock`] moves the piece down once per gravity interval
//! 3. The player moves, rotates, holds or drops the piece
//! 4. The landed piece locks, complete rows are cleared, score and speed update
//! 5. The next piece spawns; the game ends when it has no room

pub use self::{
    clock::*, config::*, game::*, game_loop::*, game_stats::*, piece_queue::*, renderer::*,
};

mod clock;
mod config;
mod game;
mod game_loop;
mod game_stats;
mod piece_queue;
mod renderer;
