//! Minimal terminal application runtime on top of ratatui and crossterm.

pub use self::{app::App, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
