use crossterm::event::Event;
use ratatui::Frame;

use super::Runtime;

/// A terminal application driven by [`Runtime::run`].
pub trait App {
    /// Called once before the first event. Configure tick and frame rates here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles a terminal event (key press, resize, ...).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Called on every tick.
    fn update(&mut self, runtime: &mut Runtime);
}
