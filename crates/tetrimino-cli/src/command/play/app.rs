use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::{App, Runtime};

use super::screen::PlayScreen;

const FPS: u64 = 60;

#[derive(Debug)]
pub struct PlayApp {
    screen: PlayScreen,
}

impl PlayApp {
    pub fn new(screen: PlayScreen) -> Self {
        Self { screen }
    }
}

impl App for PlayApp {
    #[expect(clippy::cast_precision_loss)]
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_frame_rate(FPS as f64);
        runtime.set_tick_rate(Some(FPS as f64));
    }

    fn should_exit(&self) -> bool {
        self.screen.is_exiting()
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        self.screen.handle_event(&event);
    }

    fn draw(&self, frame: &mut Frame) {
        self.screen.draw(frame);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        self.screen.update();
    }
}
