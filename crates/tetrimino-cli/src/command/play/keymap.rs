use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tetrimino_engine::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Game(Action),
    Exit,
}

/// Maps a key press to a command. Key releases map to nothing.
pub fn command_for(key: &KeyEvent) -> Option<KeyCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let action = match key.code {
        KeyCode::Left => Action::MoveLeft,
        KeyCode::Right => Action::MoveRight,
        KeyCode::Down => Action::SoftDrop,
        KeyCode::Char(' ') => Action::HardDrop,
        KeyCode::Char('z' | 'Z') => Action::RotateLeft,
        KeyCode::Up | KeyCode::Char('x' | 'X') => Action::RotateRight,
        KeyCode::Char('c' | 'C') => Action::Hold,
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => return Some(KeyCommand::Exit),
        _ => return None,
    };
    Some(KeyCommand::Game(action))
}
