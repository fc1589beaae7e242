use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Difficulty, Direction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    Quit,
    None,
}

/// Maps terminal key presses to game actions.
///
/// Nothing is filtered here; the controller decides what is legal.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let action = match key.code {
            // Movement - Arrow keys
            KeyCode::Up => Action::Move(Direction::Up),
            KeyCode::Down => Action::Move(Direction::Down),
            KeyCode::Left => Action::Move(Direction::Left),
            KeyCode::Right => Action::Move(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => Action::Move(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => Action::Move(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => Action::Move(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => Action::Move(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => Action::TogglePause,
            KeyCode::Char('r') | KeyCode::Char('R') => Action::Restart,
            KeyCode::Char('1') => Action::SetDifficulty(Difficulty::Easy),
            KeyCode::Char('2') => Action::SetDifficulty(Difficulty::Medium),
            KeyCode::Char('3') => Action::SetDifficulty(Difficulty::Hard),
            KeyCode::Tab => Action::CycleDifficulty,

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return KeyAction::Quit,
            _ => return KeyAction::None,
        };

        KeyAction::GameAction(action)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
