use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{ControlAction, Direction, GamePhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    Control(ControlAction),
    None,
}

/// Maps key presses to engine requests. Some keys mean different things
/// depending on the phase the game is in.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, phase: GamePhase) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Control(ControlAction::Quit);
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Steer(Direction::Up),
            KeyCode::Down => KeyAction::Steer(Direction::Down),
            KeyCode::Left => KeyAction::Steer(Direction::Left),
            KeyCode::Right => KeyAction::Steer(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Steer(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Steer(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Steer(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Steer(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                KeyAction::Control(ControlAction::Quit)
            }
            KeyCode::Char('p') | KeyCode::Char('P') => match phase {
                GamePhase::Paused => KeyAction::Control(ControlAction::Resume),
                _ => KeyAction::Control(ControlAction::Pause),
            },
            KeyCode::Char(' ') => match phase {
                GamePhase::Playing => KeyAction::Control(ControlAction::Pause),
                GamePhase::Paused => KeyAction::Control(ControlAction::Resume),
                _ => KeyAction::None,
            },
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('N') => match phase {
                GamePhase::GameOver => KeyAction::Control(ControlAction::Restart),
                _ => KeyAction::Control(ControlAction::NewGame),
            },
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Control(ControlAction::Restart),
            KeyCode::Char('m') | KeyCode::Char('M') => KeyAction::Control(ControlAction::ToMenu),

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, phase: GamePhase) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), phase)
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(press(KeyCode::Up, GamePhase::Playing), KeyAction::Steer(Direction::Up));
        assert_eq!(press(KeyCode::Down, GamePhase::Playing), KeyAction::Steer(Direction::Down));
        assert_eq!(press(KeyCode::Left, GamePhase::Playing), KeyAction::Steer(Direction::Left));
        assert_eq!(press(KeyCode::Right, GamePhase::Playing), KeyAction::Steer(Direction::Right));
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(press(KeyCode::Char('w'), GamePhase::Playing), KeyAction::Steer(Direction::Up));
        assert_eq!(press(KeyCode::Char('a'), GamePhase::Playing), KeyAction::Steer(Direction::Left));
        assert_eq!(press(KeyCode::Char('s'), GamePhase::Playing), KeyAction::Steer(Direction::Down));
        assert_eq!(press(KeyCode::Char('D'), GamePhase::Playing), KeyAction::Steer(Direction::Right));
    }

    #[test]
    fn test_pause_toggles() {
        assert_eq!(
            press(KeyCode::Char('p'), GamePhase::Playing),
            KeyAction::Control(ControlAction::Pause)
        );
        assert_eq!(
            press(KeyCode::Char('p'), GamePhase::Paused),
            KeyAction::Control(ControlAction::Resume)
        );
        assert_eq!(
            press(KeyCode::Char(' '), GamePhase::Paused),
            KeyAction::Control(ControlAction::Resume)
        );
        assert_eq!(press(KeyCode::Char(' '), GamePhase::Menu), KeyAction::None);
    }

    #[test]
    fn test_enter_depends_on_phase() {
        assert_eq!(
            press(KeyCode::Enter, GamePhase::Menu),
            KeyAction::Control(ControlAction::NewGame)
        );
        assert_eq!(
            press(KeyCode::Enter, GamePhase::GameOver),
            KeyAction::Control(ControlAction::Restart)
        );
    }

    #[test]
    fn test_quit_keys() {
        let quit = KeyAction::Control(ControlAction::Quit);
        assert_eq!(press(KeyCode::Char('q'), GamePhase::Menu), quit);
        assert_eq!(press(KeyCode::Esc, GamePhase::Playing), quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(InputHandler::new().handle_key_event(ctrl_c, GamePhase::Paused), quit);
    }

    #[test]
    fn test_menu_and_restart_keys() {
        assert_eq!(
            press(KeyCode::Char('m'), GamePhase::GameOver),
            KeyAction::Control(ControlAction::ToMenu)
        );
        assert_eq!(
            press(KeyCode::Char('R'), GamePhase::GameOver),
            KeyAction::Control(ControlAction::Restart)
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(press(KeyCode::Char('x'), GamePhase::Playing), KeyAction::None);
    }
}
