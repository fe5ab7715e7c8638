use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, interval, sleep};

use crate::game::{ControlAction, GameEngine, GamePhase};
use crate::input::{InputHandler, KeyAction};
use crate::persistence::{self, DataPaths};
use crate::render::{Renderer, ScoreBoard};

/// Keyboard-driven session in the terminal. Ticks follow the engine's
/// current interval; frames are drawn at a fixed rate.
pub struct PlayMode {
    engine: GameEngine,
    renderer: Renderer,
    input_handler: InputHandler,
    paths: DataPaths,
    last_rank: Option<usize>,
}

impl PlayMode {
    pub fn new(engine: GameEngine, paths: DataPaths) -> Self {
        Self {
            engine,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            paths,
            last_rank: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        self.save_all()?;
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The tick deadline is re-armed after every tick since the interval
        // changes with length and effects
        let tick_timer = sleep(self.engine.tick_interval());
        tokio::pin!(tick_timer);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = &mut tick_timer => {
                    self.update_game();
                    tick_timer.as_mut().reset(Instant::now() + self.engine.tick_interval());
                }

                // Render frame
                _ = render_timer.tick() => {
                    let snapshot = self.engine.snapshot();
                    let board = ScoreBoard {
                        high_scores: self.engine.score_state().high_scores(),
                        new_rank: self.last_rank,
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, board);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.engine.submit_action(ControlAction::Quit);
                }
            }

            if self.engine.quit_requested() {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key, self.engine.phase()) {
            KeyAction::Steer(direction) => {
                self.engine.submit_direction(direction);
            }
            KeyAction::Control(action) => {
                if let Some(GamePhase::Playing) = self.engine.submit_action(action) {
                    if matches!(action, ControlAction::NewGame | ControlAction::Restart) {
                        self.last_rank = None;
                    }
                }
            }
            KeyAction::None => {}
        }
    }

    fn update_game(&mut self) {
        let report = self.engine.tick();

        if report.game_over() {
            self.last_rank = report.high_score_rank;
            if report.high_score_rank.is_some() {
                if let Err(err) = self.save_high_scores() {
                    warn!("{:#}", err);
                }
            }
        }
    }

    fn save_high_scores(&self) -> Result<()> {
        persistence::save_high_scores(&self.engine.export_high_scores(), &self.paths.high_scores)
            .context("Failed to save high scores")
    }

    fn save_all(&self) -> Result<()> {
        self.save_high_scores()?;
        persistence::save_settings(&self.engine.export_settings(), &self.paths.settings)
            .context("Failed to save settings")?;
        info!("Saved settings and high scores");
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> PlayMode {
        let engine = GameEngine::new(GameConfig::default(), 7).unwrap();
        let dir = std::env::temp_dir().join(format!("snake_arcade_play_{}", std::process::id()));
        PlayMode::new(engine, DataPaths::in_dir(dir))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_enter_starts_round() {
        let mut mode = mode();
        assert_eq!(mode.engine.phase(), GamePhase::Menu);
        mode.handle_event(key(KeyCode::Enter));
        assert_eq!(mode.engine.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_pause_key_toggles() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        mode.handle_event(key(KeyCode::Char('p')));
        assert_eq!(mode.engine.phase(), GamePhase::Paused);
        mode.handle_event(key(KeyCode::Char('p')));
        assert_eq!(mode.engine.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_steering_reaches_engine() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Enter));
        let head = mode.engine.snake().head();
        mode.handle_event(key(KeyCode::Up));
        mode.update_game();
        assert_eq!(mode.engine.snake().current_direction(), Direction::Up);
        assert_eq!(mode.engine.snake().head(), head.moved_in_direction(Direction::Up));
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.engine.quit_requested());
    }

    #[test]
    fn test_key_release_ignored() {
        let mut mode = mode();
        let mut release = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        mode.handle_event(Event::Key(release));
        assert_eq!(mode.engine.phase(), GamePhase::Menu);
    }
}
