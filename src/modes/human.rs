use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{GameConfig, GameController, ScoreStore, Snapshot};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

/// Frame period of the terminal loop; the engine decides when a frame ticks
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Interactive terminal game: frames, keys and drawing around one controller
pub struct HumanMode<S: ScoreStore> {
    controller: GameController<S>,
    snapshots: watch::Receiver<Snapshot>,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Terminal changed under us; draw even without a new snapshot
    needs_redraw: bool,
}

impl<S: ScoreStore> HumanMode<S> {
    pub fn new(config: GameConfig, store: S) -> Result<Self> {
        let controller =
            GameController::new(config, store).context("Invalid game configuration")?;
        let snapshots = controller.subscribe();

        Ok(Self {
            controller,
            snapshots,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            needs_redraw: false,
        })
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

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let started = Instant::now();

        self.draw(terminal)?;

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Frame: let the engine decide whether this is a tick
                _ = frame_timer.tick() => {
                    let now_ms = started.elapsed().as_millis() as u64;
                    self.controller.advance(now_ms);
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            if self.needs_redraw || self.snapshots.has_changed().unwrap_or(false) {
                self.draw(terminal)?;
            }
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.needs_redraw = false;
        let snapshot = self.snapshots.borrow_and_update().clone();
        terminal
            .draw(|frame| self.renderer.render(frame, &snapshot))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let key = match event {
            Event::Key(key) => key,
            Event::Resize(_, _) => {
                self.needs_redraw = true;
                return;
            }
            _ => return,
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::GameAction(action) => self.controller.apply(action),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
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
    use crate::game::{Direction, GameState, MemoryStore};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default(), MemoryStore::with_high_score(4)).unwrap();
        let snap = mode.snapshots.borrow().clone();
        assert_eq!(snap.state, GameState::Ready);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.high_score, 4);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(HumanMode::new(GameConfig::new(2, 2), MemoryStore::new()).is_err());
    }

    #[test]
    fn test_key_presses_reach_controller() {
        let mut mode = HumanMode::new(GameConfig::small(), MemoryStore::new()).unwrap();

        mode.handle_event(key(KeyCode::Down, KeyEventKind::Press));
        mode.controller.tick();
        assert_eq!(mode.controller.snapshot().direction, Direction::Down);

        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Press));
        assert_eq!(mode.controller.state(), GameState::Paused);

        // Releases are ignored
        mode.handle_event(key(KeyCode::Char(' '), KeyEventKind::Release));
        assert_eq!(mode.controller.state(), GameState::Paused);

        mode.handle_event(key(KeyCode::Char('r'), KeyEventKind::Press));
        assert_eq!(mode.controller.state(), GameState::Ready);
        assert!(mode.snapshots.has_changed().unwrap());

        mode.handle_event(key(KeyCode::Char('q'), KeyEventKind::Press));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_game_over_reaches_screen_through_snapshot() {
        let mut mode = HumanMode::new(GameConfig::small(), MemoryStore::new()).unwrap();
        let interval = mode.controller.difficulty().tick_interval_ms();

        // Heading right from the center, the wall is a few ticks away
        for frame in 0..20 {
            mode.controller.advance(frame * interval);
        }

        assert!(mode.snapshots.has_changed().unwrap());
        let snapshot = mode.snapshots.borrow_and_update().clone();
        assert_eq!(snapshot.state, GameState::GameOver);
        assert_eq!(snapshot.high_score, snapshot.score);
    }

    #[test]
    fn test_resize_requests_redraw_while_paused() {
        let mut mode = HumanMode::new(GameConfig::small(), MemoryStore::new()).unwrap();
        mode.controller.start();
        mode.controller.toggle_pause();
        mode.snapshots.borrow_and_update();
        assert!(!mode.needs_redraw);

        mode.handle_event(Event::Resize(120, 40));

        assert!(mode.needs_redraw);
        assert!(!mode.snapshots.has_changed().unwrap());
        assert_eq!(mode.controller.state(), GameState::Paused);
    }
}
