use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{Game, TICK_INTERVAL};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

/// Interactive play in the terminal.
///
/// Ticks, key presses and frames are all handled on one task, so the game
/// never sees a heading change or restart in the middle of a tick.
pub struct HumanMode {
    game: Game,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Whether the tick timer is driving the game
    ticking: bool,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            ticking: true,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut terminal = match setup_terminal() {
            Ok(terminal) => terminal,
            Err(err) => {
                // Best effort; the setup error is the one reported
                let _ = execute!(stderr(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(err);
            }
        };

        let result = self.run_game_loop(&mut terminal).await;
        let cleanup = cleanup_terminal(&mut terminal);

        log::info!("Leaving with high score {}", self.game.high_score());
        first_error(result, cleanup)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(TICK_INTERVAL);
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            let mut restarted = false;

            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => restarted = self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                _ = tick_timer.tick(), if self.ticking => {
                    self.update_game();
                }

                _ = render_timer.tick() => {
                    let snapshot = self.game.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if restarted {
                tick_timer.reset();
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Apply one terminal event. Returns true when a new game started and
    /// the tick timer needs restarting.
    fn handle_event(&mut self, event: Event) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => {
                self.game.set_heading(direction);
                false
            }
            KeyAction::Restart => self.restart(),
            KeyAction::Quit => {
                self.should_quit = true;
                false
            }
            KeyAction::None => false,
        }
    }

    fn update_game(&mut self) {
        let result = self.game.tick();
        if result.terminated {
            self.ticking = false;
        }
    }

    fn restart(&mut self) -> bool {
        if !self.game.reset() {
            return false;
        }
        self.ticking = true;
        true
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stderr>>> {
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Restore the terminal, attempting every step even if an earlier one fails
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen");
    let cursor = terminal.show_cursor().context("Failed to show cursor");
    first_error(first_error(raw, screen), cursor)
}

/// Keep the earlier error when both steps fail
fn first_error(first: Result<()>, second: Result<()>) -> Result<()> {
    first.and(second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, Phase};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> HumanMode {
        HumanMode::new(Game::with_seed(GameConfig::default(), 11, 0))
    }

    fn play_until_over(mode: &mut HumanMode) {
        mode.handle_event(key(KeyCode::Up));
        for _ in 0..20 {
            mode.update_game();
        }
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(mode.ticking);
        assert_eq!(mode.game.phase(), Phase::Running);
        assert_eq!(mode.game.snapshot().score, 0);
    }

    #[test]
    fn test_arrow_key_steers() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Down));
        assert_eq!(mode.game.snapshot().heading, Direction::Down);

        mode.handle_event(key(KeyCode::Up));
        assert_eq!(mode.game.snapshot().heading, Direction::Down);
    }

    #[test]
    fn test_game_over_stops_ticking() {
        let mut mode = mode();
        play_until_over(&mut mode);
        assert!(!mode.ticking);
        assert_eq!(mode.game.phase(), Phase::Over);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let mut mode = mode();
        assert!(!mode.handle_event(key(KeyCode::Char('r'))));

        play_until_over(&mut mode);
        assert!(mode.handle_event(key(KeyCode::Char('r'))));
        assert!(mode.ticking);
        assert_eq!(mode.game.phase(), Phase::Running);
    }

    #[test]
    fn test_loop_error_wins_over_cleanup_error() {
        let result = first_error(
            Err(anyhow::anyhow!("draw failed")),
            Err(anyhow::anyhow!("restore failed")),
        );
        assert_eq!(result.unwrap_err().to_string(), "draw failed");

        let result = first_error(Ok(()), Err(anyhow::anyhow!("restore failed")));
        assert_eq!(result.unwrap_err().to_string(), "restore failed");

        assert!(first_error(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }
}
