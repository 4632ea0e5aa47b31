//! Main TUI application state and logic

use crate::playback::{PlaybackError, Player};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Delay between automatic steps while playing
const PLAY_TICK: Duration = Duration::from_secs(1);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    State,
    Log,
    Details,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: state -> log -> details)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::State => FocusedPane::Log,
            FocusedPane::Log => FocusedPane::Details,
            FocusedPane::Details => FocusedPane::State,
        }
    }
}

/// The main application state
pub struct App {
    pub player: Player,

    /// Shown as the state pane title
    pub title: String,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub state_scroll: usize,
    pub log_scroll: usize,
    pub details_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(player: Player, title: impl Into<String>) -> Self {
        let now = Instant::now();
        App {
            player,
            title: title.into(),
            focused_pane: FocusedPane::State,
            state_scroll: 0,
            log_scroll: usize::MAX,
            details_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: now,
            last_space_press: now.checked_sub(Duration::from_secs(1)).unwrap_or(now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_TICK {
                self.tick();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// One auto-play step; stops playing at the end
    pub fn tick(&mut self) {
        if self.player.step_forward().is_ok() {
            self.status_message = "Playing...".to_string();
            self.follow_current();
        } else {
            self.is_playing = false;
            self.status_message = "Playback complete".to_string();
        }
        self.last_play_time = Instant::now();
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: State (top) | Log (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let step = self.player.current();

        super::panes::render_state_pane(
            frame,
            left_rows[0],
            &self.title,
            step,
            self.focused_pane == FocusedPane::State,
            &mut self.state_scroll,
        );

        super::panes::render_log_pane(
            frame,
            left_rows[1],
            self.player.steps(),
            self.player.position(),
            self.focused_pane == FocusedPane::Log,
            &mut self.log_scroll,
        );

        super::panes::render_details_pane(
            frame,
            columns[1],
            step,
            self.focused_pane == FocusedPane::Details,
            &mut self.details_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.player.position(),
            self.player.len(),
            self.is_playing,
        );
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).map_or(1, |d| d as usize);
                let stepped = self.player.advance(n);
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.follow_current();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => {
                self.is_playing = false;
                let result = self.player.step_backward().map(|_| ());
                self.report("Stepped backward", result);
            }
            KeyCode::Right => {
                self.is_playing = false;
                let result = self.player.step_forward().map(|_| ());
                self.report("Stepped forward", result);
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play (200ms debounce against key repeat)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        let now = Instant::now();
                        self.last_play_time = now.checked_sub(PLAY_TICK).unwrap_or(now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.player.jump_to_end();
                self.status_message = "Jumped to end".to_string();
                self.follow_current();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.player.rewind_to_start();
                self.status_message = "Jumped to start".to_string();
                self.follow_current();
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::State => &mut self.state_scroll,
            FocusedPane::Log => &mut self.log_scroll,
            FocusedPane::Details => &mut self.details_scroll,
        }
    }

    fn report(&mut self, done: &str, result: Result<(), PlaybackError>) {
        match result {
            Ok(()) => {
                self.status_message = done.to_string();
                self.follow_current();
            }
            Err(e) => {
                self.status_message = format!("Cannot step: {}", e);
            }
        }
    }

    /// Keep the log scrolled to the newest visible step
    fn follow_current(&mut self) {
        self.log_scroll = usize::MAX;
    }
}
