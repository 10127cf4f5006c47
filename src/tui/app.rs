//! Terminal player state and key handling.
//!
//! Terminal I/O lives in the `greedyviz-tui` binary; everything that can be
//! tested without a terminal lives here.
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | `←` / `h` | previous step |
//! | `→` / `l` | next step |
//! | `space` | play / pause |
//! | `Home` / `End` | first / last step |
//! | `r` | reset |
//! | `g` | new random dataset |
//! | `1` `2` `3` / `Tab` | activity / knapsack / Prim / cycle |
//! | `+` / `-` | faster / slower |
//! | `q` / `Esc` | quit |

use std::time::Duration;

use crossterm::event::KeyCode;

use crate::config::VizConfig;
use crate::demos::{AnySession, DatasetFile};
use crate::engine::{AlgorithmKind, Clock, SystemClock};
use crate::error::VizResult;

/// Interval change per `+` / `-` press.
pub const SPEED_STEP: Duration = Duration::from_millis(100);

/// Upper bound on how long the event loop blocks waiting for input.
pub const MAX_POLL: Duration = Duration::from_millis(250);

/// Application state for the terminal player.
#[derive(Debug)]
pub struct VizApp<C = SystemClock> {
    /// The active session.
    pub session: AnySession<C>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Number of auto-play steps delivered so far.
    pub auto_steps: u64,
}

impl<C: Clock + Clone> VizApp<C> {
    /// Start with a random dataset for `kind`.
    #[must_use]
    pub fn new(kind: AlgorithmKind, config: VizConfig, clock: C) -> Self {
        Self {
            session: AnySession::new(kind, config, clock),
            should_quit: false,
            auto_steps: 0,
        }
    }

    /// Start from a fixed dataset.
    ///
    /// # Errors
    ///
    /// Returns error if the dataset is invalid.
    pub fn from_dataset(file: DatasetFile, config: VizConfig, clock: C) -> VizResult<Self> {
        Ok(Self {
            session: AnySession::from_dataset(file, config, clock)?,
            should_quit: false,
            auto_steps: 0,
        })
    }

    /// Deliver a due auto-play step, if any.
    pub fn update(&mut self) -> bool {
        let fired = self.session.tick();
        if fired {
            self.auto_steps += 1;
        }
        fired
    }

    /// How long the event loop may block before the next auto-play step.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        self.session.time_until_due().map_or(MAX_POLL, |due| due.min(MAX_POLL))
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => {
                let _ = self.session.prev();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let _ = self.session.next();
            }
            KeyCode::Home => {
                let _ = self.session.seek(0);
            }
            KeyCode::End => {
                let _ = self.session.seek_end();
            }
            KeyCode::Char(' ') => self.session.toggle_play(),
            KeyCode::Char('r') => self.session.reset(),
            KeyCode::Char('g') => self.session.regenerate(),
            KeyCode::Char('1') => self.switch(AlgorithmKind::Activity),
            KeyCode::Char('2') => self.switch(AlgorithmKind::Knapsack),
            KeyCode::Char('3') => self.switch(AlgorithmKind::Prim),
            KeyCode::Tab => self.switch(self.session.kind().cycle()),
            KeyCode::Char('+' | '=') => {
                let faster = self.session.interval().saturating_sub(SPEED_STEP);
                self.session.set_interval(faster);
            }
            KeyCode::Char('-') => {
                let slower = self.session.interval().saturating_add(SPEED_STEP);
                self.session.set_interval(slower);
            }
            _ => {}
        }
    }

    fn switch(&mut self, kind: AlgorithmKind) {
        if kind != self.session.kind() {
            self.session.switch_to(kind);
            self.auto_steps = 0;
        }
    }

    /// Check if the app should quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }
}
