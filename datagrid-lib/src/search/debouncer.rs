//! Trailing-edge, change-gated debounce.
//!
//! The debouncer never sleeps and never spawns anything. It records a
//! deadline on each keystroke; whoever drives it (an event loop, or
//! [`SearchTask`](super::SearchTask)) polls it once that deadline passes.

use std::time::{Duration, Instant};

use log::{debug, trace};

/// Turns raw keystrokes into committed search terms.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    raw: String,
    committed: String,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            raw: String::new(),
            committed: String::new(),
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The text as typed so far.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The last committed term (trimmed).
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// When the pending commit check is due, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record a keystroke.
    ///
    /// Replaces the raw text and restarts the quiet period. Identical text
    /// leaves the pending deadline untouched.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        if text == self.raw {
            return;
        }
        trace!("Search input {:?}", text);
        self.raw = text;
        self.deadline = Some(now + self.delay);
    }

    /// Commit the settled value if the quiet period has elapsed.
    ///
    /// Returns the newly committed term, or `None` when nothing is due or
    /// the settled value equals the last commit.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if deadline <= now => self.deadline = None,
            _ => return None,
        }

        let settled = self.raw.trim();
        if settled == self.committed {
            trace!("Search settled on unchanged term {:?}", settled);
            return None;
        }

        self.committed = settled.to_string();
        debug!("Search committed {:?}", self.committed);
        Some(self.committed.clone())
    }

    /// Drop the pending deadline, keeping the text.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Clear text, committed term and pending deadline.
    pub fn reset(&mut self) {
        self.raw.clear();
        self.committed.clear();
        self.deadline = None;
    }
}
