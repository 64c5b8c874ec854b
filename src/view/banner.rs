use std::time::{Duration, Instant};

/// What kind of notice is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Success,
    Error,
}

/// The message area shown above a screen. One slot: posting anything
/// replaces whatever was there, success messages clear themselves after a
/// fixed interval, and error messages persist until the next action.
#[derive(Debug)]
pub struct StatusBanner {
    ttl: Duration,
    current: Option<(Notice, String, Instant)>,
}

impl StatusBanner {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn success(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some((Notice::Success, text.into(), now));
    }

    pub fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some((Notice::Error, text.into(), now));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The message to display right now, expiring a stale success as a
    /// side effect.
    pub fn current(&mut self, now: Instant) -> Option<(Notice, &str)> {
        if let Some((Notice::Success, _, posted_at)) = &self.current {
            if now.duration_since(*posted_at) >= self.ttl {
                self.current = None;
            }
        }
        self.current
            .as_ref()
            .map(|(notice, text, _)| (*notice, text.as_str()))
    }
}
