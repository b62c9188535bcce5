//! Quiescence window for rapid user toggles.

use std::time::{Duration, Instant};

/// Swallows repeat events inside a fixed window so rapid clicking produces
/// one search round trip, not one per click.
///
/// The first event fires; each suppressed event extends the window, so a
/// burst only fires again once it has gone quiet for the full window.
#[derive(Debug)]
pub struct ToggleDebouncer {
    window: Duration,
    last_seen: Option<Instant>,
}

impl ToggleDebouncer {
    pub fn new(window_ms: u64) -> Self {
        ToggleDebouncer {
            window: Duration::from_millis(window_ms),
            last_seen: None,
        }
    }

    /// Returns true when the event should trigger a round trip.
    pub fn should_fire(&mut self) -> bool {
        let now = Instant::now();
        let fire = match self.last_seen {
            Some(prev) => now.duration_since(prev) >= self.window,
            None => true,
        };
        self.last_seen = Some(now);
        fire
    }
}
