//! Debounced search input.
//!
//! Keystrokes update the text immediately; the query used for filtering only
//! changes once input has been quiet for the configured delay.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct SearchBox {
    delay: Duration,
    text: String,
    applied: String,
    last_input: Option<Instant>,
}

impl SearchBox {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            text: String::new(),
            applied: String::new(),
            last_input: None,
        }
    }

    pub fn input(&mut self, text: &str, now: Instant) {
        self.text = text.to_string();
        self.last_input = Some(now);
    }

    /// What the user has typed so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The query currently applied to the list.
    pub fn query(&self) -> &str {
        &self.applied
    }

    pub fn is_pending(&self) -> bool {
        self.last_input.is_some()
    }

    /// Apply pending input once the delay has passed since the last keystroke.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        let last = self.last_input?;
        if now.saturating_duration_since(last) < self.delay {
            return None;
        }
        self.apply();
        Some(&self.applied)
    }

    /// Apply pending input right away (Enter key).
    pub fn flush(&mut self) -> &str {
        if self.last_input.is_some() {
            self.apply();
        }
        &self.applied
    }

    /// Wait out the quiet period, then apply.
    pub async fn settle(&mut self) -> &str {
        if let Some(last) = self.last_input {
            tokio::time::sleep_until(last + self.delay).await;
            self.apply();
        }
        &self.applied
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.applied.clear();
        self.last_input = None;
    }

    fn apply(&mut self) {
        self.last_input = None;
        self.applied = self.text.clone();
        tracing::trace!(query = %self.applied, "search query applied");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_quiet_input_is_applied() {
        let start = Instant::now();
        let mut search = SearchBox::new(Duration::from_millis(300));

        search.input("c", start);
        search.input("cr", start + Duration::from_millis(100));
        search.input("cruz", start + Duration::from_millis(200));

        assert_eq!(search.poll(start + Duration::from_millis(400)), None);
        assert_eq!(search.query(), "");
        assert_eq!(search.text(), "cruz");

        assert_eq!(search.poll(start + Duration::from_millis(500)), Some("cruz"));
        assert!(!search.is_pending());
        assert_eq!(search.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_flush_applies_immediately() {
        let mut search = SearchBox::new(Duration::from_millis(300));
        search.input("wash", Instant::now());
        assert_eq!(search.flush(), "wash");

        search.clear();
        assert_eq!(search.query(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_for_delay() {
        let mut search = SearchBox::new(Duration::from_millis(300));
        let start = Instant::now();
        search.input("bleach", start);

        assert_eq!(search.settle().await, "bleach");
        assert!(Instant::now() >= start + Duration::from_millis(300));
    }
}
