use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Politeness gate for one crawl session.
///
/// Each turn waits a fresh random gap in `[min, max]` measured from the end
/// of the previous request. The first turn is free. Sessions own their pacer;
/// nothing is shared across concurrent crawls.
#[derive(Debug, Clone)]
pub struct Pacer {
    min: Duration,
    max: Duration,
    last_done: Option<Instant>,
}

impl Pacer {
    pub fn new(min: Duration, max: Duration) -> Self {
        let max = max.max(min);
        Self { min, max, last_done: None }
    }

    /// Draw the next gap, uniform over the configured interval.
    pub fn next_gap(&self) -> Duration {
        let lo = self.min.as_millis() as u64;
        let hi = self.max.as_millis() as u64;
        if hi <= lo {
            return self.min;
        }
        Duration::from_millis(fastrand::u64(lo..=hi))
    }

    /// Wait for the next turn. Returns `false` if `cancel` fired while waiting.
    pub async fn wait_turn(&mut self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        let Some(prev) = self.last_done else { return true };
        let earliest = prev + self.next_gap();
        if let Some(wait) = earliest.checked_duration_since(Instant::now()) {
            if !wait.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = cancel.cancelled() => return false,
                }
            }
        }
        true
    }

    /// Mark the request of the current turn as finished.
    pub fn finish(&mut self) {
        self.last_done = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_stays_inside_interval() {
        let pacer = Pacer::new(Duration::from_millis(10), Duration::from_millis(20));
        for _ in 0..200 {
            let gap = pacer.next_gap();
            assert!(gap >= Duration::from_millis(10) && gap <= Duration::from_millis(20));
        }
    }

    #[test]
    fn inverted_interval_collapses_to_min() {
        let pacer = Pacer::new(Duration::from_millis(30), Duration::from_millis(5));
        assert_eq!(pacer.next_gap(), Duration::from_millis(30));
    }

    #[tokio::test]
    async fn first_turn_does_not_wait() {
        let mut pacer = Pacer::new(Duration::from_millis(200), Duration::from_millis(300));
        let start = Instant::now();
        assert!(pacer.wait_turn(&CancellationToken::new()).await);
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
