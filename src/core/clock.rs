//! Time source and sleep capability used for all pacing

use async_trait::async_trait;
use std::time::Duration;

/// Clock + sleep capability.
///
/// Every delay in the engine (settle time, waypoint pacing, holds) goes
/// through this trait so a virtual clock can stand in under test.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic time elapsed since the clock was created
    fn now(&self) -> Duration;

    /// Suspend for `duration`. Not cancellable once entered.
    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by tokio timers
pub struct TokioClock {
    start: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            start: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_advances_with_sleep() {
        let clock = TokioClock::new();
        clock.sleep(Duration::from_millis(250)).await;
        assert!(clock.now() >= Duration::from_millis(250));
    }
}
