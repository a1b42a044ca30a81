//! Timing of the inner part of a chain.

use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Measures how long the layers inside one stage take for one invocation.
#[derive(Debug)]
pub struct SpanTimer {
    stage: String,
    invocation_id: Uuid,
    started: Instant,
}

impl SpanTimer {
    /// Starts timing `stage` for the invocation `invocation_id`.
    #[must_use]
    pub fn start(stage: impl Into<String>, invocation_id: Uuid) -> Self {
        Self {
            stage: stage.into(),
            invocation_id,
            started: Instant::now(),
        }
    }

    /// Returns the stage being timed.
    #[must_use]
    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Returns the time since the timer started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stops the timer, logs the measurement, and returns it in milliseconds.
    pub fn finish(self, success: bool) -> f64 {
        let elapsed_ms = self.elapsed().as_secs_f64() * 1000.0;
        debug!(
            stage = %self.stage,
            invocation_id = %self.invocation_id,
            elapsed_ms,
            success,
            "inner chain finished"
        );
        elapsed_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reports_elapsed_ms() {
        let timer = SpanTimer::start("timing", Uuid::new_v4());
        assert_eq!(timer.stage(), "timing");

        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.elapsed() >= Duration::from_millis(10));
        assert!(timer.finish(true) >= 10.0);
    }
}
