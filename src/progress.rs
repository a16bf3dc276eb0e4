//! Advisory progress reporting for long-running loops.
//!
//! The contract is deliberately minimal: a status string plus a percentage
//! that never decreases within a run. Observers are advisory only; the
//! numeric engines produce identical results whether or not anyone listens.

/// Receives periodic progress events from a long computation.
pub trait ProgressObserver {
    /// `percent` is in [0, 100] and non-decreasing within one run.
    fn on_progress(&mut self, percent: f64, status: &str);
}

/// Observer that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&mut self, _percent: f64, _status: &str) {}
}

/// Observer that records events, for tests and debugging.
#[derive(Debug, Clone, Default)]
pub struct RecordingProgress {
    pub events: Vec<(f64, String)>,
}

impl ProgressObserver for RecordingProgress {
    fn on_progress(&mut self, percent: f64, status: &str) {
        self.events.push((percent, status.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_observer_keeps_events() {
        let mut obs = RecordingProgress::default();
        obs.on_progress(10.0, "warming up");
        obs.on_progress(100.0, "done");
        assert_eq!(obs.events.len(), 2);
        assert_eq!(obs.events[1].0, 100.0);
    }
}
