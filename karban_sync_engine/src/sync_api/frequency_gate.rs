use chrono::{DateTime, Duration, Utc};

/// Decides whether a scheduled run is due. The gate holds no state; the caller reads and advances the checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyGate {
    frequency: Duration,
}

impl FrequencyGate {
    pub fn new(frequency: Duration) -> Self {
        Self { frequency }
    }

    /// A run is due if there has never been one, or if at least one full interval has passed since the last one.
    pub fn is_due(&self, last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_run {
            None => true,
            Some(last) => now - last >= self.frequency,
        }
    }
}
