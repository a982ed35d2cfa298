use chrono::{DateTime, Duration, Utc};
use helios_core::{Pulse, Timestamp};
use helios_ports::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Simulated clock - only advances when explicitly moved
///
/// The pulse clock sets it to each pulse before broadcasting, so every
/// actor reading "now" during a step sees the same simulated time.
pub struct SimClock {
    /// Current simulation time in epoch milliseconds
    millis: AtomicI64,
}

impl SimClock {
    /// Create a simulated clock starting at the given epoch milliseconds
    pub fn new(initial_millis: i64) -> Arc<Self> {
        Arc::new(Self {
            millis: AtomicI64::new(initial_millis),
        })
    }

    /// Create a simulated clock starting at a timestamp
    pub fn starting_at(initial_time: Timestamp) -> Arc<Self> {
        Self::new(initial_time.timestamp_millis())
    }

    /// Advance the simulated time by a specified duration
    pub fn advance(&self, duration: Duration) {
        self.millis
            .fetch_add(duration.num_milliseconds(), Ordering::SeqCst);
    }

    /// Explicitly set the simulation time in epoch milliseconds
    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Move to a pulse; the terminal marker leaves the time unchanged
    pub fn set_pulse(&self, pulse: Pulse) {
        if !pulse.is_terminal() {
            self.set_millis(pulse.millis());
        }
    }

    pub fn millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

impl Clock for SimClock {
    fn now(&self) -> Timestamp {
        DateTime::from_timestamp_millis(self.millis()).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    fn name(&self) -> &str {
        "SimClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sim_clock_is_fixed() {
        let clock = SimClock::new(1_000);
        let time1 = clock.now();
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
        let time2 = clock.now();

        // Simulated time should not advance automatically
        assert_eq!(time1, time2);

        clock.advance(Duration::seconds(5));
        assert_eq!(clock.now() - time1, Duration::seconds(5));
    }

    #[test]
    fn test_set_pulse_ignores_terminal() {
        let clock = SimClock::new(0);
        clock.set_pulse(Pulse(86_400_000));
        assert_eq!(clock.millis(), 86_400_000);
        clock.set_pulse(Pulse::TERMINAL);
        assert_eq!(clock.millis(), 86_400_000);
    }
}
