use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One discrete simulated time step, in milliseconds since the epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pulse(pub i64);

impl Pulse {
    /// Marker broadcast after the last pulse of a run
    pub const TERMINAL: Pulse = Pulse(-1);

    pub fn is_terminal(&self) -> bool {
        *self == Self::TERMINAL
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Pulse as a UTC timestamp (`None` for the terminal marker)
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if self.is_terminal() {
            return None;
        }
        DateTime::from_timestamp_millis(self.0)
    }
}

impl std::fmt::Display for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_terminal() {
            write!(f, "terminal")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
