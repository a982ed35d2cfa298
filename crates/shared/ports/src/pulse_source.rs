use helios_core::Pulse;

use crate::error::PulseSourceError;

/// Port for the precomputed pulse schedule
///
/// Loading is eager and synchronous; a source that cannot be read must
/// fail rather than return a partial schedule.
pub trait PulseSource: Send + Sync {
    /// Every pulse in the inclusive `[start, stop]` range, in any order
    fn load(&self, start: i64, stop: i64) -> Result<Vec<Pulse>, PulseSourceError>;

    /// Source description for logging
    fn describe(&self) -> String {
        "pulse source".to_string()
    }
}
