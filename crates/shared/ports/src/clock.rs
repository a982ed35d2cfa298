use helios_core::Timestamp;

/// Port for time abstraction
///
/// Actors that need "now" read it through this trait, so a simulated
/// clock driven by the pulse clock makes them deterministic.
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
