//! Helios Clock Infrastructure
//!
//! Provides time abstractions for pulse-driven simulation:
//!
//! - [`SimClock`]: simulated time, moved explicitly (or by the pulse clock)
//! - [`Pulsar`]: the synchronized pulse clock that drives a simulation in
//!   lockstep
//!
//! ## Pulse barrier
//!
//! ```text
//!            pulse N                    ack N
//! Pulsar ──────────────► subscriber A ─────────┐
//!        ──────────────► subscriber B ─────────┤
//!        ──────────────► subscriber C ─────────┤
//!                                              ▼
//!                          all N acks in ──► pulse N+1
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use helios_clock::{DirectorySource, Pulsar, SimClock};
//!
//! let clock = SimClock::new(0);
//! let source = DirectorySource::new("data/pulses");
//! let mut pulsar = Pulsar::new(&source, start, stop)?.with_clock(clock.clone());
//!
//! let mut sub = pulsar.subscribe("trader");
//! tokio::spawn(async move {
//!     while let Some(pulse) = sub.next().await {
//!         // ... one simulation step ...
//!         sub.ack().await.ok();
//!         if pulse.is_terminal() { break; }
//!     }
//! });
//!
//! pulsar.start().await?;
//! ```

mod pulsar;
mod sim;
mod source;

pub use pulsar::{ClockError, PulseReport, PulseSubscription, Pulsar, PulsarState};
pub use sim::SimClock;
pub use source::{DirectorySource, StaticSource};

// Re-export the Clock trait for convenience
pub use helios_ports::Clock;
