//! Helios Ports
//!
//! Port definitions (traits) for the Helios engine.
//! These define the boundaries between the coordination core and the
//! collaborators it treats as opaque capabilities (brokerage adapters,
//! pulse sources, order sizing), plus the mailbox primitives every actor
//! is built from.

mod adapter;
mod clock;
mod error;
pub mod mailbox;
mod pulse_source;
mod sizer;

pub use adapter::Adapter;
pub use clock::Clock;
pub use error::{AdapterError, AdapterResult, PulseSourceError, SizingError};
pub use mailbox::{Ack, DEFAULT_MAILBOX_CAPACITY, MailboxClosed, Put, Reply};
pub use pulse_source::PulseSource;
pub use sizer::Sizer;
