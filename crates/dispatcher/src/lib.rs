//! Helios Dispatcher
//!
//! Many-producers / many-consumers fan-out. Parties subscribe a named
//! endpoint (a bounded queue they read from) under a topic; publishers
//! broadcast a message to every endpoint currently subscribed to that topic.
//!
//! ```text
//!  publisher ──send(msg, "delta")──►┌────────────┐──► endpoint "destiny"
//!  publisher ──send(msg, "delta")──►│ Dispatcher │──► endpoint "auditor"
//!                                   └────────────┘
//! ```
//!
//! The subscription registry is owned by a single worker task, so
//! subscribing while others publish needs no lock. A full endpoint queue
//! blocks delivery (and therefore the publisher); nothing is dropped.

pub mod error;
pub mod router;
pub mod topics;

pub use error::DispatchError;
pub use router::Dispatcher;
pub use topics::Topics;
