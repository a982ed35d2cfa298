//! Helios Core Domain
//!
//! Pure domain types exchanged between the Helios actors.
//! This crate contains no async, no I/O, and is 100% unit testable.
//!
//! ## Message payloads
//!
//! ```text
//! Allotment ──┐
//!             ├──► ProtoOrder ──► (sizing) ──► Order
//! Path ───────┘
//!
//! Position ──► Delta ──► (re-insertion / accumulation)
//!
//! Pulse ──► every subscriber, one step at a time
//! ```

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Allotment, Balances, Delta, DeltaKind, Destination, Order, OrderFilter, OrderId, OrderStatus,
    OrderType, Path, Position, PositionId, ProtoOrder, Pulse, Side, TimestampedPath,
};
pub use values::{Cents, Price, Quantity, Symbol, Timestamp};
