//! Helios Money - Capital Allocator
//!
//! Manages a pool of capital split into discrete, equal spend-units
//! ([`Allotment`](helios_core::Allotment)s):
//!
//! - **Pool**: the pure ledger (allotments, available, total)
//! - **Money**: the actor owning a pool behind its mailboxes
//! - **Accumulator**: collects small returns and converts them into whole
//!   allotments once they add up to one
//!
//! ## Flow
//!
//! ```text
//!  get() ──► Allotment ──► (matched / spent)
//!                               │
//!  put(Allotment) ◄─────────────┘  (unspent capital comes back)
//!
//!  returns ──► Accumulator ──(sum >= unit)──► put(Allotment)
//! ```

pub mod accumulator;
pub mod allocator;
pub mod error;
pub mod pool;

pub use accumulator::Accumulator;
pub use allocator::{Money, MoneyConfig};
pub use error::{MoneyError, Result};
pub use pool::{ALLOTMENT_COUNT, Pool};
