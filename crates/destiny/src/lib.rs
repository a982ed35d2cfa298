//! Helios Destiny - Candidate Store
//!
//! Holds the decaying set of trade candidates ([`Path`](helios_core::Path)s)
//! and the pipelines around it:
//!
//! - **Candidates**: the pure set with random pick and age-based decay
//! - **Destiny**: the actor owning a candidate set behind its mailboxes
//! - **Matcher**: pairs incoming allotments with a random candidate and
//!   publishes the resulting proposal
//! - **Reinserter**: puts promising paths back when their deltas say so
//! - **Ranking**: penalty functions for scoring candidates
//!
//! ## Flow
//!
//! ```text
//!  Allotment ──► Matcher ──get()──► Destiny
//!                   │
//!                   └─ProtoOrder──► Dispatcher("proposal") ──► executor
//!
//!  Dispatcher("delta") ──► Reinserter ──put()──► Destiny
//! ```

pub mod candidates;
pub mod error;
pub mod matcher;
pub mod ranking;
pub mod reinsert;
pub mod store;

pub use candidates::Candidates;
pub use error::{DestinyError, Result};
pub use matcher::{MatchOutcome, Matcher};
pub use ranking::{RankingContext, Scorer, WeightedPenalty, rank};
pub use reinsert::{ReinsertPolicy, Reinserter, ThresholdPolicy};
pub use store::{Destiny, DestinyConfig};
