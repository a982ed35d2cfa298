//! Helios Runner - Pulse-Driven Trading Simulation
//!
//! Orchestrates the actors into a deterministic simulation:
//!
//! - **Config**: JSON simulation settings
//! - **Paper**: in-memory brokerage adapter
//! - **Sizer**: whole-unit order sizing
//! - **Trader**: the agent stepping once per pulse
//! - **Simulation**: wiring and teardown of all components
//!
//! ## Architecture
//!
//! ```text
//!                   ┌─────────────────┐
//!                   │     Pulsar      │──set──► SimClock
//!                   └────────┬────────┘
//!                            │ pulse / ack
//!                            ▼
//! ┌────────────────────────────────────────────────────────┐
//! │                        TRADER                          │
//! │                                                        │
//! │  Money ──allotment──► Matcher ◄──path── Destiny        │
//! │                          │                 ▲           │
//! │                          │ proposal        │ re-insert │
//! │                          ▼                 │           │
//! │              Dispatcher("proposal")    Reinserter      │
//! │                          │                 ▲           │
//! │                          ▼                 │           │
//! │                  Sizer ──► Paper      Dispatcher("delta")
//! │                              │             ▲           │
//! │                              └──positions──┘           │
//! │                                                        │
//! │  proceeds ──► Accumulator ──allotments──► Money        │
//! └────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod paper;
pub mod simulation;
pub mod sizer;
pub mod trader;

pub use config::{ConfigError, MarkConfig, SimulationConfig};
pub use error::{Result, RunnerError};
pub use paper::PaperAdapter;
pub use simulation::{SimulationResults, TradingSimulation};
pub use sizer::WholeUnitSizer;
pub use trader::{Trader, TraderConfig, TraderLinks, TraderReport};
