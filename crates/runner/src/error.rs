use helios_clock::ClockError;
use helios_destiny::DestinyError;
use helios_dispatcher::DispatchError;
use helios_money::MoneyError;
use helios_ports::{AdapterError, MailboxClosed};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pulse clock error: {0}")]
    Clock(#[from] ClockError),

    #[error("Brokerage error: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Capital allocator error: {0}")]
    Money(#[from] MoneyError),

    #[error("Candidate store error: {0}")]
    Destiny(#[from] DestinyError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Mailbox closed")]
    Closed(#[from] MailboxClosed),

    #[error("Task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
