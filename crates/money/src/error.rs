//! Capital allocator errors

use helios_ports::MailboxClosed;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// No allotments left; try again later
    #[error("no allotments available")]
    EmptyPool,

    #[error("capital allocator stopped: {0}")]
    Closed(#[from] MailboxClosed),
}

pub type Result<T> = std::result::Result<T, MoneyError>;
