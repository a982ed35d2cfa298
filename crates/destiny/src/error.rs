//! Candidate store errors

use helios_ports::MailboxClosed;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DestinyError {
    /// The candidate set is empty; try again later
    #[error("no candidates available")]
    NoCandidates,

    #[error("candidate store stopped: {0}")]
    Closed(#[from] MailboxClosed),
}

pub type Result<T> = std::result::Result<T, DestinyError>;
