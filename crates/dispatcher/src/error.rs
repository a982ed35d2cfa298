use helios_ports::MailboxClosed;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("dispatcher stopped: {0}")]
    Closed(#[from] MailboxClosed),
}
