//! Mailbox primitives shared by every actor
//!
//! An actor owns its state inside one spawned task and is reached only
//! through bounded `mpsc` queues. Two request shapes recur:
//!
//! - **Put**: a payload plus an optional [`Ack`]. When present, the caller
//!   awaits the ack and knows the mutation has been applied.
//! - **Get**: the caller sends a [`Reply`] handle and awaits the answer.
//!
//! Maintenance requests (decay, re-allot, shutdown) carry an [`Ack`] and
//! follow the Put-with-wait shape.

use thiserror::Error;
use tokio::sync::oneshot;

/// Capacity used for actor mailboxes unless configured otherwise
pub const DEFAULT_MAILBOX_CAPACITY: usize = 64;

/// Completion signal sent by a worker once a request has been applied
pub type Ack = oneshot::Sender<()>;

/// Reply handle for request/reply queries
pub type Reply<T> = oneshot::Sender<T>;

/// The owning worker has stopped and can no longer serve requests
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("actor mailbox closed")]
pub struct MailboxClosed;

/// Fire-and-optionally-wait request
#[derive(Debug)]
pub struct Put<T> {
    pub payload: T,
    pub ack: Option<Ack>,
}

impl<T> Put<T> {
    /// Build a put; when `block` is true also return the receiver to await
    pub fn new(payload: T, block: bool) -> (Self, Option<oneshot::Receiver<()>>) {
        if block {
            let (tx, rx) = oneshot::channel();
            (
                Self {
                    payload,
                    ack: Some(tx),
                },
                Some(rx),
            )
        } else {
            (Self { payload, ack: None }, None)
        }
    }

    /// Split into payload and ack handle (worker side)
    pub fn into_parts(self) -> (T, Option<Ack>) {
        (self.payload, self.ack)
    }
}

/// Signal completion if the caller asked to wait
///
/// A caller that has stopped waiting is not an error.
pub fn acknowledge(ack: Option<Ack>) {
    if let Some(tx) = ack {
        let _ = tx.send(());
    }
}

/// Await an optional acknowledgment (caller side)
pub async fn wait_for(ack: Option<oneshot::Receiver<()>>) -> Result<(), MailboxClosed> {
    match ack {
        Some(rx) => rx.await.map_err(|_| MailboxClosed),
        None => Ok(()),
    }
}

/// Send a request built around a fresh reply handle and await the answer
pub async fn request<Req, T>(
    mailbox: &tokio::sync::mpsc::Sender<Req>,
    build: impl FnOnce(Reply<T>) -> Req,
) -> Result<T, MailboxClosed> {
    let (tx, rx) = oneshot::channel();
    mailbox.send(build(tx)).await.map_err(|_| MailboxClosed)?;
    rx.await.map_err(|_| MailboxClosed)
}
