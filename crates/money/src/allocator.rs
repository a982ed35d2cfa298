//! Capital allocator actor
//!
//! One worker owns the [`Pool`]. It waits on three mailboxes at once:
//!
//! - `puts`: allotments coming back (fire-and-optionally-wait)
//! - `queries`: request/reply reads, including `get`
//! - `upkeep`: re-allot and shutdown (always acknowledged)

use helios_core::{Allotment, Cents};
use helios_ports::mailbox::{self, Ack, Put, Reply};
use helios_ports::{DEFAULT_MAILBOX_CAPACITY, MailboxClosed};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{MoneyError, Result};
use crate::pool::Pool;

/// Capital allocator configuration
#[derive(Debug, Clone)]
pub struct MoneyConfig {
    /// Starting cash in minor units
    pub cash: Cents,
    /// Capacity of each mailbox
    pub mailbox_capacity: usize,
}

impl Default for MoneyConfig {
    fn default() -> Self {
        Self {
            cash: 0,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

enum Query {
    Get(Reply<Result<Allotment>>),
    Available(Reply<Cents>),
    Total(Reply<Cents>),
    Len(Reply<usize>),
    UnitSize(Reply<Option<Cents>>),
}

enum Upkeep {
    ReAllot(Ack),
    Shutdown(Ack),
}

/// Handle to a running capital allocator
#[derive(Clone)]
pub struct Money {
    puts: mpsc::Sender<Put<Allotment>>,
    queries: mpsc::Sender<Query>,
    upkeep: mpsc::Sender<Upkeep>,
}

impl Money {
    /// Spawn an allocator holding `cash`, pre-partitioned into allotments
    pub fn spawn(config: MoneyConfig) -> (Self, JoinHandle<()>) {
        let capacity = config.mailbox_capacity.max(1);
        let (puts_tx, puts_rx) = mpsc::channel(capacity);
        let (queries_tx, queries_rx) = mpsc::channel(capacity);
        let (upkeep_tx, upkeep_rx) = mpsc::channel(capacity);

        let pool = Pool::new(config.cash);
        log::info!(
            "[Money] Starting with {} cents in {} allotments",
            pool.total(),
            pool.len()
        );

        let worker = Allocator {
            pool,
            puts_rx,
            queries_rx,
            upkeep_rx,
            shutdown_acks: Vec::new(),
        };
        let handle = tokio::spawn(worker.run());

        (
            Self {
                puts: puts_tx,
                queries: queries_tx,
                upkeep: upkeep_tx,
            },
            handle,
        )
    }

    /// Take one allotment, or [`MoneyError::EmptyPool`]
    pub async fn get(&self) -> Result<Allotment> {
        mailbox::request(&self.queries, Query::Get).await?
    }

    /// Return an allotment to the pool
    ///
    /// The zero allotment is dropped. With `block`, returns once applied.
    pub async fn put(&self, allotment: Allotment, block: bool) -> Result<()> {
        let (put, done) = Put::new(allotment, block);
        self.puts.send(put).await.map_err(|_| MailboxClosed)?;
        mailbox::wait_for(done).await?;
        Ok(())
    }

    /// Re-partition available capital into fresh equal allotments
    pub async fn reallot(&self) -> Result<()> {
        mailbox::request(&self.upkeep, Upkeep::ReAllot).await?;
        Ok(())
    }

    /// Capital not currently handed out
    pub async fn available(&self) -> Result<Cents> {
        Ok(mailbox::request(&self.queries, Query::Available).await?)
    }

    /// Size of the book
    pub async fn total(&self) -> Result<Cents> {
        Ok(mailbox::request(&self.queries, Query::Total).await?)
    }

    /// Allotments on hand
    pub async fn len(&self) -> Result<usize> {
        Ok(mailbox::request(&self.queries, Query::Len).await?)
    }

    /// Amount an inflow should be converted into (see [`Pool::unit_size`])
    pub async fn unit_size(&self) -> Result<Option<Cents>> {
        Ok(mailbox::request(&self.queries, Query::UnitSize).await?)
    }

    /// Stop the allocator after it has served what it already accepted
    pub async fn shutdown(&self) -> Result<()> {
        mailbox::request(&self.upkeep, Upkeep::Shutdown).await?;
        Ok(())
    }
}

/// The worker owning the pool
struct Allocator {
    pool: Pool,
    puts_rx: mpsc::Receiver<Put<Allotment>>,
    queries_rx: mpsc::Receiver<Query>,
    upkeep_rx: mpsc::Receiver<Upkeep>,
    shutdown_acks: Vec<Ack>,
}

impl Allocator {
    async fn run(mut self) {
        loop {
            tokio::select! {
                Some(put) = self.puts_rx.recv() => self.handle_put(put),
                Some(query) = self.queries_rx.recv() => self.handle_query(query),
                Some(upkeep) = self.upkeep_rx.recv() => self.handle_upkeep(upkeep),
                else => break,
            }
        }

        for ack in self.shutdown_acks.drain(..) {
            let _ = ack.send(());
        }
        log::info!(
            "[Money] Stopped with {} available of {} total",
            self.pool.available(),
            self.pool.total()
        );
    }

    fn handle_put(&mut self, put: Put<Allotment>) {
        let (allotment, ack) = put.into_parts();
        if !self.pool.put(allotment) {
            log::debug!("[Money] Ignoring zero allotment");
        }
        mailbox::acknowledge(ack);
    }

    fn handle_query(&mut self, query: Query) {
        match query {
            Query::Get(reply) => {
                let result = self.pool.get();
                if let Ok(allotment) = &result {
                    log::trace!(
                        "[Money] Handed out {} cents, {} available",
                        allotment.amount,
                        self.pool.available()
                    );
                }
                let _ = reply.send(result);
            }
            Query::Available(reply) => {
                let _ = reply.send(self.pool.available());
            }
            Query::Total(reply) => {
                let _ = reply.send(self.pool.total());
            }
            Query::Len(reply) => {
                let _ = reply.send(self.pool.len());
            }
            Query::UnitSize(reply) => {
                let _ = reply.send(self.pool.unit_size());
            }
        }
    }

    fn handle_upkeep(&mut self, upkeep: Upkeep) {
        match upkeep {
            Upkeep::ReAllot(ack) => {
                self.pool.reallot();
                log::debug!(
                    "[Money] Re-allotted {} available into {} allotments",
                    self.pool.available(),
                    self.pool.len()
                );
                let _ = ack.send(());
            }
            Upkeep::Shutdown(ack) => {
                self.shutdown_acks.push(ack);
                self.puts_rx.close();
                self.queries_rx.close();
                self.upkeep_rx.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_with(cash: Cents) -> Money {
        let (money, _handle) = Money::spawn(MoneyConfig {
            cash,
            ..Default::default()
        });
        money
    }

    #[tokio::test]
    async fn test_get_reduces_available() {
        let money = spawn_with(100_000);
        let allotment = money.get().await.unwrap();
        assert_eq!(allotment.amount, 1_000);
        assert_eq!(money.available().await.unwrap(), 99_000);
        assert_eq!(money.len().await.unwrap(), 99);
    }

    #[tokio::test]
    async fn test_blocking_put_is_applied() {
        let money = spawn_with(100_000);
        money.put(Allotment::new(2_500), true).await.unwrap();
        assert_eq!(money.available().await.unwrap(), 102_500);
        assert_eq!(money.total().await.unwrap(), 102_500);
    }

    #[tokio::test]
    async fn test_zero_put_ignored() {
        let money = spawn_with(100_000);
        money.put(Allotment::ZERO, true).await.unwrap();
        assert_eq!(money.len().await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_empty_pool_error() {
        let money = spawn_with(0);
        assert_eq!(money.get().await, Err(MoneyError::EmptyPool));
    }

    #[tokio::test]
    async fn test_reallot_always_hundred_units() {
        let money = spawn_with(100_000);
        for _ in 0..10 {
            money.get().await.unwrap();
        }
        money.put(Allotment::new(123), true).await.unwrap();
        money.reallot().await.unwrap();

        assert_eq!(money.len().await.unwrap(), 100);
        assert_eq!(money.unit_size().await.unwrap(), Some(901));
    }

    #[tokio::test]
    async fn test_shutdown_closes_mailboxes() {
        let (money, handle) = Money::spawn(MoneyConfig {
            cash: 10_000,
            ..Default::default()
        });
        money.shutdown().await.unwrap();
        handle.await.unwrap();
        assert_eq!(
            money.get().await,
            Err(MoneyError::Closed(MailboxClosed))
        );
    }
}
