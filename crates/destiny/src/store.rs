//! Candidate store actor
//!
//! One worker owns the [`Candidates`] set. Reads and writes arrive on
//! three mailboxes serviced by a single `select!` loop, so a decay sweep
//! can never interleave with a put or a get.

use chrono::Duration;
use helios_core::{Path, TimestampedPath};
use helios_ports::mailbox::{self, Ack, Put, Reply};
use helios_ports::{Clock, DEFAULT_MAILBOX_CAPACITY, MailboxClosed};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::candidates::Candidates;
use crate::error::Result;

/// Candidate store configuration
#[derive(Debug, Clone)]
pub struct DestinyConfig {
    /// Candidates older than this are evicted by decay
    pub max_age: Duration,
    /// Seed for candidate selection; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Capacity of each mailbox
    pub mailbox_capacity: usize,
}

impl Default for DestinyConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::days(1),
            seed: None,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

enum Query {
    Get(Reply<Result<Path>>),
    Len(Reply<usize>),
    Snapshot(Reply<Vec<TimestampedPath>>),
}

enum Upkeep {
    /// Replies with the number of evicted candidates
    Decay(Reply<usize>),
    Shutdown(Ack),
}

/// Handle to a running candidate store
#[derive(Clone)]
pub struct Destiny {
    puts: mpsc::Sender<Put<Path>>,
    queries: mpsc::Sender<Query>,
    upkeep: mpsc::Sender<Upkeep>,
}

impl Destiny {
    /// Spawn an empty store reading "now" from `clock`
    pub fn spawn(config: DestinyConfig, clock: Arc<dyn Clock>) -> (Self, JoinHandle<()>) {
        let capacity = config.mailbox_capacity.max(1);
        let (puts_tx, puts_rx) = mpsc::channel(capacity);
        let (queries_tx, queries_rx) = mpsc::channel(capacity);
        let (upkeep_tx, upkeep_rx) = mpsc::channel(capacity);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "[Destiny] Starting with max age {} ms on {}",
            config.max_age.num_milliseconds(),
            clock.name()
        );

        let worker = Store {
            candidates: Candidates::new(config.max_age),
            clock,
            rng,
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

    /// A random live candidate, or [`DestinyError::NoCandidates`](crate::DestinyError)
    pub async fn get(&self) -> Result<Path> {
        mailbox::request(&self.queries, Query::Get).await?
    }

    /// Add a candidate stamped with the current time
    ///
    /// The zero path is dropped. With `block`, returns once applied.
    pub async fn put(&self, path: Path, block: bool) -> Result<()> {
        let (put, done) = Put::new(path, block);
        self.puts.send(put).await.map_err(|_| MailboxClosed)?;
        mailbox::wait_for(done).await?;
        Ok(())
    }

    /// Evict candidates older than the configured max age
    ///
    /// Returns the number evicted once the sweep is done.
    pub async fn decay(&self) -> Result<usize> {
        Ok(mailbox::request(&self.upkeep, Upkeep::Decay).await?)
    }

    /// Number of live candidates
    pub async fn len(&self) -> Result<usize> {
        Ok(mailbox::request(&self.queries, Query::Len).await?)
    }

    /// Copy of every live candidate, oldest first
    pub async fn snapshot(&self) -> Result<Vec<TimestampedPath>> {
        Ok(mailbox::request(&self.queries, Query::Snapshot).await?)
    }

    /// Stop the store after it has served what it already accepted
    pub async fn shutdown(&self) -> Result<()> {
        mailbox::request(&self.upkeep, Upkeep::Shutdown).await?;
        Ok(())
    }
}

/// The worker owning the candidate set
struct Store {
    candidates: Candidates,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    puts_rx: mpsc::Receiver<Put<Path>>,
    queries_rx: mpsc::Receiver<Query>,
    upkeep_rx: mpsc::Receiver<Upkeep>,
    shutdown_acks: Vec<Ack>,
}

impl Store {
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
        log::info!("[Destiny] Stopped with {} candidates", self.candidates.len());
    }

    fn handle_put(&mut self, put: Put<Path>) {
        let (path, ack) = put.into_parts();
        let symbol = path.destination.symbol.clone();
        if self.candidates.put(path, self.clock.now()) {
            log::trace!("[Destiny] Candidate {} added", symbol);
        } else {
            log::debug!("[Destiny] Ignoring zero path");
        }
        mailbox::acknowledge(ack);
    }

    fn handle_query(&mut self, query: Query) {
        match query {
            Query::Get(reply) => {
                let result = self.candidates.pick(&mut self.rng).cloned();
                let _ = reply.send(result);
            }
            Query::Len(reply) => {
                let _ = reply.send(self.candidates.len());
            }
            Query::Snapshot(reply) => {
                let _ = reply.send(self.candidates.iter().cloned().collect());
            }
        }
    }

    fn handle_upkeep(&mut self, upkeep: Upkeep) {
        match upkeep {
            Upkeep::Decay(reply) => {
                let evicted = self.candidates.decay(self.clock.now());
                if evicted > 0 {
                    log::debug!(
                        "[Destiny] Decay evicted {}, {} left",
                        evicted,
                        self.candidates.len()
                    );
                }
                let _ = reply.send(evicted);
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
