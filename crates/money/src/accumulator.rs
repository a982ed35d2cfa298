//! Return accumulator
//!
//! Small returns rarely match an allotment on their own. The accumulator
//! keeps a running sum and, each time it reaches the allocator's current
//! unit size, hands one whole allotment back to the pool.

use helios_core::{Allotment, Cents, Delta};
use helios_ports::mailbox::{self, Put, Reply};
use helios_ports::{DEFAULT_MAILBOX_CAPACITY, MailboxClosed};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::allocator::Money;
use crate::error::Result;

/// Handle to a running accumulator
#[derive(Clone)]
pub struct Accumulator {
    credits: mpsc::Sender<Put<Cents>>,
    pending: mpsc::Sender<Reply<Cents>>,
}

impl Accumulator {
    /// Spawn an accumulator feeding `money`
    pub fn spawn(money: Money) -> (Self, JoinHandle<()>) {
        Self::with_capacity(money, DEFAULT_MAILBOX_CAPACITY)
    }

    pub fn with_capacity(money: Money, capacity: usize) -> (Self, JoinHandle<()>) {
        let (credits_tx, credits_rx) = mpsc::channel(capacity.max(1));
        let (pending_tx, pending_rx) = mpsc::channel(capacity.max(1));

        let worker = Worker {
            money,
            sum: 0,
            credits_rx,
            pending_rx,
        };
        let handle = tokio::spawn(worker.run());

        (
            Self {
                credits: credits_tx,
                pending: pending_tx,
            },
            handle,
        )
    }

    /// Add a return (may be negative) to the running sum
    ///
    /// With `block`, returns once the sum has been converted as far as it
    /// goes.
    pub async fn credit(&self, amount: Cents, block: bool) -> Result<()> {
        let (put, done) = Put::new(amount, block);
        self.credits.send(put).await.map_err(|_| MailboxClosed)?;
        mailbox::wait_for(done).await?;
        Ok(())
    }

    /// Credit a delta; only realized returns count
    pub async fn credit_delta(&self, delta: &Delta, block: bool) -> Result<()> {
        if !delta.is_realized() {
            return Ok(());
        }
        self.credit(delta.amount, block).await
    }

    /// Sum not yet converted into allotments
    pub async fn pending(&self) -> Result<Cents> {
        Ok(mailbox::request(&self.pending, |reply| reply).await?)
    }
}

struct Worker {
    money: Money,
    sum: Cents,
    credits_rx: mpsc::Receiver<Put<Cents>>,
    pending_rx: mpsc::Receiver<Reply<Cents>>,
}

impl Worker {
    async fn run(mut self) {
        loop {
            tokio::select! {
                Some(credit) = self.credits_rx.recv() => {
                    let (amount, ack) = credit.into_parts();
                    self.sum += amount;
                    if let Err(e) = self.convert().await {
                        log::error!("[Accumulator] Cannot return capital: {}", e);
                    }
                    mailbox::acknowledge(ack);
                }
                Some(reply) = self.pending_rx.recv() => {
                    let _ = reply.send(self.sum);
                }
                else => break,
            }
        }
        log::debug!("[Accumulator] Stopped with {} cents pending", self.sum);
    }

    /// Turn the running sum into whole allotments
    async fn convert(&mut self) -> Result<()> {
        let Some(unit) = self.money.unit_size().await? else {
            log::warn!(
                "[Accumulator] No allotment size to convert {} cents into",
                self.sum
            );
            return Ok(());
        };

        while self.sum >= unit {
            self.money.put(Allotment::new(unit), true).await?;
            self.sum -= unit;
            log::debug!(
                "[Accumulator] Converted {} cents into an allotment, {} pending",
                unit,
                self.sum
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::MoneyConfig;

    fn spawn_pair(cash: Cents) -> (Money, Accumulator) {
        let (money, _) = Money::spawn(MoneyConfig {
            cash,
            ..Default::default()
        });
        let (accumulator, _) = Accumulator::spawn(money.clone());
        (money, accumulator)
    }

    #[tokio::test]
    async fn test_small_credits_accumulate() {
        let (money, accumulator) = spawn_pair(100_000);
        accumulator.credit(400, true).await.unwrap();
        accumulator.credit(400, true).await.unwrap();

        assert_eq!(accumulator.pending().await.unwrap(), 800);
        assert_eq!(money.len().await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_credit_converts_whole_units() {
        let (money, accumulator) = spawn_pair(100_000);
        accumulator.credit(2_600, true).await.unwrap();

        assert_eq!(accumulator.pending().await.unwrap(), 600);
        assert_eq!(money.len().await.unwrap(), 102);
        assert_eq!(money.available().await.unwrap(), 102_000);
    }

    #[tokio::test]
    async fn test_without_unit_size_sum_is_kept() {
        let (money, accumulator) = spawn_pair(50);
        accumulator.credit(500, true).await.unwrap();

        assert_eq!(accumulator.pending().await.unwrap(), 500);
        assert_eq!(money.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unrealized_delta_not_credited() {
        use helios_core::{Destination, Path};
        use rust_decimal_macros::dec;

        let (_money, accumulator) = spawn_pair(100_000);
        let path = Path::from(Destination::new("GOOG", "stock"));

        accumulator
            .credit_delta(&Delta::unrealized(path.clone(), 900, dec!(90)), true)
            .await
            .unwrap();
        assert_eq!(accumulator.pending().await.unwrap(), 0);

        accumulator
            .credit_delta(&Delta::realized(path, 900, dec!(90)), true)
            .await
            .unwrap();
        assert_eq!(accumulator.pending().await.unwrap(), 900);
    }
}
