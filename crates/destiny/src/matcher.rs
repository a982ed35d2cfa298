//! Capital-to-trade matching
//!
//! Every incoming allotment is paired with a random live candidate. A
//! successful pairing is published as a [`ProtoOrder`] under
//! [`Topics::TRADE_PROPOSAL`]; otherwise the allotment goes back to whoever
//! asked (or, for fire-and-forget requests, to the capital allocator).

use helios_core::{Allotment, ProtoOrder};
use helios_dispatcher::{Dispatcher, Topics};
use helios_money::Money;
use helios_ports::mailbox::{self, Reply};
use helios_ports::{DEFAULT_MAILBOX_CAPACITY, MailboxClosed};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{DestinyError, Result};
use crate::store::Destiny;

/// What became of a submitted allotment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Paired with a candidate and published
    Matched,
    /// No candidate (or no executor); the allotment is handed back
    Unmatched(Allotment),
}

struct MatchRequest {
    allotment: Allotment,
    reply: Option<Reply<MatchOutcome>>,
}

/// Handle to a running matcher
#[derive(Clone)]
pub struct Matcher {
    requests: mpsc::Sender<MatchRequest>,
}

impl Matcher {
    /// Spawn a matcher drawing candidates from `destiny`
    ///
    /// `money` receives unmatched allotments from requests that did not ask
    /// for a reply; without it those allotments are dropped with a warning.
    pub fn spawn(
        destiny: Destiny,
        proposals: Dispatcher<ProtoOrder>,
        money: Option<Money>,
    ) -> (Self, JoinHandle<()>) {
        Self::with_capacity(destiny, proposals, money, DEFAULT_MAILBOX_CAPACITY)
    }

    pub fn with_capacity(
        destiny: Destiny,
        proposals: Dispatcher<ProtoOrder>,
        money: Option<Money>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = Worker {
            destiny,
            proposals,
            money,
            requests_rx: rx,
        };
        let handle = tokio::spawn(worker.run());
        (Self { requests: tx }, handle)
    }

    /// Submit an allotment and wait for the outcome
    pub async fn submit(&self, allotment: Allotment) -> Result<MatchOutcome> {
        let outcome = mailbox::request(&self.requests, |reply| MatchRequest {
            allotment,
            reply: Some(reply),
        })
        .await?;
        Ok(outcome)
    }

    /// Submit an allotment without waiting
    pub async fn offer(&self, allotment: Allotment) -> Result<()> {
        self.requests
            .send(MatchRequest {
                allotment,
                reply: None,
            })
            .await
            .map_err(|_| DestinyError::Closed(MailboxClosed))
    }
}

struct Worker {
    destiny: Destiny,
    proposals: Dispatcher<ProtoOrder>,
    money: Option<Money>,
    requests_rx: mpsc::Receiver<MatchRequest>,
}

impl Worker {
    async fn run(mut self) {
        while let Some(request) = self.requests_rx.recv().await {
            let outcome = self.pair(request.allotment).await;
            match (request.reply, outcome) {
                (Some(reply), outcome) => {
                    let _ = reply.send(outcome);
                }
                (None, MatchOutcome::Matched) => {}
                (None, MatchOutcome::Unmatched(allotment)) => self.give_back(allotment).await,
            }
        }
        log::debug!("[Matcher] Stopped");
    }

    async fn pair(&self, allotment: Allotment) -> MatchOutcome {
        let path = match self.destiny.get().await {
            Ok(path) => path,
            Err(DestinyError::NoCandidates) => return MatchOutcome::Unmatched(allotment),
            Err(e) => {
                log::error!("[Matcher] Candidate store unavailable: {}", e);
                return MatchOutcome::Unmatched(allotment);
            }
        };

        let symbol = path.destination.symbol.clone();
        let proposal = ProtoOrder::new(allotment, path);
        match self.proposals.send(proposal, Topics::TRADE_PROPOSAL).await {
            Ok(0) => {
                log::warn!(
                    "[Matcher] Nobody executes proposals, keeping {} cents",
                    allotment.amount
                );
                MatchOutcome::Unmatched(allotment)
            }
            Ok(_) => {
                log::debug!(
                    "[Matcher] Proposed {} cents on {}",
                    allotment.amount,
                    symbol
                );
                MatchOutcome::Matched
            }
            Err(e) => {
                log::error!("[Matcher] Cannot publish proposal: {}", e);
                MatchOutcome::Unmatched(allotment)
            }
        }
    }

    async fn give_back(&self, allotment: Allotment) {
        match &self.money {
            Some(money) => {
                if let Err(e) = money.put(allotment, true).await {
                    log::error!("[Matcher] Lost {} cents: {}", allotment.amount, e);
                }
            }
            None => log::warn!(
                "[Matcher] Dropping unmatched allotment of {} cents",
                allotment.amount
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DestinyConfig;
    use helios_clock::SimClock;
    use helios_core::{Destination, Path};
    use helios_money::MoneyConfig;

    fn goog() -> Path {
        Path::from(Destination::new("GOOG", "stock"))
    }

    fn destiny() -> Destiny {
        Destiny::spawn(
            DestinyConfig {
                seed: Some(3),
                ..Default::default()
            },
            SimClock::new(0),
        )
        .0
    }

    #[tokio::test]
    async fn test_match_publishes_proposal() {
        let destiny = destiny();
        destiny.put(goog(), true).await.unwrap();
        let (proposals, _) = Dispatcher::spawn();
        let (tx, mut rx) = mpsc::channel(4);
        proposals
            .subscribe(Topics::TRADE_PROPOSAL, "executor", tx, true)
            .await
            .unwrap();
        let (matcher, _) = Matcher::spawn(destiny, proposals, None);

        let outcome = matcher.submit(Allotment::new(1_000)).await.unwrap();
        assert_eq!(outcome, MatchOutcome::Matched);
        assert_eq!(
            rx.try_recv().unwrap(),
            ProtoOrder::new(Allotment::new(1_000), goog())
        );
    }

    #[tokio::test]
    async fn test_no_candidates_returns_allotment() {
        let (proposals, _) = Dispatcher::spawn();
        let (matcher, _) = Matcher::spawn(destiny(), proposals, None);

        let outcome = matcher.submit(Allotment::new(1_000)).await.unwrap();
        assert_eq!(outcome, MatchOutcome::Unmatched(Allotment::new(1_000)));
    }

    #[tokio::test]
    async fn test_no_executor_returns_allotment() {
        let destiny = destiny();
        destiny.put(goog(), true).await.unwrap();
        let (proposals, _) = Dispatcher::spawn();
        let (matcher, _) = Matcher::spawn(destiny, proposals, None);

        let outcome = matcher.submit(Allotment::new(500)).await.unwrap();
        assert_eq!(outcome, MatchOutcome::Unmatched(Allotment::new(500)));
    }

    #[tokio::test]
    async fn test_offer_returns_unmatched_to_money() {
        let (money, _) = Money::spawn(MoneyConfig {
            cash: 100_000,
            ..Default::default()
        });
        let allotment = money.get().await.unwrap();
        assert_eq!(money.available().await.unwrap(), 99_000);

        let (proposals, _) = Dispatcher::spawn();
        let (matcher, handle) = Matcher::spawn(destiny(), proposals, Some(money.clone()));
        matcher.offer(allotment).await.unwrap();

        // Dropping the only handle lets the worker finish the queued offer and stop
        drop(matcher);
        handle.await.unwrap();

        let available = money.available().await.unwrap();
        assert_eq!(available, 100_000);
    }
}
