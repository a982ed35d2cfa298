//! Trader agent
//!
//! Steps once per pulse and acknowledges only when the step is done, so the
//! pulse clock never runs ahead of it. Each step:
//!
//! - runs candidate decay and capital re-allotment on their cadence
//! - drains the capital pool through the matcher and executes the proposals
//!   that come back
//! - marks open positions, publishes their deltas and closes those past
//!   take-profit or stop-loss

use helios_clock::PulseSubscription;
use helios_core::values::decimal_to_cents;
use helios_core::{Allotment, Delta, DeltaKind, Order, Position, ProtoOrder, Pulse, Side};
use helios_destiny::{Destiny, MatchOutcome, Matcher};
use helios_dispatcher::{Dispatcher, Topics};
use helios_money::{Accumulator, Money, MoneyError};
use helios_ports::{Adapter, Clock, Sizer};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::Result;

/// Trader configuration
#[derive(Debug, Clone)]
pub struct TraderConfig {
    /// Name used in logs and subscriptions
    pub name: String,
    /// Close once the return reaches this percent
    pub take_profit: Decimal,
    /// Close once the loss reaches this percent
    pub stop_loss: Decimal,
    /// Decay candidates every N pulses (0 disables)
    pub decay_every: u64,
    /// Re-allot capital every N pulses (0 disables)
    pub reallot_every: u64,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            name: "trader".to_string(),
            take_profit: dec!(100),
            stop_loss: dec!(50),
            decay_every: 1,
            reallot_every: 0,
        }
    }
}

/// Handles to everything a trader talks to
#[derive(Clone)]
pub struct TraderLinks {
    pub money: Money,
    pub accumulator: Accumulator,
    pub destiny: Destiny,
    pub matcher: Matcher,
    pub deltas: Dispatcher<Delta>,
    pub adapter: Arc<dyn Adapter>,
    pub sizer: Arc<dyn Sizer>,
    pub clock: Arc<dyn Clock>,
}

/// What a trader did over its run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraderReport {
    /// Pulses stepped (excluding the terminal one)
    pub pulses: u64,
    /// Proposals received from the matcher
    pub proposals: u64,
    /// Orders the brokerage accepted
    pub orders_submitted: u64,
    /// Positions closed on take-profit or stop-loss
    pub positions_closed: u64,
}

/// Pulse-driven trading agent
pub struct Trader {
    config: TraderConfig,
    links: TraderLinks,
    pulses: PulseSubscription,
    proposals_rx: mpsc::Receiver<ProtoOrder>,
    report: TraderReport,
}

impl Trader {
    /// `proposals_rx` must be subscribed to [`Topics::TRADE_PROPOSAL`] and be
    /// the only endpoint there
    pub fn new(
        config: TraderConfig,
        links: TraderLinks,
        pulses: PulseSubscription,
        proposals_rx: mpsc::Receiver<ProtoOrder>,
    ) -> Self {
        Self {
            config,
            links,
            pulses,
            proposals_rx,
            report: TraderReport::default(),
        }
    }

    /// Step through pulses until the terminal marker
    pub async fn run(mut self) -> Result<TraderReport> {
        log::info!("[{}] Trader started", self.config.name);

        loop {
            let Some(pulse) = self.pulses.next().await else {
                log::warn!("[{}] Pulse clock went away", self.config.name);
                break;
            };

            if pulse.is_terminal() {
                self.pulses.ack().await?;
                break;
            }

            self.step(pulse).await?;
            self.pulses.ack().await?;
        }

        log::info!(
            "[{}] Trader stopped after {} pulses: {} orders, {} closed",
            self.config.name,
            self.report.pulses,
            self.report.orders_submitted,
            self.report.positions_closed
        );
        Ok(self.report)
    }

    async fn step(&mut self, pulse: Pulse) -> Result<()> {
        self.report.pulses += 1;
        let n = self.report.pulses;
        log::debug!("[{}] Pulse {} (#{})", self.config.name, pulse, n);

        if on_cadence(n, self.config.decay_every) {
            self.links.destiny.decay().await?;
        }
        if on_cadence(n, self.config.reallot_every) {
            self.links.money.reallot().await?;
        }

        self.deploy_capital().await?;
        self.review_positions().await?;
        Ok(())
    }

    /// Match allotments until the pool is empty or nothing matches
    ///
    /// Allotments that could not be used are only returned at the end, so the
    /// same one is not drawn again within the step.
    async fn deploy_capital(&mut self) -> Result<()> {
        let mut held_back = Vec::new();

        loop {
            let allotment = match self.links.money.get().await {
                Ok(allotment) => allotment,
                Err(MoneyError::EmptyPool) => break,
                Err(e) => return Err(e.into()),
            };

            match self.links.matcher.submit(allotment).await? {
                MatchOutcome::Matched => {
                    while let Ok(proposal) = self.proposals_rx.try_recv() {
                        self.report.proposals += 1;
                        if let Some(unused) = self.execute(proposal).await? {
                            held_back.push(unused);
                        }
                    }
                }
                MatchOutcome::Unmatched(allotment) => {
                    held_back.push(allotment);
                    break;
                }
            }
        }

        for allotment in held_back {
            self.links.money.put(allotment, true).await?;
        }
        Ok(())
    }

    /// Size and submit a proposal
    ///
    /// Returns the allotment when it could not be spent. Change left over
    /// after sizing goes straight back to the pool.
    async fn execute(&mut self, proposal: ProtoOrder) -> Result<Option<Allotment>> {
        let allotment = proposal.allotment;
        let order = match self.links.sizer.size(&proposal, self.links.clock.now()) {
            Ok(order) => order,
            Err(e) => {
                log::debug!("[{}] {}", self.config.name, e);
                return Ok(Some(allotment));
            }
        };

        let cost = decimal_to_cents(order.notional());
        let symbol = order.symbol().to_string();
        match self.links.adapter.submit_order(order).await {
            Ok(id) => {
                self.report.orders_submitted += 1;
                log::debug!(
                    "[{}] Bought {} for {} cents ({})",
                    self.config.name,
                    symbol,
                    cost,
                    id
                );
                let change = allotment.amount - cost;
                if change > 0 {
                    self.links.money.put(Allotment::new(change), true).await?;
                }
                Ok(None)
            }
            Err(e) => {
                log::warn!(
                    "[{}] {} rejected by {}: {}",
                    self.config.name,
                    symbol,
                    self.links.adapter.name(),
                    e
                );
                Ok(Some(allotment))
            }
        }
    }

    /// Publish every position's delta and close the ones past their limits
    async fn review_positions(&mut self) -> Result<()> {
        let mut positions: Vec<Position> = self
            .links
            .adapter
            .get_positions()
            .await?
            .into_values()
            .collect();
        positions.sort_by(|a, b| a.path.destination.symbol.cmp(&b.path.destination.symbol));

        for position in positions {
            let delta = position.delta(DeltaKind::Unrealized);
            let beyond_limits =
                delta.percent >= self.config.take_profit || delta.percent <= -self.config.stop_loss;
            self.links.deltas.send(delta, Topics::DELTA).await?;

            if beyond_limits {
                self.close(position).await?;
            }
        }
        Ok(())
    }

    async fn close(&mut self, position: Position) -> Result<()> {
        let symbol = position.path.destination.symbol.clone();
        let order = Order::limit_with_time(
            position.path.clone(),
            Side::Sell,
            position.quantity,
            position.mark_price,
            self.links.clock.now(),
        );
        if let Err(e) = self.links.adapter.submit_order(order).await {
            log::warn!("[{}] Cannot close {}: {}", self.config.name, symbol, e);
            return Ok(());
        }

        let realized = position.delta(DeltaKind::Realized);
        log::info!(
            "[{}] Closed {} at {}% ({} cents)",
            self.config.name,
            symbol,
            realized.percent.round_dp(2),
            realized.amount
        );
        self.report.positions_closed += 1;

        self.links.accumulator.credit(position.value(), true).await?;
        self.links.deltas.send(realized, Topics::DELTA).await?;
        Ok(())
    }
}

fn on_cadence(n: u64, every: u64) -> bool {
    every > 0 && n % every == 0
}
