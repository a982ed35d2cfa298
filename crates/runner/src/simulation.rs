//! Simulation - pulse-driven orchestration
//!
//! Ties together:
//! - the pulse clock and the simulated clock it drives
//! - the capital allocator and its return accumulator
//! - the candidate store, the matcher and the delta re-inserter
//! - the proposal and delta routers
//! - the paper brokerage and one trader

use chrono::Duration;
use helios_clock::{DirectorySource, Pulsar, SimClock, StaticSource};
use helios_core::{Balances, Cents, Delta, ProtoOrder};
use helios_destiny::{Destiny, DestinyConfig, Matcher, Reinserter, ThresholdPolicy};
use helios_dispatcher::{Dispatcher, Topics};
use helios_money::{Accumulator, Money, MoneyConfig};
use helios_ports::{Adapter, PulseSource};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::SimulationConfig;
use crate::error::{Result, RunnerError};
use crate::paper::PaperAdapter;
use crate::sizer::WholeUnitSizer;
use crate::trader::{Trader, TraderConfig, TraderLinks, TraderReport};

/// Simulation results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationResults {
    /// Pulses replayed
    pub pulses: usize,
    /// Proposals the trader received
    pub proposals: u64,
    /// Orders the brokerage accepted
    pub orders_submitted: u64,
    /// Positions closed on take-profit or stop-loss
    pub positions_closed: u64,
    /// Paths put back into the candidate store
    pub reinserted: usize,
    /// Capital left in the pool
    pub available: Cents,
    /// Size of the book
    pub total: Cents,
    /// Brokerage account at the end
    pub balances: Balances,
}

/// Fully wired simulation, ready to run
pub struct TradingSimulation {
    config: SimulationConfig,
    pulsar: Pulsar,
    money: Money,
    destiny: Destiny,
    proposals: Dispatcher<ProtoOrder>,
    deltas: Dispatcher<Delta>,
    adapter: Arc<PaperAdapter>,
    trader: Trader,
    reinserter: JoinHandle<usize>,
}

impl TradingSimulation {
    /// Load the pulse schedule and spawn every actor
    ///
    /// Fails before anything runs when the pulse source cannot be read.
    pub async fn with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let capacity = config.mailbox_capacity.max(1);

        let source: Box<dyn PulseSource> = match &config.pulse_dir {
            Some(dir) => Box::new(DirectorySource::new(dir)),
            None => Box::new(StaticSource::every(
                config.start,
                config.stop,
                config.pulse_step_ms,
            )),
        };
        let clock = SimClock::new(config.start);
        let mut pulsar =
            Pulsar::new(source.as_ref(), config.start, config.stop)?.with_clock(clock.clone());

        let (money, _) = Money::spawn(MoneyConfig {
            cash: config.cash,
            mailbox_capacity: capacity,
        });
        let (accumulator, _) = Accumulator::with_capacity(money.clone(), capacity);

        let (destiny, _) = Destiny::spawn(
            DestinyConfig {
                max_age: Duration::milliseconds(config.max_age_ms),
                seed: config.seed,
                mailbox_capacity: capacity,
            },
            clock.clone(),
        );
        for path in &config.candidates {
            destiny.put(path.clone(), true).await?;
        }

        let (proposals, _) = Dispatcher::<ProtoOrder>::with_capacity(capacity);
        let (deltas, _) = Dispatcher::<Delta>::with_capacity(capacity);
        let (matcher, _) = Matcher::with_capacity(
            destiny.clone(),
            proposals.clone(),
            Some(money.clone()),
            capacity,
        );
        let reinserter = Reinserter::subscribe(
            &deltas,
            "destiny",
            destiny.clone(),
            ThresholdPolicy {
                threshold: config.reinsert_threshold,
            },
            capacity,
        )
        .await?;

        let adapter = Arc::new(PaperAdapter::new(config.cash, clock.clone()));
        for mark in &config.marks {
            adapter.schedule_mark(&mark.symbol, mark.at, mark.price).await;
        }
        adapter.connect("helios", "paper", None).await?;

        let trader_config = TraderConfig {
            take_profit: config.take_profit,
            stop_loss: config.stop_loss,
            decay_every: config.decay_every,
            reallot_every: config.reallot_every,
            ..Default::default()
        };
        let (proposal_tx, proposal_rx) = mpsc::channel(capacity);
        proposals
            .subscribe(Topics::TRADE_PROPOSAL, &trader_config.name, proposal_tx, true)
            .await?;
        let pulses = pulsar.subscribe(trader_config.name.clone());

        let links = TraderLinks {
            money: money.clone(),
            accumulator,
            destiny: destiny.clone(),
            matcher,
            deltas: deltas.clone(),
            adapter: adapter.clone(),
            sizer: Arc::new(WholeUnitSizer),
            clock,
        };
        let trader = Trader::new(trader_config, links, pulses, proposal_rx);

        Ok(Self {
            config,
            pulsar,
            money,
            destiny,
            proposals,
            deltas,
            adapter,
            trader,
            reinserter,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Pulses the run will replay
    pub fn pulse_count(&self) -> usize {
        self.pulsar.schedule().len()
    }

    /// Run the schedule to completion and tear every actor down
    pub async fn run(mut self) -> Result<SimulationResults> {
        log::info!(
            "Starting simulation: {} pulses, {} cents",
            self.pulse_count(),
            self.config.cash
        );

        let trader = tokio::spawn(self.trader.run());
        let clock_result = self.pulsar.start().await;
        let trader_result = trader
            .await
            .map_err(|e| RunnerError::Task(e.to_string()))?;

        // A trader failure is what makes the clock lose its subscriber
        let trader_report: TraderReport = trader_result?;
        let pulse_report = clock_result?;

        // Closing the delta router drops the re-inserter's queue
        self.deltas.shutdown().await?;
        let reinserted = self
            .reinserter
            .await
            .map_err(|e| RunnerError::Task(e.to_string()))?;

        let balances = self.adapter.get_balances().await?;
        let available = self.money.available().await?;
        let total = self.money.total().await?;

        self.proposals.shutdown().await?;
        self.destiny.shutdown().await?;
        self.money.shutdown().await?;

        let results = SimulationResults {
            pulses: pulse_report.pulses,
            proposals: trader_report.proposals,
            orders_submitted: trader_report.orders_submitted,
            positions_closed: trader_report.positions_closed,
            reinserted,
            available,
            total,
            balances,
        };
        log::info!(
            "Simulation finished: {} pulses, {} orders, {} closed, {} of {} cents available",
            results.pulses,
            results.orders_submitted,
            results.positions_closed,
            results.available,
            results.total
        );
        Ok(results)
    }
}
