use helios_core::Pulse;
use helios_ports::{MailboxClosed, PulseSource, PulseSourceError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::SimClock;

/// Lifecycle of a pulse clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulsarState {
    /// Schedule loaded, accepting subscribers
    Loaded,
    /// Broadcasting pulses
    Running,
    /// Terminal marker delivered and acknowledged
    Finished,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("pulse schedule unavailable: {0}")]
    Source(#[from] PulseSourceError),

    #[error("pulse clock cannot start from state {0:?}")]
    AlreadyStarted(PulsarState),

    #[error("pulse subscriber {0} went away")]
    SubscriberGone(String),
}

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PulseReport {
    /// Pulses replayed (excluding the terminal marker)
    pub pulses: usize,
    /// Broadcast rounds, including the terminal one
    pub broadcasts: usize,
}

/// Subscriber side of a pulse registration
pub struct PulseSubscription {
    pulses: mpsc::Receiver<Pulse>,
    acks: mpsc::Sender<Pulse>,
    in_flight: Option<Pulse>,
}

impl PulseSubscription {
    /// Wait for the next pulse; `None` once the clock is gone
    pub async fn next(&mut self) -> Option<Pulse> {
        self.in_flight = self.pulses.recv().await;
        self.in_flight
    }

    /// Acknowledge the pulse currently in flight
    ///
    /// Acknowledging again before the next pulse arrives does nothing.
    pub async fn ack(&mut self) -> Result<(), MailboxClosed> {
        match self.in_flight.take() {
            Some(pulse) => self.acks.send(pulse).await.map_err(|_| MailboxClosed),
            None => Ok(()),
        }
    }
}

struct Subscriber {
    name: String,
    pulses: mpsc::Sender<Pulse>,
    /// Each ack names the pulse it answers
    acks: mpsc::Receiver<Pulse>,
}

/// Synchronized pulse clock
///
/// Replays a fixed, ascending schedule of pulses. Each pulse goes to every
/// subscriber, and the next one is released only after every subscriber
/// has acknowledged. After the last pulse, [`Pulse::TERMINAL`] is broadcast
/// and acknowledged the same way.
///
/// There is no timeout: a subscriber that never acknowledges stalls the run.
pub struct Pulsar {
    schedule: Vec<Pulse>,
    subscribers: Vec<Subscriber>,
    state: PulsarState,
    clock: Option<Arc<SimClock>>,
}

impl Pulsar {
    /// Load the `[start, stop]` slice of a pulse source
    ///
    /// Fails if the source cannot be read; the clock never runs with a
    /// partial schedule.
    pub fn new(source: &dyn PulseSource, start: i64, stop: i64) -> Result<Self, ClockError> {
        let mut schedule = source.load(start, stop)?;
        schedule.sort();

        if schedule.is_empty() {
            log::warn!(
                "[Pulsar] No pulses in [{}, {}] from {}",
                start,
                stop,
                source.describe()
            );
        } else {
            log::info!(
                "[Pulsar] Loaded {} pulses in [{}, {}] from {}",
                schedule.len(),
                start,
                stop,
                source.describe()
            );
        }

        Ok(Self {
            schedule,
            subscribers: Vec::new(),
            state: PulsarState::Loaded,
            clock: None,
        })
    }

    /// Set this simulated clock to each pulse before broadcasting it
    pub fn with_clock(mut self, clock: Arc<SimClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn schedule(&self) -> &[Pulse] {
        &self.schedule
    }

    pub fn state(&self) -> PulsarState {
        self.state
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Register a subscriber and hand back its queues
    pub fn subscribe(&mut self, name: impl Into<String>) -> PulseSubscription {
        let (pulse_tx, pulse_rx) = mpsc::channel(1);
        let (ack_tx, ack_rx) = mpsc::channel(1);
        self.register(name, pulse_tx, ack_rx);
        PulseSubscription {
            pulses: pulse_rx,
            acks: ack_tx,
            in_flight: None,
        }
    }

    /// Register a subscriber's pulse queue and the queue it acknowledges on
    ///
    /// Registering an existing name replaces the previous registration.
    /// Acks must echo the pulse they answer; any other value is discarded.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        pulses: mpsc::Sender<Pulse>,
        acks: mpsc::Receiver<Pulse>,
    ) {
        let name = name.into();
        let subscriber = Subscriber {
            name: name.clone(),
            pulses,
            acks,
        };

        match self.subscribers.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                log::debug!("[Pulsar] Replacing subscriber {}", name);
                *existing = subscriber;
            }
            None => {
                log::debug!("[Pulsar] Subscriber {} registered", name);
                self.subscribers.push(subscriber);
            }
        }
    }

    /// Run the whole schedule, then the terminal marker
    pub async fn start(&mut self) -> Result<PulseReport, ClockError> {
        if self.state != PulsarState::Loaded {
            return Err(ClockError::AlreadyStarted(self.state));
        }
        self.state = PulsarState::Running;
        log::info!(
            "[Pulsar] Starting: {} pulses, {} subscribers",
            self.schedule.len(),
            self.subscribers.len()
        );

        let mut report = PulseReport::default();
        let schedule = self.schedule.clone();
        for pulse in schedule {
            if let Some(clock) = &self.clock {
                clock.set_pulse(pulse);
            }
            self.tick(pulse).await?;
            report.pulses += 1;
            report.broadcasts += 1;
        }

        self.tick(Pulse::TERMINAL).await?;
        report.broadcasts += 1;

        self.state = PulsarState::Finished;
        log::info!("[Pulsar] Finished after {} pulses", report.pulses);
        Ok(report)
    }

    /// Broadcast one pulse and wait for every acknowledgment
    async fn tick(&mut self, pulse: Pulse) -> Result<(), ClockError> {
        log::debug!("[Pulsar] Pulse {}", pulse);

        for subscriber in &self.subscribers {
            subscriber
                .pulses
                .send(pulse)
                .await
                .map_err(|_| ClockError::SubscriberGone(subscriber.name.clone()))?;
        }

        for subscriber in &mut self.subscribers {
            loop {
                match subscriber.acks.recv().await {
                    Some(acked) if acked == pulse => break,
                    Some(stale) => log::debug!(
                        "[Pulsar] Discarding ack for {} from {} while waiting on {}",
                        stale,
                        subscriber.name,
                        pulse
                    ),
                    None => return Err(ClockError::SubscriberGone(subscriber.name.clone())),
                }
            }
        }
        Ok(())
    }
}
