//! Delta-driven re-insertion
//!
//! Positions report their returns as [`Delta`]s. A path whose position is
//! doing well is worth trying again, so the policy may put it back into
//! the candidate store (with a fresh timestamp).

use helios_core::Delta;
use helios_dispatcher::{DispatchError, Dispatcher, Topics};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::store::Destiny;

/// Decides whether a delta's path goes back into the candidate set
pub trait ReinsertPolicy: Send + Sync {
    fn should_reinsert(&self, delta: &Delta) -> bool;
}

/// Re-insert when the return exceeds a percentage of basis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    /// Percent return that must be exceeded (`100` = doubled)
    pub threshold: Decimal,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            threshold: dec!(100),
        }
    }
}

impl ReinsertPolicy for ThresholdPolicy {
    fn should_reinsert(&self, delta: &Delta) -> bool {
        delta.percent > self.threshold
    }
}

/// Worker feeding deltas through a policy into the candidate store
pub struct Reinserter;

impl Reinserter {
    /// Consume `deltas` until the queue closes
    ///
    /// The task resolves to the number of paths re-inserted.
    pub fn spawn<P>(
        destiny: Destiny,
        mut deltas: mpsc::Receiver<Delta>,
        policy: P,
    ) -> JoinHandle<usize>
    where
        P: ReinsertPolicy + 'static,
    {
        tokio::spawn(async move {
            let mut reinserted = 0;
            while let Some(delta) = deltas.recv().await {
                if !policy.should_reinsert(&delta) {
                    continue;
                }
                log::debug!(
                    "[Reinserter] {} returned {}%, re-inserting",
                    delta.path.destination,
                    delta.percent
                );
                match destiny.put(delta.path, true).await {
                    Ok(()) => reinserted += 1,
                    Err(e) => {
                        log::error!("[Reinserter] Candidate store unavailable: {}", e);
                        break;
                    }
                }
            }
            reinserted
        })
    }

    /// Subscribe a new endpoint named `name` to the delta topic and spawn on it
    pub async fn subscribe<P>(
        dispatcher: &Dispatcher<Delta>,
        name: &str,
        destiny: Destiny,
        policy: P,
        capacity: usize,
    ) -> Result<JoinHandle<usize>, DispatchError>
    where
        P: ReinsertPolicy + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        dispatcher.subscribe(Topics::DELTA, name, tx, true).await?;
        Ok(Self::spawn(destiny, rx, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_core::{Destination, Path};

    fn delta(percent: Decimal) -> Delta {
        Delta::unrealized(Path::from(Destination::new("GOOG", "stock")), 0, percent)
    }

    #[test]
    fn test_threshold_is_strict() {
        let policy = ThresholdPolicy::default();
        assert!(!policy.should_reinsert(&delta(dec!(100))));
        assert!(policy.should_reinsert(&delta(dec!(100.01))));
        assert!(!policy.should_reinsert(&delta(dec!(-50))));
    }
}
