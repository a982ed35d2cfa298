use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by a brokerage adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted by the broker, not yet filled
    Open,
    /// Completely filled
    Filled,
    /// Canceled before filling
    Canceled,
    /// Refused by the broker
    Rejected,
}

impl OrderStatus {
    /// Returns true if the order can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Canceled | OrderStatus::Rejected
        )
    }
}
