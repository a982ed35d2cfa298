use serde::{Deserialize, Serialize};

use crate::values::Cents;

/// Account balances reported by a brokerage adapter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    /// Uninvested cash
    pub cash: Cents,
    /// Cash plus market value of positions
    pub value: Cents,
}
