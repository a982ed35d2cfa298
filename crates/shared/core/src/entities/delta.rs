use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Path;
use crate::values::Cents;

/// Whether a return has been locked in or is only marked to market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeltaKind {
    Realized,
    Unrealized,
}

/// A return attributed to an open (or just closed) position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    /// Path the position was opened from
    pub path: Path,
    /// Return in minor units
    pub amount: Cents,
    /// Return as a percentage of cost basis (`150` = +150%)
    pub percent: Decimal,
    pub kind: DeltaKind,
}

impl Delta {
    pub fn realized(path: Path, amount: Cents, percent: Decimal) -> Self {
        Self {
            path,
            amount,
            percent,
            kind: DeltaKind::Realized,
        }
    }

    pub fn unrealized(path: Path, amount: Cents, percent: Decimal) -> Self {
        Self {
            path,
            amount,
            percent,
            kind: DeltaKind::Unrealized,
        }
    }

    /// Build a delta from a cost basis and current value, both in minor units
    pub fn from_values(path: Path, basis: Cents, value: Cents, kind: DeltaKind) -> Self {
        let amount = value - basis;
        let percent = if basis == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(amount) * Decimal::ONE_HUNDRED / Decimal::from(basis)
        };
        Self {
            path,
            amount,
            percent,
            kind,
        }
    }

    pub fn is_realized(&self) -> bool {
        self.kind == DeltaKind::Realized
    }
}
