use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Delta, DeltaKind, Path};
use crate::values::{Cents, decimal_to_cents};

/// Unique identifier for a position
pub type PositionId = Uuid;

/// A long holding opened from a candidate path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,

    /// Path the position was opened from
    pub path: Path,

    /// Units held (always positive)
    pub quantity: Decimal,

    /// Average entry price
    pub entry_price: Decimal,

    /// Current market price (for P&L calculation)
    pub mark_price: Decimal,

    /// When the position was opened
    pub opened_at: DateTime<Utc>,
}

impl Position {
    pub fn new(path: Path, quantity: Decimal, entry_price: Decimal, opened_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
            quantity,
            entry_price,
            mark_price: entry_price,
            opened_at,
        }
    }

    /// Cost basis in minor units
    pub fn basis(&self) -> Cents {
        decimal_to_cents(self.quantity * self.entry_price)
    }

    /// Current market value in minor units
    pub fn value(&self) -> Cents {
        decimal_to_cents(self.quantity * self.mark_price)
    }

    /// Calculate unrealized P&L based on current mark price
    pub fn unrealized_pnl(&self) -> Decimal {
        self.quantity * (self.mark_price - self.entry_price)
    }

    /// Return of this position as a delta of the given kind
    pub fn delta(&self, kind: DeltaKind) -> Delta {
        Delta::from_values(self.path.clone(), self.basis(), self.value(), kind)
    }

    /// Add to the position, averaging the entry price
    pub fn increase(&mut self, quantity: Decimal, price: Decimal) {
        let old_notional = self.quantity * self.entry_price;
        let new_notional = quantity * price;
        let total_quantity = self.quantity + quantity;

        if total_quantity > Decimal::ZERO {
            self.entry_price = (old_notional + new_notional) / total_quantity;
        }
        self.quantity = total_quantity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Destination;
    use rust_decimal_macros::dec;

    fn position() -> Position {
        Position::new(
            Path::new(Destination::new("GOOG", "stock"), dec!(100)),
            dec!(10),
            dec!(100),
            Utc::now(),
        )
    }

    #[test]
    fn test_position_delta() {
        let mut pos = position();
        assert_eq!(pos.basis(), 100_000);
        pos.mark_price = dec!(250);
        assert_eq!(pos.value(), 250_000);
        assert_eq!(pos.unrealized_pnl(), dec!(1500));

        let delta = pos.delta(DeltaKind::Unrealized);
        assert_eq!(delta.amount, 150_000);
        assert_eq!(delta.percent, dec!(150));
    }

    #[test]
    fn test_increase_averages_entry() {
        let mut pos = position();
        pos.increase(dec!(10), dec!(200));
        assert_eq!(pos.quantity, dec!(20));
        assert_eq!(pos.entry_price, dec!(150));
    }
}
