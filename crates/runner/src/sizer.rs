use helios_core::values::cents_to_decimal;
use helios_core::{Order, ProtoOrder, Side, Timestamp};
use helios_ports::{Sizer, SizingError};
use rust_decimal::Decimal;

/// Buys as many whole units as the allotment pays for at the path's unit price
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeUnitSizer;

impl Sizer for WholeUnitSizer {
    fn size(&self, proto: &ProtoOrder, now: Timestamp) -> Result<Order, SizingError> {
        let symbol = proto.path.destination.symbol.clone();
        let price = proto.path.unit_price();
        if price <= Decimal::ZERO {
            return Err(SizingError::ConstructionFailure {
                symbol,
                reason: format!("no positive price (got {})", price),
            });
        }

        let budget = cents_to_decimal(proto.allotment.amount);
        let quantity = (budget / price).floor();
        if quantity.is_zero() {
            return Err(SizingError::ConstructionFailure {
                symbol,
                reason: format!("{} buys no whole unit at {}", budget, price),
            });
        }

        Ok(Order::limit_with_time(
            proto.path.clone(),
            Side::Buy,
            quantity,
            price,
            now,
        ))
    }
}
