use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Destination, OrderStatus, OrderType, Path, Side};

/// Unique identifier for an order
pub type OrderId = Uuid;

/// An order as submitted to, and reported back by, a brokerage adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub destination: Destination,
    /// The candidate this order was built from
    pub path: Path,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    /// Required for Limit orders
    pub price: Option<Decimal>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a limit order for a path with explicit timestamp
    pub fn limit_with_time(
        path: Path,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            destination: path.destination.clone(),
            path,
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
            status: OrderStatus::Open,
            created_at: timestamp,
        }
    }

    /// Create a limit order using current system time
    /// Note: For simulation, prefer `limit_with_time` with clock-provided time
    pub fn limit(path: Path, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self::limit_with_time(path, side, quantity, price, Utc::now())
    }

    pub fn symbol(&self) -> &str {
        self.destination.symbol.as_str()
    }

    /// Validate the order based on order type requirements
    pub fn validate(&self) -> bool {
        if self.quantity <= Decimal::ZERO {
            return false;
        }
        match self.order_type {
            OrderType::Market => true,
            OrderType::Limit => self.price.is_some_and(|p| p > Decimal::ZERO),
        }
    }

    /// Notional value at the order price
    pub fn notional(&self) -> Decimal {
        self.quantity * self.price.unwrap_or(Decimal::ZERO)
    }
}

/// Which orders to list when querying an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            OrderFilter::All => true,
            OrderFilter::Open => !order.status.is_terminal(),
            OrderFilter::Closed => order.status.is_terminal(),
        }
    }
}
