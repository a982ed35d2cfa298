use async_trait::async_trait;
use helios_core::{Balances, Order, OrderFilter, OrderId, Position, PositionId};
use std::collections::HashMap;

use crate::error::AdapterResult;

/// Port for a brokerage account
///
/// Every call is a capability that may fail with an opaque
/// [`AdapterError`](crate::AdapterError); callers decide what to do with
/// failures.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Authenticate, returning a (possibly refreshed) session token
    async fn connect(&self, id: &str, auth: &str, token: Option<&str>) -> AdapterResult<String>;

    /// Cash and total account value
    async fn get_balances(&self) -> AdapterResult<Balances>;

    /// Orders matching the filter, keyed by order id
    async fn get_orders(&self, filter: OrderFilter) -> AdapterResult<HashMap<OrderId, Order>>;

    /// Open positions keyed by position id
    async fn get_positions(&self) -> AdapterResult<HashMap<PositionId, Position>>;

    /// Submit an order, returning the broker's id for it
    async fn submit_order(&self, order: Order) -> AdapterResult<OrderId>;

    /// Adapter name for logging
    fn name(&self) -> &str {
        "Adapter"
    }
}
