//! Paper brokerage
//!
//! An in-memory [`Adapter`] that fills every valid order immediately at its
//! limit price. Positions are marked from scheduled prices that take effect
//! once the clock reaches them, or from [`PaperAdapter::set_mark`].

use async_trait::async_trait;
use helios_core::values::decimal_to_cents;
use helios_core::{
    Balances, Cents, Order, OrderFilter, OrderId, OrderStatus, OrderType, Position, PositionId,
    Price, Side, Symbol,
};
use helios_ports::{Adapter, AdapterError, AdapterResult, Clock};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Book {
    session: Option<String>,
    cash: Cents,
    /// Open positions by symbol
    positions: HashMap<Symbol, Position>,
    orders: HashMap<OrderId, Order>,
    marks: HashMap<Symbol, Price>,
    /// symbol -> time (ms) -> price
    schedule: HashMap<Symbol, BTreeMap<i64, Price>>,
}

impl Book {
    /// Apply every scheduled mark whose time has come
    fn refresh_marks(&mut self, now_ms: i64) {
        for (symbol, prices) in &self.schedule {
            if let Some((_, price)) = prices.range(..=now_ms).next_back() {
                self.marks.insert(symbol.clone(), *price);
            }
        }
        for (symbol, position) in self.positions.iter_mut() {
            if let Some(price) = self.marks.get(symbol) {
                position.mark_price = *price;
            }
        }
    }

    fn require_session(&self) -> AdapterResult<()> {
        match self.session {
            Some(_) => Ok(()),
            None => Err(AdapterError::NotConnected),
        }
    }
}

/// In-memory brokerage account
pub struct PaperAdapter {
    book: RwLock<Book>,
    clock: Arc<dyn Clock>,
}

impl PaperAdapter {
    /// Open an account holding `cash`, reading time from `clock`
    pub fn new(cash: Cents, clock: Arc<dyn Clock>) -> Self {
        Self {
            book: RwLock::new(Book {
                cash,
                ..Default::default()
            }),
            clock,
        }
    }

    /// Mark `symbol` at `price` from now on
    pub async fn set_mark(&self, symbol: &str, price: Price) {
        let mut book = self.book.write().await;
        book.schedule.remove(symbol);
        book.marks.insert(symbol.to_string(), price);
        if let Some(position) = book.positions.get_mut(symbol) {
            position.mark_price = price;
        }
    }

    /// Mark `symbol` at `price` once the clock reaches `at_ms`
    pub async fn schedule_mark(&self, symbol: &str, at_ms: i64, price: Price) {
        let mut book = self.book.write().await;
        book.schedule
            .entry(symbol.to_string())
            .or_default()
            .insert(at_ms, price);
    }

    pub async fn cash(&self) -> Cents {
        self.book.read().await.cash
    }

    fn now_ms(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    fn fill_price(book: &Book, order: &Order) -> AdapterResult<Price> {
        match order.order_type {
            OrderType::Limit => order
                .price
                .ok_or_else(|| AdapterError::Rejected("limit order without price".to_string())),
            OrderType::Market => book
                .marks
                .get(order.symbol())
                .copied()
                .ok_or_else(|| AdapterError::Rejected(format!("no mark for {}", order.symbol()))),
        }
    }
}

#[async_trait]
impl Adapter for PaperAdapter {
    async fn connect(&self, id: &str, auth: &str, token: Option<&str>) -> AdapterResult<String> {
        if id.is_empty() || auth.is_empty() {
            return Err(AdapterError::AuthFailure("missing credentials".to_string()));
        }
        let session = match token {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => format!("paper-{}", Uuid::new_v4()),
        };
        self.book.write().await.session = Some(session.clone());
        log::info!("[Paper] {} connected", id);
        Ok(session)
    }

    async fn get_balances(&self) -> AdapterResult<Balances> {
        let mut book = self.book.write().await;
        book.require_session()?;
        book.refresh_marks(self.now_ms());
        let held: Cents = book.positions.values().map(Position::value).sum();
        Ok(Balances {
            cash: book.cash,
            value: book.cash + held,
        })
    }

    async fn get_orders(&self, filter: OrderFilter) -> AdapterResult<HashMap<OrderId, Order>> {
        let book = self.book.read().await;
        book.require_session()?;
        Ok(book
            .orders
            .iter()
            .filter(|(_, order)| filter.matches(order))
            .map(|(id, order)| (*id, order.clone()))
            .collect())
    }

    async fn get_positions(&self) -> AdapterResult<HashMap<PositionId, Position>> {
        let mut book = self.book.write().await;
        book.require_session()?;
        book.refresh_marks(self.now_ms());
        Ok(book
            .positions
            .values()
            .map(|position| (position.id, position.clone()))
            .collect())
    }

    async fn submit_order(&self, mut order: Order) -> AdapterResult<OrderId> {
        let mut book = self.book.write().await;
        book.require_session()?;
        book.refresh_marks(self.now_ms());

        if !order.validate() {
            return Err(AdapterError::Rejected(format!(
                "invalid order for {}",
                order.symbol()
            )));
        }
        let price = Self::fill_price(&book, &order)?;
        let notional = decimal_to_cents(order.quantity * price);
        let symbol = order.symbol().to_string();

        match order.side {
            Side::Buy => {
                if notional > book.cash {
                    return Err(AdapterError::Rejected(format!(
                        "{} cents needed, {} available",
                        notional, book.cash
                    )));
                }
                book.cash -= notional;
                let mark = book.marks.get(&symbol).copied();
                let position = book.positions.entry(symbol.clone()).or_insert_with(|| {
                    Position::new(order.path.clone(), Decimal::ZERO, price, order.created_at)
                });
                position.increase(order.quantity, price);
                position.mark_price = mark.unwrap_or(price);
            }
            Side::Sell => {
                let held = book
                    .positions
                    .get(&symbol)
                    .map(|p| p.quantity)
                    .unwrap_or(Decimal::ZERO);
                if held < order.quantity {
                    return Err(AdapterError::Rejected(format!(
                        "cannot sell {} {}, holding {}",
                        order.quantity, symbol, held
                    )));
                }
                book.cash += notional;
                if held == order.quantity {
                    book.positions.remove(&symbol);
                } else if let Some(position) = book.positions.get_mut(&symbol) {
                    position.quantity -= order.quantity;
                }
            }
        }

        order.status = OrderStatus::Filled;
        let id = order.id;
        log::debug!(
            "[Paper] Filled {:?} {} {} @ {}",
            order.side,
            order.quantity,
            symbol,
            price
        );
        book.orders.insert(id, order);
        Ok(id)
    }

    fn name(&self) -> &str {
        "Paper"
    }
}
