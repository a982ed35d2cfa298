use serde::{Deserialize, Serialize};

use crate::values::Symbol;

/// Identifier pair naming a tradeable instrument, e.g. `("GOOG", "stock")`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Destination {
    pub symbol: Symbol,
    /// Instrument type ("stock", "option", ...)
    pub kind: String,
}

impl Destination {
    pub fn new(symbol: impl Into<Symbol>, kind: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            kind: kind.into(),
        }
    }

    /// The zero-value destination names nothing
    pub fn is_zero(&self) -> bool {
        self.symbol.is_empty() && self.kind.is_empty()
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.symbol, self.kind)
    }
}
