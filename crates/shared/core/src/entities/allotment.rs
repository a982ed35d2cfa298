use serde::{Deserialize, Serialize};

use crate::values::Cents;

/// One discrete, fungible unit of spendable capital
///
/// The zero amount is the "absent" sentinel and is never stored by the
/// capital allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allotment {
    pub amount: Cents,
}

impl Allotment {
    pub const ZERO: Allotment = Allotment { amount: 0 };

    pub fn new(amount: Cents) -> Self {
        Self { amount }
    }

    /// Returns true for the sentinel value
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl From<Cents> for Allotment {
    fn from(amount: Cents) -> Self {
        Self::new(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinel() {
        assert!(Allotment::default().is_zero());
        assert!(Allotment::ZERO.is_zero());
        assert!(!Allotment::new(1_000).is_zero());
    }
}
