use helios_core::{Allotment, Cents};

use crate::error::{MoneyError, Result};

/// Number of equal allotments a re-allot partitions the available capital into
pub const ALLOTMENT_COUNT: i64 = 100;

/// Capital ledger: the allotments on hand plus running totals
///
/// `available` is the capital not currently handed out; `total` tracks the
/// size of the book and only grows (inflows past the previous total raise it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pool {
    allotments: Vec<Allotment>,
    available: Cents,
    total: Cents,
}

impl Pool {
    /// Create a pool holding `cash`, already partitioned
    pub fn new(cash: Cents) -> Self {
        let mut pool = Self {
            allotments: Vec::new(),
            available: cash,
            total: cash,
        };
        pool.reallot();
        pool
    }

    pub fn available(&self) -> Cents {
        self.available
    }

    pub fn total(&self) -> Cents {
        self.total
    }

    pub fn len(&self) -> usize {
        self.allotments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allotments.is_empty()
    }

    pub fn allotments(&self) -> &[Allotment] {
        &self.allotments
    }

    /// Take the most recently added allotment
    pub fn get(&mut self) -> Result<Allotment> {
        let allotment = self.allotments.pop().ok_or(MoneyError::EmptyPool)?;
        self.available -= allotment.amount;
        Ok(allotment)
    }

    /// Return or add an allotment; the zero sentinel is ignored
    ///
    /// Returns whether the pool changed.
    pub fn put(&mut self, allotment: Allotment) -> bool {
        if allotment.is_zero() {
            return false;
        }
        self.allotments.push(allotment);
        self.available += allotment.amount;
        if self.available > self.total {
            self.total = self.available;
        }
        true
    }

    /// Replace every allotment with a fresh equal partition of `available`
    ///
    /// The remainder of the division stays in `available` without being
    /// allotted.
    pub fn reallot(&mut self) {
        let unit = self.available / ALLOTMENT_COUNT;
        self.allotments.clear();
        if unit > 0 {
            self.allotments = vec![Allotment::new(unit); ALLOTMENT_COUNT as usize];
        }
    }

    /// Size of the allotment an inflow should be converted into
    ///
    /// The most recently added allotment when there is one, otherwise
    /// `total / 100`; `None` when neither is positive.
    pub fn unit_size(&self) -> Option<Cents> {
        match self.allotments.last() {
            Some(allotment) => Some(allotment.amount),
            None => {
                let unit = self.total / ALLOTMENT_COUNT;
                (unit > 0).then_some(unit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool_is_partitioned() {
        let pool = Pool::new(100_000);
        assert_eq!(pool.len(), 100);
        assert!(pool.allotments().iter().all(|a| a.amount == 1_000));
        assert_eq!(pool.available(), 100_000);
        assert_eq!(pool.total(), 100_000);
    }

    #[test]
    fn test_get_then_put_restores_available() {
        let mut pool = Pool::new(100_000);
        let allotment = pool.get().unwrap();
        assert_eq!(allotment.amount, 1_000);
        assert_eq!(pool.available(), 99_000);
        assert_eq!(pool.len(), 99);

        assert!(pool.put(allotment));
        assert_eq!(pool.available(), 100_000);
        assert_eq!(pool.len(), 100);
    }

    #[test]
    fn test_put_then_get_returns_same_amount() {
        let mut pool = Pool::new(100_000);
        let before = pool.available();
        pool.put(Allotment::new(4_321));
        assert_eq!(pool.get().unwrap().amount, 4_321);
        assert_eq!(pool.available(), before);
    }

    #[test]
    fn test_zero_put_is_ignored() {
        let mut pool = Pool::new(100_000);
        assert!(!pool.put(Allotment::ZERO));
        assert_eq!(pool.len(), 100);
        assert_eq!(pool.available(), 100_000);
    }

    #[test]
    fn test_inflow_raises_total() {
        let mut pool = Pool::new(100_000);
        pool.put(Allotment::new(5_000));
        assert_eq!(pool.available(), 105_000);
        assert_eq!(pool.total(), 105_000);
    }

    #[test]
    fn test_empty_pool() {
        let mut pool = Pool::new(0);
        assert!(pool.is_empty());
        assert_eq!(pool.get(), Err(MoneyError::EmptyPool));
        assert_eq!(pool.unit_size(), None);
    }

    #[test]
    fn test_reallot_discards_boundaries_and_remainder() {
        let mut pool = Pool::new(100_000);
        for _ in 0..30 {
            pool.get().unwrap();
        }
        pool.put(Allotment::new(777));
        pool.reallot();

        // 70_000 + 777 = 70_777 -> 100 x 707, remainder 77 unallotted
        assert_eq!(pool.len(), 100);
        assert!(pool.allotments().iter().all(|a| a.amount == 707));
        assert_eq!(pool.available(), 70_777);
    }

    #[test]
    fn test_reallot_too_small_empties_pool() {
        let mut pool = Pool::new(100_000);
        while pool.available() >= 100 {
            pool.get().unwrap();
        }
        pool.reallot();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_unit_size_falls_back_to_total() {
        let mut pool = Pool::new(100_000);
        while !pool.is_empty() {
            pool.get().unwrap();
        }
        assert_eq!(pool.unit_size(), Some(1_000));

        let mut small = Pool::new(99);
        assert_eq!(small.unit_size(), None);
        small.put(Allotment::new(5));
        assert_eq!(small.unit_size(), Some(5));
    }
}
