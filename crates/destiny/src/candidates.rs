use chrono::Duration;
use helios_core::{Path, Timestamp, TimestampedPath};
use rand::Rng;

use crate::error::{DestinyError, Result};

/// A set of candidate paths that forgets entries older than `max_age`
#[derive(Debug, Clone)]
pub struct Candidates {
    paths: Vec<TimestampedPath>,
    max_age: Duration,
}

impl Candidates {
    pub fn new(max_age: Duration) -> Self {
        Self {
            paths: Vec::new(),
            max_age,
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimestampedPath> {
        self.paths.iter()
    }

    /// Add a path stamped with `now`; the zero path is ignored
    pub fn put(&mut self, path: Path, now: Timestamp) -> bool {
        if path.is_zero() {
            return false;
        }
        self.paths.push(TimestampedPath::new(path, now));
        true
    }

    /// A uniformly random candidate, left in place
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Path> {
        if self.paths.is_empty() {
            return Err(DestinyError::NoCandidates);
        }
        let index = rng.gen_range(0..self.paths.len());
        Ok(&self.paths[index].path)
    }

    /// Keep only paths created within `max_age` of `now`
    ///
    /// Returns how many were evicted. A cutoff before the earliest
    /// representable instant evicts nothing.
    pub fn decay(&mut self, now: Timestamp) -> usize {
        let Some(cutoff) = now.checked_sub_signed(self.max_age) else {
            return 0;
        };
        let before = self.paths.len();
        self.paths.retain(|p| p.created_at >= cutoff);
        before - self.paths.len()
    }
}
