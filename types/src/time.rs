//! Block time used throughout the engine.
//!
//! Timestamps are Unix epoch seconds (UTC) taken from the block header, never
//! from the local clock, so every node derives the same `endTime` for a stake.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in one day.
pub const SECS_PER_DAY: u64 = 24 * 3600;

/// Seconds in the 365-day year used to prorate interest.
pub const SECS_PER_YEAR: u64 = 365 * SECS_PER_DAY;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs`, or `None` on overflow.
    pub fn checked_add_secs(&self, secs: u64) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }

    /// Seconds elapsed from this timestamp to `later` (zero if `later` is earlier).
    pub fn secs_until(&self, later: Timestamp) -> u64 {
        later.0.saturating_sub(self.0)
    }

    /// Big-endian encoding; byte order matches numeric order in key scans.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(
            Timestamp::new(10).checked_add_secs(5),
            Some(Timestamp::new(15))
        );
        assert_eq!(Timestamp::new(u64::MAX).checked_add_secs(1), None);
    }

    #[test]
    fn big_endian_bytes_sort_numerically() {
        let a = Timestamp::new(255).to_be_bytes();
        let b = Timestamp::new(256).to_be_bytes();
        assert!(a < b);
    }
}
