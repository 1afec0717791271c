//! Fixed-point decimal with 18 fractional digits.
//!
//! Interest and reward shares are fractional quantities that every node must
//! reproduce bit for bit, so they are computed on integers (`u128` scaled by
//! 10^18) with floor division, never on floating point. Values are unsigned:
//! the engine never produces negative interest.

use crate::TypesError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional decimal digits.
pub const PRECISION: usize = 18;

const ONE_RAW: u128 = 1_000_000_000_000_000_000;

/// An unsigned decimal number with 18 fractional digits.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(u128);

impl Dec {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(ONE_RAW);

    /// Build a decimal from its raw scaled representation (`value × 10^18`).
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// The raw scaled representation (`value × 10^18`).
    pub const fn raw(&self) -> u128 {
        self.0
    }

    /// `percent / 100`, e.g. `Dec::percent(25)` is `0.25`.
    pub const fn percent(percent: u64) -> Self {
        Self(percent as u128 * (ONE_RAW / 100))
    }

    /// `numerator / denominator`, floored to 18 digits.
    pub fn from_ratio(numerator: u128, denominator: u128) -> Result<Self, TypesError> {
        if denominator == 0 {
            return Err(TypesError::DivisionByZero);
        }
        mul_div_floor(numerator, ONE_RAW, denominator)
            .map(Self)
            .ok_or(TypesError::Overflow)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// `self × rhs`, floored to 18 digits.
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        mul_div_floor(self.0, rhs.0, ONE_RAW).map(Self)
    }

    /// The integer part, truncating any fraction.
    pub fn floor_int(&self) -> u128 {
        self.0 / ONE_RAW
    }

    /// Round to the nearest integer, ties to even.
    pub fn round_int(&self) -> u128 {
        let int = self.floor_int();
        let rem = self.0 % ONE_RAW;
        let half = ONE_RAW / 2;
        if rem > half || (rem == half && int % 2 == 1) {
            int + 1
        } else {
            int
        }
    }

    /// This value rounded half-to-even and kept as a decimal.
    pub fn round(&self) -> Self {
        // Only saturates within one unit of u128::MAX.
        Self(self.round_int().saturating_mul(ONE_RAW))
    }
}

/// `⌊a × b / c⌋` without overflowing the intermediate product where possible.
///
/// Splits the larger factor as `a = q·c + r`, so that
/// `⌊a·b/c⌋ = q·b + ⌊r·b/c⌋` exactly. Returns `None` if `c == 0` or the result
/// does not fit in `u128`.
pub fn mul_div_floor(a: u128, b: u128, c: u128) -> Option<u128> {
    if c == 0 {
        return None;
    }
    let (a, b) = if a >= b { (a, b) } else { (b, a) };
    let q = a / c;
    let r = a % c;
    q.checked_mul(b)?.checked_add(r.checked_mul(b)? / c)
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / ONE_RAW,
            self.0 % ONE_RAW,
            width = PRECISION
        )
    }
}

impl fmt::Debug for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dec({})", self)
    }
}

impl FromStr for Dec {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidDecimal(s.to_string());
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty()
            || frac_part.len() > PRECISION
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        if s.contains('.') && frac_part.is_empty() {
            return Err(invalid());
        }

        let int: u128 = int_part.parse().map_err(|_| invalid())?;
        let mut frac: u128 = 0;
        if !frac_part.is_empty() {
            frac = frac_part.parse().map_err(|_| invalid())?;
            frac *= 10u128.pow((PRECISION - frac_part.len()) as u32);
        }
        int.checked_mul(ONE_RAW)
            .and_then(|v| v.checked_add(frac))
            .map(Self)
            .ok_or(TypesError::Overflow)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
