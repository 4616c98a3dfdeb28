//! Rupee amounts held as integer paise.
//!
//! Every balance, position and total in the crate is accumulated as an `i64` count of
//! minor units so repeated additions and splits never drift. JSON carries amounts as plain
//! decimal numbers of rupees; conversion happens only at that boundary.

use crate::core::errors::RupeeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use utoipa::ToSchema;

/// Minor units per rupee.
pub const MINOR_PER_UNIT: i64 = 100;

/// Amounts at or below this many paise (0.01 rupee) count as settled.
pub const TOLERANCE_MINOR: i64 = 1;

/// Largest single amount accepted (100 crore). Sums of millions of such amounts still fit
/// in an `i64` of paise, so totals never overflow.
pub const MAX_ABS_RUPEES: f64 = 1_000_000_000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ToSchema)]
#[schema(value_type = f64, example = 250.5)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Rounds half away from zero to the nearest paisa.
    pub fn from_rupees(rupees: f64) -> Result<Self, RupeeError> {
        if !rupees.is_finite() {
            return Err(RupeeError::validation(
                "amount",
                "Invalid Amount",
                "Amount must be a finite number",
            ));
        }
        if rupees.abs() > MAX_ABS_RUPEES {
            return Err(RupeeError::validation(
                "amount",
                "Amount Too Large",
                format!("Amount cannot exceed {}", MAX_ABS_RUPEES),
            ));
        }
        Ok(Money((rupees * MINOR_PER_UNIT as f64).round() as i64))
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn to_rupees(self) -> f64 {
        self.0 as f64 / MINOR_PER_UNIT as f64
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Money) -> Self {
        Money(self.0.min(other.0))
    }

    /// Within one paisa of zero.
    pub fn is_settled(self) -> bool {
        self.0.abs() <= TOLERANCE_MINOR
    }

    /// Splits into `parts` shares that add back up to `self` exactly. The leftover paise
    /// go one each to the leading shares.
    pub fn split_evenly(self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let n = parts as i64;
        let base = self.0.div_euclid(n);
        let leftover = self.0.rem_euclid(n) as usize;
        (0..parts)
            .map(|i| Money(base + if i < leftover { 1 } else { 0 }))
            .collect()
    }

    /// Share of `self` as a percentage of `whole`, 0 when `whole` is zero.
    pub fn percent_of(self, whole: Money) -> f64 {
        if whole.0 == 0 {
            return 0.0;
        }
        self.0 as f64 / whole.0 as f64 * 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(
            f,
            "{}{}.{:02}",
            sign,
            abs / MINOR_PER_UNIT as u64,
            abs % MINOR_PER_UNIT as u64
        )
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_rupees())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rupees = f64::deserialize(deserializer)?;
        Money::from_rupees(rupees).map_err(serde::de::Error::custom)
    }
}
