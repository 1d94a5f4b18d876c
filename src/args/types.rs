use std::num::{NonZeroU64, NonZeroUsize};

use crate::error::ValidationError;

/// Basis points per whole percent.
const BASIS_POINTS_PER_PERCENT: u64 = 100;
/// Upper bound for a percentage expressed in basis points (100%).
const MAX_BASIS_POINTS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(NonZeroU64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(PositiveU64)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU64 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU64::try_from(value)
    }
}

impl From<PositiveU64> for u64 {
    fn from(value: PositiveU64) -> Self {
        value.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}

/// A percentage in hundredths of a percent (`1.25%` is 125).
///
/// Parsing accepts up to two decimal places and an optional trailing `%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BasisPoints(u64);

impl BasisPoints {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Ratio of `part` over `total` in basis points; zero when `total` is zero.
    #[must_use]
    pub fn ratio(part: u64, total: u64) -> Self {
        let scaled = u128::from(part)
            .saturating_mul(u128::from(MAX_BASIS_POINTS))
            .checked_div(u128::from(total))
            .unwrap_or(0);
        Self(u64::try_from(scaled).unwrap_or(u64::MAX))
    }

    /// Like [`BasisPoints::ratio`] but rounded up, so a rate just above a
    /// threshold never renders equal to it.
    #[must_use]
    pub fn ratio_ceil(part: u64, total: u64) -> Self {
        let scaled = u128::from(part).saturating_mul(u128::from(MAX_BASIS_POINTS));
        let Some(floor) = scaled.checked_div(u128::from(total)) else {
            return Self(0);
        };
        let exact = floor.saturating_mul(u128::from(total)) == scaled;
        let rounded = if exact { floor } else { floor.saturating_add(1) };
        Self(u64::try_from(rounded).unwrap_or(u64::MAX))
    }

    /// Whether `part / total` is strictly above this rate. Compared without
    /// rounding; a zero `total` never exceeds.
    #[must_use]
    pub fn exceeded_by(self, part: u64, total: u64) -> bool {
        u128::from(part).saturating_mul(u128::from(MAX_BASIS_POINTS))
            > u128::from(self.0).saturating_mul(u128::from(total))
    }
}

impl TryFrom<u64> for BasisPoints {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > MAX_BASIS_POINTS {
            return Err(ValidationError::PercentOutOfRange {
                value: value.to_string(),
            });
        }
        Ok(Self(value))
    }
}

impl std::str::FromStr for BasisPoints {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        let invalid = || ValidationError::InvalidPercent {
            value: s.to_owned(),
        };

        let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > 2
            || !whole.chars().all(|ch| ch.is_ascii_digit())
            || !fraction.chars().all(|ch| ch.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_err| invalid())?
        };
        let fraction: u64 = match fraction.len() {
            0 => 0,
            1 => fraction
                .parse::<u64>()
                .map_err(|_err| invalid())?
                .saturating_mul(10),
            _ => fraction.parse().map_err(|_err| invalid())?,
        };

        let total = whole
            .checked_mul(BASIS_POINTS_PER_PERCENT)
            .and_then(|value| value.checked_add(fraction))
            .ok_or_else(|| ValidationError::PercentOutOfRange {
                value: s.to_owned(),
            })?;
        if total > MAX_BASIS_POINTS {
            return Err(ValidationError::PercentOutOfRange {
                value: s.to_owned(),
            });
        }
        Ok(Self(total))
    }
}

impl std::fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{:02}%",
            self.0 / BASIS_POINTS_PER_PERCENT,
            self.0 % BASIS_POINTS_PER_PERCENT
        )
    }
}
