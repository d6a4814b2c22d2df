use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

/// Number of stored units in one percentage point.
const UNITS_PER_PERCENT: i64 = 100;

//--------------------------------------      Percent        ---------------------------------------------------------
/// A percentage rate, stored as an integer number of hundredths of a percent so that rates compare exactly.
///
/// Upstream systems send rates as JSON floats (`18.0`, `2.5`). They are rounded to the nearest hundredth of a
/// percent on the way in.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percent(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a percentage: {0}")]
pub struct PercentConversionError(String);

impl Percent {
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn from_hundredths(value: i64) -> Self {
        Self(value)
    }

    pub fn hundredths(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / UNITS_PER_PERCENT as f64
    }
}

impl TryFrom<f64> for Percent {
    type Error = PercentConversionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(PercentConversionError(format!("{value} is not a valid rate")));
        }
        let scaled = (value * UNITS_PER_PERCENT as f64).round();
        if scaled > i64::MAX as f64 {
            return Err(PercentConversionError(format!("{value} is too large")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(scaled as i64))
    }
}

impl From<Percent> for f64 {
    fn from(value: Percent) -> Self {
        value.as_f64()
    }
}

impl Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / UNITS_PER_PERCENT;
        let frac = self.0 % UNITS_PER_PERCENT;
        if frac == 0 {
            write!(f, "{whole}%")
        } else {
            write!(f, "{whole}.{frac:02}%")
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rounds_to_hundredths() {
        assert_eq!(Percent::try_from(2.5).unwrap().hundredths(), 250);
        assert_eq!(Percent::try_from(18.004).unwrap().hundredths(), 1800);
        assert!(Percent::try_from(-1.0).is_err());
        assert!(Percent::try_from(f64::NAN).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Percent::from_hundredths(500).to_string(), "5%");
        assert_eq!(Percent::from_hundredths(250).to_string(), "2.50%");
    }

    #[test]
    fn serde_as_float() {
        let p: Percent = serde_json::from_str("9.0").unwrap();
        assert_eq!(p, Percent::from_hundredths(900));
        assert_eq!(serde_json::to_string(&p).unwrap(), "9.0");
    }
}
