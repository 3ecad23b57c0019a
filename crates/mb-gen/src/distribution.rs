use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::{GenError, Result};

/// Default inclusive bounds for integer-valued matrices.
pub const DEFAULT_LOW: i64 = 0;
pub const DEFAULT_HIGH: i64 = 14;

/// The distribution each matrix element is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueDistribution {
    /// Whole numbers in `low..=high`, stored as f64.
    Integers { low: i64, high: i64 },
    /// Uniform reals in `[0, 1)`.
    Unit,
}

impl ValueDistribution {
    /// Integer distribution over `low..=high`.
    ///
    /// # Errors
    /// `InvalidRange` if `low > high`.
    pub fn integers(low: i64, high: i64) -> Result<Self> {
        if low > high {
            return Err(GenError::InvalidRange { low, high });
        }
        Ok(ValueDistribution::Integers { low, high })
    }

    /// Draw one value.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            ValueDistribution::Integers { low, high } => rng.gen_range(low..=high) as f64,
            ValueDistribution::Unit => rng.gen::<f64>(),
        }
    }

    /// Re-check the bounds of a distribution built by hand.
    pub fn validate(&self) -> Result<()> {
        match *self {
            ValueDistribution::Integers { low, high } if low > high => {
                Err(GenError::InvalidRange { low, high })
            }
            _ => Ok(()),
        }
    }
}

impl Default for ValueDistribution {
    fn default() -> Self {
        ValueDistribution::Integers {
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
        }
    }
}

impl fmt::Display for ValueDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueDistribution::Integers { low, high } => write!(f, "integers[{}, {}]", low, high),
            ValueDistribution::Unit => write!(f, "unit[0, 1)"),
        }
    }
}

/// Parses `int` (default bounds) or `unit`.
impl FromStr for ValueDistribution {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integers" => Ok(ValueDistribution::default()),
            "unit" => Ok(ValueDistribution::Unit),
            other => Err(GenError::UnknownDistribution(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_integers_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let dist = ValueDistribution::integers(0, 9).unwrap();
        for _ in 0..1000 {
            let v = dist.sample(&mut rng);
            assert!((0.0..=9.0).contains(&v));
            assert_eq!(v.fract(), 0.0);
        }
    }

    #[test]
    fn test_unit_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = ValueDistribution::Unit.sample(&mut rng);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let dist = ValueDistribution::integers(3, 3).unwrap();
        assert_eq!(dist.sample(&mut rng), 3.0);
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            ValueDistribution::integers(5, 1),
            Err(GenError::InvalidRange { low: 5, high: 1 })
        ));
        assert!(ValueDistribution::Integers { low: 2, high: 1 }
            .validate()
            .is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "int".parse::<ValueDistribution>().unwrap(),
            ValueDistribution::default()
        );
        assert_eq!(
            "Unit".parse::<ValueDistribution>().unwrap(),
            ValueDistribution::Unit
        );
        assert!(matches!(
            "normal".parse::<ValueDistribution>(),
            Err(GenError::UnknownDistribution(_))
        ));
    }

    #[test]
    fn test_default_is_zero_to_fourteen() {
        assert_eq!(
            ValueDistribution::default(),
            ValueDistribution::Integers { low: 0, high: 14 }
        );
    }
}
