use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops;
use std::str::FromStr;

use crate::error::MatrixError;

/// Exact rational number, always in lowest terms with a positive denominator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rational {
    num: BigInt,
    den: BigInt,
}

impl Rational {
    pub fn new(num: BigInt, den: BigInt) -> Result<Self, MatrixError> {
        if den.is_zero() {
            return Err(MatrixError::ZeroDenominator);
        }
        Ok(Self::reduced(num, den))
    }

    pub fn from_integer(value: i64) -> Self {
        Rational {
            num: BigInt::from(value),
            den: BigInt::one(),
        }
    }

    pub fn numer(&self) -> &BigInt {
        &self.num
    }

    pub fn denom(&self) -> &BigInt {
        &self.den
    }

    pub fn is_integer(&self) -> bool {
        self.den.is_one()
    }

    // Callers guarantee a non-zero denominator.
    fn reduced(num: BigInt, den: BigInt) -> Self {
        let g = num.gcd(&den);
        let (num, den) = (num / &g, den / &g);
        if den.is_negative() {
            Rational {
                num: -num,
                den: -den,
            }
        } else {
            Rational { num, den }
        }
    }
}

impl FromStr for Rational {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let (num, den) = match s.split_once('/') {
            Some((num, den)) => (num.trim(), den.trim()),
            None => (s.trim(), "1"),
        };
        let parse = |part: &str| {
            BigInt::parse_bytes(part.as_bytes(), 10).ok_or(format!("Invalid number: {s:?}"))
        };
        Rational::new(parse(num)?, parse(den)?).map_err(|e| e.to_string())
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::from_integer(value)
    }
}

impl ops::Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        if self.den == rhs.den {
            return Rational::reduced(self.num + rhs.num, self.den);
        }
        Rational::reduced(
            &self.num * &rhs.den + &rhs.num * &self.den,
            self.den * rhs.den,
        )
    }
}

impl ops::Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        self + (-rhs)
    }
}

impl ops::Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            num: -self.num,
            den: self.den,
        }
    }
}

impl ops::Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        Rational::reduced(self.num * rhs.num, self.den * rhs.den)
    }
}

/// Panics on a zero divisor, like integer division. Matrix code checks
/// divisors before dividing.
impl ops::Div for Rational {
    type Output = Rational;

    fn div(self, rhs: Rational) -> Rational {
        assert!(!rhs.num.is_zero(), "Rational division by zero");
        Rational::reduced(self.num * rhs.den, self.den * rhs.num)
    }
}

impl Zero for Rational {
    fn zero() -> Rational {
        Rational::from_integer(0)
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

impl One for Rational {
    fn one() -> Rational {
        Rational::from_integer(1)
    }
}

impl ToPrimitive for Rational {
    fn to_i64(&self) -> Option<i64> {
        (&self.num / &self.den).to_i64()
    }

    fn to_u64(&self) -> Option<u64> {
        (&self.num / &self.den).to_u64()
    }

    fn to_f64(&self) -> Option<f64> {
        let value = self.num.to_f64()? / self.den.to_f64()?;
        value.is_finite().then_some(value)
    }
}

impl FromPrimitive for Rational {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Rational::from_integer(n))
    }

    fn from_u64(n: u64) -> Option<Self> {
        Some(Rational {
            num: BigInt::from(n),
            den: BigInt::one(),
        })
    }
}

impl std::iter::Sum<Rational> for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Rational {
        iter.fold(Rational::zero(), |acc, x| acc + x)
    }
}

impl PartialEq<i64> for Rational {
    fn eq(&self, rhs: &i64) -> bool {
        self.num == &self.den * rhs
    }
}

impl Ord for Rational {
    fn cmp(&self, rhs: &Rational) -> Ordering {
        (&self.num * &rhs.den).cmp(&(&rhs.num * &self.den))
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, rhs: &Rational) -> Option<Ordering> {
        Some(self.cmp(rhs))
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Rational {
        s.parse().unwrap()
    }

    #[test]
    fn test_rational_parse_and_reduce() {
        assert_eq!(q("6/-8"), q("-3/4"));
        assert_eq!(q("6/-8").to_string(), "-3/4");
        assert_eq!(q(" 42 ").to_string(), "42");
        assert_eq!(q("0/5"), Rational::zero());
        assert!("1/0".parse::<Rational>().is_err());
        assert!("x/2".parse::<Rational>().is_err());
    }

    #[test]
    fn test_rational_zero_denominator() {
        assert_eq!(
            Rational::new(1.into(), 0.into()),
            Err(MatrixError::ZeroDenominator)
        );
        assert_eq!("3/0".parse::<Rational>().unwrap_err(), "zero denominator");
        assert_eq!(Rational::from_u64(5), Some(q("5")));
    }

    #[test]
    fn test_rational_arithmetic() {
        assert_eq!(q("1/2") + q("1/3"), q("5/6"));
        assert_eq!(q("1/2") - q("3/4"), q("-1/4"));
        assert_eq!(q("2/3") * q("9/4"), q("3/2"));
        assert_eq!(q("2/3") / q("4/9"), q("3/2"));
        assert_eq!(q("1/4") + q("3/4"), 1);
        assert_eq!(
            vec![q("1/2"), q("1/4"), q("1/4")].into_iter().sum::<Rational>(),
            1
        );
    }

    #[test]
    fn test_rational_ordering_and_conversion() {
        assert!(q("-1/2") < q("1/3"));
        assert!(q("7/3") > q("2"));
        assert_eq!(q("7/2").to_f64(), Some(3.5));
        assert_eq!(q("7/2").to_i64(), Some(3));
        assert_eq!(q("-7/2").to_u64(), None);
    }

    #[test]
    #[should_panic]
    fn test_rational_div_zero_panics() {
        let _ = q("1") / Rational::zero();
    }
}
