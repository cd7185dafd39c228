use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An exact non-negative rational number, always kept in lowest terms.
///
/// Shares of the estate are tracked as `Fraction`s until the very last step so
/// that repeated splitting never drifts the way binary floating point does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fraction {
    num: u128,
    den: u128,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl Fraction {
    pub const ZERO: Fraction = Fraction { num: 0, den: 1 };
    pub const ONE: Fraction = Fraction { num: 1, den: 1 };

    /// Returns `None` when `den` is zero.
    pub fn new(num: u128, den: u128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        if num == 0 {
            return Some(Self::ZERO);
        }
        let g = gcd(num, den);
        Some(Self {
            num: num / g,
            den: den / g,
        })
    }

    pub const fn numer(&self) -> u128 {
        self.num
    }

    pub const fn denom(&self) -> u128 {
        self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    pub fn exceeds_one(&self) -> bool {
        self.num > self.den
    }

    pub fn checked_add(self, other: Fraction) -> Option<Fraction> {
        let g = gcd(self.den, other.den);
        let lhs = self.num.checked_mul(other.den / g)?;
        let rhs = other.num.checked_mul(self.den / g)?;
        let den = (self.den / g).checked_mul(other.den)?;
        Fraction::new(lhs.checked_add(rhs)?, den)
    }

    /// `None` when the difference would be negative (or on overflow).
    pub fn checked_sub(self, other: Fraction) -> Option<Fraction> {
        let g = gcd(self.den, other.den);
        let lhs = self.num.checked_mul(other.den / g)?;
        let rhs = other.num.checked_mul(self.den / g)?;
        let den = (self.den / g).checked_mul(other.den)?;
        Fraction::new(lhs.checked_sub(rhs)?, den)
    }

    pub fn checked_mul(self, other: Fraction) -> Option<Fraction> {
        // Cross-reduce first to keep the intermediates small.
        let g1 = gcd(self.num, other.den).max(1);
        let g2 = gcd(other.num, self.den).max(1);
        let num = (self.num / g1).checked_mul(other.num / g2)?;
        let den = (self.den / g2).checked_mul(other.den / g1)?;
        Fraction::new(num, den)
    }

    /// Applies the fraction to a whole number of minor units, rounding half up.
    pub fn of_minor_units(&self, amount: u64) -> Option<u64> {
        let scaled = u128::from(amount).checked_mul(self.num)?;
        let mut quotient = scaled / self.den;
        let remainder = scaled % self.den;
        if remainder.checked_mul(2)? >= self.den {
            quotient += 1;
        }
        u64::try_from(quotient).ok()
    }

    /// Applies the fraction to a whole number of minor units and splits the
    /// exact product into its whole part and the fraction of a unit left over.
    pub fn split_minor_units(&self, amount: u64) -> Option<(u64, Fraction)> {
        let scaled = u128::from(amount).checked_mul(self.num)?;
        let whole = u64::try_from(scaled / self.den).ok()?;
        let rest = Fraction::new(scaled % self.den, self.den)?;
        Some((whole, rest))
    }
}

/// Compares `a_num/a_den` with `b_num/b_den` without multiplying, by comparing
/// integer parts and then the reciprocals of the remainders.
fn cmp_ratio(a_num: u128, a_den: u128, b_num: u128, b_den: u128) -> Ordering {
    let (a_whole, a_rest) = (a_num / a_den, a_num % a_den);
    let (b_whole, b_rest) = (b_num / b_den, b_num % b_den);
    a_whole
        .cmp(&b_whole)
        .then_with(|| match (a_rest, b_rest) {
            (0, 0) => Ordering::Equal,
            (0, _) => Ordering::Less,
            (_, 0) => Ordering::Greater,
            _ => cmp_ratio(b_den, b_rest, a_den, a_rest),
        })
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        match (
            self.num.checked_mul(other.den),
            other.num.checked_mul(self.den),
        ) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            _ => cmp_ratio(self.num, self.den, other.num, other.den),
        }
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Fraction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s.trim(), "1"),
        };
        let num = num
            .parse::<u128>()
            .map_err(|e| format!("invalid numerator in '{}': {}", s, e))?;
        let den = den
            .parse::<u128>()
            .map_err(|e| format!("invalid denominator in '{}': {}", s, e))?;
        Fraction::new(num, den).ok_or_else(|| format!("zero denominator in '{}'", s))
    }
}

impl TryFrom<String> for Fraction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fraction> for String {
    fn from(value: Fraction) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: u128, d: u128) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn test_new_reduces_to_lowest_terms() {
        let f = frac(4, 24);
        assert_eq!((f.numer(), f.denom()), (1, 6));
        assert_eq!(frac(0, 7), Fraction::ZERO);
        assert!(Fraction::new(1, 0).is_none());
    }

    #[test]
    fn test_arithmetic() {
        let used = frac(1, 8).checked_add(frac(1, 6)).unwrap();
        assert_eq!(used, frac(7, 24));
        assert_eq!(Fraction::ONE.checked_sub(used).unwrap(), frac(17, 24));
        assert_eq!(frac(17, 24).checked_mul(frac(2, 3)).unwrap(), frac(17, 36));
        assert!(frac(1, 6).checked_sub(frac(1, 3)).is_none());
    }

    #[test]
    fn test_ordering_and_overcommitment() {
        assert!(frac(1, 6) < frac(1, 4));
        let total = frac(1, 4)
            .checked_add(frac(1, 6))
            .and_then(|f| f.checked_add(frac(1, 6)))
            .and_then(|f| f.checked_add(frac(2, 3)))
            .unwrap();
        assert_eq!(total, frac(5, 4));
        assert!(total.exceeds_one());
        assert!(!Fraction::ONE.exceeds_one());
    }

    #[test]
    fn test_of_minor_units_rounds_half_up() {
        assert_eq!(frac(1, 4).of_minor_units(800_000), Some(200_000));
        assert_eq!(frac(2, 3).of_minor_units(100), Some(67));
        assert_eq!(frac(1, 3).of_minor_units(100), Some(33));
        assert_eq!(frac(1, 2).of_minor_units(5), Some(3));
    }

    #[test]
    fn test_ordering_does_not_overflow() {
        let big = u128::MAX - 1;
        assert!(frac(big, u128::MAX) < Fraction::ONE);
        assert!(frac(u128::MAX, big) > Fraction::ONE);
        assert!(frac(big, u128::MAX) > frac(big - 2, u128::MAX - 2));
        assert_eq!(
            frac(u128::MAX, 3).cmp(&frac(u128::MAX, 3)),
            std::cmp::Ordering::Equal
        );
        assert!(frac(u128::MAX, 7) > frac(u128::MAX, 8));
    }

    #[test]
    fn test_split_minor_units() {
        assert_eq!(frac(1, 6).split_minor_units(5), Some((0, frac(5, 6))));
        assert_eq!(frac(13, 24).split_minor_units(5), Some((2, frac(17, 24))));
        assert_eq!(frac(1, 4).split_minor_units(800_000), Some((200_000, Fraction::ZERO)));
    }

    #[test]
    fn test_string_form() {
        assert_eq!(frac(2, 3).to_string(), "2/3");
        assert_eq!(Fraction::ONE.to_string(), "1");
        assert_eq!("17/24".parse::<Fraction>().unwrap(), frac(17, 24));
        assert!("1/0".parse::<Fraction>().is_err());
        let json = serde_json::to_string(&frac(1, 8)).unwrap();
        assert_eq!(json, "\"1/8\"");
    }
}
