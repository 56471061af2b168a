//! `Int<N>` -- the two's-complement signed counterpart of
//! [`UInt<N>`](crate::UInt).
//!
//! The bit pattern is stored in an unsigned value; the highest bit is the
//! sign. Overflow is reported as a carry `bool` the same way the unsigned
//! layer does it, with the signed rules: adding values of equal sign may
//! overflow, adding values of opposite sign never does.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::MathError;
use crate::uint::UInt;
use crate::words::Word;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Int<const N: usize> {
    pub(crate) u: UInt<N>,
}

impl<const N: usize> Int<N> {
    pub fn zero() -> Self {
        Self { u: UInt::zero() }
    }

    pub fn one() -> Self {
        Self { u: UInt::one() }
    }

    /// Largest value: all bits set except the sign bit.
    pub fn max_value() -> Self {
        let mut r = Self { u: UInt::max_value() };
        r.u.tab[N - 1] &= !crate::words::HIGHEST_BIT;
        r
    }

    /// Smallest value: only the sign bit set.
    pub fn min_value() -> Self {
        let mut r = Self::zero();
        r.u.tab[N - 1] = crate::words::HIGHEST_BIT;
        r
    }

    pub fn set_zero(&mut self) {
        self.u.set_zero();
    }

    pub fn set_one(&mut self) {
        self.u.set_one();
    }

    /// Sets the value to -1 (all bits set).
    pub fn set_sign_one(&mut self) {
        self.u.set_max();
    }

    pub fn set_max(&mut self) {
        *self = Self::max_value();
    }

    pub fn set_min(&mut self) {
        *self = Self::min_value();
    }

    pub fn is_zero(&self) -> bool {
        self.u.is_zero()
    }

    /// True for negative values.
    pub fn is_sign(&self) -> bool {
        self.u.is_the_highest_bit_set()
    }

    /// Negates the value. Fails (returning `true`, value unchanged) only
    /// for the minimum, whose negation does not fit.
    pub fn change_sign(&mut self) -> bool {
        if self.u.is_only_the_highest_bit_set() {
            return true;
        }

        let mut t = UInt::zero();
        t.sub(&self.u);
        self.u = t;
        false
    }

    /// Makes the value negative; no-op if it already is.
    pub fn set_sign(&mut self) {
        if !self.is_sign() {
            self.change_sign();
        }
    }

    /// Makes the value non-negative. Fails only for the minimum.
    pub fn abs(&mut self) -> bool {
        if self.is_sign() {
            self.change_sign()
        } else {
            false
        }
    }

    /// `self += other`; returns `true` on signed overflow.
    pub fn add(&mut self, other: &Self) -> bool {
        let sign1 = self.is_sign();
        let sign2 = other.is_sign();

        self.u.add(&other.u);

        // overflow is only possible when the operands have equal signs and
        // the result does not share it
        sign1 == sign2 && self.is_sign() != sign1
    }

    /// `self -= other`; returns `true` on signed overflow.
    pub fn sub(&mut self, other: &Self) -> bool {
        let sign1 = self.is_sign();
        let sign2 = other.is_sign();

        self.u.sub(&other.u);

        sign1 != sign2 && self.is_sign() != sign1
    }

    pub fn add_one(&mut self) -> bool {
        self.add(&Self::one())
    }

    pub fn sub_one(&mut self) -> bool {
        self.sub(&Self::one())
    }

    /// `self += value`; returns `true` on signed overflow.
    pub fn add_i64(&mut self, value: i64) -> bool {
        self.add(&Self::from_i64(value))
    }

    /// `self -= value`; returns `true` on signed overflow.
    pub fn sub_i64(&mut self, value: i64) -> bool {
        self.sub(&Self::from_i64(value))
    }

    /// `self *= other`; returns `true` on signed overflow.
    pub fn mul(&mut self, other: &Self) -> bool {
        let sign1 = self.is_sign();
        let sign2 = other.is_sign();

        let mut a = *self;
        let mut b = *other;
        a.abs();
        b.abs();

        if a.u.mul(&b.u) {
            return true;
        }

        if a.u.is_the_highest_bit_set() {
            // a magnitude at the sign bit only represents the minimum
            if sign1 == sign2 || !a.u.is_only_the_highest_bit_set() {
                return true;
            }
            self.u = a.u;
            return false;
        }

        if sign1 != sign2 {
            a.set_sign();
        }
        self.u = a.u;
        false
    }

    /// `self /= divisor`, truncating toward zero; returns the remainder
    /// (whose sign follows the dividend), or `None` when the divisor is
    /// zero.
    pub fn div_rem(&mut self, divisor: &Self) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }

        let dividend_sign = self.is_sign();
        let divisor_sign = divisor.is_sign();

        let mut a = *self;
        let mut b = *divisor;
        a.abs();
        b.abs();

        let rem_u = a.u.div_rem(&b.u)?;

        let mut rem = Self { u: rem_u };
        if dividend_sign {
            rem.set_sign();
        }
        if dividend_sign != divisor_sign {
            a.set_sign();
        }
        self.u = a.u;
        Some(rem)
    }

    pub fn from_i64(value: i64) -> Self {
        let mut r = if value < 0 {
            Self { u: UInt::max_value() }
        } else {
            Self::zero()
        };
        r.u.tab[0] = value as u64;
        r
    }

    /// The value as an `i64`, or `None` when it does not fit.
    pub fn to_i64(&self) -> Option<i64> {
        let low = self.u.tab[0] as i64;
        let extension: Word = if low < 0 { Word::MAX } else { 0 };

        if self.u.tab[1..].iter().all(|&w| w == extension) {
            Some(low)
        } else {
            None
        }
    }

    /// Conversion from a different width, sign-extending or truncating.
    /// The flag is `true` when the value does not survive the truncation.
    pub fn from_width<const M: usize>(other: &Int<M>) -> (Self, bool) {
        let extension: Word = if other.is_sign() { Word::MAX } else { 0 };

        let mut r = Self::zero();
        for (i, w) in r.u.tab.iter_mut().enumerate() {
            *w = if i < M { other.u.tab[i] } else { extension };
        }

        let lost = M > N
            && (other.u.tab[N..].iter().any(|&w| w != extension)
                || r.is_sign() != other.is_sign());
        (r, lost)
    }

    /// Low limb reinterpreted as signed, ignoring the rest. Only
    /// meaningful when the value is known to be small.
    pub(crate) fn low_i64(&self) -> i64 {
        self.u.tab[0] as i64
    }

    /// The underlying bit pattern.
    pub fn as_uint(&self) -> &UInt<N> {
        &self.u
    }

    pub(crate) fn as_uint_mut(&mut self) -> &mut UInt<N> {
        &mut self.u
    }

    /// Renders the value in `base` (2..=16), with a leading `-` when
    /// negative.
    pub fn to_radix(&self, base: u32) -> Result<String, MathError> {
        let mut magnitude = self.u;
        if self.is_sign() {
            // wrapping negate; for the minimum this is already its own
            // unsigned magnitude
            let mut t = UInt::zero();
            t.sub(&magnitude);
            magnitude = t;
        }

        let digits = magnitude.to_radix(base)?;
        if self.is_sign() {
            Ok(format!("-{digits}"))
        } else {
            Ok(digits)
        }
    }

    /// Parses the whole of `s` in `base`, with an optional leading sign.
    pub fn from_radix(s: &str, base: u32) -> Result<Self, MathError> {
        if !(2..=16).contains(&base) {
            return Err(MathError::ImproperArgument);
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let magnitude = UInt::<N>::from_radix(digits, base)?;

        let mut r = Self { u: magnitude };
        if negative {
            if magnitude > Int::<N>::min_value().u {
                return Err(MathError::Overflow);
            }
            // the minimum's magnitude maps onto itself
            let mut t = UInt::zero();
            t.sub(&r.u);
            r.u = t;
        } else if r.is_sign() {
            return Err(MathError::Overflow);
        }

        Ok(r)
    }
}

impl<const N: usize> Default for Int<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> From<i64> for Int<N> {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

/// Reinterprets the bit pattern; values with the top bit set come out
/// negative.
impl<const N: usize> From<UInt<N>> for Int<N> {
    fn from(u: UInt<N>) -> Self {
        Self { u }
    }
}

impl<const N: usize> Ord for Int<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // the top limb compares as signed, the rest as unsigned
        let a = self.u.tab[N - 1] as i64;
        let b = other.u.tab[N - 1] as i64;
        a.cmp(&b).then_with(|| {
            crate::words::cmp_slices(&self.u.tab[..N - 1], &other.u.tab[..N - 1])
        })
    }
}

impl<const N: usize> PartialOrd for Int<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> fmt::Display for Int<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_radix(10) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("overflow"),
        }
    }
}

impl<const N: usize> fmt::Debug for Int<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Int({self})")
    }
}

impl<const N: usize> FromStr for Int<N> {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_radix(s, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_round_trip_through_strings() {
        assert_eq!(Int::<1>::max_value().to_string(), "9223372036854775807");
        assert_eq!(Int::<1>::min_value().to_string(), "-9223372036854775808");

        let min: Int<1> = "-9223372036854775808".parse().unwrap();
        assert_eq!(min, Int::min_value());
        assert!("9223372036854775808".parse::<Int<1>>().is_err());
        assert!("-9223372036854775809".parse::<Int<1>>().is_err());
    }

    #[test]
    fn change_sign_fails_only_for_min() {
        let mut a = Int::<2>::min_value();
        assert!(a.change_sign());
        assert_eq!(a, Int::min_value());

        let mut b = Int::<2>::from_i64(-5);
        assert!(!b.change_sign());
        assert_eq!(b, Int::from_i64(5));
    }

    #[test]
    fn add_overflow_rules() {
        let mut a = Int::<1>::max_value();
        assert!(a.add(&Int::one()));

        let mut b = Int::<1>::min_value();
        assert!(b.add(&Int::from_i64(-1)));

        // opposite signs never overflow
        let mut c = Int::<1>::max_value();
        assert!(!c.add(&Int::from_i64(-1)));
        assert_eq!(c.to_i64(), Some(i64::MAX - 1));
    }

    #[test]
    fn sub_overflow_rules() {
        let mut a = Int::<1>::min_value();
        assert!(a.sub(&Int::one()));

        let mut b = Int::<1>::max_value();
        assert!(b.sub(&Int::from_i64(-1)));

        let mut c = Int::<1>::from_i64(-3);
        assert!(!c.sub(&Int::from_i64(-10)));
        assert_eq!(c.to_i64(), Some(7));
    }

    #[test]
    fn mul_signs_and_min_exception() {
        let mut a = Int::<1>::from_i64(-6);
        assert!(!a.mul(&Int::from_i64(7)));
        assert_eq!(a.to_i64(), Some(-42));

        let mut b = Int::<1>::from_i64(-6);
        assert!(!b.mul(&Int::from_i64(-7)));
        assert_eq!(b.to_i64(), Some(42));

        // min = -2^63 is representable exactly once
        let mut c = Int::<1>::from_i64(i64::MIN / 2);
        assert!(!c.mul(&Int::from_i64(2)));
        assert_eq!(c, Int::min_value());

        let mut d = Int::<1>::from_i64(i64::MIN / 2);
        assert!(d.mul(&Int::from_i64(-2)));
    }

    #[test]
    fn division_truncates_toward_zero() {
        let cases = [
            (7, 2, 3, 1),
            (-7, 2, -3, -1),
            (7, -2, -3, 1),
            (-7, -2, 3, -1),
        ];
        for (a, b, q, r) in cases {
            let mut x = Int::<2>::from_i64(a);
            let rem = x.div_rem(&Int::from_i64(b)).unwrap();
            assert_eq!(x.to_i64(), Some(q), "{a} / {b}");
            assert_eq!(rem.to_i64(), Some(r), "{a} % {b}");
        }

        let mut x = Int::<2>::from_i64(5);
        assert!(x.div_rem(&Int::zero()).is_none());
    }

    #[test]
    fn sign_extension_and_to_i64() {
        let a = Int::<3>::from_i64(-1);
        assert_eq!(a.u.tab, [u64::MAX; 3]);
        assert_eq!(a.to_i64(), Some(-1));

        let mut big = Int::<3>::max_value();
        assert_eq!(big.to_i64(), None);
        big.set_min();
        assert_eq!(big.to_i64(), None);
    }

    #[test]
    fn width_conversions() {
        for v in [0i64, 1, -1, i64::MIN, i64::MAX] {
            let narrow = Int::<1>::from_i64(v);
            let (wide, lost) = Int::<3>::from_width(&narrow);
            assert!(!lost);
            assert_eq!(wide, Int::from_i64(v));

            let (back, lost) = Int::<1>::from_width(&wide);
            assert!(!lost);
            assert_eq!(back, narrow);
        }

        // a value wider than the target is reported
        let wide = Int::<2>::from_radix("18446744073709551616", 10).unwrap();
        let (_, lost) = Int::<1>::from_width(&wide);
        assert!(lost);

        // truncation that flips the sign is reported too
        let wide = Int::<2>::from_radix("9223372036854775808", 10).unwrap();
        let (narrow, lost) = Int::<1>::from_width(&wide);
        assert!(lost);
        assert_eq!(narrow, Int::min_value());
    }

    #[test]
    fn uint_reinterpretation() {
        assert_eq!(Int::<1>::from(UInt::from(5)), Int::from_i64(5));
        assert_eq!(Int::<1>::from(UInt::max_value()), Int::from_i64(-1));
        assert!(Int::<2>::from(UInt::<2>::max_value()).is_sign());
    }

    #[test]
    fn ordering_mixes_signs() {
        let values = [-100i64, -1, 0, 1, 100];
        for &a in &values {
            for &b in &values {
                let ia = Int::<2>::from_i64(a);
                let ib = Int::<2>::from_i64(b);
                assert_eq!(ia.cmp(&ib), a.cmp(&b), "{a} vs {b}");
            }
        }
        assert!(Int::<2>::min_value() < Int::max_value());
    }
}
