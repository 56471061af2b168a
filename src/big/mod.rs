//! `Big<E, M>` -- binary floating point with an `E`-limb signed exponent
//! and an `M`-limb mantissa.
//!
//! The value is `(-1)^sign * mantissa * 2^exponent`. A standardized value
//! has the highest mantissa bit set; zero is the one exception and is
//! always stored as `+0` with a zero exponent. Every public operation
//! returns a standardized value.

pub mod consts;
pub mod string;

use std::cmp::Ordering;

use crate::error::MathError;
use crate::int::Int;
use crate::uint::UInt;
use crate::words::{self, Word, HIGHEST_BIT, WORD_BITS};
use crate::MAX_SERIES_ITERATIONS;

#[derive(Clone, Copy, Debug)]
pub struct Big<const E: usize, const M: usize> {
    pub(crate) exponent: Int<E>,
    pub(crate) mantissa: UInt<M>,
    pub(crate) sign: bool,
}

impl<const E: usize, const M: usize> Big<E, M> {
    /// Mantissa width in bits.
    pub(crate) const MANTISSA_BITS: usize = M * WORD_BITS;

    pub fn zero() -> Self {
        Self {
            exponent: Int::zero(),
            mantissa: UInt::zero(),
            sign: false,
        }
    }

    pub fn one() -> Self {
        let mut r = Self::zero();
        r.set_one();
        r
    }

    pub fn set_zero(&mut self) {
        self.exponent.set_zero();
        self.mantissa.set_zero();
        self.sign = false;
    }

    pub fn set_one(&mut self) {
        self.mantissa.set_zero();
        self.mantissa.tab[M - 1] = HIGHEST_BIT;
        self.exponent = Int::from_i64(-((Self::MANTISSA_BITS - 1) as i64));
        self.sign = false;
    }

    /// Sets the value 0.5.
    pub fn set_half(&mut self) {
        self.set_one();
        self.exponent.sub_one();
    }

    /// Largest finite value.
    pub fn set_max(&mut self) {
        self.mantissa.set_max();
        self.exponent.set_max();
        self.sign = false;
    }

    /// Most negative finite value.
    pub fn set_min(&mut self) {
        self.set_max();
        self.sign = true;
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_sign(&self) -> bool {
        self.sign
    }

    pub fn abs(&mut self) {
        self.sign = false;
    }

    /// Makes the value negative; zero is left alone.
    pub fn set_sign(&mut self) {
        if !self.is_zero() {
            self.sign = true;
        }
    }

    pub fn change_sign(&mut self) {
        if !self.is_zero() {
            self.sign = !self.sign;
        }
    }

    /// Resets a zero mantissa to the canonical `+0` form; returns whether
    /// the value was zero.
    fn correct_zero(&mut self) -> bool {
        if self.mantissa.is_zero() {
            self.exponent.set_zero();
            self.sign = false;
            true
        } else {
            false
        }
    }

    /// Restores the standardized form after an operation that may have
    /// left the highest mantissa bit clear. Returns `true` on exponent
    /// underflow.
    pub fn standardize(&mut self) -> bool {
        if self.mantissa.is_the_highest_bit_set() {
            return false;
        }
        if self.correct_zero() {
            return false;
        }

        let moved = self.mantissa.compensation_to_left();
        self.exponent.sub_i64(moved as i64)
    }

    /// Parity of the integer part.
    pub fn mod2(&self) -> bool {
        if !self.exponent.is_sign() && !self.exponent.is_zero() {
            // the lowest represented bit already has weight 2 or more
            return false;
        }
        if self.exponent <= Int::from_i64(-(Self::MANTISSA_BITS as i64)) {
            return false;
        }

        let e = (-self.exponent.low_i64()) as usize;
        self.mantissa.tab[e / WORD_BITS] >> (e % WORD_BITS) & 1 != 0
    }

    /// `|self| < |other|`.
    pub fn smaller_without_sign_than(&self, other: &Self) -> bool {
        if self.is_zero() {
            return !other.is_zero();
        }
        if other.is_zero() {
            return false;
        }

        match self.exponent.cmp(&other.exponent) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.mantissa < other.mantissa,
        }
    }

    /// `|self| > |other|`.
    pub fn greater_without_sign_than(&self, other: &Self) -> bool {
        other.smaller_without_sign_than(self)
    }

    /// `|self| == |other|`.
    pub fn equal_without_sign(&self, other: &Self) -> bool {
        if self.is_zero() {
            return other.is_zero();
        }
        self.exponent == other.exponent && self.mantissa == other.mantissa
    }

    /// `self += other`; returns `true` on exponent overflow.
    pub fn add(&mut self, mut other: Self) -> bool {
        let mut exp_offset = self.exponent;
        exp_offset.sub(&other.exponent);
        exp_offset.abs();

        // keep the larger magnitude in self
        if self.smaller_without_sign_than(&other) {
            std::mem::swap(self, &mut other);
        }

        if other.is_zero() {
            return false;
        }

        let width = Int::<E>::from_i64(Self::MANTISSA_BITS as i64);
        match exp_offset.cmp(&width) {
            Ordering::Greater => {
                // the smaller value is below the last mantissa bit
                return false;
            }
            Ordering::Equal => {
                // only the rounding unit of the smaller value survives
                other.mantissa.set_one();
            }
            Ordering::Less => {
                other.mantissa.rcr(exp_offset.low_i64() as usize, false);
            }
        }

        let mut carry = false;
        if self.sign == other.sign {
            if self.mantissa.add(&other.mantissa) {
                self.mantissa.rcr1(true);
                carry = self.exponent.add_one();
            }
        } else if self.mantissa.sub(&other.mantissa) {
            // cannot happen after the magnitude swap, kept symmetrical
            self.mantissa.rcl1(true);
            carry = self.exponent.sub_one();
        }

        carry | self.standardize()
    }

    /// `self -= other`; returns `true` on exponent overflow.
    pub fn sub(&mut self, mut other: Self) -> bool {
        other.change_sign();
        self.add(other)
    }

    /// `self *= other`; returns `true` on exponent overflow.
    pub fn mul(&mut self, other: &Self) -> bool {
        if self.is_zero() {
            return false;
        }
        if other.is_zero() {
            self.set_zero();
            return false;
        }

        let mut product = vec![0 as Word; 2 * M];
        words::mul_slices(&self.mantissa.tab, &other.mantissa.tab, &mut product);

        let moved = words::compensation_to_left(&mut product);

        let mut carry = false;
        let exp_add = Self::MANTISSA_BITS - moved;
        if exp_add > 0 {
            carry |= self.exponent.add_i64(exp_add as i64);
        }
        carry |= self.exponent.add(&other.exponent);

        self.mantissa.tab.copy_from_slice(&product[M..]);
        self.sign = self.sign != other.sign;

        carry | self.standardize()
    }

    /// `self /= other`; returns `true` on division by zero or exponent
    /// overflow.
    pub fn div(&mut self, other: &Self) -> bool {
        if other.is_zero() {
            return true;
        }
        if self.is_zero() {
            return false;
        }

        // dividend shifted up a full mantissa width so the quotient keeps
        // a full mantissa of precision
        let mut dividend = vec![0 as Word; 2 * M];
        dividend[M..].copy_from_slice(&self.mantissa.tab);

        let mut divisor = vec![0 as Word; 2 * M];
        divisor[..M].copy_from_slice(&other.mantissa.tab);

        if words::div_rem(&mut dividend, &divisor, None) {
            return true;
        }

        let moved = words::compensation_to_left(&mut dividend);

        let mut carry = self.exponent.sub_i64(moved as i64);
        carry |= self.exponent.sub(&other.exponent);

        self.mantissa.tab.copy_from_slice(&dividend[M..]);
        self.sign = self.sign != other.sign;

        carry | self.standardize()
    }

    /// `self = self^n` for a machine-word exponent.
    pub fn pow_uint(&mut self, mut n: u64) -> Result<(), MathError> {
        if self.is_zero() {
            if n == 0 {
                return Err(MathError::ImproperArgument);
            }
            return Ok(());
        }

        let mut start = *self;
        let mut result = Self::one();
        let mut carry = false;

        while !carry {
            if n & 1 != 0 {
                carry |= result.mul(&start);
            }
            n >>= 1;
            if n == 0 {
                break;
            }
            let s = start;
            carry |= start.mul(&s);
        }

        if carry {
            return Err(MathError::Overflow);
        }
        *self = result;
        Ok(())
    }

    /// `self = self^n` for a signed machine-word exponent.
    pub fn pow_int(&mut self, n: i64) -> Result<(), MathError> {
        if n >= 0 {
            return self.pow_uint(n as u64);
        }

        if self.is_zero() {
            return Err(MathError::ImproperArgument);
        }

        self.pow_uint(n.unsigned_abs())?;

        let mut result = Self::one();
        if result.div(self) {
            return Err(MathError::Overflow);
        }
        *self = result;
        Ok(())
    }

    /// `self = self^pow` where `pow` is a non-negative integer held as a
    /// `Big` (its sign is ignored, its fraction must be zero).
    pub fn pow_big_uint(&mut self, pow: &Self) -> Result<(), MathError> {
        let mut pow = *pow;
        pow.abs();

        if self.is_zero() {
            if pow.is_zero() {
                return Err(MathError::ImproperArgument);
            }
            return Ok(());
        }

        let one = Self::one();
        let mut start = *self;
        let mut result = one;
        let mut carry = false;

        // pow is halved by decrementing its exponent; mod2 reads the bit
        // that just became the integer part's lowest
        while !carry && !pow.smaller_without_sign_than(&one) {
            if pow.mod2() {
                carry |= result.mul(&start);
            }
            let s = start;
            carry |= start.mul(&s);
            carry |= pow.exponent.sub_one();
        }

        if carry {
            return Err(MathError::Overflow);
        }
        *self = result;
        Ok(())
    }

    /// `self = self^pow` where `pow` is an integer held as a `Big`.
    pub fn pow_big_int(&mut self, pow: &Self) -> Result<(), MathError> {
        if !pow.is_sign() {
            return self.pow_big_uint(pow);
        }

        if self.is_zero() {
            return Err(MathError::ImproperArgument);
        }

        self.pow_big_uint(pow)?;

        let mut result = Self::one();
        if result.div(self) {
            return Err(MathError::Overflow);
        }
        *self = result;
        Ok(())
    }

    /// `self = self^pow` for an arbitrary real exponent.
    ///
    /// Zero raised to a non-positive power and a negative value raised to
    /// a fractional power are improper.
    pub fn pow(&mut self, pow: &Self) -> Result<(), MathError> {
        if self.is_zero() {
            if pow.is_sign() || pow.is_zero() {
                return Err(MathError::ImproperArgument);
            }
            return Ok(());
        }

        let mut pow_frac = *pow;
        pow_frac.remain_fraction();
        if pow_frac.is_zero() {
            return self.pow_big_int(pow);
        }

        // fractional exponent: self^pow = e^(pow * ln(self))
        if self.is_sign() {
            return Err(MathError::ImproperArgument);
        }

        let mut t = self.ln()?;
        if t.mul(pow) {
            return Err(MathError::Overflow);
        }
        *self = t.exp()?;
        Ok(())
    }

    /// `e^x` via the Maclaurin series.
    ///
    /// The argument is split as `x = m * 2^k` with `|m| < 1`; the series
    /// runs on the small part and the result is raised to the power-of-two
    /// factor.
    pub fn exp(&self) -> Result<Self, MathError> {
        if self.is_zero() {
            return Ok(Self::one());
        }

        // m: the mantissa scaled into (-1, 1)
        let mut m = *self;
        m.exponent = Int::from_i64(-(Self::MANTISSA_BITS as i64));

        // pow2: the value 2^(exponent + mantissa bits), so self = m * pow2
        let mut pow2 = *self;
        pow2.mantissa.set_zero();
        pow2.mantissa.tab[M - 1] = HIGHEST_BIT;
        let mut carry = pow2.exponent.add_one();
        pow2.abs();

        let one = Self::one();
        let mut result = Self::zero();

        if pow2.greater_without_sign_than(&one) {
            result.exp_surrounding_0(&m);
            result.pow_big_uint(&pow2)?;
        } else {
            // |self| < 1, the series converges on the argument directly
            result.exp_surrounding_0(self);
        }

        carry |= result.standardize();
        if carry {
            return Err(MathError::Overflow);
        }
        Ok(result)
    }

    /// Natural logarithm; improper for non-positive arguments.
    pub fn ln(&self) -> Result<Self, MathError> {
        if self.is_sign() || self.is_zero() {
            return Err(MathError::ImproperArgument);
        }

        // m: the mantissa scaled into [1, 2)
        let mut m = *self;
        m.exponent = Int::from_i64(-((Self::MANTISSA_BITS - 1) as i64));

        let mut result = Self::zero();
        result.ln_surrounding_1(&m);

        // ln(self) = ln(m) + (exponent + mantissa bits - 1) * ln(2)
        let mut exp_part = Self::from_int(&self.exponent);
        let mut carry = exp_part.add(Self::from_u64((Self::MANTISSA_BITS - 1) as u64));

        let mut ln2 = Self::zero();
        ln2.set_ln2();
        carry |= exp_part.mul(&ln2);
        carry |= result.add(exp_part);

        if carry {
            return Err(MathError::Overflow);
        }
        Ok(result)
    }

    /// Logarithm to an arbitrary base; the base must be positive and not
    /// one.
    pub fn log(&self, base: &Self) -> Result<Self, MathError> {
        if base.is_sign() || base.is_zero() || *base == Self::one() {
            return Err(MathError::ImproperArgument);
        }
        if *self == Self::one() {
            return Ok(Self::zero());
        }

        let mut result = self.ln()?;
        let denominator = base.ln()?;
        if result.div(&denominator) {
            return Err(MathError::Overflow);
        }
        Ok(result)
    }

    /// `e^x` for `|x| < 1`: `1 + x + x^2/2! + x^3/3! + ...`
    ///
    /// A carry inside the loop only means the next term no longer
    /// contributes; the accumulated value is still the result.
    fn exp_surrounding_0(&mut self, x: &Self) {
        let one = Self::one();
        let mut numerator = *x;
        let mut denominator = one;
        let mut denominator_i = one;

        self.set_one();
        let mut old_value = *self;

        for i in 1..=MAX_SERIES_ITERATIONS {
            let mut next_part = numerator;
            if next_part.div(&denominator) {
                break;
            }

            self.add(next_part);

            if i % 5 == 0 {
                if old_value == *self {
                    break;
                }
                old_value = *self;
            }

            if denominator_i.add(one) {
                break;
            }
            if denominator.mul(&denominator_i) {
                break;
            }
            if numerator.mul(x) {
                break;
            }
        }
    }

    /// `ln(x)` for `x` in `[1, 2)`:
    /// `2 * (u + u^3/3 + u^5/5 + ...)` with `u = (x-1)/(x+1)`.
    fn ln_surrounding_1(&mut self, x: &Self) {
        let one = Self::one();

        if *x == one {
            self.set_zero();
            return;
        }

        let two = Self::from_u64(2);

        let mut u = *x;
        let mut x_plus_1 = *x;
        u.sub(one);
        x_plus_1.add(one);
        u.div(&x_plus_1);

        let mut u2 = u;
        let su = u;
        u2.mul(&su);

        let mut denominator = one;

        self.set_zero();
        let mut old_value = *self;

        for i in 1..=MAX_SERIES_ITERATIONS {
            let mut next_part = u;
            if next_part.div(&denominator) {
                break;
            }

            self.add(next_part);

            if i % 5 == 0 {
                if old_value == *self {
                    break;
                }
                old_value = *self;
            }

            if u.mul(&u2) {
                break;
            }
            if denominator.add(two) {
                break;
            }
        }

        // times two
        self.exponent.add_one();
    }

    /// Truncates toward zero.
    pub fn skip_fraction(&mut self) {
        if self.is_zero() || !self.exponent.is_sign() {
            return;
        }

        if self.exponent <= Int::from_i64(-(Self::MANTISSA_BITS as i64)) {
            // purely fractional
            self.set_zero();
            return;
        }

        let e = (-self.exponent.low_i64()) as usize;
        self.mantissa.clear_first_bits(e);
        // the highest mantissa bit is untouched, still standardized
    }

    /// Keeps only the fractional part.
    pub fn remain_fraction(&mut self) {
        if self.is_zero() {
            return;
        }
        if !self.exponent.is_sign() {
            // no fraction at all
            self.set_zero();
            return;
        }

        if self.exponent <= Int::from_i64(-(Self::MANTISSA_BITS as i64)) {
            // purely fractional already
            return;
        }

        let e = self.exponent.low_i64();
        let bits_to_leave = (Self::MANTISSA_BITS as i64 + e) as usize;

        self.mantissa.rcl(bits_to_leave, false);
        self.exponent.sub_i64(bits_to_leave as i64);
        self.standardize();
    }

    /// Rounds half away from zero; returns `true` on exponent overflow.
    pub fn round(&mut self) -> bool {
        if self.is_zero() {
            return false;
        }

        let mut half = Self::zero();
        half.set_half();

        let carry = if self.is_sign() {
            self.sub(half)
        } else {
            self.add(half)
        };

        self.skip_fraction();
        carry
    }

    pub fn from_u64(value: u64) -> Self {
        let mut r = Self::zero();
        r.mantissa.tab[M - 1] = value;
        r.exponent = Int::from_i64(-(((M - 1) * WORD_BITS) as i64));
        r.standardize();
        r
    }

    pub fn from_i64(value: i64) -> Self {
        let mut r = Self::from_u64(value.unsigned_abs());
        if value < 0 {
            r.set_sign();
        }
        r
    }

    /// Conversion from the exponent-sized signed integer.
    pub fn from_int(value: &Int<E>) -> Self {
        let mut magnitude = *value;
        let negative = magnitude.is_sign();
        if negative {
            // for the minimum value change_sign fails but the raw bits
            // are already the correct magnitude
            magnitude.change_sign();
        }

        let mut r = Self::zero();
        let moved = magnitude.as_uint_mut().compensation_to_left();
        r.exponent = Int::from_i64((E as i64 - M as i64) * WORD_BITS as i64 - moved as i64);

        let keep = E.min(M);
        for i in 1..=keep {
            r.mantissa.tab[M - i] = magnitude.as_uint().tab[E - i];
        }

        r.standardize();
        if negative {
            r.set_sign();
        }
        r
    }

    /// The integer part as an `i64`, or `Overflow` when it does not fit.
    pub fn to_i64(&self) -> Result<i64, MathError> {
        if self.is_zero() {
            return Ok(0);
        }

        let max_bit = -(Self::MANTISSA_BITS as i64);

        if self.exponent > Int::from_i64(max_bit + WORD_BITS as i64) {
            return Err(MathError::Overflow);
        }
        if self.exponent <= Int::from_i64(max_bit) {
            return Ok(0);
        }

        let how_many_bits = (-self.exponent.low_i64()) as usize;
        let magnitude = self.mantissa.tab[M - 1] >> (how_many_bits % WORD_BITS);

        if self.sign && magnitude == HIGHEST_BIT {
            return Ok(i64::MIN);
        }
        if magnitude & HIGHEST_BIT != 0 {
            return Err(MathError::Overflow);
        }

        let result = magnitude as i64;
        Ok(if self.sign { -result } else { result })
    }

    /// The integer part as an exponent-sized signed integer.
    pub fn to_int(&self) -> Result<Int<E>, MathError> {
        let mut result = UInt::<E>::zero();

        if !self.is_zero() {
            let max_bit = -(Self::MANTISSA_BITS as i64);

            if self.exponent > Int::from_i64(max_bit + (E * WORD_BITS) as i64) {
                return Err(MathError::Overflow);
            }

            if self.exponent > Int::from_i64(max_bit) {
                let e = self.exponent.low_i64();

                if e < 0 {
                    let shift = (-e) as usize;
                    let index = shift / WORD_BITS;

                    let mut mantissa = self.mantissa;
                    mantissa.rcr(shift % WORD_BITS, false);

                    for (a, i) in (index..M).enumerate() {
                        if a < E {
                            result.tab[a] = mantissa.tab[i];
                        }
                    }
                } else {
                    let shift = e as usize;
                    let index = shift / WORD_BITS;

                    for i in 0..M {
                        result.tab[index + i] = self.mantissa.tab[i];
                    }
                    result.rcl(shift % WORD_BITS, false);
                }
            }
        }

        let mut signed = Int { u: result };
        if self.sign && result.is_only_the_highest_bit_set() {
            return Ok(signed);
        }
        if result.is_the_highest_bit_set() {
            return Err(MathError::Overflow);
        }
        if self.sign {
            signed.change_sign();
        }
        Ok(signed)
    }
}

impl<const E: usize, const M: usize> Default for Big<E, M> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const E: usize, const M: usize> From<i64> for Big<E, M> {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl<const E: usize, const M: usize> PartialEq for Big<E, M> {
    fn eq(&self, other: &Self) -> bool {
        if self.is_zero() {
            return other.is_zero();
        }
        self.sign == other.sign && self.equal_without_sign(other)
    }
}

impl<const E: usize, const M: usize> PartialOrd for Big<E, M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }

        let less = match (self.sign, other.sign) {
            (true, false) => true,
            (false, true) => false,
            (false, false) => self.smaller_without_sign_than(other),
            (true, true) => other.smaller_without_sign_than(self),
        };

        Some(if less { Ordering::Less } else { Ordering::Greater })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type B = Big<1, 2>;

    fn close(a: &B, b: &B, slack_bits: i64) {
        let mut d = *a;
        d.sub(*b);
        if d.is_zero() {
            return;
        }
        let reference = if b.is_zero() {
            -(B::MANTISSA_BITS as i64)
        } else {
            b.exponent.low_i64()
        };
        let bound = reference - B::MANTISSA_BITS as i64 + slack_bits;
        assert!(
            d.exponent.low_i64() <= bound,
            "difference too large: {} vs {} (diff exponent {}, bound {})",
            a.exponent.low_i64(),
            b.exponent.low_i64(),
            d.exponent.low_i64(),
            bound
        );
    }

    #[test]
    fn integer_round_trip() {
        for v in [0i64, 1, -1, 2, 10, 1000, -987654321, i64::MAX, i64::MIN] {
            assert_eq!(B::from_i64(v).to_i64(), Ok(v), "{v}");
        }
    }

    #[test]
    fn zero_is_canonical() {
        let mut a = B::from_i64(5);
        a.sub(B::from_i64(5));
        assert!(a.is_zero());
        assert!(!a.is_sign());
        assert!(a.exponent.is_zero());
        assert_eq!(a, B::zero());
    }

    #[test]
    fn add_sub_small_integers() {
        let mut a = B::from_i64(123);
        assert!(!a.add(B::from_i64(877)));
        assert_eq!(a.to_i64(), Ok(1000));

        assert!(!a.sub(B::from_i64(1500)));
        assert_eq!(a.to_i64(), Ok(-500));
    }

    #[test]
    fn add_ignores_vanishing_operand() {
        // 1 + 2^-200 at 128 mantissa bits is still 1
        let mut tiny = B::one();
        tiny.exponent.sub_i64(200);
        let mut a = B::one();
        assert!(!a.add(tiny));
        assert_eq!(a, B::one());
    }

    #[test]
    fn mul_div_small_integers() {
        let mut a = B::from_i64(-6);
        assert!(!a.mul(&B::from_i64(7)));
        assert_eq!(a.to_i64(), Ok(-42));

        assert!(!a.div(&B::from_i64(-7)));
        assert_eq!(a.to_i64(), Ok(6));

        // division by zero reports carry and x/x == 1
        let mut b = B::from_i64(3);
        assert!(b.div(&B::zero()));
        let mut c = B::from_i64(12345);
        let d = c;
        assert!(!c.div(&d));
        assert_eq!(c, B::one());
    }

    #[test]
    fn division_of_non_dyadic_fraction() {
        // 1/3 * 3 is one ulp short of 1, round() on *2 style checks would
        // hide it; compare with tolerance instead
        let mut third = B::one();
        third.div(&B::from_i64(3));
        let mut back = third;
        back.mul(&B::from_i64(3));
        close(&back, &B::one(), 2);
    }

    #[test]
    fn mod2_parity() {
        for v in [0i64, 1, 2, 3, 4, 5, 100, 101, -7, -8] {
            assert_eq!(B::from_i64(v).mod2(), v % 2 != 0, "{v}");
        }

        let mut half = B::zero();
        half.set_half();
        assert!(!half.mod2());
    }

    #[test]
    fn fraction_splitting() {
        // 6.25 = 25/4
        let mut v = B::from_i64(25);
        v.div(&B::from_i64(4));

        let mut int_part = v;
        int_part.skip_fraction();
        assert_eq!(int_part.to_i64(), Ok(6));

        let mut frac_part = v;
        frac_part.remain_fraction();
        let mut quarter = B::one();
        quarter.exponent.sub_i64(2);
        assert_eq!(frac_part, quarter);

        int_part.add(frac_part);
        assert_eq!(int_part, v);
    }

    #[test]
    fn round_half_away_from_zero() {
        let cases = [(5, 2, 3), (-5, 2, -3), (7, 4, 2), (9, 4, 2), (-9, 4, -2)];
        for (n, d, expected) in cases {
            let mut v = B::from_i64(n);
            v.div(&B::from_i64(d));
            assert!(!v.round());
            assert_eq!(v.to_i64(), Ok(expected), "{n}/{d}");
        }
    }

    #[test]
    fn pow_integral() {
        let mut a = B::from_i64(2);
        a.pow_uint(10).unwrap();
        assert_eq!(a.to_i64(), Ok(1024));

        let mut b = B::from_i64(2);
        b.pow_int(-2).unwrap();
        let mut quarter = B::one();
        quarter.exponent.sub_i64(2);
        assert_eq!(b, quarter);

        let mut c = B::from_i64(-3);
        c.pow_big_int(&B::from_i64(3)).unwrap();
        assert_eq!(c.to_i64(), Ok(-27));

        let mut zero = B::zero();
        assert_eq!(zero.pow_uint(0), Err(MathError::ImproperArgument));
    }

    #[test]
    fn pow_fractional() {
        // 9^0.5 = 3
        let mut a = B::from_i64(9);
        let mut half = B::zero();
        half.set_half();
        a.pow(&half).unwrap();
        close(&a, &B::from_i64(3), 8);

        let mut neg = B::from_i64(-9);
        assert_eq!(neg.pow(&half), Err(MathError::ImproperArgument));
    }

    #[test]
    fn exp_and_ln() {
        assert_eq!(B::zero().exp().unwrap(), B::one());
        assert_eq!(B::one().ln().unwrap(), B::zero());

        let mut e = B::zero();
        e.set_e();
        close(&B::one().exp().unwrap(), &e, 8);
        close(&e.ln().unwrap(), &B::one(), 8);

        // ln(exp(x)) = x for a value away from 1
        let x = B::from_i64(5);
        close(&x.exp().unwrap().ln().unwrap(), &x, 10);

        assert_eq!(B::zero().ln().map(|_| ()), Err(MathError::ImproperArgument));
        assert_eq!(B::from_i64(-1).ln().map(|_| ()), Err(MathError::ImproperArgument));
    }

    #[test]
    fn log_of_powers() {
        let thousand = B::from_i64(1000);
        let ten = B::from_i64(10);
        close(&thousand.log(&ten).unwrap(), &B::from_i64(3), 8);

        assert_eq!(
            thousand.log(&B::one()).map(|_| ()),
            Err(MathError::ImproperArgument)
        );
        assert_eq!(B::one().log(&ten).unwrap(), B::zero());
    }

    #[test]
    fn comparisons_follow_signs() {
        let values = [-10i64, -2, -1, 0, 1, 2, 10];
        for &a in &values {
            for &b in &values {
                let ba = B::from_i64(a);
                let bb = B::from_i64(b);
                assert_eq!(ba.partial_cmp(&bb), a.partial_cmp(&b), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn standardize_is_idempotent() {
        let mut v = B::from_i64(12345);
        let before = v;
        assert!(!v.standardize());
        assert_eq!(v, before);
    }

    #[test]
    fn from_int_and_to_int_round_trip() {
        for v in [0i64, 1, -1, 42, -9000, i64::MAX, i64::MIN] {
            let i = crate::Int::<1>::from_i64(v);
            let b = B::from_int(&i);
            assert_eq!(b, B::from_i64(v), "{v}");
            assert_eq!(b.to_int(), Ok(i), "{v}");
        }
    }

    #[test]
    fn ln_above_the_mantissa_range() {
        // the exponent is positive here, so its ln(2) contribution
        // dominates the result
        let mut x = B::from_i64(2);
        x.pow_uint(130).unwrap();

        let mut expected = B::zero();
        expected.set_ln2();
        expected.mul(&B::from_i64(130));
        close(&x.ln().unwrap(), &expected, 8);
    }
}
