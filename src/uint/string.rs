//! Radix conversion for [`UInt`].

use std::fmt;
use std::str::FromStr;

use crate::error::MathError;
use crate::words::Word;

use super::UInt;

/// Digit value of `c` in `base` (2..=16), or `None`. Letters are accepted
/// in both cases.
pub(crate) fn char_to_digit(c: char, base: u32) -> Option<u32> {
    let d = c.to_digit(16)?;
    (d < base).then_some(d)
}

/// The character for digit `d` (`d < 16`), lowercase.
pub(crate) fn digit_to_char(d: u32) -> char {
    char::from_digit(d, 16).unwrap_or('?')
}

impl<const N: usize> UInt<N> {
    /// Renders the value in `base` (2..=16).
    pub fn to_radix(&self, base: u32) -> Result<String, MathError> {
        if !(2..=16).contains(&base) {
            return Err(MathError::ImproperArgument);
        }

        let mut temp = *self;
        let mut out = Vec::new();

        loop {
            // base fits in one limb, so div_word cannot fail here
            let digit = temp.div_word(base as Word).unwrap_or(0);
            out.push(digit_to_char(digit as u32));
            if temp.is_zero() {
                break;
            }
        }

        out.reverse();
        Ok(out.into_iter().collect())
    }

    /// Parses leading digits of `s` in `base`, stopping at the first
    /// non-digit. Returns the value, a carry flag set when the digits did
    /// not fit in `N` limbs, and the unparsed tail. An input without a
    /// single digit parses as zero.
    pub fn from_radix_prefix(s: &str, base: u32) -> (Self, bool, &str) {
        let mut value = Self::zero();
        let mut carry = false;
        let mut rest = s;

        for (i, c) in s.char_indices() {
            let Some(digit) = char_to_digit(c, base) else {
                rest = &s[i..];
                return (value, carry, rest);
            };

            carry |= value.mul_word(base as Word);
            carry |= value.add_word(digit as Word, 0);
        }

        (value, carry, &rest[rest.len()..])
    }

    /// Parses the whole of `s` in `base`. Trailing garbage or digits that
    /// do not fit report [`MathError::Overflow`]; an empty or digit-free
    /// input reports [`MathError::ImproperArgument`].
    pub fn from_radix(s: &str, base: u32) -> Result<Self, MathError> {
        if !(2..=16).contains(&base) {
            return Err(MathError::ImproperArgument);
        }
        if s.is_empty() || char_to_digit(s.chars().next().unwrap_or(' '), base).is_none() {
            return Err(MathError::ImproperArgument);
        }

        let (value, carry, rest) = Self::from_radix_prefix(s, base);
        if carry || !rest.is_empty() {
            return Err(MathError::Overflow);
        }
        Ok(value)
    }
}

impl<const N: usize> fmt::Display for UInt<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_radix(10) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("overflow"),
        }
    }
}

impl<const N: usize> fmt::Debug for UInt<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt({self})")
    }
}

impl<const N: usize> FromStr for UInt<N> {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_radix(s, 10)
    }
}
