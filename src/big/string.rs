//! Radix conversion for [`Big`]: printing through the internal logarithm
//! and parsing with fraction and scientific notation.

use std::fmt;
use std::str::FromStr;

use crate::error::MathError;
use crate::int::Int;
use crate::uint::string::{char_to_digit, digit_to_char};
use crate::words::WORD_BITS;
use crate::MAX_SERIES_ITERATIONS;

use super::Big;

/// How many digits to keep after the decimal point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigitsAfterPoint {
    /// Everything the mantissa can resolve.
    All,
    /// Everything, with trailing zeros (and a trailing point) removed.
    TrimZeros,
    /// At most `n` digits, rounding the first dropped one.
    Max(usize),
}

/// Formatting options for [`Big::to_radix`].
#[derive(Clone, Copy, Debug)]
pub struct FormatOpts {
    /// Output base, 2..=16.
    pub base: u32,
    /// Force the scientific form.
    pub always_scientific: bool,
    /// Switch to the scientific form when the absolute decimal exponent
    /// exceeds this.
    pub when_scientific: u64,
    pub digits_after_point: DigitsAfterPoint,
}

impl Default for FormatOpts {
    fn default() -> Self {
        Self {
            base: 10,
            always_scientific: false,
            when_scientific: 15,
            digits_after_point: DigitsAfterPoint::TrimZeros,
        }
    }
}

impl FormatOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }

    pub fn scientific(mut self) -> Self {
        self.always_scientific = true;
        self
    }

    pub fn digits_after_point(mut self, policy: DigitsAfterPoint) -> Self {
        self.digits_after_point = policy;
        self
    }
}

/// Per-base cache of `ln(base)`, reused across conversions.
///
/// The logarithm of the output base is the expensive part of printing;
/// callers converting many values keep one cache and pass it to
/// [`Big::to_radix_cached`].
pub struct LnCache<const E: usize, const M: usize> {
    entries: [Option<Big<E, M>>; 15],
}

impl<const E: usize, const M: usize> LnCache<E, M> {
    pub fn new() -> Self {
        Self { entries: [None; 15] }
    }

    fn ln_of_base(&mut self, base: u32) -> Result<Big<E, M>, MathError> {
        let slot = &mut self.entries[base as usize - 2];
        if let Some(v) = *slot {
            return Ok(v);
        }
        let v = Big::from_u64(base as u64).ln()?;
        *slot = Some(v);
        Ok(v)
    }
}

impl<const E: usize, const M: usize> Default for LnCache<E, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const E: usize, const M: usize> Big<E, M> {
    /// Renders the value according to `opts`.
    pub fn to_radix(&self, opts: &FormatOpts) -> Result<String, MathError> {
        let mut cache = LnCache::new();
        self.to_radix_cached(opts, &mut cache)
    }

    /// Like [`Big::to_radix`] but reusing a caller-held logarithm cache.
    pub fn to_radix_cached(
        &self,
        opts: &FormatOpts,
        cache: &mut LnCache<E, M>,
    ) -> Result<String, MathError> {
        let base = opts.base;
        if !(2..=16).contains(&base) {
            return Err(MathError::ImproperArgument);
        }

        if self.is_zero() {
            return Ok("0".to_owned());
        }

        let (mut digits, mut new_exp) = if base == 2 {
            self.mantissa_digits_base2()
        } else {
            self.rebase_mantissa(base, cache)?
        };

        // power-of-two bases convert exactly; the last digit of the others
        // carries the re-basing error and is rounded away
        if !matches!(base, 2 | 4 | 8 | 16) {
            round_last_digit(&mut digits, &mut new_exp, base)?;
        }

        let body = set_comma_and_exponent(digits, &new_exp, opts)?;
        Ok(if self.sign { format!("-{body}") } else { body })
    }

    /// Direct dump of the mantissa bits, most significant first.
    fn mantissa_digits_base2(&self) -> (String, Int<E>) {
        let mut digits = String::with_capacity(Self::MANTISSA_BITS);
        for &limb in self.mantissa.tab.iter().rev() {
            let mut value = limb;
            for _ in 0..WORD_BITS {
                digits.push(if value & crate::words::HIGHEST_BIT != 0 { '1' } else { '0' });
                value <<= 1;
            }
        }
        (digits, self.exponent)
    }

    /// Re-bases the mantissa: finds `new_exp` such that
    /// `|self| / base^new_exp` is an integer filling the mantissa width,
    /// and returns its digits.
    fn rebase_mantissa(
        &self,
        base: u32,
        cache: &mut LnCache<E, M>,
    ) -> Result<(String, Int<E>), MathError> {
        // the weight of the lowest mantissa bit, 2^exponent
        let mut low_bit = Self::zero();
        low_bit.mantissa.set_one();
        low_bit.exponent = self.exponent;
        if low_bit.standardize() {
            // exponent at the very bottom of its range
            return Err(MathError::Overflow);
        }

        // new_exp = trunc(log_base(2^exponent)) + 1, so that base^new_exp
        // is always above the lowest bit's weight
        let mut new_exp_big = low_bit.ln()?;
        let ln_base = cache.ln_of_base(base)?;
        if new_exp_big.div(&ln_base) {
            return Err(MathError::Overflow);
        }
        new_exp_big.skip_fraction();
        if new_exp_big.add(Self::one()) {
            return Err(MathError::Overflow);
        }
        let new_exp = new_exp_big.to_int()?;

        let mut scale = Self::from_u64(base as u64);
        scale.pow_big_int(&new_exp_big)?;

        let mut temp = *self;
        temp.abs();
        if temp.div(&scale) {
            return Err(MathError::Overflow);
        }
        if temp.move_mantissa_into_right() {
            return Err(MathError::InternalError);
        }

        let digits = temp.mantissa.to_radix(base)?;
        Ok((digits, new_exp))
    }

    /// Turns a value with exponent in `(-mantissa bits, 0]` into its
    /// integer part held directly in the mantissa. Carry when the exponent
    /// is outside that range.
    fn move_mantissa_into_right(&mut self) -> bool {
        if self.is_zero() {
            return false;
        }
        if !self.exponent.is_sign() && !self.exponent.is_zero() {
            return true;
        }
        if self.exponent <= Int::from_i64(-(Self::MANTISSA_BITS as i64)) {
            return true;
        }

        self.mantissa.rcr((-self.exponent.low_i64()) as usize, false);
        false
    }

    /// Parses leading characters of `s` in `base`: optional sign, a `#`
    /// (base 16) or `&` (base 2) prefix, integer digits, an optional
    /// fraction, and for bases up to 10 an optional `e±ddd` decimal
    /// exponent. Returns the value, a carry flag for overflow, and the
    /// unparsed tail.
    pub fn parse_radix(s: &str, mut base: u32) -> (Self, bool, &str) {
        let mut value = Self::zero();
        let mut carry = false;

        let mut rest = s;
        let negative = if let Some(r) = rest.strip_prefix('-') {
            rest = r;
            true
        } else {
            rest = rest.strip_prefix('+').unwrap_or(rest);
            false
        };

        if let Some(r) = rest.strip_prefix('#') {
            base = 16;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('&') {
            base = 2;
            rest = r;
        }

        if !(2..=16).contains(&base) {
            return (value, false, s);
        }

        let base_big = Self::from_u64(base as u64);

        // integer part
        while let Some(d) = rest.chars().next().and_then(|c| char_to_digit(c, base)) {
            carry |= value.mul(&base_big);
            carry |= value.add(Self::from_u64(d as u64));
            rest = &rest[1..];
        }

        // fraction
        if let Some(mut frac) = rest.strip_prefix('.') {
            let mut power = Self::one();
            let mut converged = false;

            for i in 1..=MAX_SERIES_ITERATIONS {
                let Some(d) = frac.chars().next().and_then(|c| char_to_digit(c, base)) else {
                    break;
                };
                frac = &frac[1..];

                if power.mul(&base_big) {
                    converged = true;
                    break;
                }
                if d != 0 {
                    let mut part = Self::from_u64(d as u64);
                    if part.div(&power) {
                        converged = true;
                        break;
                    }

                    // the stopped-changing test must only run against a
                    // nonzero digit; a run of zeros changes nothing and
                    // says nothing about resolution
                    if i % 5 == 0 {
                        let old_value = value;
                        value.add(part);
                        if value == old_value {
                            converged = true;
                            break;
                        }
                    } else {
                        value.add(part);
                    }
                }
            }

            // digits beyond the mantissa's resolution are accepted and
            // ignored
            if converged {
                while frac.chars().next().and_then(|c| char_to_digit(c, base)).is_some() {
                    frac = &frac[1..];
                }
            }
            rest = frac;
        }

        // scientific part; above base 10 the letter e is a digit
        if base <= 10 {
            if rest.starts_with('e') || rest.starts_with('E') {
                let tail = &rest[1..];
                let (exp_negative, mut digits_part) = if let Some(t) = tail.strip_prefix('-') {
                    (true, t)
                } else {
                    (false, tail.strip_prefix('+').unwrap_or(tail))
                };

                let mut exp_value = Self::zero();
                let ten = Self::from_u64(10);
                let mut any = false;

                while let Some(d) = digits_part.chars().next().and_then(|c| c.to_digit(10)) {
                    carry |= exp_value.mul(&ten);
                    carry |= exp_value.add(Self::from_u64(d as u64));
                    digits_part = &digits_part[1..];
                    any = true;
                }

                if any {
                    if exp_negative {
                        exp_value.set_sign();
                    }
                    let mut scale = ten;
                    match scale.pow_big_int(&exp_value) {
                        Ok(()) => carry |= value.mul(&scale),
                        Err(_) => carry = true,
                    }
                    rest = digits_part;
                }
                // a bare 'e' with no digits stays unparsed
            }
        }

        if negative {
            value.set_sign();
        }
        (value, carry, rest)
    }
}

/// Drops the least significant printed digit and rounds the rest on it.
fn round_last_digit<const E: usize>(
    digits: &mut String,
    new_exp: &mut Int<E>,
    base: u32,
) -> Result<(), MathError> {
    if digits.len() < 2 {
        return Ok(());
    }

    let last = digits.pop().and_then(|c| char_to_digit(c, base)).unwrap_or(0);
    if new_exp.add_one() {
        return Err(MathError::Overflow);
    }

    if last >= base / 2 {
        increment_digits(digits, base);
    }
    Ok(())
}

/// Adds one to a digit string in place, rippling from the right and
/// skipping a decimal point; grows by a leading `1` on full carry.
fn increment_digits(digits: &mut String, base: u32) {
    let mut bytes = std::mem::take(digits).into_bytes();

    let mut i = bytes.len();
    let mut carry = true;
    while carry && i > 0 {
        i -= 1;
        if bytes[i] == b'.' {
            continue;
        }
        let d = char_to_digit(bytes[i] as char, base).unwrap_or(0) + 1;
        if d == base {
            bytes[i] = b'0';
        } else {
            bytes[i] = digit_to_char(d) as u8;
            carry = false;
        }
    }
    if carry {
        bytes.insert(0, b'1');
    }

    // the bytes stay ASCII throughout
    *digits = String::from_utf8(bytes).unwrap_or_default();
}

/// Places the decimal point (or switches to the scientific form) and
/// applies the digits-after-point policy. `digits` is the integer
/// mantissa, the value is `digits * base^new_exp`.
fn set_comma_and_exponent<const E: usize>(
    mut digits: String,
    new_exp: &Int<E>,
    opts: &FormatOpts,
) -> Result<String, MathError> {
    let len = digits.len() as i64;

    // exponent of the leading digit
    let mut scientific_exp = *new_exp;
    if scientific_exp.add_i64(len - 1) {
        return Err(MathError::Overflow);
    }

    let scientific = opts.always_scientific
        || match scientific_exp.to_i64() {
            Some(v) => v.unsigned_abs() > opts.when_scientific,
            None => true,
        };

    if scientific {
        if digits.len() > 1 {
            digits.insert(1, '.');
        }
        apply_digit_policy(&mut digits, opts);

        if opts.base == 10 {
            digits.push('e');
            if !scientific_exp.is_sign() {
                digits.push('+');
            }
            digits.push_str(&scientific_exp.to_radix(10)?);
        } else {
            // "10" read in the output base is the base itself
            digits.push_str("*10^");
            digits.push_str(&scientific_exp.to_radix(opts.base)?);
        }
        return Ok(digits);
    }

    let e = new_exp.to_i64().ok_or(MathError::Overflow)?;
    if e >= 0 {
        for _ in 0..e {
            digits.push('0');
        }
    } else {
        let shift = e.unsigned_abs() as usize;
        if (shift as i64) < len {
            digits.insert(len as usize - shift, '.');
        } else {
            let mut with_zeros = String::from("0.");
            for _ in 0..shift - len as usize {
                with_zeros.push('0');
            }
            with_zeros.push_str(&digits);
            digits = with_zeros;
        }
    }

    apply_digit_policy(&mut digits, opts);
    Ok(digits)
}

fn apply_digit_policy(digits: &mut String, opts: &FormatOpts) {
    let Some(dot) = digits.find('.') else {
        return;
    };

    match opts.digits_after_point {
        DigitsAfterPoint::All => {}
        DigitsAfterPoint::TrimZeros => trim_trailing_zeros(digits),
        DigitsAfterPoint::Max(n) => {
            let after = digits.len() - dot - 1;
            if after > n {
                let cut: String = digits.split_off(dot + 1 + n);
                if n == 0 {
                    digits.pop();
                }
                let first_dropped = cut
                    .chars()
                    .next()
                    .and_then(|c| char_to_digit(c, opts.base))
                    .unwrap_or(0);
                if first_dropped >= opts.base / 2 {
                    increment_digits(digits, opts.base);
                }
            }
            // the limit composes with zero trimming, it does not pad
            trim_trailing_zeros(digits);
        }
    }
}

fn trim_trailing_zeros(digits: &mut String) {
    if !digits.contains('.') {
        return;
    }
    while digits.ends_with('0') {
        digits.pop();
    }
    if digits.ends_with('.') {
        digits.pop();
    }
}

impl<const E: usize, const M: usize> fmt::Display for Big<E, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_radix(&FormatOpts::default()) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("overflow"),
        }
    }
}

impl<const E: usize, const M: usize> FromStr for Big<E, M> {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(MathError::ImproperArgument);
        }
        let (value, carry, rest) = Self::parse_radix(s, 10);
        if carry {
            return Err(MathError::Overflow);
        }
        if !rest.is_empty() {
            return Err(MathError::ImproperArgument);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type B = Big<1, 2>;

    fn fmt(v: &B) -> String {
        v.to_string()
    }

    #[test]
    fn small_integers_print_exactly() {
        for v in [0i64, 1, -1, 7, 42, -1000, 123456789] {
            assert_eq!(fmt(&B::from_i64(v)), v.to_string(), "{v}");
        }
    }

    #[test]
    fn dyadic_fractions_print_exactly() {
        let mut half = B::zero();
        half.set_half();
        assert_eq!(fmt(&half), "0.5");

        let mut v = B::from_i64(25);
        v.div(&B::from_i64(4));
        assert_eq!(fmt(&v), "6.25");

        let mut eighth = B::one();
        eighth.div(&B::from_i64(8));
        assert_eq!(fmt(&eighth), "0.125");

        let mut neg = eighth;
        neg.set_sign();
        assert_eq!(fmt(&neg), "-0.125");
    }

    #[test]
    fn parse_and_print_round_trip() {
        for s in ["1.5", "0.25", "-3.75", "1024", "-0.0625"] {
            let v: B = s.parse().unwrap();
            assert_eq!(fmt(&v), s, "{s}");
        }
    }

    #[test]
    fn parse_base_prefixes() {
        let (v, carry, rest) = B::parse_radix("#ff", 10);
        assert!(!carry);
        assert_eq!(rest, "");
        assert_eq!(v.to_i64(), Ok(255));

        let (v, _, rest) = B::parse_radix("&101.1", 10);
        assert_eq!(rest, "");
        let mut expected = B::from_i64(11);
        expected.div(&B::from_i64(2));
        assert_eq!(v, expected);
    }

    #[test]
    fn parse_scientific() {
        let (v, carry, rest) = B::parse_radix("1.5e3", 10);
        assert!(!carry);
        assert_eq!(rest, "");
        assert_eq!(v.to_i64(), Ok(1500));

        let (v, _, rest) = B::parse_radix("25e-2", 10);
        assert_eq!(rest, "");
        let mut quarter = B::one();
        quarter.div(&B::from_i64(4));
        assert_eq!(v, quarter);

        // a bare exponent marker is not consumed
        let (v, _, rest) = B::parse_radix("12e", 10);
        assert_eq!(v.to_i64(), Ok(12));
        assert_eq!(rest, "e");
    }

    #[test]
    fn parse_keeps_digits_after_zero_runs() {
        // a run of zero fraction digits crossing a five-digit checkpoint
        // must not look like convergence
        for s in ["0.0000000001", "0.00000001"] {
            let v: B = s.parse().unwrap();
            assert!(!v.is_zero(), "{s}");
            assert_eq!(fmt(&v), s, "{s}");
        }

        let (v, carry, rest) = B::parse_radix("0.004", 10);
        assert!(!carry);
        assert_eq!(rest, "");
        let mut expected = B::one();
        expected.div(&B::from_i64(250));
        assert_eq!(v, expected);
    }

    #[test]
    fn parse_stops_at_garbage() {
        let (v, carry, rest) = B::parse_radix("3.5kg", 10);
        assert!(!carry);
        assert_eq!(rest, "kg");
        let mut expected = B::from_i64(7);
        expected.div(&B::from_i64(2));
        assert_eq!(v, expected);

        assert!("3.5kg".parse::<B>().is_err());
    }

    #[test]
    fn hex_output() {
        let opts = FormatOpts::new().base(16);
        assert_eq!(B::from_i64(255).to_radix(&opts).unwrap(), "ff");
        assert_eq!(B::from_i64(-4096).to_radix(&opts).unwrap(), "-1000");
    }

    #[test]
    fn binary_output() {
        let opts = FormatOpts::new().base(2);
        assert_eq!(B::from_i64(5).to_radix(&opts).unwrap(), "101");

        let mut v = B::from_i64(5);
        v.div(&B::from_i64(2));
        assert_eq!(v.to_radix(&opts).unwrap(), "10.1");
    }

    #[test]
    fn scientific_form() {
        let opts = FormatOpts::new().scientific();
        let s = B::from_i64(1500).to_radix(&opts).unwrap();
        assert_eq!(s, "1.5e+3");

        let mut v = B::from_i64(-3);
        v.div(&B::from_i64(200));
        let s = v.to_radix(&opts).unwrap();
        assert_eq!(s, "-1.5e-2");
    }

    #[test]
    fn large_values_switch_to_scientific() {
        let mut v = B::from_i64(10);
        v.pow_uint(20).unwrap();
        assert_eq!(fmt(&v), "1e+20");

        // and stay in the normal form below the threshold
        let mut w = B::from_i64(10);
        w.pow_uint(15).unwrap();
        assert_eq!(fmt(&w), "1000000000000000");
    }

    #[test]
    fn max_digits_rounds() {
        let opts = FormatOpts::new().digits_after_point(DigitsAfterPoint::Max(2));
        let mut v = B::from_i64(1);
        v.div(&B::from_i64(3));
        assert_eq!(v.to_radix(&opts).unwrap(), "0.33");

        let mut w = B::from_i64(2);
        w.div(&B::from_i64(3));
        assert_eq!(w.to_radix(&opts).unwrap(), "0.67");

        let opts0 = FormatOpts::new().digits_after_point(DigitsAfterPoint::Max(0));
        let mut x = B::from_i64(5);
        x.div(&B::from_i64(2));
        assert_eq!(x.to_radix(&opts0).unwrap(), "3");
    }

    #[test]
    fn max_digits_trims_trailing_zeros() {
        let opts = FormatOpts::new().digits_after_point(DigitsAfterPoint::Max(6));
        let mut v = B::from_i64(-3);
        v.div(&B::from_i64(4));
        assert_eq!(v.to_radix(&opts).unwrap(), "-0.75");
        assert_eq!(B::from_i64(42).to_radix(&opts).unwrap(), "42");

        // rounding up to an integer leaves no zeros behind either
        let opts1 = FormatOpts::new().digits_after_point(DigitsAfterPoint::Max(1));
        let w: B = "0.96".parse().unwrap();
        assert_eq!(w.to_radix(&opts1).unwrap(), "1");
    }

    #[test]
    fn documented_decimal_scenarios() {
        let a: B = "123456.543456".parse().unwrap();
        let b: B = "98767878.124322".parse().unwrap();
        let six = FormatOpts::new().digits_after_point(DigitsAfterPoint::Max(6));

        let mut sum = a;
        sum.add(b);
        assert_eq!(sum.to_radix(&six).unwrap(), "98891334.667778");

        let mut diff = a;
        diff.sub(b);
        assert_eq!(diff.to_radix(&six).unwrap(), "-98644421.580866");

        let four = FormatOpts::new().digits_after_point(DigitsAfterPoint::Max(4));
        let mut prod = a;
        prod.mul(&b);
        assert_eq!(prod.to_radix(&four).unwrap(), "12193540837712.2708");
    }

    #[test]
    fn cache_matches_uncached() {
        let mut cache = LnCache::new();
        let opts = FormatOpts::default();
        for v in [1i64, 7, -300, 123456789] {
            let b = B::from_i64(v);
            assert_eq!(
                b.to_radix(&opts).unwrap(),
                b.to_radix_cached(&opts, &mut cache).unwrap()
            );
        }
    }
}
