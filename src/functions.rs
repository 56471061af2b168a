//! Elementary functions over [`Big`]: factorial, trigonometry and the
//! exponential/logarithm wrappers.
//!
//! All series run until the accumulated value stops changing, capped at
//! [`MAX_SERIES_ITERATIONS`]. A carry inside a series loop means the next
//! term no longer contributes and the value collected so far is returned.

use crate::big::Big;
use crate::error::MathError;
use crate::MAX_SERIES_ITERATIONS;

/// `x!`, stepping through the integers up to `x`.
///
/// Negative arguments are improper; arguments at or above the mantissa
/// range (or whose product no longer fits) overflow.
pub fn factorial<const E: usize, const M: usize>(
    x: &Big<E, M>,
) -> Result<Big<E, M>, MathError> {
    if x.is_sign() {
        return Err(MathError::ImproperArgument);
    }
    // a positive exponent puts x beyond the mantissa width
    if !x.exponent.is_sign() && !x.exponent.is_zero() {
        return Err(MathError::Overflow);
    }

    let one = Big::one();
    let mut result = one;
    let mut multiplier = one;
    let mut carry = false;

    while !carry && multiplier < *x {
        carry |= multiplier.add(one);
        carry |= result.mul(&multiplier);
    }

    if carry {
        return Err(MathError::Overflow);
    }
    Ok(result)
}

pub fn abs<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let mut r = *x;
    r.abs();
    r
}

pub fn skip_fraction<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let mut r = *x;
    r.skip_fraction();
    r
}

pub fn remain_fraction<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let mut r = *x;
    r.remain_fraction();
    r
}

/// Rounds half away from zero.
pub fn round<const E: usize, const M: usize>(x: &Big<E, M>) -> Result<Big<E, M>, MathError> {
    let mut r = *x;
    if r.round() {
        return Err(MathError::Overflow);
    }
    Ok(r)
}

pub fn exp<const E: usize, const M: usize>(x: &Big<E, M>) -> Result<Big<E, M>, MathError> {
    x.exp()
}

pub fn ln<const E: usize, const M: usize>(x: &Big<E, M>) -> Result<Big<E, M>, MathError> {
    x.ln()
}

pub fn log<const E: usize, const M: usize>(
    x: &Big<E, M>,
    base: &Big<E, M>,
) -> Result<Big<E, M>, MathError> {
    x.log(base)
}

/// Folds the argument into `[0, pi/2]`; the returned flag says whether
/// the sine of the folded argument must be negated.
fn prepare_sin<const E: usize, const M: usize>(x: &Big<E, M>) -> (Big<E, M>, bool) {
    let mut x = *x;
    let mut change_sign = false;

    if x.is_sign() {
        // sin(-x) = -sin(x)
        change_sign = true;
        x.abs();
    }

    let mut two_pi = Big::zero();
    two_pi.set_two_pi();

    if x > two_pi {
        x.div(&two_pi);
        x.remain_fraction();
        x.mul(&two_pi);
    }

    let mut pi = Big::zero();
    pi.set_pi();

    if x > pi {
        // x in (pi, 2pi]: sin(x) = -sin(x - pi)
        x.sub(pi);
        change_sign = !change_sign;
    }

    let mut half_pi = Big::zero();
    half_pi.set_half_pi();

    if x > half_pi {
        // x in (pi/2, pi]: sin(x) = sin(pi - x)
        x.sub(half_pi);
        let mut reflected = half_pi;
        reflected.sub(x);
        x = reflected;
    }

    (x, change_sign)
}

/// Taylor series for sine on `[0, pi/2]`, anchored at whichever of 0 and
/// pi/2 is closer.
fn sin0_pi05<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let one = Big::one();

    let mut quarter_pi = Big::zero();
    quarter_pi.set_half_pi();
    quarter_pi.exponent.sub_one();

    let mut result;
    let mut numerator;
    let mut denominator;
    let mut d_numerator;
    let mut d_denominator;

    if *x < quarter_pi {
        // sin(x) = x - x^3/3! + x^5/5! - ...
        result = *x;
        numerator = *x;
        denominator = one;
        d_numerator = *x;
        d_numerator.mul(x);
        d_denominator = Big::from_u64(2);
    } else {
        // sin(x) = 1 - u^2/2! + u^4/4! - ...  with u = x - pi/2
        result = one;
        numerator = one;
        denominator = one;

        let mut half_pi = Big::zero();
        half_pi.set_half_pi();
        let mut u = *x;
        u.sub(half_pi);
        d_numerator = u;
        d_numerator.mul(&u);

        d_denominator = one;
    }

    let mut addition = false;
    let mut old_result = result;

    for _ in 1..=MAX_SERIES_ITERATIONS {
        let mut carry = numerator.mul(&d_numerator);
        carry |= denominator.mul(&d_denominator);
        carry |= d_denominator.add(one);
        carry |= denominator.mul(&d_denominator);
        carry |= d_denominator.add(one);
        if carry {
            break;
        }

        let mut temp = numerator;
        if temp.div(&denominator) {
            break;
        }

        if addition {
            result.add(temp);
        } else {
            result.sub(temp);
        }
        addition = !addition;

        if result == old_result {
            break;
        }
        old_result = result;
    }

    result
}

pub fn sin<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let (folded, change_sign) = prepare_sin(x);
    let mut result = sin0_pi05(&folded);

    // the series can land a hair outside [0, 1]
    let one = Big::one();
    if result > one {
        result = one;
    } else if result.is_sign() {
        result.set_zero();
    }

    if change_sign {
        result.change_sign();
    }
    result
}

pub fn cos<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let mut shifted = Big::zero();
    shifted.set_half_pi();
    shifted.add(*x);
    sin(&shifted)
}

/// `sin(x)/cos(x)`; improper where the cosine is zero.
pub fn tan<const E: usize, const M: usize>(x: &Big<E, M>) -> Result<Big<E, M>, MathError> {
    let denominator = cos(x);
    if denominator.is_zero() {
        return Err(MathError::ImproperArgument);
    }

    let mut result = sin(x);
    if result.div(&denominator) {
        return Err(MathError::Overflow);
    }
    Ok(result)
}

/// `cos(x)/sin(x)`; improper where the sine is zero.
pub fn ctan<const E: usize, const M: usize>(x: &Big<E, M>) -> Result<Big<E, M>, MathError> {
    let denominator = sin(x);
    if denominator.is_zero() {
        return Err(MathError::ImproperArgument);
    }

    let mut result = cos(x);
    if result.div(&denominator) {
        return Err(MathError::Overflow);
    }
    Ok(result)
}

/// Arc sine series around zero, for `x` in `[0, 0.5]`:
/// `x + x^3/(2*3) + 3*x^5/(2*4*5) + ...`
fn asin_0<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let two = Big::from_u64(2);

    let mut result = *x;
    let mut old_result = result;

    let mut x2 = *x;
    x2.mul(x);

    let mut numerator = Big::one();
    let mut denominator = two;
    let mut numerator_add = Big::one();
    let mut denominator_add = two;
    let mut numerator_x = *x;
    let mut denominator_x = Big::from_u64(3);

    for _ in 1..=MAX_SERIES_ITERATIONS {
        let mut carry = numerator_x.mul(&x2);

        let mut numerator_temp = numerator_x;
        carry |= numerator_temp.mul(&numerator);
        let mut denominator_temp = denominator;
        carry |= denominator_temp.mul(&denominator_x);
        carry |= numerator_temp.div(&denominator_temp);
        if carry {
            break;
        }

        result.add(numerator_temp);
        if result == old_result {
            break;
        }
        old_result = result;

        numerator_add.add(two);
        denominator_add.add(two);
        numerator.mul(&numerator_add);
        denominator.mul(&denominator_add);
        denominator_x.add(two);
    }

    result
}

/// Arc sine near one, for `x` in `(0.5, 1]`:
/// `asin(x) = pi/2 - sqrt(2*(1-x)) * (1 + (1-x)/12 + 3*(1-x)^2/160 + ...)`
fn asin_1<const E: usize, const M: usize>(x: &Big<E, M>) -> Result<Big<E, M>, MathError> {
    let one = Big::one();
    let two = Big::from_u64(2);

    // t = 1 - x
    let mut t = one;
    t.sub(*x);

    let mut result = one;
    let mut old_result = result;

    let mut numerator = one;
    let mut denominator = two;
    let mut numerator_add = one;
    let mut denominator_add = two;
    let mut numerator_x = t;
    let mut denominator_x = Big::from_u64(3);
    let mut denominator2 = two;

    for _ in 1..=MAX_SERIES_ITERATIONS {
        let mut numerator_temp = numerator_x;
        let mut carry = numerator_temp.mul(&numerator);
        let mut denominator_temp = denominator;
        carry |= denominator_temp.mul(&denominator_x);
        carry |= denominator_temp.mul(&denominator2);
        carry |= numerator_temp.div(&denominator_temp);
        if carry {
            break;
        }

        result.add(numerator_temp);
        if result == old_result {
            break;
        }
        old_result = result;

        numerator_add.add(two);
        denominator_add.add(two);
        numerator.mul(&numerator_add);
        denominator.mul(&denominator_add);
        denominator_x.add(two);
        denominator2.exponent.add_one();
        numerator_x.mul(&t);
    }

    // result *= sqrt(2t)
    let mut doubled = t;
    doubled.exponent.add_one();
    let mut half = one;
    half.exponent.sub_one();
    doubled.pow(&half)?;
    result.mul(&doubled);

    let mut half_pi = Big::zero();
    half_pi.set_half_pi();
    half_pi.sub(result);
    Ok(half_pi)
}

/// Arc sine; improper outside `[-1, 1]`.
pub fn asin<const E: usize, const M: usize>(x: &Big<E, M>) -> Result<Big<E, M>, MathError> {
    let one = Big::one();
    if x.greater_without_sign_than(&one) {
        return Err(MathError::ImproperArgument);
    }

    let negative = x.is_sign();
    let magnitude = abs(x);

    let mut half = one;
    half.exponent.sub_one();

    let mut result = if magnitude.greater_without_sign_than(&half) {
        asin_1(&magnitude)?
    } else {
        asin_0(&magnitude)
    };

    if negative {
        result.change_sign();
    }
    Ok(result)
}

/// Arc cosine: `pi/2 - asin(x)`.
pub fn acos<const E: usize, const M: usize>(x: &Big<E, M>) -> Result<Big<E, M>, MathError> {
    let mut result = Big::zero();
    result.set_half_pi();
    result.sub(asin(x)?);
    Ok(result)
}

/// Arc tangent series for `|x| <= 0.5`: `x - x^3/3 + x^5/5 - ...`
fn atan_series<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let two = Big::from_u64(2);

    let mut result = *x;
    let mut old_result = result;

    let mut numerator = *x;
    let mut x2 = *x;
    x2.mul(x);
    let mut denominator = Big::one();

    let mut addition = false;

    for _ in 1..=MAX_SERIES_ITERATIONS {
        let mut carry = numerator.mul(&x2);
        carry |= denominator.add(two);

        let mut temp = numerator;
        carry |= temp.div(&denominator);
        if carry {
            break;
        }

        if addition {
            result.add(temp);
        } else {
            result.sub(temp);
        }
        addition = !addition;

        if result == old_result {
            break;
        }
        old_result = result;
    }

    result
}

pub fn atan<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let one = Big::one();
    let mut half = one;
    half.exponent.sub_one();

    let negative = x.is_sign();
    let magnitude = abs(x);

    let mut result = if !magnitude.greater_without_sign_than(&half) {
        atan_series(&magnitude)
    } else if !magnitude.greater_without_sign_than(&one) {
        // atan(x) = pi/4 + atan((x-1)/(x+1)); the reduced argument lies
        // in [-1/3, 0]
        let mut u = magnitude;
        u.sub(one);
        let mut v = magnitude;
        v.add(one);
        u.div(&v);

        let mut quarter_pi = Big::zero();
        quarter_pi.set_half_pi();
        quarter_pi.exponent.sub_one();
        quarter_pi.add(atan_series(&u));
        quarter_pi
    } else {
        // atan(x) = pi/2 - atan(1/x), and 1/x is at most 1
        let mut inverse = one;
        inverse.div(&magnitude);

        let mut half_pi = Big::zero();
        half_pi.set_half_pi();
        half_pi.sub(atan(&inverse));
        half_pi
    };

    if negative {
        result.change_sign();
    }
    result
}

/// Arc cotangent: `pi/2 - atan(x)`.
pub fn actan<const E: usize, const M: usize>(x: &Big<E, M>) -> Big<E, M> {
    let mut result = Big::zero();
    result.set_half_pi();
    result.sub(atan(x));
    result
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
            "difference too large (diff exponent {}, bound {})",
            d.exponent.low_i64(),
            bound
        );
    }

    fn pi() -> B {
        let mut v = B::zero();
        v.set_pi();
        v
    }

    fn half_pi() -> B {
        let mut v = B::zero();
        v.set_half_pi();
        v
    }

    #[test]
    fn factorial_small_values() {
        let expected = [(0i64, 1i64), (1, 1), (2, 2), (3, 6), (4, 24), (10, 3628800)];
        for (n, f) in expected {
            let r = factorial(&B::from_i64(n)).unwrap();
            assert_eq!(r.to_i64(), Ok(f), "{n}!");
        }

        assert_eq!(
            factorial(&B::from_i64(-1)).map(|_| ()),
            Err(MathError::ImproperArgument)
        );
    }

    #[test]
    fn sine_special_points() {
        assert!(sin(&B::zero()).is_zero());
        assert_eq!(sin(&half_pi()), B::one());
        assert!(sin(&pi()).is_zero());

        let mut three_half_pi = pi();
        three_half_pi.add(half_pi());
        assert_eq!(sin(&three_half_pi), B::from_i64(-1));

        assert_eq!(cos(&B::zero()), B::one());
        assert!(cos(&half_pi()).is_zero());
        assert_eq!(cos(&pi()), B::from_i64(-1));
    }

    #[test]
    fn sine_is_odd_and_periodic() {
        let x = B::from_i64(1);
        let mut minus_x = x;
        minus_x.change_sign();

        let mut s = sin(&x);
        s.add(sin(&minus_x));
        close(&s, &B::zero(), 8);

        let mut shifted = x;
        let mut two_pi = B::zero();
        two_pi.set_two_pi();
        shifted.add(two_pi);
        close(&sin(&shifted), &sin(&x), 12);
    }

    #[test]
    fn sin_of_pi_sixth() {
        let mut sixth = pi();
        sixth.div(&B::from_i64(6));
        let mut half = B::zero();
        half.set_half();
        close(&sin(&sixth), &half, 8);
    }

    #[test]
    fn pythagorean_identity() {
        for v in [1i64, 2, 3, 5] {
            let x = B::from_i64(v);
            let mut s = sin(&x);
            let ss = s;
            s.mul(&ss);
            let mut c = cos(&x);
            let cc = c;
            c.mul(&cc);
            s.add(c);
            close(&s, &B::one(), 10);
        }
    }

    #[test]
    fn tangent_values() {
        let mut quarter_pi = half_pi();
        quarter_pi.exponent.sub_one();
        close(&tan(&quarter_pi).unwrap(), &B::one(), 10);

        assert_eq!(tan(&half_pi()).map(|_| ()), Err(MathError::ImproperArgument));
        assert_eq!(ctan(&B::zero()).map(|_| ()), Err(MathError::ImproperArgument));

        let mut t = tan(&B::one()).unwrap();
        t.mul(&ctan(&B::one()).unwrap());
        close(&t, &B::one(), 10);
    }

    #[test]
    fn arcsine_points() {
        assert!(asin(&B::zero()).unwrap().is_zero());
        assert_eq!(asin(&B::one()).unwrap(), half_pi());

        // asin(0.5) = pi/6
        let mut half = B::zero();
        half.set_half();
        let mut six_times = asin(&half).unwrap();
        six_times.mul(&B::from_i64(6));
        close(&six_times, &pi(), 10);

        // asin(0.75) exercises the near-one series
        let mut x: B = "0.75".parse().unwrap();
        let roundtrip = sin(&asin(&x).unwrap());
        close(&roundtrip, &x, 10);
        x.change_sign();
        close(&sin(&asin(&x).unwrap()), &x, 10);

        assert_eq!(
            asin(&B::from_i64(2)).map(|_| ()),
            Err(MathError::ImproperArgument)
        );
    }

    #[test]
    fn arccosine_points() {
        assert_eq!(acos(&B::zero()).unwrap(), half_pi());
        assert!(acos(&B::one()).unwrap().is_zero());
        close(&acos(&B::from_i64(-1)).unwrap(), &pi(), 8);
    }

    #[test]
    fn arctangent_points() {
        assert!(atan(&B::zero()).is_zero());

        // atan(1) = pi/4
        let mut four_times = atan(&B::one());
        four_times.mul(&B::from_i64(4));
        close(&four_times, &pi(), 10);

        // the three range-reduction branches agree with tan
        for s in ["0.25", "0.8", "5"] {
            let x: B = s.parse().unwrap();
            close(&tan(&atan(&x)).unwrap(), &x, 12);
        }

        // atan(-x) = -atan(x)
        let x = B::from_i64(3);
        let mut neg = x;
        neg.change_sign();
        let mut sum = atan(&x);
        sum.add(atan(&neg));
        close(&sum, &B::zero(), 8);
    }

    #[test]
    fn arccotangent_complements() {
        let x = B::from_i64(2);
        let mut sum = atan(&x);
        sum.add(actan(&x));
        close(&sum, &half_pi(), 8);
    }
}
