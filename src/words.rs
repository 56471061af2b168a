//! Limb-slice kernel shared by [`UInt`](crate::UInt) and by the
//! double-width intermediates of [`Big`](crate::Big) multiplication and
//! division.
//!
//! Everything here works on little-endian `&[u64]` slices: limb 0 is the
//! least significant. Carries and borrows are plain `bool`s and the
//! widening steps go through `u128`.

use std::cmp::Ordering;

pub(crate) type Word = u64;

pub(crate) const WORD_BITS: usize = 64;
pub(crate) const HIGHEST_BIT: Word = 1 << (WORD_BITS - 1);

/// One full-width addition step: `a + b + carry`.
#[inline]
pub(crate) fn add_carry(a: Word, b: Word, carry: bool) -> (Word, bool) {
    let (s, c1) = a.overflowing_add(b);
    let (s, c2) = s.overflowing_add(carry as Word);
    (s, c1 | c2)
}

/// One full-width subtraction step: `a - b - borrow`.
#[inline]
pub(crate) fn sub_borrow(a: Word, b: Word, borrow: bool) -> (Word, bool) {
    let (d, b1) = a.overflowing_sub(b);
    let (d, b2) = d.overflowing_sub(borrow as Word);
    (d, b1 | b2)
}

/// Full multiplication of two limbs, returning `(high, low)`.
#[inline]
pub(crate) fn mul_words(a: Word, b: Word) -> (Word, Word) {
    let p = a as u128 * b as u128;
    ((p >> WORD_BITS) as Word, p as Word)
}

/// `a = a + b + carry`, rippling through the whole slice.
pub(crate) fn add_slices(a: &mut [Word], b: &[Word], mut carry: bool) -> bool {
    for (x, &y) in a.iter_mut().zip(b.iter()) {
        let (s, c) = add_carry(*x, y, carry);
        *x = s;
        carry = c;
    }
    carry
}

/// `a = a - b - borrow`, rippling through the whole slice.
pub(crate) fn sub_slices(a: &mut [Word], b: &[Word], mut borrow: bool) -> bool {
    for (x, &y) in a.iter_mut().zip(b.iter()) {
        let (d, bo) = sub_borrow(*x, y, borrow);
        *x = d;
        borrow = bo;
    }
    borrow
}

/// Adds a single limb at position `index`, rippling the carry upwards.
pub(crate) fn add_word_at(tab: &mut [Word], value: Word, index: usize) -> bool {
    if index >= tab.len() {
        return value != 0;
    }
    let (s, mut carry) = tab[index].overflowing_add(value);
    tab[index] = s;
    for w in tab[index + 1..].iter_mut() {
        if !carry {
            return false;
        }
        let (s, c) = w.overflowing_add(1);
        *w = s;
        carry = c;
    }
    carry
}

/// Adds the two-limb value `hi:lo` starting at position `index`
/// (`index <= tab.len() - 2`), rippling the carry upwards.
pub(crate) fn add_two_words_at(tab: &mut [Word], lo: Word, hi: Word, index: usize) -> bool {
    debug_assert!(index + 2 <= tab.len());
    let (s, c) = tab[index].overflowing_add(lo);
    tab[index] = s;
    let (s, c1) = add_carry(tab[index + 1], hi, c);
    tab[index + 1] = s;
    let mut carry = c1;
    for w in tab[index + 2..].iter_mut() {
        if !carry {
            return false;
        }
        let (s, c) = w.overflowing_add(1);
        *w = s;
        carry = c;
    }
    carry
}

/// One-bit rotate left through carry: `fill` enters at bit 0, the old
/// highest bit is returned.
pub(crate) fn rcl1(tab: &mut [Word], fill: bool) -> bool {
    let mut c = fill as Word;
    for w in tab.iter_mut() {
        let out = *w >> (WORD_BITS - 1);
        *w = (*w << 1) | c;
        c = out;
    }
    c != 0
}

/// One-bit rotate right through carry: `fill` enters at the highest bit,
/// the old lowest bit is returned.
pub(crate) fn rcr1(tab: &mut [Word], fill: bool) -> bool {
    let mut c = if fill { HIGHEST_BIT } else { 0 };
    for w in tab.iter_mut().rev() {
        let out = *w & 1;
        *w = (*w >> 1) | c;
        c = if out != 0 { HIGHEST_BIT } else { 0 };
    }
    c != 0
}

/// Multi-bit rotate left: `bits` positions, vacated bits take `fill`.
/// Returns the state of the last bit shifted out.
pub(crate) fn rcl(tab: &mut [Word], mut bits: usize, fill: bool) -> bool {
    let total = tab.len() * WORD_BITS;
    if bits > total {
        bits = total;
    }

    let mut last = false;
    let all_words = bits / WORD_BITS;

    if all_words > 0 {
        let len = tab.len();
        for first in (all_words..len).rev() {
            let second = first - all_words;
            last = tab[first] & 1 != 0;
            tab[first] = tab[second];
        }
        let mask = if fill { Word::MAX } else { 0 };
        for w in tab[..all_words.min(len)].iter_mut() {
            *w = mask;
        }
    }

    for _ in 0..bits % WORD_BITS {
        last = rcl1(tab, fill);
    }
    last
}

/// Multi-bit rotate right: `bits` positions, vacated bits take `fill`.
/// Returns the state of the last bit shifted out.
pub(crate) fn rcr(tab: &mut [Word], mut bits: usize, fill: bool) -> bool {
    let total = tab.len() * WORD_BITS;
    if bits > total {
        bits = total;
    }

    let mut last = false;
    let all_words = bits / WORD_BITS;

    if all_words > 0 {
        let len = tab.len();
        let mut first = 0;
        for second in all_words..len {
            last = tab[first] & HIGHEST_BIT != 0;
            tab[first] = tab[second];
            first += 1;
        }
        let mask = if fill { Word::MAX } else { 0 };
        for w in tab[first..].iter_mut() {
            *w = mask;
        }
    }

    for _ in 0..bits % WORD_BITS {
        last = rcr1(tab, fill);
    }
    last
}

/// Shifts the value left until the highest bit is set; returns how many
/// bit positions were moved. A zero value is left untouched (returns 0).
pub(crate) fn compensation_to_left(tab: &mut [Word]) -> usize {
    let len = tab.len();
    let a = match tab.iter().rposition(|&w| w != 0) {
        Some(a) => a,
        None => return 0,
    };

    let mut moving = 0;
    if a != len - 1 {
        moving = (len - 1 - a) * WORD_BITS;
        for i in 0..=a {
            tab[len - 1 - i] = tab[a - i];
        }
        for w in tab[..len - 1 - a].iter_mut() {
            *w = 0;
        }
    }

    let rest = tab[len - 1].leading_zeros() as usize;
    if rest > 0 {
        rcl(tab, rest, false);
        moving += rest;
    }
    moving
}

/// Index and in-word bit position of the highest set bit, or `None` for
/// zero.
pub(crate) fn find_leading_bit(tab: &[Word]) -> Option<(usize, u32)> {
    let id = tab.iter().rposition(|&w| w != 0)?;
    Some((id, WORD_BITS as u32 - 1 - tab[id].leading_zeros()))
}

/// Unsigned comparison of two equally long slices.
pub(crate) fn cmp_slices(a: &[Word], b: &[Word]) -> Ordering {
    debug_assert_eq!(a.len(), b.len());
    for (&x, &y) in a.iter().rev().zip(b.iter().rev()) {
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Schoolbook multiplication into an `a.len() + b.len()` output slice.
/// Never overflows.
pub(crate) fn mul_slices(a: &[Word], b: &[Word], out: &mut [Word]) {
    debug_assert_eq!(out.len(), a.len() + b.len());
    out.fill(0);

    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        let mut carry: u128 = 0;
        for (j, &bj) in b.iter().enumerate() {
            let cur = out[i + j] as u128 + ai as u128 * bj as u128 + carry;
            out[i + j] = cur as Word;
            carry = cur >> WORD_BITS;
        }
        // this limb was untouched by the previous rows
        out[i + b.len()] = carry as Word;
    }
}

/// Division of the slice by a single limb; the quotient replaces `tab`,
/// the remainder is returned. `None` when the divisor is zero.
pub(crate) fn div_word(tab: &mut [Word], divisor: Word) -> Option<Word> {
    if divisor == 0 {
        return None;
    }
    let mut rem: Word = 0;
    for w in tab.iter_mut().rev() {
        let cur = ((rem as u128) << WORD_BITS) | *w as u128;
        *w = (cur / divisor as u128) as Word;
        rem = (cur % divisor as u128) as Word;
    }
    Some(rem)
}

/// Long division: the quotient replaces `u`, the remainder (if requested)
/// lands in `rem`. Both slices have the same length. Returns `false` on
/// success and `true` for a zero divisor.
///
/// Multi-limb divisors go through Knuth's Algorithm D, single-limb
/// divisors through the `u128` fast path of [`div_word`].
pub(crate) fn div_rem(u: &mut [Word], v: &[Word], rem: Option<&mut [Word]>) -> bool {
    debug_assert_eq!(u.len(), v.len());

    let n = match v.iter().rposition(|&w| w != 0) {
        Some(n) => n,
        None => return true,
    };

    let m = match u.iter().rposition(|&w| w != 0) {
        Some(m) => m,
        None => {
            if let Some(r) = rem {
                r.fill(0);
            }
            return false;
        }
    };

    match cmp_slices(u, v) {
        Ordering::Less => {
            if let Some(r) = rem {
                r.copy_from_slice(u);
            }
            u.fill(0);
        }
        Ordering::Equal => {
            if let Some(r) = rem {
                r.fill(0);
            }
            u.fill(0);
            u[0] = 1;
        }
        Ordering::Greater => {
            if n == 0 {
                let r = match div_word(u, v[0]) {
                    Some(r) => r,
                    None => return true,
                };
                if let Some(out) = rem {
                    out.fill(0);
                    out[0] = r;
                }
            } else {
                knuth_d(u, v, m, n, rem);
            }
        }
    }
    false
}

#[inline]
fn shl_pair(hi: Word, lo: Word, s: u32) -> Word {
    if s == 0 {
        hi
    } else {
        (hi << s) | (lo >> (WORD_BITS as u32 - s))
    }
}

#[inline]
fn shr_pair(hi: Word, lo: Word, s: u32) -> Word {
    if s == 0 {
        lo
    } else {
        (lo >> s) | (hi << (WORD_BITS as u32 - s))
    }
}

/// Algorithm D from Knuth's "The Art of Computer Programming", volume 2,
/// section 4.3.1. Preconditions: `u > v`, `v` has at least two limbs
/// (`n >= 1`), `m`/`n` are the indices of the top non-zero limbs.
fn knuth_d(u: &mut [Word], v: &[Word], m: usize, n: usize, rem: Option<&mut [Word]>) {
    const B: u128 = 1 << WORD_BITS;

    let nw = n + 1;
    let mw = m + 1;

    // D1: normalize so that the top divisor limb has its highest bit set.
    let s = v[n].leading_zeros();

    let mut vn = vec![0 as Word; nw];
    for i in (1..nw).rev() {
        vn[i] = shl_pair(v[i], v[i - 1], s);
    }
    vn[0] = v[0] << s;

    let mut un = vec![0 as Word; mw + 1];
    un[mw] = if s == 0 { 0 } else { u[mw - 1] >> (WORD_BITS as u32 - s) };
    for i in (1..mw).rev() {
        un[i] = shl_pair(u[i], u[i - 1], s);
    }
    un[0] = u[0] << s;

    let mut q = vec![0 as Word; mw - nw + 1];

    for j in (0..=mw - nw).rev() {
        // D3: estimate the quotient limb from the top three dividend limbs
        // and the top two divisor limbs.
        let num = ((un[j + nw] as u128) << WORD_BITS) | un[j + nw - 1] as u128;
        let den = vn[nw - 1] as u128;
        let mut qhat = num / den;
        let mut rhat = num % den;

        loop {
            if qhat >= B
                || qhat * vn[nw - 2] as u128 > ((rhat << WORD_BITS) | un[j + nw - 2] as u128)
            {
                qhat -= 1;
                rhat += den;
                if rhat < B {
                    continue;
                }
            }
            break;
        }

        // D4: multiply and subtract.
        let mut k: i128 = 0;
        for i in 0..nw {
            let p = qhat * vn[i] as u128;
            let t = un[i + j] as i128 - k - (p as Word) as i128;
            un[i + j] = t as Word;
            k = (p >> WORD_BITS) as i128 - (t >> WORD_BITS);
        }
        let t = un[j + nw] as i128 - k;
        un[j + nw] = t as Word;

        let mut qj = qhat as Word;

        // D6: the estimate was one too large; add the divisor back.
        if t < 0 {
            qj -= 1;
            let mut carry = false;
            for i in 0..nw {
                let (sum, c) = add_carry(un[i + j], vn[i], carry);
                un[i + j] = sum;
                carry = c;
            }
            un[j + nw] = un[j + nw].wrapping_add(carry as Word);
        }

        q[j] = qj;
    }

    // D8: denormalize the remainder.
    if let Some(out) = rem {
        out.fill(0);
        for i in 0..nw {
            out[i] = shr_pair(*un.get(i + 1).unwrap_or(&0), un[i], s);
        }
    }

    u.fill(0);
    u[..q.len()].copy_from_slice(&q);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_ripples_carry() {
        let mut a = [Word::MAX, Word::MAX, 0];
        let carry = add_slices(&mut a, &[1, 0, 0], false);
        assert!(!carry);
        assert_eq!(a, [0, 0, 1]);
    }

    #[test]
    fn sub_reports_borrow() {
        let mut a = [0, 0];
        let borrow = sub_slices(&mut a, &[1, 0], false);
        assert!(borrow);
        assert_eq!(a, [Word::MAX, Word::MAX]);
    }

    #[test]
    fn add_word_at_index() {
        let mut a = [3, 4, 5, 6];
        assert!(!add_word_at(&mut a, 10, 1));
        assert_eq!(a, [3, 14, 5, 6]);

        let mut b = [0, Word::MAX, Word::MAX, Word::MAX];
        assert!(add_word_at(&mut b, 1, 1));
        assert_eq!(b, [0, 0, 0, 0]);
    }

    #[test]
    fn add_two_words_at_index() {
        let mut a = [3, 4, 5, 6];
        assert!(!add_two_words_at(&mut a, 10, 20, 1));
        assert_eq!(a, [3, 14, 25, 6]);
    }

    #[test]
    fn rotate_round_trip() {
        let mut a = [0x0123_4567_89ab_cdef, 0xfedc_ba98_7654_3210];
        let orig = a;
        rcl(&mut a, 7, false);
        rcr(&mut a, 7, false);
        // the top 7 bits were lost on the way left
        let mut expected = orig;
        expected[1] &= (1 << (WORD_BITS - 7)) - 1;
        assert_eq!(a, expected);
    }

    #[test]
    fn rcl_reports_last_bit() {
        let mut a = [HIGHEST_BIT, 0];
        assert!(!rcl(&mut a, 64, false));
        assert_eq!(a, [0, HIGHEST_BIT]);
        assert!(rcl(&mut a, 1, false));
    }

    #[test]
    fn compensation_left_justifies() {
        let mut a = [1, 0];
        let moved = compensation_to_left(&mut a);
        assert_eq!(moved, 127);
        assert_eq!(a, [0, HIGHEST_BIT]);

        let mut zero = [0, 0];
        assert_eq!(compensation_to_left(&mut zero), 0);
    }

    #[test]
    fn leading_bit_position() {
        assert_eq!(find_leading_bit(&[0, 0]), None);
        assert_eq!(find_leading_bit(&[1, 0]), Some((0, 0)));
        assert_eq!(find_leading_bit(&[0, HIGHEST_BIT]), Some((1, 63)));
    }

    #[test]
    fn schoolbook_multiply() {
        let mut out = [0; 4];
        mul_slices(&[Word::MAX, Word::MAX], &[Word::MAX, Word::MAX], &mut out);
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        assert_eq!(out, [1, 0, Word::MAX - 1, Word::MAX]);
    }

    #[test]
    fn division_single_word() {
        let mut u = [0, 1]; // 2^64
        let r = div_word(&mut u, 10).unwrap();
        assert_eq!(u, [0x1999_9999_9999_9999, 0]);
        assert_eq!(r, 6);
    }

    #[test]
    fn division_multi_word() {
        // ((2^128 - 1) * 3 + 5) / (2^128 - 1) = 3 rem 5
        let v = [Word::MAX, Word::MAX, 0, 0];
        let mut u = [0; 4];
        mul_slices(&[Word::MAX, Word::MAX], &[3, 0], &mut u);
        assert!(!add_slices(&mut u, &[5, 0, 0, 0], false));

        let mut rem = [0; 4];
        assert!(!div_rem(&mut u, &v, Some(&mut rem)));
        assert_eq!(u, [3, 0, 0, 0]);
        assert_eq!(rem, [5, 0, 0, 0]);
    }

    #[test]
    fn division_by_zero() {
        let mut u = [7, 0];
        assert!(div_rem(&mut u, &[0, 0], None));
        assert_eq!(div_word(&mut u, 0), None);
    }

    #[test]
    fn division_smaller_and_equal() {
        let mut u = [9, 0];
        let mut rem = [0, 0];
        assert!(!div_rem(&mut u, &[10, 0], Some(&mut rem)));
        assert_eq!(u, [0, 0]);
        assert_eq!(rem, [9, 0]);

        let mut u = [10, 3];
        assert!(!div_rem(&mut u, &[10, 3], Some(&mut rem)));
        assert_eq!(u, [1, 0]);
        assert_eq!(rem, [0, 0]);
    }
}
