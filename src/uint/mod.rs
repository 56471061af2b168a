//! `UInt<N>` -- an unsigned integer stored as a fixed array of `N` 64-bit
//! limbs.

mod div;
pub(crate) mod string;

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Rem, Sub, SubAssign};

use crate::words::{self, Word, HIGHEST_BIT, WORD_BITS};

/// Fixed-width unsigned integer: `N` limbs, limb 0 least significant.
///
/// All arithmetic is modulo `2^(64*N)`; operations that can wrap report it
/// through their carry/borrow return value. The operator impls are the
/// wrapping companions of the checked methods.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UInt<const N: usize> {
    pub(crate) tab: [Word; N],
}

impl<const N: usize> UInt<N> {
    /// Number of limbs.
    pub const LIMBS: usize = N;

    /// Number of value bits.
    pub const BITS: usize = N * WORD_BITS;

    pub fn zero() -> Self {
        Self { tab: [0; N] }
    }

    pub fn one() -> Self {
        let mut r = Self::zero();
        r.tab[0] = 1;
        r
    }

    /// All bits set.
    pub fn max_value() -> Self {
        Self { tab: [Word::MAX; N] }
    }

    pub fn set_zero(&mut self) {
        self.tab = [0; N];
    }

    pub fn set_one(&mut self) {
        self.set_zero();
        self.tab[0] = 1;
    }

    pub fn set_max(&mut self) {
        self.tab = [Word::MAX; N];
    }

    /// Fills the value from a table given most-significant-limb first.
    ///
    /// If the table is longer than `N` the value is truncated and rounded:
    /// when the first unused limb has its top bit set, the lowest kept limb
    /// is incremented (unless that would carry). A shorter table leaves the
    /// low limbs zero.
    pub fn set_from_table(&mut self, table: &[Word]) {
        let mut src = 0;
        let mut i = N;

        while i > 0 && src < table.len() {
            i -= 1;
            self.tab[i] = table[src];
            src += 1;
        }

        if src < table.len() && table[src] & HIGHEST_BIT != 0 && self.tab[0] != Word::MAX {
            self.tab[0] += 1;
        }

        for w in self.tab[..i].iter_mut() {
            *w = 0;
        }
    }

    /// `self += other`; returns the carry.
    pub fn add(&mut self, other: &Self) -> bool {
        words::add_slices(&mut self.tab, &other.tab, false)
    }

    /// `self += other + carry`; returns the carry.
    pub fn add_carry(&mut self, other: &Self, carry: bool) -> bool {
        words::add_slices(&mut self.tab, &other.tab, carry)
    }

    /// `self -= other`; returns the borrow.
    pub fn sub(&mut self, other: &Self) -> bool {
        words::sub_slices(&mut self.tab, &other.tab, false)
    }

    /// `self -= other + borrow`; returns the borrow.
    pub fn sub_borrow(&mut self, other: &Self, borrow: bool) -> bool {
        words::sub_slices(&mut self.tab, &other.tab, borrow)
    }

    pub fn add_one(&mut self) -> bool {
        words::add_word_at(&mut self.tab, 1, 0)
    }

    pub fn sub_one(&mut self) -> bool {
        words::sub_slices(&mut self.tab, &Self::one().tab, false)
    }

    /// Adds a single limb at limb position `index`, rippling the carry.
    pub fn add_word(&mut self, value: Word, index: usize) -> bool {
        words::add_word_at(&mut self.tab, value, index)
    }

    /// Adds the two-limb value `hi:lo` at limb position `index`
    /// (`index <= N - 2`), rippling the carry.
    pub fn add_two_words(&mut self, lo: Word, hi: Word, index: usize) -> bool {
        words::add_two_words_at(&mut self.tab, lo, hi, index)
    }

    /// Rotates left by one bit; `fill` enters at bit 0, the old highest
    /// bit is returned.
    pub fn rcl1(&mut self, fill: bool) -> bool {
        words::rcl1(&mut self.tab, fill)
    }

    /// Rotates right by one bit; `fill` enters at the highest bit, the old
    /// lowest bit is returned.
    pub fn rcr1(&mut self, fill: bool) -> bool {
        words::rcr1(&mut self.tab, fill)
    }

    /// Rotates left by `bits`; vacated bits take `fill`. Returns the state
    /// of the last bit shifted out.
    pub fn rcl(&mut self, bits: usize, fill: bool) -> bool {
        words::rcl(&mut self.tab, bits, fill)
    }

    /// Rotates right by `bits`; vacated bits take `fill`. Returns the
    /// state of the last bit shifted out.
    pub fn rcr(&mut self, bits: usize, fill: bool) -> bool {
        words::rcr(&mut self.tab, bits, fill)
    }

    /// Shifts left until the highest bit is set; returns the number of bit
    /// positions moved. Zero stays zero.
    pub fn compensation_to_left(&mut self) -> usize {
        words::compensation_to_left(&mut self.tab)
    }

    /// Limb index and in-limb bit position of the highest set bit, or
    /// `None` for zero.
    pub fn find_leading_bit(&self) -> Option<(usize, u32)> {
        words::find_leading_bit(&self.tab)
    }

    /// Sets the bit `bit_index` (counted from 0 at the lowest bit);
    /// indexes beyond the width are ignored.
    pub fn set_bit(&mut self, bit_index: usize) {
        let index = bit_index / WORD_BITS;
        if index < N {
            self.tab[index] |= 1 << (bit_index % WORD_BITS);
        }
    }

    /// Clears the `n` lowest bits.
    pub fn clear_first_bits(&mut self, mut n: usize) {
        if n >= Self::BITS {
            self.set_zero();
            return;
        }

        let mut i = 0;
        while n >= WORD_BITS {
            self.tab[i] = 0;
            i += 1;
            n -= WORD_BITS;
        }

        if n > 0 {
            self.tab[i] &= Word::MAX << n;
        }
    }

    pub fn is_the_highest_bit_set(&self) -> bool {
        self.tab[N - 1] & HIGHEST_BIT != 0
    }

    pub fn is_the_lowest_bit_set(&self) -> bool {
        self.tab[0] & 1 != 0
    }

    /// True when the value is exactly `2^(64*N - 1)`.
    pub fn is_only_the_highest_bit_set(&self) -> bool {
        self.tab[N - 1] == HIGHEST_BIT && self.tab[..N - 1].iter().all(|&w| w == 0)
    }

    pub fn is_zero(&self) -> bool {
        self.tab.iter().all(|&w| w == 0)
    }

    /// `self *= other` truncated to `N` limbs; returns the carry when the
    /// product did not fit.
    pub fn mul(&mut self, other: &Self) -> bool {
        let mut out = vec![0 as Word; 2 * N];
        words::mul_slices(&self.tab, &other.tab, &mut out);
        self.tab.copy_from_slice(&out[..N]);
        out[N..].iter().any(|&w| w != 0)
    }

    /// Full `2N`-limb product, returned as `(low, high)` halves. Never
    /// overflows.
    pub fn mul_wide(&self, other: &Self) -> (Self, Self) {
        let mut out = vec![0 as Word; 2 * N];
        words::mul_slices(&self.tab, &other.tab, &mut out);

        let mut lo = Self::zero();
        let mut hi = Self::zero();
        lo.tab.copy_from_slice(&out[..N]);
        hi.tab.copy_from_slice(&out[N..]);
        (lo, hi)
    }

    /// `self *= word`; returns the carry.
    pub fn mul_word(&mut self, word: Word) -> bool {
        let mut carry: u128 = 0;
        for w in self.tab.iter_mut() {
            let cur = *w as u128 * word as u128 + carry;
            *w = cur as Word;
            carry = cur >> WORD_BITS;
        }
        carry != 0
    }

    pub fn to_u64(&self) -> Option<u64> {
        if self.tab[1..].iter().all(|&w| w == 0) {
            Some(self.tab[0])
        } else {
            None
        }
    }

    /// Lowest limb, ignoring the rest.
    pub(crate) fn low_word(&self) -> Word {
        self.tab[0]
    }
}

impl<const N: usize> Default for UInt<N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const N: usize> From<u64> for UInt<N> {
    fn from(value: u64) -> Self {
        let mut r = Self::zero();
        r.tab[0] = value;
        r
    }
}

impl<const N: usize> Ord for UInt<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        words::cmp_slices(&self.tab, &other.tab)
    }
}

impl<const N: usize> PartialOrd for UInt<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> Add for UInt<N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        UInt::add(&mut self, &rhs);
        self
    }
}

impl<const N: usize> AddAssign for UInt<N> {
    fn add_assign(&mut self, rhs: Self) {
        UInt::add(self, &rhs);
    }
}

impl<const N: usize> Sub for UInt<N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        UInt::sub(&mut self, &rhs);
        self
    }
}

impl<const N: usize> SubAssign for UInt<N> {
    fn sub_assign(&mut self, rhs: Self) {
        UInt::sub(self, &rhs);
    }
}

impl<const N: usize> Mul for UInt<N> {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        UInt::mul(&mut self, &rhs);
        self
    }
}

impl<const N: usize> MulAssign for UInt<N> {
    fn mul_assign(&mut self, rhs: Self) {
        UInt::mul(self, &rhs);
    }
}

/// Quotient; division by zero yields zero.
impl<const N: usize> Div for UInt<N> {
    type Output = Self;

    fn div(mut self, rhs: Self) -> Self {
        if self.div_rem(&rhs).is_none() {
            self.set_zero();
        }
        self
    }
}

impl<const N: usize> DivAssign for UInt<N> {
    fn div_assign(&mut self, rhs: Self) {
        if self.div_rem(&rhs).is_none() {
            self.set_zero();
        }
    }
}

/// Remainder; division by zero yields zero.
impl<const N: usize> Rem for UInt<N> {
    type Output = Self;

    fn rem(mut self, rhs: Self) -> Self {
        self.div_rem(&rhs).unwrap_or_else(Self::zero)
    }
}
