//! Division for [`UInt`].

use crate::words::{self, Word};

use super::UInt;

impl<const N: usize> UInt<N> {
    /// `self /= divisor`, returning the remainder, or `None` when the
    /// divisor is zero (`self` is left unchanged in that case).
    pub fn div_rem(&mut self, divisor: &Self) -> Option<Self> {
        let mut rem = Self::zero();
        let mut quot = self.tab;
        if words::div_rem(&mut quot, &divisor.tab, Some(&mut rem.tab)) {
            return None;
        }
        self.tab = quot;
        Some(rem)
    }

    /// `self /= divisor` for a single-limb divisor, returning the
    /// remainder, or `None` when the divisor is zero.
    pub fn div_word(&mut self, divisor: Word) -> Option<Word> {
        words::div_word(&mut self.tab, divisor)
    }
}
