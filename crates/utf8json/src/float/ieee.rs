//! IEEE-754 binary layouts and the decomposition Grisu starts from.

use super::diy_fp::DiyFp;

/// Bit layout of one IEEE-754 binary format.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    /// Stored significand bits (without the hidden bit).
    physical_bits: u32,
    exponent_mask: u64,
    /// Exponent bias plus `physical_bits`, so that the stored significand is
    /// read as an integer.
    exponent_bias: i32,
}

pub(crate) const DOUBLE: Layout = Layout {
    physical_bits: 52,
    exponent_mask: 0x7FF,
    exponent_bias: 0x3FF + 52,
};

pub(crate) const SINGLE: Layout = Layout {
    physical_bits: 23,
    exponent_mask: 0xFF,
    exponent_bias: 0x7F + 23,
};

impl Layout {
    const fn hidden_bit(self) -> u64 {
        1 << self.physical_bits
    }

    const fn significand_mask(self) -> u64 {
        self.hidden_bit() - 1
    }

    const fn denormal_exponent(self) -> i32 {
        -self.exponent_bias + 1
    }

    fn biased_exponent(self, bits: u64) -> u64 {
        (bits >> self.physical_bits) & self.exponent_mask
    }

    /// The exact value of a finite, non-negative number with bit pattern
    /// `bits`, not normalized.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub(crate) fn decompose(self, bits: u64) -> DiyFp {
        let stored = bits & self.significand_mask();
        match self.biased_exponent(bits) {
            0 => DiyFp::new(stored, self.denormal_exponent()),
            biased => DiyFp::new(
                stored + self.hidden_bit(),
                biased as i32 - self.exponent_bias,
            ),
        }
    }

    /// The midpoints between the value and its lower and upper neighbours,
    /// as `(minus, plus)`, both with the exponent of the normalized `plus`.
    ///
    /// When the stored significand is zero (and the value is not
    /// denormal) the lower neighbour is twice as close, because the
    /// exponent drops across that boundary.
    pub(crate) fn normalized_boundaries(self, bits: u64) -> (DiyFp, DiyFp) {
        let v = self.decompose(bits);
        let f = v.significand();
        let e = v.exponent();
        let plus = DiyFp::new((f << 1) + 1, e - 1).normalize();
        let lower_is_closer =
            bits & self.significand_mask() == 0 && self.biased_exponent(bits) > 1;
        let minus = if lower_is_closer {
            DiyFp::new((f << 2) - 1, e - 2)
        } else {
            DiyFp::new((f << 1) - 1, e - 1)
        };
        (minus.with_exponent(plus.exponent()), plus)
    }
}
