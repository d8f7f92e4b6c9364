use core::ops::{Mul, Sub};

/// A "do it yourself" floating point number: `significand * 2^exponent`
/// with a full 64-bit significand and no implicit bit.
///
/// Grisu works on these because every operation it needs (subtracting two
/// values with the same exponent, multiplying with a rounded 64-bit result)
/// is exact or has a known error bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiyFp {
    significand: u64,
    exponent: i32,
}

impl DiyFp {
    /// Bits in the significand.
    pub const SIGNIFICAND_SIZE: i32 = 64;

    /// Creates `significand * 2^exponent`.
    #[must_use]
    pub const fn new(significand: u64, exponent: i32) -> Self {
        Self {
            significand,
            exponent,
        }
    }

    /// The significand.
    #[must_use]
    pub const fn significand(self) -> u64 {
        self.significand
    }

    /// The binary exponent.
    #[must_use]
    pub const fn exponent(self) -> i32 {
        self.exponent
    }

    /// Shifts the significand left until its top bit is set, adjusting the
    /// exponent so the value is unchanged.
    ///
    /// A zero significand is returned as is.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn normalize(self) -> Self {
        if self.significand == 0 {
            return self;
        }
        let shift = self.significand.leading_zeros();
        Self {
            significand: self.significand << shift,
            exponent: self.exponent - shift as i32,
        }
    }

    /// Shifts the significand left so the exponent becomes `exponent`.
    ///
    /// `exponent` must not be above the current one, and the shift must not
    /// push set bits out of the significand.
    #[must_use]
    pub(crate) fn with_exponent(self, exponent: i32) -> Self {
        debug_assert!(exponent <= self.exponent);
        Self {
            significand: self.significand << (self.exponent - exponent),
            exponent,
        }
    }
}

impl Sub for DiyFp {
    type Output = Self;

    /// Exact difference of two values with equal exponents; `self` must not
    /// be smaller than `rhs`.
    fn sub(self, rhs: Self) -> Self {
        debug_assert_eq!(self.exponent, rhs.exponent);
        debug_assert!(self.significand >= rhs.significand);
        Self {
            significand: self.significand - rhs.significand,
            exponent: self.exponent,
        }
    }
}

impl Mul for DiyFp {
    type Output = Self;

    /// Product rounded half-up to the upper 64 bits of the 128-bit result.
    fn mul(self, rhs: Self) -> Self {
        let product = u128::from(self.significand) * u128::from(rhs.significand);
        #[allow(clippy::cast_possible_truncation)]
        let significand = ((product + (1 << 63)) >> 64) as u64;
        Self {
            significand,
            exponent: self.exponent + rhs.exponent + Self::SIGNIFICAND_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DiyFp;

    #[test]
    fn subtracts_significands() {
        let diff = DiyFp::new(3, 0) - DiyFp::new(1, 0);
        assert_eq!(diff, DiyFp::new(2, 0));
    }

    #[test]
    fn multiplies_with_rounding() {
        assert_eq!(DiyFp::new(3, 0) * DiyFp::new(2, 0), DiyFp::new(0, 64));
        assert_eq!(
            DiyFp::new(0x8000_0000_0000_0000, 11) * DiyFp::new(2, 13),
            DiyFp::new(1, 88)
        );
        assert_eq!(
            DiyFp::new(0x8000_0000_0000_0001, 11) * DiyFp::new(1, 13),
            DiyFp::new(1, 88)
        );
        assert_eq!(
            DiyFp::new(0x7FFF_FFFF_FFFF_FFFF, 11) * DiyFp::new(1, 13),
            DiyFp::new(0, 88)
        );
        assert_eq!(
            DiyFp::new(u64::MAX, 11) * DiyFp::new(u64::MAX, 13),
            DiyFp::new(0xFFFF_FFFF_FFFF_FFFE, 88)
        );
    }

    #[test]
    fn normalizes_to_top_bit() {
        let n = DiyFp::new(1, 0).normalize();
        assert_eq!(n, DiyFp::new(0x8000_0000_0000_0000, -63));
        let n = DiyFp::new(0x0012_3456_7890_ABCD, 5).normalize();
        assert_eq!(n.significand() >> 63, 1);
        assert_eq!(n.exponent(), 5 - 11);
        assert_eq!(DiyFp::new(0, 7).normalize(), DiyFp::new(0, 7));
    }
}
