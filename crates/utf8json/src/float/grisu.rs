//! Grisu3 shortest digit generation.
//!
//! The value `w` and its boundaries `minus`/`plus` are scaled by a cached
//! power of ten so that the integral part of the scaled `plus` fits in 32
//! bits. Digits are then cut off `plus` one at a time until the remainder is
//! inside the (conservatively shrunk) rounding interval, and the last digit
//! is walked down towards `w`. When the error bounds do not allow proving
//! that the result is the closest shortest representation, generation
//! reports failure and the caller falls back to an exact algorithm.

use super::{
    cached_powers::{self, MAX_TARGET_EXPONENT, MIN_TARGET_EXPONENT},
    diy_fp::DiyFp,
};

/// Longest digit string Grisu can produce for a double.
pub(crate) const MAX_DIGITS: usize = 17;

const SMALL_POWERS_OF_TEN: [u32; 11] = [
    0,
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// Largest power of ten `<= number`, with its exponent plus one, for a
/// `number` of at most `number_bits` bits. Zero yields `(0, 0)`.
#[allow(clippy::cast_sign_loss)]
fn biggest_power_ten(number: u32, number_bits: i32) -> (u32, i32) {
    // 1233 / 4096 approximates log10(2).
    let mut guess = ((number_bits + 1) * 1233 >> 12) + 1;
    if number < SMALL_POWERS_OF_TEN[guess as usize] {
        guess -= 1;
    }
    (SMALL_POWERS_OF_TEN[guess as usize], guess)
}

/// Moves the last digit of `buffer` down while that brings the represented
/// value closer to `w`, then checks that the result is safely inside the
/// rounding interval.
///
/// All quantities are in the scaled fixed-point unit of the current digit:
/// `distance_too_high_w` is the distance from the upper bound to `w`,
/// `rest` the distance from the upper bound to the current digits, and
/// `ten_kappa` the weight of the last digit.
fn round_weed(
    buffer: &mut [u8],
    distance_too_high_w: u64,
    unsafe_interval: u64,
    mut rest: u64,
    ten_kappa: u64,
    unit: u64,
) -> bool {
    let small_distance = distance_too_high_w.wrapping_sub(unit);
    let big_distance = distance_too_high_w.wrapping_add(unit);
    let last = buffer.len() - 1;

    while rest < small_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < small_distance
            || small_distance - rest >= rest + ten_kappa - small_distance)
    {
        buffer[last] -= 1;
        rest += ten_kappa;
    }

    // Another step would also be closer to the upper end of w's interval;
    // the digits cannot be decided.
    if rest < big_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < big_distance || big_distance - rest > rest + ten_kappa - big_distance)
    {
        return false;
    }

    2 * unit <= rest && unsafe_interval.checked_sub(4 * unit).is_some_and(|limit| rest <= limit)
}

/// Generates the digits of the scaled `w` into `buffer`.
///
/// Returns the digit count and `kappa`, the power of ten of the last digit
/// relative to the scaling, or `None` when the result cannot be proven
/// shortest and closest.
#[allow(clippy::cast_possible_truncation)]
fn digit_gen(low: DiyFp, w: DiyFp, high: DiyFp, buffer: &mut [u8]) -> Option<(usize, i32)> {
    debug_assert!(low.exponent() == w.exponent() && w.exponent() == high.exponent());
    debug_assert!((MIN_TARGET_EXPONENT..=MAX_TARGET_EXPONENT).contains(&w.exponent()));

    let mut unit: u64 = 1;
    let too_low = DiyFp::new(low.significand() - unit, low.exponent());
    let too_high = DiyFp::new(high.significand() + unit, high.exponent());
    let mut unsafe_interval = (too_high - too_low).significand();
    let shift = -w.exponent();
    let one = 1_u64 << shift;

    let mut integrals = (too_high.significand() >> shift) as u32;
    let mut fractionals = too_high.significand() & (one - 1);
    let (mut divisor, mut kappa) = biggest_power_ten(integrals, DiyFp::SIGNIFICAND_SIZE - shift);
    let mut length = 0;

    while kappa > 0 {
        buffer[length] = b'0' + (integrals / divisor) as u8;
        length += 1;
        integrals %= divisor;
        kappa -= 1;
        let rest = (u64::from(integrals) << shift) + fractionals;
        if rest < unsafe_interval {
            let weeded = round_weed(
                &mut buffer[..length],
                (too_high - w).significand(),
                unsafe_interval,
                rest,
                u64::from(divisor) << shift,
                unit,
            );
            return weeded.then_some((length, kappa));
        }
        divisor /= 10;
    }

    loop {
        fractionals = fractionals.wrapping_mul(10);
        unit = unit.wrapping_mul(10);
        unsafe_interval = unsafe_interval.wrapping_mul(10);
        buffer[length] = b'0' + (fractionals >> shift) as u8;
        length += 1;
        fractionals &= one - 1;
        kappa -= 1;
        if fractionals < unsafe_interval {
            let weeded = round_weed(
                &mut buffer[..length],
                (too_high - w).significand().wrapping_mul(unit),
                unsafe_interval,
                fractionals,
                one,
                unit,
            );
            return weeded.then_some((length, kappa));
        }
    }
}

/// Shortest digits for the normalized value `w` with boundaries `minus` and
/// `plus` (all three sharing `w`'s exponent).
///
/// On success returns the digit count and the decimal exponent such that
/// `digits * 10^exponent` is the shortest decimal inside the boundaries.
pub(crate) fn shortest(
    w: DiyFp,
    minus: DiyFp,
    plus: DiyFp,
    buffer: &mut [u8; MAX_DIGITS],
) -> Option<(usize, i32)> {
    debug_assert_eq!(w.exponent(), plus.exponent());
    let min_exponent = MIN_TARGET_EXPONENT - (w.exponent() + DiyFp::SIGNIFICAND_SIZE);
    let (power, decimal_exponent) = cached_powers::for_binary_exponent_range(min_exponent);

    let scaled_w = w * power;
    let scaled_minus = minus * power;
    let scaled_plus = plus * power;

    let (length, kappa) = digit_gen(scaled_minus, scaled_w, scaled_plus, buffer)?;
    Some((length, kappa - decimal_exponent))
}
