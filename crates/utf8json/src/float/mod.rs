//! Binary floating point to shortest decimal text.
//!
//! [`DecimalDigits`] runs Grisu3 over [`DiyFp`] values scaled by a cached
//! power of ten. The roughly 0.5% of doubles for which Grisu3 cannot prove
//! its answer take core's exact shortest formatter instead, so the digits
//! are always the shortest that round-trip.

mod cached_powers;
mod digits;
mod diy_fp;
mod grisu;
mod ieee;

pub use digits::DecimalDigits;
pub use diy_fp::DiyFp;
