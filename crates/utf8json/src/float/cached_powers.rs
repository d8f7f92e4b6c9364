//! Normalized powers of ten `10^k` for `k` in `-348..=340` step 8, as
//! 64-bit significand, binary exponent and decimal exponent.

use super::diy_fp::DiyFp;

#[derive(Debug, Clone, Copy)]
struct CachedPower {
    significand: u64,
    binary_exponent: i16,
    decimal_exponent: i16,
}

impl CachedPower {
    const fn new(significand: u64, binary_exponent: i16, decimal_exponent: i16) -> Self {
        Self {
            significand,
            binary_exponent,
            decimal_exponent,
        }
    }
}

static CACHED_POWERS: [CachedPower; 87] = [
    CachedPower::new(0xfa8f_d5a0_081c_0288, -1220, -348),
    CachedPower::new(0xbaae_e17f_a23e_bf76, -1193, -340),
    CachedPower::new(0x8b16_fb20_3055_ac76, -1166, -332),
    CachedPower::new(0xcf42_894a_5dce_35ea, -1140, -324),
    CachedPower::new(0x9a6b_b0aa_5565_3b2d, -1113, -316),
    CachedPower::new(0xe61a_cf03_3d1a_45df, -1087, -308),
    CachedPower::new(0xab70_fe17_c79a_c6ca, -1060, -300),
    CachedPower::new(0xff77_b1fc_bebc_dc4f, -1034, -292),
    CachedPower::new(0xbe56_91ef_416b_d60c, -1007, -284),
    CachedPower::new(0x8dd0_1fad_907f_fc3c, -980, -276),
    CachedPower::new(0xd351_5c28_3155_9a83, -954, -268),
    CachedPower::new(0x9d71_ac8f_ada6_c9b5, -927, -260),
    CachedPower::new(0xea9c_2277_23ee_8bcb, -901, -252),
    CachedPower::new(0xaecc_4991_4078_536d, -874, -244),
    CachedPower::new(0x823c_1279_5db6_ce57, -847, -236),
    CachedPower::new(0xc210_9436_4dfb_5637, -821, -228),
    CachedPower::new(0x9096_ea6f_3848_984f, -794, -220),
    CachedPower::new(0xd774_85cb_2582_3ac7, -768, -212),
    CachedPower::new(0xa086_cfcd_97bf_97f4, -741, -204),
    CachedPower::new(0xef34_0a98_172a_ace5, -715, -196),
    CachedPower::new(0xb238_67fb_2a35_b28e, -688, -188),
    CachedPower::new(0x84c8_d4df_d2c6_3f3b, -661, -180),
    CachedPower::new(0xc5dd_4427_1ad3_cdba, -635, -172),
    CachedPower::new(0x936b_9fce_bb25_c996, -608, -164),
    CachedPower::new(0xdbac_6c24_7d62_a584, -582, -156),
    CachedPower::new(0xa3ab_6658_0d5f_daf6, -555, -148),
    CachedPower::new(0xf3e2_f893_dec3_f126, -529, -140),
    CachedPower::new(0xb5b5_ada8_aaff_80b8, -502, -132),
    CachedPower::new(0x8762_5f05_6c7c_4a8b, -475, -124),
    CachedPower::new(0xc9bc_ff60_34c1_3053, -449, -116),
    CachedPower::new(0x964e_858c_91ba_2655, -422, -108),
    CachedPower::new(0xdff9_7724_7029_7ebd, -396, -100),
    CachedPower::new(0xa6df_bd9f_b8e5_b88f, -369, -92),
    CachedPower::new(0xf8a9_5fcf_8874_7d94, -343, -84),
    CachedPower::new(0xb944_7093_8fa8_9bcf, -316, -76),
    CachedPower::new(0x8a08_f0f8_bf0f_156b, -289, -68),
    CachedPower::new(0xcdb0_2555_6531_31b6, -263, -60),
    CachedPower::new(0x993f_e2c6_d07b_7fac, -236, -52),
    CachedPower::new(0xe45c_10c4_2a2b_3b06, -210, -44),
    CachedPower::new(0xaa24_2499_6973_92d3, -183, -36),
    CachedPower::new(0xfd87_b5f2_8300_ca0e, -157, -28),
    CachedPower::new(0xbce5_0864_9211_1aeb, -130, -20),
    CachedPower::new(0x8cbc_cc09_6f50_88cc, -103, -12),
    CachedPower::new(0xd1b7_1758_e219_652c, -77, -4),
    CachedPower::new(0x9c40_0000_0000_0000, -50, 4),
    CachedPower::new(0xe8d4_a510_0000_0000, -24, 12),
    CachedPower::new(0xad78_ebc5_ac62_0000, 3, 20),
    CachedPower::new(0x813f_3978_f894_0984, 30, 28),
    CachedPower::new(0xc097_ce7b_c907_15b3, 56, 36),
    CachedPower::new(0x8f7e_32ce_7bea_5c70, 83, 44),
    CachedPower::new(0xd5d2_38a4_abe9_8068, 109, 52),
    CachedPower::new(0x9f4f_2726_179a_2245, 136, 60),
    CachedPower::new(0xed63_a231_d4c4_fb27, 162, 68),
    CachedPower::new(0xb0de_6538_8cc8_ada8, 189, 76),
    CachedPower::new(0x83c7_088e_1aab_65db, 216, 84),
    CachedPower::new(0xc45d_1df9_4271_1d9a, 242, 92),
    CachedPower::new(0x924d_692c_a61b_e758, 269, 100),
    CachedPower::new(0xda01_ee64_1a70_8dea, 295, 108),
    CachedPower::new(0xa26d_a399_9aef_774a, 322, 116),
    CachedPower::new(0xf209_787b_b47d_6b85, 348, 124),
    CachedPower::new(0xb454_e4a1_79dd_1877, 375, 132),
    CachedPower::new(0x865b_8692_5b9b_c5c2, 402, 140),
    CachedPower::new(0xc835_53c5_c896_5d3d, 428, 148),
    CachedPower::new(0x952a_b45c_fa97_a0b3, 455, 156),
    CachedPower::new(0xde46_9fbd_99a0_5fe3, 481, 164),
    CachedPower::new(0xa59b_c234_db39_8c25, 508, 172),
    CachedPower::new(0xf6c6_9a72_a398_9f5c, 534, 180),
    CachedPower::new(0xb7dc_bf53_54e9_bece, 561, 188),
    CachedPower::new(0x88fc_f317_f222_41e2, 588, 196),
    CachedPower::new(0xcc20_ce9b_d35c_78a5, 614, 204),
    CachedPower::new(0x9816_5af3_7b21_53df, 641, 212),
    CachedPower::new(0xe2a0_b5dc_971f_303a, 667, 220),
    CachedPower::new(0xa8d9_d153_5ce3_b396, 694, 228),
    CachedPower::new(0xfb9b_7cd9_a4a7_443c, 720, 236),
    CachedPower::new(0xbb76_4c4c_a7a4_4410, 747, 244),
    CachedPower::new(0x8bab_8eef_b640_9c1a, 774, 252),
    CachedPower::new(0xd01f_ef10_a657_842c, 800, 260),
    CachedPower::new(0x9b10_a4e5_e991_3129, 827, 268),
    CachedPower::new(0xe710_9bfb_a19c_0c9d, 853, 276),
    CachedPower::new(0xac28_20d9_623b_f429, 880, 284),
    CachedPower::new(0x8044_4b5e_7aa7_cf85, 907, 292),
    CachedPower::new(0xbf21_e440_03ac_dd2d, 933, 300),
    CachedPower::new(0x8e67_9c2f_5e44_ff8f, 960, 308),
    CachedPower::new(0xd433_179d_9c8c_b841, 986, 316),
    CachedPower::new(0x9e19_db92_b4e3_1ba9, 1013, 324),
    CachedPower::new(0xeb96_bf6e_badf_77d9, 1039, 332),
    CachedPower::new(0xaf87_023b_9bf0_ee6b, 1066, 340),
];

const FIRST_DECIMAL_EXPONENT: i32 = -348;
const DECIMAL_EXPONENT_DISTANCE: i32 = 8;
const D_1_LOG2_10: f64 = 0.301_029_995_663_981_14;

/// Smallest and largest binary exponent Grisu wants for the scaled value.
pub(crate) const MIN_TARGET_EXPONENT: i32 = -60;
pub(crate) const MAX_TARGET_EXPONENT: i32 = -32;

/// Picks the cached power `c ~ 10^d`, returned as `(c, d)`, that moves a
/// normalized value with binary exponent `e` into
/// `[MIN_TARGET_EXPONENT, MAX_TARGET_EXPONENT]` when multiplied by it.
///
/// `min_exponent` is `MIN_TARGET_EXPONENT - (e + 64)`; the result satisfies
/// `min_exponent <= c.exponent()`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn for_binary_exponent_range(min_exponent: i32) -> (DiyFp, i32) {
    let estimate = f64::from(min_exponent + DiyFp::SIGNIFICAND_SIZE - 1) * D_1_LOG2_10;
    // No `f64::ceil` without std.
    let mut k = estimate as i32;
    if f64::from(k) < estimate {
        k += 1;
    }
    let index = ((-FIRST_DECIMAL_EXPONENT + k - 1) / DECIMAL_EXPONENT_DISTANCE + 1) as usize;
    let cached = CACHED_POWERS[index];
    let power = DiyFp::new(cached.significand, i32::from(cached.binary_exponent));
    (power, i32::from(cached.decimal_exponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_evenly_spaced() {
        for pair in CACHED_POWERS.windows(2) {
            assert_eq!(pair[1].decimal_exponent - pair[0].decimal_exponent, 8);
            assert!(pair[0].significand >> 63 == 1);
        }
        assert_eq!(i32::from(CACHED_POWERS[0].decimal_exponent), FIRST_DECIMAL_EXPONENT);
        assert_eq!(CACHED_POWERS[86].decimal_exponent, 340);
    }

    #[test]
    fn scaled_exponent_lands_in_window() {
        // Normalized exponents of every finite double.
        for e in -1137..=960 {
            let min_exponent = MIN_TARGET_EXPONENT - (e + DiyFp::SIGNIFICAND_SIZE);
            let (power, _) = for_binary_exponent_range(min_exponent);
            let scaled = power.exponent() + e + DiyFp::SIGNIFICAND_SIZE;
            assert!(
                (MIN_TARGET_EXPONENT..=MAX_TARGET_EXPONENT).contains(&scaled),
                "exponent {e} scaled to {scaled}"
            );
        }
    }

    #[test]
    fn exact_entry_for_ten_thousand() {
        let entry = CACHED_POWERS
            .iter()
            .find(|p| p.decimal_exponent == 4)
            .unwrap();
        assert_eq!(
            u128::from(entry.significand) >> -entry.binary_exponent,
            10_000
        );
    }
}
