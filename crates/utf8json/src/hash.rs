//! 32-bit FarmHash (`farmhash::Hash32`), used so that owned and borrowed
//! UTF-8 buffers with the same content hash identically.

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

#[inline]
fn fetch32(s: &[u8], i: usize) -> u32 {
    u32::from_le_bytes([s[i], s[i + 1], s[i + 2], s[i + 3]])
}

/// Murmur3 finalizer.
#[inline]
fn fmix(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

#[inline]
fn mur(mut a: u32, mut h: u32) -> u32 {
    a = a.wrapping_mul(C1);
    a = a.rotate_right(17);
    a = a.wrapping_mul(C2);
    h ^= a;
    h = h.rotate_right(19);
    h.wrapping_mul(5).wrapping_add(0xe654_6b64)
}

#[allow(clippy::cast_possible_truncation)]
fn len_0_to_4(s: &[u8]) -> u32 {
    let mut b: u32 = 0;
    let mut c: u32 = 9;
    for &v in s {
        b = b.wrapping_mul(C1).wrapping_add(u32::from(v));
        c ^= b;
    }
    fmix(mur(b, mur(s.len() as u32, c)))
}

#[allow(clippy::cast_possible_truncation)]
fn len_5_to_12(s: &[u8]) -> u32 {
    let len = s.len();
    let mut a = len as u32;
    let mut b = a.wrapping_mul(5);
    let mut c: u32 = 9;
    let d = b;
    a = a.wrapping_add(fetch32(s, 0));
    b = b.wrapping_add(fetch32(s, len - 4));
    c = c.wrapping_add(fetch32(s, (len >> 1) & 4));
    fmix(mur(c, mur(b, mur(a, d))))
}

#[allow(clippy::cast_possible_truncation)]
fn len_13_to_24(s: &[u8]) -> u32 {
    let len = s.len();
    let mut a = fetch32(s, (len >> 1) - 4);
    let b = fetch32(s, 4);
    let c = fetch32(s, len - 8);
    let d = fetch32(s, len >> 1);
    let e = fetch32(s, 0);
    let f = fetch32(s, len - 4);
    let mut h = d.wrapping_mul(C1).wrapping_add(len as u32);
    a = a.rotate_right(12).wrapping_add(f);
    h = mur(c, h).wrapping_add(a);
    a = a.rotate_right(3).wrapping_add(c);
    h = mur(e, h).wrapping_add(a);
    a = a.wrapping_add(f).rotate_right(12).wrapping_add(d);
    h = mur(b, h).wrapping_add(a);
    fmix(h)
}

/// Computes the 32-bit FarmHash of `s`.
///
/// In the 0-4 byte path bytes are mixed as unsigned values.
///
/// ```rust
/// use utf8json::farm_hash32;
///
/// assert_eq!(farm_hash32(b"hello"), 0x7996_9366);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn farm_hash32(s: &[u8]) -> u32 {
    let len = s.len();
    if len <= 4 {
        return len_0_to_4(s);
    }
    if len <= 12 {
        return len_5_to_12(s);
    }
    if len <= 24 {
        return len_13_to_24(s);
    }

    let mut h = len as u32;
    let mut g = C1.wrapping_mul(len as u32);
    let mut f = g;
    let scramble = |i: usize| {
        fetch32(s, i)
            .wrapping_mul(C1)
            .rotate_right(17)
            .wrapping_mul(C2)
    };
    let a0 = scramble(len - 4);
    let a1 = scramble(len - 8);
    let a2 = scramble(len - 16);
    let a3 = scramble(len - 12);
    let a4 = scramble(len - 20);
    h ^= a0;
    h = h.rotate_right(19).wrapping_mul(5).wrapping_add(0xe654_6b64);
    h ^= a2;
    h = h.rotate_right(19).wrapping_mul(5).wrapping_add(0xe654_6b64);
    g ^= a1;
    g = g.rotate_right(19).wrapping_mul(5).wrapping_add(0xe654_6b64);
    g ^= a3;
    g = g.rotate_right(19).wrapping_mul(5).wrapping_add(0xe654_6b64);
    f = f.wrapping_add(a4);
    f = f.rotate_right(19).wrapping_add(113);

    let mut iters = (len - 1) / 20;
    let mut p = 0;
    loop {
        let a = fetch32(s, p);
        let b = fetch32(s, p + 4);
        let c = fetch32(s, p + 8);
        let d = fetch32(s, p + 12);
        let e = fetch32(s, p + 16);
        h = h.wrapping_add(a);
        g = g.wrapping_add(b);
        f = f.wrapping_add(c);
        h = mur(d, h).wrapping_add(e);
        g = mur(c, g).wrapping_add(a);
        f = mur(b.wrapping_add(e.wrapping_mul(C1)), f).wrapping_add(d);
        f = f.wrapping_add(g);
        g = g.wrapping_add(f);
        p += 20;
        iters -= 1;
        if iters == 0 {
            break;
        }
    }

    g = g.rotate_right(11).wrapping_mul(C1);
    g = g.rotate_right(17).wrapping_mul(C1);
    f = f.rotate_right(11).wrapping_mul(C1);
    f = f.rotate_right(17).wrapping_mul(C1);
    h = h.wrapping_add(g).rotate_right(19);
    h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    h = h.rotate_right(17).wrapping_mul(C1);
    h = h.wrapping_add(f).rotate_right(19);
    h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    h.rotate_right(17).wrapping_mul(C1)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::farm_hash32;

    #[rstest]
    #[case::empty(b"", 0xdc56_d17a)]
    #[case::one(b"a", 0x3c97_3d4d)]
    #[case::four(b"abcd", 0x98b5_1e95)]
    #[case::five(b"hello", 0x7996_9366)]
    #[case::twelve(b"hello, world", 0x1d1b_11c7)]
    #[case::nineteen(b"The quick brown fox", 0xb4fe_65b9)]
    #[case::long(b"The quick brown fox jumps over the lazy dog", 0xec99_8320)]
    fn matches_reference(#[case] input: &[u8], #[case] expected: u32) {
        assert_eq!(farm_hash32(input), expected);
    }

    #[test]
    fn prefixes_hash_apart() {
        let data: std::vec::Vec<u8> = (0..=255_u8).collect();
        let hashes: std::collections::HashSet<u32> =
            (0..data.len()).map(|len| farm_hash32(&data[..len])).collect();
        assert_eq!(hashes.len(), data.len());
    }

    #[test]
    fn high_bytes_are_unsigned() {
        assert_eq!(farm_hash32(&[0xFF; 3]), 0x2f83_22e8);
        assert_eq!(farm_hash32("αβγ".as_bytes()), 0xffce_46a7);
    }
}
