//! Fingerprint properties: determinism, sensitivity and format.

use pdf_glyphmap::fingerprint::{EMPTY_SPAN_FINGERPRINT, fingerprint};
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn test_no_collisions_in_ten_thousand_tuples() {
    let mut seen = HashSet::new();
    let mut count = 0;

    for page in 0..4usize {
        for code in [0x41u32, 0x61, 0x3B1, 0x4E2D, 0x1F600] {
            for step in 0..500 {
                let x = 36.0 + step as f32 * 0.25;
                let y = 700.0 - (step % 50) as f32 * 12.5;
                assert!(seen.insert(fingerprint(code, x, y, page)));
                count += 1;
            }
        }
    }

    assert_eq!(count, 10_000);
    assert_eq!(seen.len(), 10_000);
}

#[test]
fn test_fingerprint_is_lowercase_md5_hex() {
    let fp = fingerprint('H' as u32, 56.8, 709.1, 0);
    assert_eq!(fp.len(), 32);
    assert!(fp.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    assert_ne!(fp, EMPTY_SPAN_FINGERPRINT);
}

proptest! {
    #[test]
    fn prop_deterministic(u in 0u32..0x110000, x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4, p in 0usize..10_000) {
        prop_assert_eq!(fingerprint(u, x, y, p), fingerprint(u, x, y, p));
    }

    #[test]
    fn prop_page_changes_fingerprint(u in 0u32..0x110000, x in 0.0f32..1000.0, y in 0.0f32..1000.0, p in 0usize..10_000) {
        prop_assert_ne!(fingerprint(u, x, y, p), fingerprint(u, x, y, p + 1));
    }

    #[test]
    fn prop_code_point_changes_fingerprint(u in 0u32..0x10FFFF, x in 0.0f32..1000.0, y in 0.0f32..1000.0) {
        prop_assert_ne!(fingerprint(u, x, y, 0), fingerprint(u + 1, x, y, 0));
    }

    #[test]
    fn prop_position_changes_fingerprint(u in 0u32..0x110000, x in 0.0f32..1000.0, y in 0.0f32..1000.0) {
        prop_assert_ne!(fingerprint(u, x, y, 0), fingerprint(u, x + 1.0, y, 0));
        prop_assert_ne!(fingerprint(u, x, y, 0), fingerprint(u, x, y + 1.0, 0));
    }
}
