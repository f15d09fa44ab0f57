//! Glyph fingerprints.
//!
//! A fingerprint is the MD5 digest of `"{unicode}-{x}-{y}-{page}"`, rendered as
//! lower-case hex. It is a cross-reference key between the glyph report and the
//! overlay; it carries no security property.

use md5::{Digest, Md5};

/// Placeholder fingerprint for spans without text.
pub const EMPTY_SPAN_FINGERPRINT: &str = "N/A";

/// Compute the fingerprint of a (character, position, page) triple.
///
/// # Examples
///
/// ```
/// use pdf_glyphmap::fingerprint::fingerprint;
///
/// let a = fingerprint('H' as u32, 72.0, 700.0, 0);
/// assert_eq!(a.len(), 32);
/// assert_eq!(a, fingerprint('H' as u32, 72.0, 700.0, 0));
/// assert_ne!(a, fingerprint('H' as u32, 72.0, 700.0, 1));
/// ```
pub fn fingerprint(unicode_value: u32, x: f32, y: f32, page_index: usize) -> String {
    let key = fingerprint_key(unicode_value, x, y, page_index);
    let mut hasher = Md5::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The canonical string the fingerprint is hashed from.
pub fn fingerprint_key(unicode_value: u32, x: f32, y: f32, page_index: usize) -> String {
    format!("{}-{}-{}-{}", unicode_value, format_float(x), format_float(y), page_index)
}

/// Render a float in its shortest round-trip form, keeping `.0` on integral values.
///
/// # Examples
///
/// ```
/// use pdf_glyphmap::fingerprint::format_float;
///
/// assert_eq!(format_float(72.0), "72.0");
/// assert_eq!(format_float(100.5), "100.5");
/// assert_eq!(format_float(-3.0), "-3.0");
/// ```
pub fn format_float(value: f32) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(fingerprint_key(72, 56.8, 709.1, 0), "72-56.8-709.1-0");
        assert_eq!(fingerprint_key(105, 10.0, 0.0, 3), "105-10.0-0.0-3");
    }

    #[test]
    fn test_known_digest() {
        // md5("72-10.0-20.0-0")
        let fp = fingerprint(72, 10.0, 20.0, 0);
        let mut hasher = Md5::new();
        hasher.update(b"72-10.0-20.0-0");
        assert_eq!(fp, format!("{:x}", hasher.finalize()));
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_each_input_changes_fingerprint() {
        let base = fingerprint(65, 1.0, 2.0, 0);
        assert_ne!(base, fingerprint(66, 1.0, 2.0, 0));
        assert_ne!(base, fingerprint(65, 1.5, 2.0, 0));
        assert_ne!(base, fingerprint(65, 1.0, 2.5, 0));
        assert_ne!(base, fingerprint(65, 1.0, 2.0, 1));
    }

    #[test]
    fn test_swapped_coordinates_differ() {
        assert_ne!(fingerprint(65, 1.0, 2.0, 0), fingerprint(65, 2.0, 1.0, 0));
    }

    #[test]
    fn test_format_float_non_finite() {
        assert_eq!(format_float(f32::INFINITY), "inf");
        assert_eq!(format_float(f32::NAN), "NaN");
    }
}
