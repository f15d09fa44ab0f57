//! Plain-text artifacts and atomic file output.
//!
//! Every artifact is written whole: the bytes go to a temporary sibling file
//! which is then renamed over the destination, so an interrupted run never
//! leaves a truncated report behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fingerprint::format_float;
use crate::layout::GlyphRecord;

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `data` to `path` via a temporary file and a rename.
///
/// Parent directories are created as needed.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(path);
    let result = fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Format one line of the glyph report (without the trailing newline).
///
/// # Examples
///
/// ```
/// use pdf_glyphmap::geometry::{Point, Position};
/// use pdf_glyphmap::layout::GlyphRecord;
/// use pdf_glyphmap::report::format_glyph_line;
///
/// let glyph = GlyphRecord {
///     fingerprint: "abc".to_string(),
///     character: 'H',
///     unicode_value: 72,
///     font_size: 12.0,
///     origin: Position::LayoutBottomLeft(Point::new(72.0, 700.5)),
///     page_index: 0,
/// };
/// assert_eq!(
///     format_glyph_line(&glyph),
///     "Glyph Code: abc, Text: H, Unicode: 72, Font Size: 12.0, Position: (72.0, 700.5), Page: 0"
/// );
/// ```
pub fn format_glyph_line(glyph: &GlyphRecord) -> String {
    format!(
        "Glyph Code: {}, Text: {}, Unicode: {}, Font Size: {}, Position: ({}, {}), Page: {}",
        glyph.fingerprint,
        glyph.character,
        glyph.unicode_value,
        format_float(glyph.font_size),
        format_float(glyph.x()),
        format_float(glyph.y()),
        glyph.page_index
    )
}

/// Full glyph report, one newline-terminated line per glyph.
pub fn glyph_report(glyphs: &[GlyphRecord]) -> String {
    let mut out = String::new();
    for glyph in glyphs {
        out.push_str(&format_glyph_line(glyph));
        out.push('\n');
    }
    out
}

/// Write the glyph report to `path`.
pub fn write_glyph_report(glyphs: &[GlyphRecord], path: &Path) -> Result<()> {
    write_atomic(path, glyph_report(glyphs).as_bytes())?;
    log::info!("Glyph information saved to {}", path.display());
    Ok(())
}

/// Write a UTF-8 text artifact to `path`.
pub fn write_text(text: &str, path: &Path) -> Result<()> {
    write_atomic(path, text.as_bytes())?;
    log::info!("Text saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Position};

    fn glyph(c: char, page_index: usize) -> GlyphRecord {
        GlyphRecord {
            fingerprint: format!("fp{}", page_index),
            character: c,
            unicode_value: c as u32,
            font_size: 9.96,
            origin: Position::LayoutBottomLeft(Point::new(56.8, 709.0)),
            page_index,
        }
    }

    #[test]
    fn test_report_lines() {
        let report = glyph_report(&[glyph('a', 0), glyph('b', 1)]);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Glyph Code: fp0, Text: a, Unicode: 97, Font Size: 9.96, Position: (56.8, 709.0), Page: 0"
        );
        assert!(lines[1].ends_with("Page: 1"));
        assert!(report.ends_with('\n'));
    }

    #[test]
    fn test_empty_report() {
        assert_eq!(glyph_report(&[]), "");
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.txt");

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_atomic_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        // A regular file cannot be used as a directory
        let result = write_atomic(&blocker.join("out.txt"), b"data");
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
