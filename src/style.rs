//! Indentation style conversion
//!
//! The canonical renderer always emits spaces. When a run asks for tabs,
//! this pass rewrites each line's leading indentation: every complete
//! `width`-space run becomes one tab, repeated across nesting levels, so a
//! line three levels deep (12 leading spaces at width 4) ends up with three
//! leading tabs. A trailing partial run stays as literal spaces. Nothing
//! after the first non-space character is touched, and line endings are
//! preserved as-is.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Convert leading space runs to tabs, line by line.
pub fn convert_indent(source: &str, width: usize) -> String {
    if width == 0 {
        return source.to_owned();
    }
    let mut out = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        let spaces = line.bytes().take_while(|&b| b == b' ').count();
        let tabs = spaces / width;
        for _ in 0..tabs {
            out.push('\t');
        }
        out.push_str(&line[tabs * width..]);
    }
    out
}

/// Convert the file at `path` in place.
///
/// The converted content is written to a sibling temp file first and renamed
/// over the original, so a failure never leaves a partially converted file.
pub fn convert_indent_in_place(path: &Path, width: usize) -> io::Result<()> {
    let source = fs::read_to_string(path)?;
    let converted = convert_indent(&source, width);

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(converted.as_bytes())?;
    staged.flush()?;
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_nesting_level_becomes_one_tab() {
        let source = "<a>\n    <b>\n        <c/>\n    </b>\n</a>\n";
        assert_eq!(
            convert_indent(source, 4),
            "<a>\n\t<b>\n\t\t<c/>\n\t</b>\n</a>\n"
        );
    }

    #[test]
    fn partial_runs_keep_their_spaces() {
        assert_eq!(convert_indent("      x\n", 4), "\t  x\n");
        assert_eq!(convert_indent("   x\n", 4), "   x\n");
    }

    #[test]
    fn non_leading_whitespace_is_untouched() {
        assert_eq!(
            convert_indent("    <a b=\"1\"    c=\"2\"/>\n", 4),
            "\t<a b=\"1\"    c=\"2\"/>\n"
        );
    }

    #[test]
    fn crlf_line_endings_are_preserved() {
        assert_eq!(convert_indent("<a>\r\n    <b/>\r\n</a>\r\n", 4), "<a>\r\n\t<b/>\r\n</a>\r\n");
    }

    #[test]
    fn in_place_conversion_rewrites_the_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.xml");
        fs::write(&path, "<a>\n    <b/>\n</a>\n").unwrap();
        convert_indent_in_place(&path, 4).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<a>\n\t<b/>\n</a>\n");
    }
}
