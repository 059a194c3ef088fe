//! In-memory document model.
//!
//! A document is the flat list of display lines the viewer scrolls over.
//! Tabs are expanded at load time and the widest line is precomputed so the
//! horizontal scroll range never has to rescan the text.

use std::io;
use std::path::Path;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Tab stops every 8 columns, the terminal default.
const TAB_WIDTH: usize = 8;

/// A loaded text document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Display name (file name, shown in the title bar).
    pub name: String,
    lines: Vec<String>,
    max_width: usize,
}

impl Document {
    /// Load a file from disk.
    pub fn open(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(name, &text))
    }

    /// Build a document from raw text.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let lines: Vec<String> = text
            .lines()
            .map(expand_tabs)
            .collect();
        let max_width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        Self {
            name: name.into(),
            lines,
            max_width,
        }
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Display width of the widest line, in terminal columns.
    pub fn max_width(&self) -> usize {
        self.max_width
    }
}

/// Expand tabs to spaces, honouring column alignment.
fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = TAB_WIDTH - (column % TAB_WIDTH);
            for _ in 0..pad {
                out.push(' ');
            }
            column += pad;
        } else {
            out.push(ch);
            column += ch.width().unwrap_or(0);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_tabs_to_column_stops() {
        let doc = Document::from_text("t", "a\tb\n\tc");
        assert_eq!(doc.line(0), Some("a       b"));
        assert_eq!(doc.line(1), Some("        c"));
    }

    #[test]
    fn tracks_the_widest_line() {
        let doc = Document::from_text("t", "ab\nabcdef\nxyz");
        assert_eq!(doc.max_width(), 6);
        assert_eq!(doc.line_count(), 3);
    }

    #[test]
    fn wide_glyphs_count_double() {
        let doc = Document::from_text("t", "日本語");
        assert_eq!(doc.max_width(), 6);
    }

    #[test]
    fn strips_line_endings() {
        let doc = Document::from_text("t", "one\r\ntwo\r\n");
        assert_eq!(doc.line(0), Some("one"));
        assert_eq!(doc.line(1), Some("two"));
        assert_eq!(doc.line_count(), 2);
    }
}
