//! Comment stripping and CDATA section tracking
//!
//! The tree builder never sees comments, and it skips every recorded CDATA
//! span when looking for tag boundaries, so markup-like text inside a CDATA
//! section stays literal.

use crate::scanner::{Scanner, TAG_START};
use std::ops::Range;

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &[u8] = b"-->";
pub(crate) const CDATA_OPEN: &str = "<![CDATA[";
pub(crate) const CDATA_CLOSE: &str = "]]>";

/// Working text of one parse plus the byte ranges of its CDATA sections,
/// markers included. Ranges are sorted and never overlap.
#[derive(Debug)]
pub(crate) struct Source {
    text: String,
    cdata: Vec<Range<usize>>,
}

impl Source {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn slice(&self, range: Range<usize>) -> &str {
        &self.text[range]
    }

    /// CDATA section that covers `pos`, if any.
    pub fn cdata_containing(&self, pos: usize) -> Option<&Range<usize>> {
        let idx = self.cdata.partition_point(|section| section.end <= pos);
        self.cdata.get(idx).filter(|section| section.start <= pos)
    }

    /// CDATA sections lying entirely inside `span`, in order.
    pub fn cdata_within<'s>(&'s self, span: &Range<usize>) -> impl Iterator<Item = &'s Range<usize>> {
        let first = self.cdata.partition_point(|section| section.start < span.start);
        let end = span.end;
        self.cdata[first..]
            .iter()
            .take_while(move |section| section.end <= end)
    }
}

/// Trims the input, drops comments and records CDATA sections.
///
/// Comment markers inside a CDATA section are literal text. An unterminated
/// comment or CDATA opener is left in place as ordinary text.
pub(crate) fn preprocess(input: &str) -> Source {
    let input = input.trim_start_matches('\u{feff}').trim();
    let mut text = String::with_capacity(input.len());
    let mut cdata = Vec::new();
    let mut scanner = Scanner::new(input.as_bytes());
    let mut copied = 0;

    while let Some(open) = scanner.find_next(TAG_START) {
        scanner.pos = open;
        if scanner.starts_with(COMMENT_OPEN) {
            scanner.advance(COMMENT_OPEN.len());
            if let Some(close) = scanner.find_pattern(COMMENT_CLOSE) {
                text.push_str(&input[copied..open]);
                copied = close + COMMENT_CLOSE.len();
                scanner.pos = copied;
            }
        } else if scanner.starts_with(CDATA_OPEN.as_bytes()) {
            scanner.advance(CDATA_OPEN.len());
            if let Some(close) = scanner.find_pattern(CDATA_CLOSE.as_bytes()) {
                let end = close + CDATA_CLOSE.len();
                text.push_str(&input[copied..open]);
                let start = text.len();
                text.push_str(&input[open..end]);
                cdata.push(start..text.len());
                copied = end;
                scanner.pos = end;
            }
        } else {
            scanner.advance(1);
        }
    }
    text.push_str(&input[copied..]);

    // Removing a leading comment can expose whitespace again.
    text.truncate(text.trim_end().len());
    let leading = text.len() - text.trim_start().len();
    if leading > 0 {
        text.drain(..leading);
        for section in &mut cdata {
            section.start -= leading;
            section.end -= leading;
        }
    }

    Source { text, cdata }
}
