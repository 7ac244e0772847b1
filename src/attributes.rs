//! `name=value` pair extraction from raw tag text

use crate::model::Attributes;
use crate::scanner::{is_name_byte, is_word_byte, run_end, Scanner};
use memchr::memchr;

/// Parses every `name=value` pair found in `raw`.
///
/// Values may be double-quoted, single-quoted or a bare word. Text that does
/// not form a pair is skipped. A repeated name keeps its last value.
pub fn parse_attributes(raw: &str) -> Attributes {
    let mut attributes = Attributes::default();
    extract_into(raw, &mut attributes);
    attributes
}

pub(crate) fn extract_into(raw: &str, attributes: &mut Attributes) {
    let bytes = raw.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        if !is_name_byte(bytes[pos]) {
            pos += 1;
            continue;
        }
        let name_end = run_end(bytes, pos, is_name_byte);
        match read_value(bytes, name_end) {
            Some((value, next)) => {
                attributes.insert(raw[pos..name_end].to_owned(), raw[value].to_owned());
                pos = next;
            }
            // No shorter name starting inside this run can be followed by `=`.
            None => pos = name_end,
        }
    }
}

/// Reads `\s*=\s*value` starting right after a name. Returns the byte range of
/// the unquoted value and the position after the whole pair.
fn read_value(bytes: &[u8], from: usize) -> Option<(std::ops::Range<usize>, usize)> {
    let mut scanner = Scanner::at(bytes, from);
    scanner.skip_whitespace();
    if scanner.peek()? != b'=' {
        return None;
    }
    scanner.advance(1);
    scanner.skip_whitespace();

    let start = scanner.pos;
    match scanner.peek()? {
        quote @ (b'"' | b'\'') => {
            let close = memchr(quote, &bytes[start + 1..])? + start + 1;
            Some((start + 1..close, close + 1))
        }
        byte if is_word_byte(byte) => {
            let end = run_end(bytes, start, is_word_byte);
            Some((start..end, end))
        }
        _ => None,
    }
}
