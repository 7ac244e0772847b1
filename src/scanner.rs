use memchr::{memchr, memmem};

pub(crate) const TAG_START: u8 = b'<';
pub(crate) const TAG_END: u8 = b'>';
pub(crate) const SLASH: u8 = b'/';

/// Bytes allowed in element and attribute names. Any non-ASCII byte counts,
/// so multi-byte characters are never split.
#[inline(always)]
pub(crate) fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b':' | b'.') || byte >= 0x80
}

/// Bytes allowed in a bare (unquoted) attribute value.
#[inline(always)]
pub(crate) fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte >= 0x80
}

#[inline(always)]
pub(crate) fn skip_whitespace(data: &[u8], mut pos: usize) -> usize {
    while pos < data.len() {
        match data[pos] {
            b' ' | b'\t' | b'\n' | b'\r' => pos += 1,
            _ => break,
        }
    }
    pos
}

/// End of the run of bytes starting at `pos` accepted by `accept`.
#[inline(always)]
pub(crate) fn run_end(data: &[u8], mut pos: usize, accept: fn(u8) -> bool) -> usize {
    while pos < data.len() && accept(data[pos]) {
        pos += 1;
    }
    pos
}

/// Forward-only cursor over a byte buffer. Positions are absolute offsets
/// into `data`; a scanner over `&buf[..limit]` never looks past `limit`.
pub(crate) struct Scanner<'a> {
    pub data: &'a [u8],
    pub pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline(always)]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline(always)]
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    #[inline(always)]
    pub fn skip_whitespace(&mut self) {
        self.pos = skip_whitespace(self.data, self.pos);
    }

    #[inline(always)]
    pub fn find_next(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.data.get(self.pos..)?).map(|i| self.pos + i)
    }

    #[inline(always)]
    pub fn find_pattern(&self, pattern: &[u8]) -> Option<usize> {
        memmem::find(self.data.get(self.pos..)?, pattern).map(|i| self.pos + i)
    }

    #[inline(always)]
    pub fn starts_with(&self, pattern: &[u8]) -> bool {
        self.remaining().starts_with(pattern)
    }

    #[inline(always)]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.data.len());
    }

    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    #[inline(always)]
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }
}
