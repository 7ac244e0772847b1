// Recursive-descent XML tree builder
use crate::model::{Document, Element};
use crate::preprocess::{self, Source};
use crate::scanner::{is_name_byte, run_end, skip_whitespace, Scanner, SLASH, TAG_END, TAG_START};
use crate::{attributes, declaration, namespace, Error, Result};
use bitflags::bitflags;
#[cfg(feature = "mmap")]
use memmap2::Mmap;
use memchr::memchr;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, trace, warn};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ParseFlags: u8 {
        /// Rewrite element names to their namespace-expanded form.
        const NAMESPACES = 1;
        /// Match a closing tag only after every nested element of the same
        /// name has been closed.
        const BALANCED_NESTING = 1 << 1;
    }
}

/// Builds [`Document`] trees from XML text.
///
/// By default an open tag is matched with the first closing tag of the same
/// name, so `<a><a></a></a>` splits after the inner `</a>`.
/// [`with_balanced_nesting`](Self::with_balanced_nesting) counts nested
/// openings instead.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    flags: ParseFlags,
    max_depth: Option<usize>,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            flags: ParseFlags::empty(),
            max_depth: None,
        }
    }

    pub fn with_namespaces(mut self, enabled: bool) -> Self {
        self.flags.set(ParseFlags::NAMESPACES, enabled);
        self
    }

    pub fn with_balanced_nesting(mut self, enabled: bool) -> Self {
        self.flags.set(ParseFlags::BALANCED_NESTING, enabled);
        self
    }

    /// Fail with [`Error::DepthLimitExceeded`] when elements nest deeper than
    /// `limit`. The root element is at depth 1.
    pub fn with_max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }

    pub fn flags(&self) -> ParseFlags {
        self.flags
    }

    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading document");

        #[cfg(feature = "mmap")]
        {
            let file = std::fs::File::open(path)?;
            // SAFETY: the map is only read, and dropped before this returns.
            let map = unsafe { Mmap::map(&file)? };
            self.parse_bytes(&map)
        }

        #[cfg(not(feature = "mmap"))]
        {
            let content = std::fs::read(path)?;
            self.parse_bytes(&content)
        }
    }

    /// Parses each file, in parallel with the `parallel` feature. Results are
    /// returned in the order of `paths`.
    pub fn parse_files<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Vec<Result<Document>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            paths.par_iter().map(|path| self.parse_file(path)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            paths.iter().map(|path| self.parse_file(path)).collect()
        }
    }

    pub fn parse_bytes(&self, data: &[u8]) -> Result<Document> {
        // Skip BOM if present
        let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
        self.parse_str(std::str::from_utf8(data)?)
    }

    pub fn parse_str(&self, xml: &str) -> Result<Document> {
        debug!(bytes = xml.len(), flags = ?self.flags, "parsing document");

        let source = preprocess::preprocess(xml);
        let (declaration, body_start) = declaration::extract(source.text());

        let builder = TreeBuilder {
            source: &source,
            balanced: self.flags.contains(ParseFlags::BALANCED_NESTING),
            max_depth: self.max_depth,
        };
        let mut elements = builder.parse_level(body_start..source.len(), 1)?.elements;
        let mut root = match elements.len() {
            0 => None,
            1 => elements.pop(),
            count => return Err(Error::MultipleRoots { count }),
        };

        if self.flags.contains(ParseFlags::NAMESPACES) {
            if let Some(root) = root.as_mut() {
                namespace::resolve(root);
            }
        }

        debug!(
            declaration = declaration.is_some(),
            root = ?root.as_ref().map(Element::name),
            "parsed document"
        );
        Ok(Document { declaration, root })
    }
}

/// Siblings found in one span plus the text left around them.
struct Level {
    elements: Vec<Element>,
    text: String,
}

enum TagKind {
    SelfClosing,
    Pair { inner: Range<usize> },
}

/// A matched tag. All ranges are byte offsets into the source text.
struct Tag {
    name: Range<usize>,
    attributes: Range<usize>,
    outer: Range<usize>,
    kind: TagKind,
}

struct TreeBuilder<'s> {
    source: &'s Source,
    balanced: bool,
    max_depth: Option<usize>,
}

impl<'s> TreeBuilder<'s> {
    #[inline(always)]
    fn bytes(&self) -> &'s [u8] {
        self.source.bytes()
    }

    /// Collects the sibling elements of `span`. An opening tag that cannot be
    /// matched ends the scan; it and the rest of the span become text.
    fn parse_level(&self, span: Range<usize>, depth: usize) -> Result<Level> {
        let mut cursor = span.start;
        let mut gaps = Vec::new();
        let mut elements = Vec::new();

        while let Some((open, name_end)) = self.next_tag_open(cursor, span.end) {
            let Some(tag) = self.match_tag(open, name_end, span.end) else {
                warn!(
                    tag = self.source.slice(open + 1..name_end),
                    offset = open,
                    "no matching end for tag, keeping the rest as text"
                );
                break;
            };
            trace!(tag = self.source.slice(tag.name.clone()), depth, "matched tag");
            gaps.push(cursor..open);
            cursor = tag.outer.end;
            elements.push(self.build_element(&tag, depth)?);
        }
        gaps.push(cursor..span.end);

        Ok(Level {
            elements,
            text: self.collect_text(&gaps),
        })
    }

    fn build_element(&self, tag: &Tag, depth: usize) -> Result<Element> {
        if let Some(limit) = self.max_depth {
            if depth > limit {
                return Err(Error::DepthLimitExceeded { limit });
            }
        }

        let mut element = Element::new(self.source.slice(tag.name.clone()));
        attributes::extract_into(
            self.source.slice(tag.attributes.clone()),
            &mut element.attributes,
        );

        if let TagKind::Pair { inner } = &tag.kind {
            let level = self.parse_level(inner.clone(), depth + 1)?;
            if !level.elements.is_empty() {
                element.children = Some(level.elements);
            }
            if !level.text.is_empty() {
                element.content = Some(level.text);
            }
        }
        Ok(element)
    }

    /// Next `<` in `from..limit` outside any CDATA section.
    fn next_markup(&self, from: usize, limit: usize) -> Option<usize> {
        let mut scanner = Scanner::at(&self.bytes()[..limit], from);
        loop {
            let open = scanner.find_next(TAG_START)?;
            match self.source.cdata_containing(open) {
                Some(section) => scanner.pos = section.end,
                None => return Some(open),
            }
        }
    }

    /// Next `<name` in `from..limit`. Returns the offset of `<` and the end
    /// of the name.
    fn next_tag_open(&self, from: usize, limit: usize) -> Option<(usize, usize)> {
        let bytes = &self.bytes()[..limit];
        let mut pos = from;
        while let Some(open) = self.next_markup(pos, limit) {
            let name_end = run_end(bytes, open + 1, is_name_byte);
            if name_end > open + 1 {
                return Some((open, name_end));
            }
            pos = open + 1;
        }
        None
    }

    fn match_tag(&self, open: usize, name_end: usize, limit: usize) -> Option<Tag> {
        let bytes = self.bytes();
        let name = open + 1..name_end;
        let gt = self.open_tag_end(name_end, limit)?;

        if gt > name_end && bytes[gt - 1] == SLASH {
            return Some(Tag {
                name,
                attributes: name_end..gt - 1,
                outer: open..gt + 1,
                kind: TagKind::SelfClosing,
            });
        }

        let (close, close_end) = self.find_close(&bytes[name.clone()], gt + 1, limit)?;
        Some(Tag {
            name,
            attributes: name_end..gt,
            outer: open..close_end,
            kind: TagKind::Pair { inner: gt + 1..close },
        })
    }

    /// Offset of the `>` ending an opening tag whose name ends at `from`.
    /// Quoted attribute values may contain `>`; a `<` means the tag is broken.
    fn open_tag_end(&self, from: usize, limit: usize) -> Option<usize> {
        let bytes = &self.bytes()[..limit];
        let mut pos = from;
        while pos < bytes.len() {
            match bytes[pos] {
                TAG_END => return Some(pos),
                TAG_START => return None,
                quote @ (b'"' | b'\'') => {
                    if let Some(offset) = memchr(quote, &bytes[pos + 1..]) {
                        pos += offset + 1;
                    }
                }
                _ => {}
            }
            pos += 1;
        }
        None
    }

    /// Finds `</name>` after `from`, returning the offset of its `<` and the
    /// offset just past its `>`.
    fn find_close(&self, name: &[u8], from: usize, limit: usize) -> Option<(usize, usize)> {
        let bytes = &self.bytes()[..limit];
        let mut nested = 0usize;
        let mut pos = from;

        while let Some(open) = self.next_markup(pos, limit) {
            pos = open + 1;
            if bytes.get(open + 1) == Some(&SLASH) {
                if let Some(end) = closing_tag_end(bytes, open + 2, name) {
                    if nested == 0 {
                        return Some((open, end));
                    }
                    nested -= 1;
                    pos = end;
                }
            } else if self.balanced && opens_tag(bytes, open + 1, name) {
                if let Some(gt) = self.open_tag_end(open + 1 + name.len(), limit) {
                    if bytes[gt - 1] != SLASH {
                        nested += 1;
                    }
                    pos = gt + 1;
                }
            }
        }
        None
    }

    /// Joins the text of `gaps`, dropping line breaks outside CDATA sections,
    /// and trims the result.
    fn collect_text(&self, gaps: &[Range<usize>]) -> String {
        let mut text = String::new();
        for gap in gaps {
            let mut pos = gap.start;
            for section in self.source.cdata_within(gap) {
                push_without_line_breaks(&mut text, self.source.slice(pos..section.start));
                text.push_str(self.source.slice(section.clone()));
                pos = section.end;
            }
            push_without_line_breaks(&mut text, self.source.slice(pos..gap.end));
        }

        let trimmed = text.trim();
        if trimmed.len() == text.len() {
            text
        } else {
            trimmed.to_owned()
        }
    }
}

/// If `bytes[start..]` continues a closing tag for `name` (`name\s*>`),
/// returns the offset just past the `>`.
fn closing_tag_end(bytes: &[u8], start: usize, name: &[u8]) -> Option<usize> {
    if !bytes.get(start..)?.starts_with(name) {
        return None;
    }
    let end = skip_whitespace(bytes, start + name.len());
    (bytes.get(end) == Some(&TAG_END)).then_some(end + 1)
}

/// Whether `bytes[start..]` opens a tag called exactly `name`.
fn opens_tag(bytes: &[u8], start: usize, name: &[u8]) -> bool {
    bytes.get(start..).is_some_and(|rest| rest.starts_with(name))
        && bytes
            .get(start + name.len())
            .is_some_and(|&byte| !is_name_byte(byte))
}

fn push_without_line_breaks(out: &mut String, text: &str) {
    out.extend(text.chars().filter(|&c| c != '\r' && c != '\n'));
}
