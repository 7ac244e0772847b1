use crate::attributes;
use crate::model::Declaration;
use crate::scanner::Scanner;
use tracing::trace;

const DECLARATION_OPEN: &[u8] = b"<?xml";
const DECLARATION_CLOSE: &[u8] = b"?>";

/// Consumes a `<?xml ... ?>` header at the very start of `text`.
///
/// Returns the parsed header (none when it is absent or carries no
/// attributes) and the offset where the document body begins.
pub(crate) fn extract(text: &str) -> (Option<Declaration>, usize) {
    let mut scanner = Scanner::new(text.as_bytes());
    if !scanner.starts_with(DECLARATION_OPEN) {
        return (None, 0);
    }
    scanner.advance(DECLARATION_OPEN.len());
    // `<?xml-stylesheet ...?>` and friends are not the declaration.
    match scanner.peek() {
        Some(b'?' | b' ' | b'\t' | b'\r' | b'\n') => {}
        _ => return (None, 0),
    }
    let Some(close) = scanner.find_pattern(DECLARATION_CLOSE) else {
        return (None, 0);
    };

    let body = &text[DECLARATION_OPEN.len()..close];
    let attributes = attributes::parse_attributes(body);
    trace!(attributes = attributes.len(), "xml declaration");
    let declaration = (!attributes.is_empty()).then_some(Declaration { attributes });
    (declaration, close + DECLARATION_CLOSE.len())
}
