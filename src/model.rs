use crate::preprocess::{CDATA_CLOSE, CDATA_OPEN};
use compact_str::CompactString;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Parsed document tree
// ============================================================================

/// Attribute values keyed by attribute name. Scoped to one element.
pub type Attributes = HashMap<String, String, ahash::RandomState>;

// Maps serialize with sorted keys so JSON output is reproducible.
fn serialize_sorted<S: Serializer>(
    attributes: &Attributes,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let sorted: BTreeMap<&str, &str> = attributes
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    sorted.serialize(serializer)
}

/// The attributes of the `<?xml ... ?>` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(serialize_with = "serialize_sorted")]
    pub attributes: Attributes,
}

/// One element of the tree.
///
/// `content` holds the element's own text with newlines outside CDATA
/// sections removed and both ends trimmed; CDATA markers are kept. When an
/// element mixes text and child elements, `content` is the concatenation of
/// all its text fragments and their interleaving is lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: CompactString,
    #[serde(
        default,
        skip_serializing_if = "Attributes::is_empty",
        serialize_with = "serialize_sorted"
    )]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
}

impl Element {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::default(),
            content: None,
            children: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Direct children in document order; empty when there are none.
    pub fn children(&self) -> &[Element] {
        self.children.as_deref().unwrap_or_default()
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().iter().find(|child| child.name() == name)
    }

    /// True when the element has neither content nor children.
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.children.is_none()
    }

    /// The element's content with CDATA markers removed.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        let content = self.content.as_deref()?;
        if !content.contains(CDATA_OPEN) {
            return Some(Cow::Borrowed(content));
        }

        let mut text = String::with_capacity(content.len());
        let mut rest = content;
        while let Some(start) = rest.find(CDATA_OPEN) {
            let body = &rest[start + CDATA_OPEN.len()..];
            let Some(end) = body.find(CDATA_CLOSE) else {
                break;
            };
            text.push_str(&rest[..start]);
            text.push_str(&body[..end]);
            rest = &body[end + CDATA_CLOSE.len()..];
        }
        text.push_str(rest);
        Some(Cow::Owned(text))
    }

    /// This element and all elements below it, pre-order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children().iter().rev());
        Some(element)
    }
}

/// Result of one parse: the optional declaration and at most one root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<Declaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    pub fn declaration_attribute(&self, name: &str) -> Option<&str> {
        self.declaration
            .as_ref()?
            .attributes
            .get(name)
            .map(String::as_str)
    }

    /// Number of elements in the tree.
    pub fn element_count(&self) -> usize {
        self.root().map_or(0, |root| root.descendants().count())
    }

    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
