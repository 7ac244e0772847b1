//! Namespace expansion of element names
//!
//! Each element sees the bindings of its ancestors plus its own `xmlns` and
//! `xmlns:<prefix>` attributes. A default binding is prepended to unprefixed
//! names; a bound prefix replaces `prefix:`. Attributes are never rewritten.

use crate::model::{Attributes, Element};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::trace;

const XMLNS: &str = "xmlns";
const XMLNS_PREFIX: &str = "xmlns:";

/// Namespace bindings in scope at one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceScope {
    default: Option<String>,
    prefixes: HashMap<String, String, ahash::RandomState>,
}

impl NamespaceScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// URI bound to the unprefixed (default) namespace.
    pub fn default_namespace(&self) -> Option<&str> {
        self.default.as_deref().filter(|uri| !uri.is_empty())
    }

    /// URI bound to `prefix`.
    pub fn lookup(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .get(prefix)
            .map(String::as_str)
            .filter(|uri| !uri.is_empty())
    }

    /// The scope for an element with `attributes`, borrowing this one when
    /// the element declares nothing.
    pub fn enter<'s>(&'s self, attributes: &Attributes) -> Cow<'s, NamespaceScope> {
        let mut scope = Cow::Borrowed(self);
        for (name, uri) in attributes {
            if name == XMLNS {
                scope.to_mut().default = Some(uri.clone());
            } else if let Some(prefix) = name.strip_prefix(XMLNS_PREFIX) {
                scope.to_mut().prefixes.insert(prefix.to_owned(), uri.clone());
            }
        }
        scope
    }

    /// Expanded form of `name`, or `None` when it stays as is.
    ///
    /// Names whose prefix is `http` or `https` look like absolute URLs and are
    /// never treated as prefixed.
    pub fn expand(&self, name: &str) -> Option<String> {
        match name.split_once(':') {
            None => self.default_namespace().map(|uri| format!("{uri}{name}")),
            Some((prefix, local)) if !prefix.is_empty() && prefix != "http" && prefix != "https" => {
                self.lookup(prefix).map(|uri| format!("{uri}{local}"))
            }
            Some(_) => None,
        }
    }
}

/// Rewrites the names of `root` and every element below it.
pub fn resolve(root: &mut Element) {
    resolve_in(root, &NamespaceScope::new());
}

fn resolve_in(element: &mut Element, parent: &NamespaceScope) {
    let scope = parent.enter(&element.attributes);
    if let Some(expanded) = scope.expand(&element.name) {
        trace!(from = %element.name, to = %expanded, "expanded element name");
        element.name = expanded.into();
    }
    if let Some(children) = element.children.as_mut() {
        for child in children {
            resolve_in(child, &scope);
        }
    }
}
