//! XML serializer.
//!
//! Writes a [`Document`] back as XML text. Attributes are written in name
//! order and an element's `content` comes before its children, since the
//! tree does not keep their interleaving. Content is written verbatim, so
//! parsing the output again gives an equal tree.
//!
//! Names are written as they are. A tree parsed with namespace expansion
//! only reparses equal while its expanded names are still valid tag names:
//! `DAV:prop` is, but `http://ns.example.com/boxschema/bigbox` is not, and
//! reads back as text.

use crate::model::{Attributes, Document, Element};

/// Options controlling serialization output.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Put child elements on their own indented lines. Elements with
    /// content are never indented inside.
    pub indent: bool,
    /// Indentation for one nesting level.
    pub indent_str: String,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent: false,
            indent_str: "  ".to_string(),
        }
    }
}

impl SerializeOptions {
    #[must_use]
    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn indent_str(mut self, s: &str) -> Self {
        self.indent_str = s.to_string();
        self
    }
}

impl Document {
    pub fn to_xml(&self) -> String {
        self.to_xml_with_options(&SerializeOptions::default())
    }

    pub fn to_xml_with_options(&self, options: &SerializeOptions) -> String {
        let mut output = String::new();
        if let Some(declaration) = &self.declaration {
            output.push_str("<?xml");
            // version leads, as in every conventional header
            if let Some(version) = declaration.attributes.get("version") {
                write_attribute(&mut output, "version", version);
            }
            for (name, value) in sorted(&declaration.attributes) {
                if name != "version" {
                    write_attribute(&mut output, name, value);
                }
            }
            output.push_str("?>");
            if self.root.is_some() {
                output.push('\n');
            }
        }
        if let Some(root) = &self.root {
            write_element(&mut output, root, options, 0);
        }
        output
    }
}

impl Element {
    pub fn to_xml(&self) -> String {
        self.to_xml_with_options(&SerializeOptions::default())
    }

    pub fn to_xml_with_options(&self, options: &SerializeOptions) -> String {
        let mut output = String::new();
        write_element(&mut output, self, options, 0);
        output
    }
}

fn sorted(attributes: &Attributes) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = attributes
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    pairs.sort_unstable();
    pairs
}

fn write_attribute(output: &mut String, name: &str, value: &str) {
    // Values holding both quote kinds cannot be written back faithfully.
    let quote = if value.contains('"') && !value.contains('\'') {
        '\''
    } else {
        '"'
    };
    output.push(' ');
    output.push_str(name);
    output.push('=');
    output.push(quote);
    output.push_str(value);
    output.push(quote);
}

fn write_element(output: &mut String, element: &Element, options: &SerializeOptions, depth: usize) {
    output.push('<');
    output.push_str(element.name());
    for (name, value) in sorted(&element.attributes) {
        write_attribute(output, name, value);
    }

    if element.is_empty() {
        output.push_str("/>");
        return;
    }
    output.push('>');

    if let Some(content) = &element.content {
        output.push_str(content);
    }

    let indent = options.indent && element.content.is_none();
    for child in element.children() {
        if indent {
            output.push('\n');
            push_indent(output, options, depth + 1);
        }
        write_element(output, child, options, depth + 1);
    }
    if indent && !element.children().is_empty() {
        output.push('\n');
        push_indent(output, options, depth);
    }

    output.push_str("</");
    output.push_str(element.name());
    output.push('>');
}

fn push_indent(output: &mut String, options: &SerializeOptions, depth: usize) {
    for _ in 0..depth {
        output.push_str(&options.indent_str);
    }
}
