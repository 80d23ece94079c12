//! Minimal SVG node tree with centralized escaping.
//!
//! Documents are built as [`Element`]s and serialized once. Attribute values
//! and text are escaped on output, so callers pass raw strings.

use std::fmt::Write as _;

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data.
    Text(String),
}

/// An SVG element with ordered attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name, attrs: Vec::new(), children: Vec::new() }
    }

    /// Append an attribute.
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Append a numeric attribute, written without a trailing `.0`.
    #[must_use]
    pub fn num(self, name: &'static str, value: f32) -> Self {
        self.attr(name, format_number(value))
    }

    /// Append a child element.
    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append character data.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append several child elements.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children.into_iter().map(Node::Element));
        self
    }

    /// Serialize without whitespace between elements.
    #[must_use]
    pub fn to_compact_string(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, None);
        out
    }

    /// Serialize with two-space indentation.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, Some(0));
        out.push('\n');
        out
    }

    fn write(&self, out: &mut String, depth: Option<usize>) {
        if let Some(d) = depth {
            if d > 0 {
                out.push('\n');
            }
            out.push_str(&"  ".repeat(d));
        }

        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape(value, true));
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        let text_only = self.children.iter().all(|c| matches!(c, Node::Text(_)));
        for child in &self.children {
            match child {
                Node::Element(el) => el.write(out, depth.map(|d| d + 1)),
                Node::Text(text) => out.push_str(&escape(text, false)),
            }
        }

        if let (Some(d), false) = (depth, text_only) {
            out.push('\n');
            out.push_str(&"  ".repeat(d));
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

/// Escape markup-significant characters; quotes too inside attributes.
#[must_use]
pub fn escape(input: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '\'' if in_attribute => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Format a coordinate, dropping the fraction when it is zero.
#[must_use]
pub fn format_number(value: f32) -> String {
    if value.fract() == 0.0 && value.abs() < 1e9 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
