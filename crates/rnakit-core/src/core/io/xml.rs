//! A small XML element-tree reader and writer.
//!
//! Covers what structure documents use: elements, attributes, character
//! data, the predefined and numeric entities, comments, CDATA sections,
//! processing instructions and a DOCTYPE declaration (which is skipped).
//! Namespaces and DTD validation are out of its reach.

use super::error::FormatError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// 1-based line of the start tag; 0 for elements built in memory.
    pub line: usize,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl ToString) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    /// A child element holding only `text`.
    pub fn text_element(name: &str, text: impl ToString) -> Self {
        Self::new(name).with_text(text)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Concatenated character data of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Deepest element nesting accepted by [`parse`].
const MAX_DEPTH: usize = 256;

/// Parses a document and returns its root element.
pub(crate) fn parse(text: &str) -> Result<Element, FormatError> {
    Parser {
        text,
        pos: 0,
        line: 1,
    }
    .document()
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn advance(&mut self, len: usize) {
        self.line += self.rest()[..len].matches('\n').count();
        self.pos += len;
    }

    fn error(&self, details: impl Into<String>) -> FormatError {
        FormatError::Xml {
            line: self.line,
            details: details.into(),
        }
    }

    /// Consumes everything up to and including `terminator` and returns the
    /// text before it.
    fn take_until(&mut self, terminator: &str, what: &str) -> Result<&'a str, FormatError> {
        let rest = self.rest();
        match rest.find(terminator) {
            Some(idx) => {
                self.advance(idx + terminator.len());
                Ok(&rest[..idx])
            }
            None => Err(self.error(format!("unterminated {what}"))),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.advance(rest.len() - trimmed.len());
    }

    fn expect(&mut self, token: char) -> Result<(), FormatError> {
        match self.rest().chars().next() {
            Some(c) if c == token => {
                self.advance(c.len_utf8());
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{token}', found '{c}'"))),
            None => Err(self.error(format!("expected '{token}', found end of input"))),
        }
    }

    fn name(&mut self) -> Result<&'a str, FormatError> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a name"));
        }
        self.advance(len);
        Ok(&rest[..len])
    }

    fn skip_doctype(&mut self) -> Result<(), FormatError> {
        let mut depth = 0usize;
        for (idx, c) in self.rest().char_indices() {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '>' if depth == 0 => {
                    self.advance(idx + 1);
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(self.error("unterminated DOCTYPE declaration"))
    }

    /// Skips whitespace, comments, processing instructions and DOCTYPE
    /// outside the root element.
    fn skip_misc(&mut self) -> Result<(), FormatError> {
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("<?") {
                self.take_until("?>", "processing instruction")?;
            } else if rest.starts_with("<!--") {
                self.advance(4);
                self.take_until("-->", "comment")?;
            } else if rest.starts_with("<!DOCTYPE") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn document(mut self) -> Result<Element, FormatError> {
        self.skip_misc()?;
        if !self.rest().starts_with('<') {
            return Err(self.error("expected a root element"));
        }
        let root = self.element(1)?;
        self.skip_misc()?;
        if !self.rest().is_empty() {
            return Err(self.error("content after the root element"));
        }
        Ok(root)
    }

    fn element(&mut self, depth: usize) -> Result<Element, FormatError> {
        if depth > MAX_DEPTH {
            return Err(self.error(format!("elements nested deeper than {MAX_DEPTH} levels")));
        }
        let mut element = Element {
            line: self.line,
            ..Element::default()
        };
        self.expect('<')?;
        element.name = self.name()?.to_string();

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.advance(2);
                return Ok(element);
            }
            if rest.starts_with('>') {
                self.advance(1);
                break;
            }
            let name = self.name()?.to_string();
            self.skip_whitespace();
            self.expect('=')?;
            self.skip_whitespace();
            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => return Err(self.error(format!("attribute '{name}' value must be quoted"))),
            };
            self.advance(1);
            let line = self.line;
            let raw = self.take_until(&quote.to_string(), "attribute value")?;
            if element.attr(&name).is_some() {
                return Err(self.error(format!("duplicate attribute '{name}'")));
            }
            element.attributes.push((name, unescape(raw, line)?));
        }

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(format!("unterminated element <{}>", element.name)));
            } else if rest.starts_with("</") {
                self.advance(2);
                let end = self.name()?;
                if end != element.name {
                    return Err(self.error(format!(
                        "mismatched end tag </{end}> for <{}>",
                        element.name
                    )));
                }
                self.skip_whitespace();
                self.expect('>')?;
                return Ok(element);
            } else if rest.starts_with("<!--") {
                self.advance(4);
                self.take_until("-->", "comment")?;
            } else if rest.starts_with("<![CDATA[") {
                self.advance(9);
                let data = self.take_until("]]>", "CDATA section")?;
                element.children.push(Node::Text(data.to_string()));
            } else if rest.starts_with("<?") {
                self.take_until("?>", "processing instruction")?;
            } else if rest.starts_with('<') {
                let child = self.element(depth + 1)?;
                element.children.push(Node::Element(child));
            } else {
                let len = rest.find('<').unwrap_or(rest.len());
                let line = self.line;
                self.advance(len);
                element
                    .children
                    .push(Node::Text(unescape(&rest[..len], line)?));
            }
        }
    }
}

fn unescape(raw: &str, line: usize) -> Result<String, FormatError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let error = |details: String| FormatError::Xml { line, details };

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + 1..];
        let end = rest
            .find(';')
            .ok_or_else(|| error("unterminated entity reference".to_string()))?;
        let entity = &rest[..end];
        let c = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = match entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => entity.strip_prefix('#').and_then(|dec| dec.parse().ok()),
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| error(format!("unknown entity '&{entity};'")))?
            }
        };
        out.push(c);
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn escape(text: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders `root` as an indented document with an XML declaration.
pub(crate) fn write_document(root: &Element, doctype: Option<&str>) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    if let Some(doctype) = doctype {
        out.push_str(doctype);
        out.push('\n');
    }
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push_str(&format!(" {name}=\"{}\"", escape(value, true)));
    }

    if element.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    if element.elements().next().is_none() {
        out.push('>');
        out.push_str(&escape(&element.text(), false));
        out.push_str(&format!("</{}>\n", element.name));
        return;
    }

    out.push_str(">\n");
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(out, child, depth + 1),
            Node::Text(text) if !text.trim().is_empty() => {
                out.push_str(&indent);
                out.push_str("  ");
                out.push_str(&escape(text.trim(), false));
                out.push('\n');
            }
            Node::Text(_) => {}
        }
    }
    out.push_str(&indent);
    out.push_str(&format!("</{}>\n", element.name));
}
