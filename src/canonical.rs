//! XML parsing and canonical re-serialization
//!
//! This module turns an XML document into a small in-memory tree and renders
//! it back in the one canonical layout every formatted file converges to:
//! a fixed number of spaces per nesting level, the declaration on the first
//! line with no blank line after it, text content trimmed rather than padded,
//! and attributes kept in their original order.
//!
//! # Example
//!
//! ```rust
//! use xmlfmt::canonical::{parse, render};
//!
//! let doc = parse("<project>\n  <name>demo</name>\n</project>").unwrap();
//! let out = render(&doc, 4);
//! assert_eq!(out, "<project>\n    <name>demo</name>\n</project>\n");
//! ```

use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use thiserror::Error;

/// Failure while reading or parsing an XML document.
///
/// I/O errors are folded in here because the pipeline treats an unreadable
/// or wrongly encoded file exactly like malformed markup: the original is
/// left untouched and the batch moves on.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unreadable input: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("invalid attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("document has no root element")]
    NoRoot,
    #[error("unclosed element <{0}>")]
    Unclosed(String),
    #[error("text content outside the root element")]
    TrailingContent,
}

/// The `<?xml ...?>` declaration, kept as its parsed parts so the canonical
/// form can rebuild it with uniform quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// One node of the document tree. Text and CDATA keep their raw (escaped)
/// form so rendering never re-escapes content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    Instruction(String),
    DocType(String),
}

/// An element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// A whole parsed document: optional declaration, anything before the root
/// (doctype, comments, processing instructions), the root element, and
/// anything after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub declaration: Option<Declaration>,
    pub prolog: Vec<Node>,
    pub root: Element,
    pub trailer: Vec<Node>,
}

impl Declaration {
    fn from_event(decl: &BytesDecl) -> Result<Self, ParseError> {
        let version = String::from_utf8_lossy(&decl.version()?).into_owned();
        let encoding = match decl.encoding() {
            Some(enc) => Some(String::from_utf8_lossy(&enc?).into_owned()),
            None => None,
        };
        let standalone = match decl.standalone() {
            Some(sa) => Some(String::from_utf8_lossy(&sa?).into_owned()),
            None => None,
        };
        Ok(Self {
            version,
            encoding,
            standalone,
        })
    }
}

fn element_from_start(start: &BytesStart) -> Result<Element, ParseError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        ));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Parse an XML string into a [`Document`].
///
/// Whitespace-only text is dropped and remaining text is trimmed, matching
/// the canonical layout; the parser rejects mismatched or unclosed tags and
/// content outside the root element.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut declaration = None;
    let mut prolog: Vec<Node> = Vec::new();
    let mut trailer: Vec<Node> = Vec::new();
    let mut root: Option<Element> = None;
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader.read_event()?;

        // Nodes outside any element land in the prolog or trailer.
        let mut attach = |node: Node,
                          stack: &mut Vec<Element>,
                          root: &mut Option<Element>|
         -> Result<(), ParseError> {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
            } else if matches!(node, Node::Text(_) | Node::CData(_)) {
                return Err(ParseError::TrailingContent);
            } else if root.is_none() {
                prolog.push(node);
            } else {
                trailer.push(node);
            }
            Ok(())
        };

        match event {
            Event::Decl(decl) => declaration = Some(Declaration::from_event(&decl)?),
            Event::DocType(text) => {
                let text = String::from_utf8_lossy(&text).trim().to_owned();
                attach(Node::DocType(text), &mut stack, &mut root)?;
            }
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                if stack.is_empty() && root.is_none() {
                    root = Some(element);
                } else {
                    attach(Node::Element(element), &mut stack, &mut root)?;
                }
            }
            Event::End(_) => {
                // The reader has already verified the end tag matches.
                if let Some(element) = stack.pop() {
                    if stack.is_empty() && root.is_none() {
                        root = Some(element);
                    } else {
                        attach(Node::Element(element), &mut stack, &mut root)?;
                    }
                }
            }
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(&text.into_inner()).into_owned();
                attach(Node::Text(raw), &mut stack, &mut root)?;
            }
            Event::CData(cdata) => {
                let raw = String::from_utf8_lossy(&cdata).into_owned();
                attach(Node::CData(raw), &mut stack, &mut root)?;
            }
            Event::Comment(comment) => {
                let raw = String::from_utf8_lossy(&comment).into_owned();
                attach(Node::Comment(raw), &mut stack, &mut root)?;
            }
            Event::PI(pi) => {
                let raw = String::from_utf8_lossy(&pi).into_owned();
                attach(Node::Instruction(raw), &mut stack, &mut root)?;
            }
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed(open.name));
    }
    let root = root.ok_or(ParseError::NoRoot)?;

    Ok(Document {
        declaration,
        prolog,
        root,
        trailer,
    })
}

/// Render a [`Document`] in canonical form with `indent_width` spaces per
/// nesting level. The output always uses spaces; tab conversion is a
/// separate pass over the rendered bytes.
pub fn render(doc: &Document, indent_width: usize) -> String {
    let mut out = String::new();

    if let Some(decl) = &doc.declaration {
        out.push_str("<?xml version=\"");
        out.push_str(&decl.version);
        out.push('"');
        if let Some(encoding) = &decl.encoding {
            out.push_str(" encoding=\"");
            out.push_str(encoding);
            out.push('"');
        }
        if let Some(standalone) = &decl.standalone {
            out.push_str(" standalone=\"");
            out.push_str(standalone);
            out.push('"');
        }
        out.push_str("?>\n");
    }
    for node in &doc.prolog {
        render_node(node, 0, indent_width, &mut out);
    }
    render_element(&doc.root, 0, indent_width, &mut out);
    for node in &doc.trailer {
        render_node(node, 0, indent_width, &mut out);
    }

    out
}

fn render_node(node: &Node, depth: usize, indent_width: usize, out: &mut String) {
    let pad = " ".repeat(depth * indent_width);
    match node {
        Node::Element(element) => render_element(element, depth, indent_width, out),
        Node::Text(text) => {
            out.push_str(&pad);
            out.push_str(text);
            out.push('\n');
        }
        Node::CData(cdata) => {
            out.push_str(&pad);
            out.push_str("<![CDATA[");
            out.push_str(cdata);
            out.push_str("]]>\n");
        }
        Node::Comment(comment) => {
            out.push_str(&pad);
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->\n");
        }
        Node::Instruction(pi) => {
            out.push_str(&pad);
            out.push_str("<?");
            out.push_str(pi);
            out.push_str("?>\n");
        }
        Node::DocType(doctype) => {
            out.push_str(&pad);
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push_str(">\n");
        }
    }
}

fn render_element(element: &Element, depth: usize, indent_width: usize, out: &mut String) {
    let pad = " ".repeat(depth * indent_width);
    out.push_str(&pad);
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        // Raw values from single-quoted attributes may contain a literal
        // double quote; everything else is already escaped.
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>\n");
        return;
    }

    let inline = element
        .children
        .iter()
        .all(|child| matches!(child, Node::Text(_) | Node::CData(_)));
    if inline {
        out.push('>');
        for child in &element.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::CData(cdata) => {
                    out.push_str("<![CDATA[");
                    out.push_str(cdata);
                    out.push_str("]]>");
                }
                _ => unreachable!("inline elements hold only text and CDATA"),
            }
        }
    } else {
        out.push_str(">\n");
        for child in &element.children {
            render_node(child, depth + 1, indent_width, out);
        }
        out.push_str(&pad);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}
