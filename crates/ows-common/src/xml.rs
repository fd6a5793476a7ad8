//! Minimal element tree on top of quick-xml.
//!
//! Capabilities documents are small enough to hold in memory, and the
//! protocol parsers need to walk them with inheritance (nested WMS layers),
//! so events are folded into a tree. Element and attribute names are stored
//! by local name; namespace prefixes are dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{OwsError, OwsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Local name (no namespace prefix)
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub nodes: Vec<XmlNode>,
}

/// Parse a complete document and return its root element.
///
/// Fails with `ParseFault` on malformed input: mismatched or unclosed tags,
/// text or a second element outside the root, or no root at all.
pub fn parse_document(xml: &str) -> OwsResult<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(OwsError::ParseFault(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        };

        match event {
            Event::Start(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(parse_fault("content after root element"));
                }
                stack.push(element_from_start(&e)?);
            }
            Event::Empty(e) => {
                let element = element_from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| parse_fault("closing tag without opening tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t.unescape()?.into_owned();
                push_text(&mut stack, text)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                push_text(&mut stack, text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_fault(&format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| parse_fault("document has no root element"))
}

fn parse_fault(msg: &str) -> OwsError {
    OwsError::ParseFault(msg.to_string())
}

fn element_from_start(e: &BytesStart<'_>) -> OwsResult<XmlElement> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| OwsError::ParseFault(format!("bad attribute: {}", err)))?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        nodes: Vec::new(),
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> OwsResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.nodes.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(parse_fault("content after root element")),
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: String) -> OwsResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.nodes.push(XmlNode::Text(text)),
        None if text.trim().is_empty() => {}
        None => return Err(parse_fault("text outside root element")),
    }
    Ok(())
}

impl XmlElement {
    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.nodes.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Child elements with the given local name.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// First child element with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// Follow first-child steps, e.g. `["Capability", "Request", "GetMap"]`.
    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of this element and all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.nodes {
            match node {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Trimmed text of the first named child; `None` when missing or blank.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(|c| c.text().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Trimmed, non-blank texts of all named children.
    pub fn children_text(&self, name: &str) -> Vec<String> {
        self.children(name)
            .map(|c| c.text().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}
