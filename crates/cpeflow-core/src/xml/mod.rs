//! Path-addressable XML document tree for UBL invoices.
//!
//! UBL documents are namespace-heavy (`cbc:`, `cac:`, `ext:`, signature
//! blocks) but field lookups only ever address elements by local name, so
//! the tree stores local names and attribute local names and drops prefixes.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::XmlError;

/// One element of a parsed document.
#[derive(Debug, Clone, Default)]
pub struct XmlNode {
    /// Element local name (namespace prefix stripped).
    pub name: String,
    /// Attribute local names and values, in document order.
    pub attrs: Vec<(String, String)>,
    /// Concatenated character data directly inside this element.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed text content.
    pub fn content(&self) -> &str {
        self.text.trim()
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given local name.
    ///
    /// The name borrow is independent of the node borrow, so a transient
    /// name can drive a lookup whose results outlive it.
    pub fn children_named<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// All descendants with the given local name, in document order.
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a XmlNode> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }

    /// First match of a descendant path.
    ///
    /// The first segment matches any descendant; the remaining segments are
    /// child steps, mirroring an XPath `.//a/b/c` lookup.
    pub fn find_path(&self, path: &[&str]) -> Option<&XmlNode> {
        self.find_path_all(path).into_iter().next()
    }

    /// All matches of a descendant path, in document order.
    pub fn find_path_all<'a>(&'a self, path: &[&str]) -> Vec<&'a XmlNode> {
        let Some((first, rest)) = path.split_first() else {
            return Vec::new();
        };
        let mut matches = Vec::new();
        for anchor in self.descendants(first) {
            walk_child_path(anchor, rest, &mut matches);
        }
        matches
    }
}

fn collect_descendants<'a>(node: &'a XmlNode, name: &str, found: &mut Vec<&'a XmlNode>) {
    for child in &node.children {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}

fn walk_child_path<'a>(node: &'a XmlNode, rest: &[&str], matches: &mut Vec<&'a XmlNode>) {
    match rest.split_first() {
        None => matches.push(node),
        Some((step, tail)) => {
            for child in node.children_named(step) {
                walk_child_path(child, tail, matches);
            }
        }
    }
}

/// A parsed UBL invoice document.
#[derive(Debug, Clone)]
pub struct UblDocument {
    root: XmlNode,
}

impl UblDocument {
    /// Parse a document from XML text.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        // Synthetic document node at the bottom of the stack.
        let mut stack: Vec<XmlNode> = vec![XmlNode::named("")];

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(node_from(&e)?),
                Ok(Event::Empty(e)) => {
                    let node = node_from(&e)?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| XmlError::Malformed(e.to_string()))?;
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text);
                    }
                }
                Ok(Event::CData(t)) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    let Some(node) = stack.pop() else {
                        return Err(XmlError::Malformed("unbalanced end tag".into()));
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Err(XmlError::Malformed("unbalanced end tag".into())),
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(XmlError::Malformed(e.to_string())),
            }
        }

        if stack.len() != 1 {
            return Err(XmlError::Malformed("unexpected end of document".into()));
        }
        let document = stack.remove(0);
        let root = document
            .children
            .into_iter()
            .next()
            .ok_or(XmlError::NoRoot)?;
        Ok(Self { root })
    }

    /// Root element of the document.
    pub fn root(&self) -> &XmlNode {
        &self.root
    }
}

fn node_from(e: &BytesStart<'_>) -> Result<XmlNode, XmlError> {
    let mut node = XmlNode::named(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| XmlError::Malformed(e.to_string()))?
            .into_owned();
        node.attrs.push((key, value));
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <Invoice xmlns:cbc="urn:cbc" xmlns:cac="urn:cac">
            <cbc:ID>F001-0038941</cbc:ID>
            <cbc:Note languageLocaleID="1000">SOLES</cbc:Note>
            <cac:AccountingSupplierParty>
                <cac:Party>
                    <cac:PartyIdentification><cbc:ID>20100123456</cbc:ID></cac:PartyIdentification>
                </cac:Party>
            </cac:AccountingSupplierParty>
        </Invoice>"#;

    #[test]
    fn test_local_names_strip_prefixes() {
        let doc = UblDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.root().name, "Invoice");
        assert_eq!(doc.root().child("ID").map(XmlNode::content), Some("F001-0038941"));
    }

    #[test]
    fn test_attr_lookup() {
        let doc = UblDocument::parse(SAMPLE).unwrap();
        let note = doc.root().child("Note").unwrap();
        assert_eq!(note.attr("languageLocaleID"), Some("1000"));
        assert_eq!(note.content(), "SOLES");
    }

    #[test]
    fn test_find_path_descendant_then_children() {
        let doc = UblDocument::parse(SAMPLE).unwrap();
        let id = doc
            .root()
            .find_path(&["AccountingSupplierParty", "Party", "PartyIdentification", "ID"])
            .unwrap();
        assert_eq!(id.content(), "20100123456");
    }

    #[test]
    fn test_children_named_outlives_transient_name() {
        let doc = UblDocument::parse(SAMPLE).unwrap();
        // The matched nodes borrow the document, not the name.
        let note = {
            let name = String::from("Note");
            doc.root().children_named(&name).next()
        };
        assert_eq!(note.map(XmlNode::content), Some("SOLES"));
    }

    #[test]
    fn test_malformed_document() {
        assert!(UblDocument::parse("<Invoice><ID>").is_err());
        assert!(matches!(UblDocument::parse("   "), Err(XmlError::NoRoot)));
    }
}
