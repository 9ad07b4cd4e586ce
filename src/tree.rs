use anyhow::{Context, Result};
use roxmltree::Node as XmlNode;

/// An SVG element: qualified tag name, attributes in document order, children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter, mostly for constructing trees in code.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces the value in place if the attribute exists, appends otherwise.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Pre-order walk over this element and all descendant elements.
    pub fn walk(&self, f: &mut impl FnMut(&Element)) {
        f(self);
        for child in self.elements() {
            child.walk(f);
        }
    }

    /// Same as [`Element::walk`], with mutable access. The tree shape must not
    /// change during the walk, only attribute values.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in self.children.iter_mut() {
            if let Node::Element(e) = child {
                e.walk_mut(f);
            }
        }
    }

    /// First element in document order whose `id` equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.attribute("id") == Some(id) {
            return Some(self);
        }
        self.elements().find_map(|c| c.find_by_id(id))
    }

    /// Parse SVG markup into a tree rooted at the document element.
    pub fn parse(text: &str) -> Result<Element> {
        let doc = roxmltree::Document::parse(text).context("parse svg")?;
        Ok(convert(doc.root_element()))
    }
}

fn qualified_name(node: XmlNode, local: &str, ns_uri: Option<&str>) -> String {
    match ns_uri.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

/// Elements in the default namespace keep their bare name even when the same
/// URI is also bound to a prefix.
fn element_name(node: XmlNode) -> String {
    let tag = node.tag_name();
    let in_default = tag.namespace().map_or(false, |uri| {
        node.namespaces()
            .any(|ns| ns.name().is_none() && ns.uri() == uri)
    });
    if in_default {
        tag.name().to_string()
    } else {
        qualified_name(node, tag.name(), tag.namespace())
    }
}

fn convert(node: XmlNode) -> Element {
    let mut el = Element::new(element_name(node));

    // Declarations introduced by this element, i.e. in scope here but not on the parent.
    let parent = node.parent_element();
    for ns in node.namespaces() {
        if ns.name() == Some("xml") {
            continue;
        }
        let inherited = parent.map_or(false, |p| {
            p.namespaces()
                .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
        });
        if inherited {
            continue;
        }
        let k = match ns.name() {
            Some(name) => format!("xmlns:{}", name),
            None => "xmlns".to_string(),
        };
        el.attributes.push((k, ns.uri().to_string()));
    }

    for attr in node.attributes() {
        let k = qualified_name(node, attr.name(), attr.namespace());
        el.attributes.push((k, attr.value().to_string()));
    }

    for c in node.children() {
        match c.node_type() {
            roxmltree::NodeType::Element => el.children.push(Node::Element(convert(c))),
            roxmltree::NodeType::Text => {
                // Whitespace runs are kept: between tspans they are rendered.
                let text = c.text().unwrap_or("");
                el.children.push(Node::Text(text.to_string()));
            }
            _ => {}
        }
    }

    el
}
