use crate::tree::{Element, Node};
use xmlwriter::XmlWriter;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n";

fn walk(el: &Element, w: &mut XmlWriter) {
    w.start_element(&el.name);
    for (k, v) in &el.attributes {
        w.write_attribute(k, v);
    }
    for c in &el.children {
        match c {
            Node::Element(child) => walk(child, w),
            Node::Text(text) => w.write_text(text),
        }
    }
    w.end_element();
}

/// Serialize a tree to SVG text with an XML declaration prepended.
///
/// Namespace declarations are ordinary `xmlns` attributes in the tree, so they
/// are written wherever the tree carries them.
pub fn write_svg(root: &Element) -> String {
    // No indentation: text content of <text>/<style> must survive unchanged.
    let opt = xmlwriter::Options {
        indent: xmlwriter::Indent::None,
        ..xmlwriter::Options::default()
    };
    let mut writer = XmlWriter::new(opt);
    walk(root, &mut writer);
    let mut svg = writer.end_document();
    svg.insert_str(0, XML_DECLARATION);
    svg
}
