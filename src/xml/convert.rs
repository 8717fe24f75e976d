use roxmltree::Node;

use crate::{
    core::errors::AppResult,
    xml::{
        namespace::{qualified, NamespaceContext},
        record::NestedRecord,
    },
};

/// Converts the children of `element` into a [`NestedRecord`] keyed by
/// qualified tag names.
///
/// Children that have element children of their own become nested records;
/// every other child contributes its text. Comments, processing instructions
/// and whitespace between elements are ignored.
pub fn convert(element: Node<'_, '_>) -> NestedRecord {
    let mut record = NestedRecord::new(namespace_context(element));
    for child in element.children().filter(Node::is_element) {
        let key = tag_key(child);
        if child.children().any(|node| node.is_element()) {
            record.insert(key, convert(child));
        } else {
            record.insert_text(key, child.text().map(ToString::to_string));
        }
    }
    record
}

/// Every namespace in scope at `node`, inherited declarations included.
pub fn namespace_context(node: Node<'_, '_>) -> NamespaceContext {
    NamespaceContext::new(node.namespaces().map(|ns| (ns.name(), ns.uri())))
}

pub fn tag_key(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    qualified(tag.namespace(), tag.name())
}

/// Parses `xml` and converts its root element.
pub fn convert_str(xml: &str) -> AppResult<NestedRecord> {
    let document = roxmltree::Document::parse(xml)?;
    Ok(convert(document.root_element()))
}
