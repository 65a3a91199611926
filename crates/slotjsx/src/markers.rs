//! `Slot` and `Slottable` marker components.
//!
//! Both markers are runtime no-ops: when a renderer reaches one (because the
//! interceptor fell back, or the tree was built with the bare primitive) it
//! renders its children unchanged.

use crate::element::{Element, ElementType, Node, Props};

/// Build a `Slot` invocation without going through an interceptor.
pub fn slot(props: Props) -> Element {
    Element::new(ElementType::Slot, props, None)
}

/// Wrap a host element in a `Slottable` insertion marker.
pub fn slottable(host: impl Into<Node>) -> Node {
    Node::Element(Element::new(
        ElementType::Slottable,
        Props::new().with_child(host),
        None,
    ))
}

/// Runtime rendering of a marker: its children, unchanged.
pub fn render_marker(props: &Props) -> &[Node] {
    props.children()
}
