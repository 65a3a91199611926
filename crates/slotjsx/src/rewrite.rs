//! Children rewriting for the search path.
//!
//! Walks the slot's children depth-first, left to right, and substitutes the
//! first `Slottable` with the children of the host element it wraps. Every other
//! node keeps its type, props and key; only its children are rewritten.

use crate::element::{Element, Node};
use crate::traits::SlotError;

/// Result of a search-path rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    /// The element found inside the `Slottable`
    pub host: Element,

    /// The slot's children with the `Slottable` replaced by the host's children
    pub children: Vec<Node>,
}

/// Find the `Slottable` in `children` and substitute it with its host's children.
///
/// The first `Slottable` in pre-order decides the host. Any later `Slottable`
/// is not considered as a second host and receives the same host children.
pub fn replace_slottable(children: &[Node]) -> Result<Substitution, SlotError> {
    let mut rewriter = Rewriter::default();
    let children = rewriter.transform(children)?;

    match rewriter.host {
        Some(host) => Ok(Substitution { host, children }),
        None => Err(SlotError::HostNotFound),
    }
}

/// Extract the single host element wrapped by a `Slottable`.
pub fn slottable_host(slottable: &Element) -> Result<&Element, SlotError> {
    match slottable.children() {
        [Node::Element(host)] => Ok(host),
        [_] => Err(SlotError::InvalidHost),
        other => Err(SlotError::AmbiguousHost { count: other.len() }),
    }
}

#[derive(Default)]
struct Rewriter {
    host: Option<Element>,
}

impl Rewriter {
    fn transform(&mut self, nodes: &[Node]) -> Result<Vec<Node>, SlotError> {
        let mut out = Vec::with_capacity(nodes.len());

        for node in nodes {
            let Node::Element(element) = node else {
                out.push(node.clone());
                continue;
            };

            if element.ty.is_slottable() {
                if self.host.is_none() {
                    let found = slottable_host(element)?.clone();
                    tracing::trace!(host = found.ty.name(), "Found Slottable host");
                    self.host = Some(found);
                }
                if let Some(host) = &self.host {
                    out.extend(host.children().iter().cloned());
                }
                continue;
            }

            if element.children().is_empty() {
                out.push(node.clone());
                continue;
            }

            let children = self.transform(element.children())?;
            out.push(Node::Element(element.with_children(children)));
        }

        Ok(out)
    }
}
