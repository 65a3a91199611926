//! Host resolution for a `Slot` invocation.

use crate::element::{ElementType, Node, PropMap};
use crate::rewrite::replace_slottable;
use crate::traits::SlotError;

/// How the host was located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// The slot's only child is the host
    Direct,
    /// The host was found inside a `Slottable`
    Search,
}

/// The host element split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct HostResolution {
    pub path: ResolutionPath,

    /// Type of the host element
    pub host_type: ElementType,

    /// Host props, without children
    pub host_props: PropMap,

    /// Children of the slotted element: the host's own children on the direct
    /// path, the rewritten slot children on the search path
    pub children: Vec<Node>,
}

/// Locate the host among the children of a `Slot` invocation.
pub fn resolve_host(children: &[Node]) -> Result<HostResolution, SlotError> {
    match children {
        [Node::Element(host)] if !host.ty.is_slottable() => {
            let (host_props, host_children) = host.props.clone().into_parts();
            Ok(HostResolution {
                path: ResolutionPath::Direct,
                host_type: host.ty.clone(),
                host_props,
                children: host_children,
            })
        }
        [] | [_] => Err(SlotError::MissingHostChild),
        _ => {
            let substitution = replace_slottable(children)?;
            let (host_props, _) = substitution.host.props.into_parts();
            Ok(HostResolution {
                path: ResolutionPath::Search,
                host_type: substitution.host.ty,
                host_props,
                children: substitution.children,
            })
        }
    }
}
