//! Slot/Slottable element-creation interceptor.
//!
//! This crate lets a wrapper component render *as* the element its caller nests
//! inside a `Slot` marker, merging the wrapper's props onto that host element
//! instead of adding a wrapper node.

pub mod element;
pub mod html;
pub mod markers;
pub mod markup;
pub mod merge;
pub mod refs;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod rewrite;
pub mod runtime;
pub mod traits;

pub use element::{
    create_element, create_element_dev, normalize_children, ComponentRef, Element, ElementType,
    Node, PropMap, Props, StyleMap, TypeKind, Value,
};
pub use html::render_html;
pub use markers::{slot, slottable};
pub use markup::{parse_markup, Builder, Markup, MarkupError, Scope};
pub use merge::{merge_props, DefaultMerge, MergeProps, ShallowMerge};
pub use refs::{compose_refs, Mounted, NodeRef};
pub use registry::{ComponentRegistry, RegistryError};
pub use report::{CollectingReporter, ErrorReporter, TracingReporter};
pub use resolve::{resolve_host, HostResolution, ResolutionPath};
pub use rewrite::{replace_slottable, Substitution};
pub use runtime::{
    transform_slot, with_slot, with_slot_dev, with_slot_dev_with, with_slot_jsxs, with_slot_with,
    SlotOptions, Slotted, WithSlot, WithSlotDev,
};
pub use traits::{CreateElement, CreateElementDev, SlotError, SourceInfo};
