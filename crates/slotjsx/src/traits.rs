//! Trait definitions for creation primitives.

use crate::element::{ElementType, Props, Value};

/// Source location forwarded to the diagnostics primitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceInfo {
    pub file_name: String,
    pub line_number: u32,
    pub column_number: u32,
}

/// Errors that can occur while slotting. All are recoverable: the interceptor
/// reports them and falls back to rendering the marker as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("Slot component requires a Slottable child")]
    HostNotFound,

    #[error("Slottable must contain exactly one child element, found {count}")]
    AmbiguousHost { count: usize },

    #[error("Slottable child must be a valid element")]
    InvalidHost,

    #[error("Slot requires an element child to slot onto")]
    MissingHostChild,
}

/// The production element-creation primitive (`jsx` / `jsxs`).
pub trait CreateElement {
    /// Opaque element produced by the host framework
    type Output;

    fn create(&self, ty: ElementType, props: Props, key: Option<String>) -> Self::Output;
}

impl<F, O> CreateElement for F
where
    F: Fn(ElementType, Props, Option<String>) -> O,
{
    type Output = O;

    fn create(&self, ty: ElementType, props: Props, key: Option<String>) -> O {
        self(ty, props, key)
    }
}

/// The development-mode element-creation primitive (`jsxDEV`).
pub trait CreateElementDev {
    /// Opaque element produced by the host framework
    type Output;

    /// # Arguments
    /// * `is_static_children` - Whether children were passed as a static array
    /// * `source` - Source location of the call site
    /// * `owner` - The `this` of the call site, if any
    fn create_dev(
        &self,
        ty: ElementType,
        props: Props,
        key: Option<String>,
        is_static_children: bool,
        source: Option<SourceInfo>,
        owner: Option<Value>,
    ) -> Self::Output;
}

impl<F, O> CreateElementDev for F
where
    F: Fn(ElementType, Props, Option<String>, bool, Option<SourceInfo>, Option<Value>) -> O,
{
    type Output = O;

    fn create_dev(
        &self,
        ty: ElementType,
        props: Props,
        key: Option<String>,
        is_static_children: bool,
        source: Option<SourceInfo>,
        owner: Option<Value>,
    ) -> O {
        self(ty, props, key, is_static_children, source, owner)
    }
}
