//! Element tree abstraction.
//!
//! The minimal shape the slotting engine needs from a host framework's elements:
//! a type identity, a property mapping and an ordered, normalized list of children.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::refs::{Mounted, NodeRef};
use crate::traits::SourceInfo;

/// Reserved property name for children.
pub const CHILDREN: &str = "children";

/// Property mapping without the `children` key.
pub type PropMap = BTreeMap<String, Value>;

/// Inline style mapping: `backgroundColor` -> `blue`.
pub type StyleMap = BTreeMap<String, String>;

/// Event handler callback. Handlers are side-effecting and return nothing.
pub type Callback = Rc<dyn Fn(&[Value])>;

/// Component render function.
pub type RenderFn = Rc<dyn Fn(&Props) -> Node>;

/// Classification of an element type for the interceptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Triggers slotting when passed to the creation primitive.
    SlotMarker,
    /// Marks the host element and the insertion point for its children.
    SlottableMarker,
    /// Intrinsic tag or component.
    Ordinary,
}

/// The type of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    /// Intrinsic tag (e.g., "a", "button")
    Intrinsic(String),
    /// User component
    Component(ComponentRef),
    /// The `Slot` marker
    Slot,
    /// The `Slottable` marker
    Slottable,
}

impl ElementType {
    /// Create an intrinsic element type.
    pub fn intrinsic(tag: impl Into<String>) -> Self {
        Self::Intrinsic(tag.into())
    }

    /// Classify this type.
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Slot => TypeKind::SlotMarker,
            Self::Slottable => TypeKind::SlottableMarker,
            Self::Intrinsic(_) | Self::Component(_) => TypeKind::Ordinary,
        }
    }

    pub fn is_slot(&self) -> bool {
        self.kind() == TypeKind::SlotMarker
    }

    pub fn is_slottable(&self) -> bool {
        self.kind() == TypeKind::SlottableMarker
    }

    /// Display name of the type.
    pub fn name(&self) -> &str {
        match self {
            Self::Intrinsic(tag) => tag,
            Self::Component(component) => component.name(),
            Self::Slot => "Slot",
            Self::Slottable => "Slottable",
        }
    }
}

/// A reference to a component. Compared by identity of its render function,
/// never by name.
#[derive(Clone)]
pub struct ComponentRef {
    name: Rc<str>,
    render: RenderFn,
}

impl ComponentRef {
    pub fn new(name: impl Into<Rc<str>>, render: impl Fn(&Props) -> Node + 'static) -> Self {
        Self {
            name: name.into(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the component with the given props.
    pub fn render(&self, props: &Props) -> Node {
        (self.render)(props)
    }
}

impl PartialEq for ComponentRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentRef").field(&self.name).finish()
    }
}

/// A property value.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Style(StyleMap),
    Handler(Callback),
    Ref(NodeRef<Mounted>),
}

impl Value {
    /// Wrap a closure as an event handler value.
    pub fn handler(f: impl Fn(&[Value]) + 'static) -> Self {
        Self::Handler(Rc::new(f))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_style(&self) -> Option<&StyleMap> {
        match self {
            Self::Style(style) => Some(style),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&Callback> {
        match self {
            Self::Handler(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Style(a), Self::Style(b)) => a == b,
            (Self::Handler(a), Self::Handler(b)) => Rc::ptr_eq(a, b),
            (Self::Ref(a), Self::Ref(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Number(n) => write!(f, "Number({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Style(style) => f.debug_tuple("Style").field(style).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
            Self::Ref(r) => f.debug_tuple("Ref").field(r).finish(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<StyleMap> for Value {
    fn from(style: StyleMap) -> Self {
        Self::Style(style)
    }
}

impl From<NodeRef<Mounted>> for Value {
    fn from(r: NodeRef<Mounted>) -> Self {
        Self::Ref(r)
    }
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Number(f64),
    /// null, undefined or a boolean; never rendered
    Empty,
    /// Nested child array, flattened on normalization
    List(Vec<Node>),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Normalize heterogeneous children into one flat, ordered sequence.
///
/// Nested lists are flattened in place and empty children are dropped.
pub fn normalize_children(children: impl IntoIterator<Item = Node>) -> Vec<Node> {
    let mut out = Vec::new();
    flatten_into(children, &mut out);
    out
}

fn flatten_into(children: impl IntoIterator<Item = Node>, out: &mut Vec<Node>) {
    for child in children {
        match child {
            Node::List(nested) => flatten_into(nested, out),
            Node::Empty => {}
            other => out.push(other),
        }
    }
}

/// Properties of an element, with children carried separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: PropMap,
    children: Vec<Node>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build props from a property mapping and children.
    pub fn from_parts(values: PropMap, children: impl IntoIterator<Item = Node>) -> Self {
        let mut props = Self {
            values: PropMap::new(),
            children: normalize_children(children),
        };
        for (key, value) in values {
            props.insert(key, value);
        }
        props
    }

    /// Split into the property mapping and the children.
    pub fn into_parts(self) -> (PropMap, Vec<Node>) {
        (self.values, self.children)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push_child(child.into());
        self
    }

    /// Builder-style children replacement.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.set_children(children);
        self
    }

    /// Insert a property. The reserved `children` key is rejected.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if key == CHILDREN {
            tracing::warn!("Ignoring `children` passed as a property; use set_children");
            return None;
        }
        self.values.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Property mapping, excluding children.
    pub fn values(&self) -> &PropMap {
        &self.values
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn set_children(&mut self, children: impl IntoIterator<Item = Node>) {
        self.children = normalize_children(children);
    }

    pub fn push_child(&mut self, child: Node) {
        flatten_into([child], &mut self.children);
    }
}

/// An element: the output of the creation primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub ty: ElementType,
    pub props: Props,
    pub key: Option<String>,
    /// Source location recorded by the diagnostics primitive
    pub source: Option<SourceInfo>,
}

impl Element {
    pub fn new(ty: ElementType, props: Props, key: Option<String>) -> Self {
        Self {
            ty,
            props,
            key,
            source: None,
        }
    }

    pub fn children(&self) -> &[Node] {
        self.props.children()
    }

    /// Copy of this element with the same type, properties and key but new children.
    pub fn with_children(&self, children: Vec<Node>) -> Self {
        let mut element = self.clone();
        element.props.set_children(children);
        element
    }
}

/// Base creation primitive: builds an [`Element`] as-is.
pub fn create_element(ty: ElementType, props: Props, key: Option<String>) -> Element {
    Element::new(ty, props, key)
}

/// Base diagnostics creation primitive: builds an [`Element`] and records its source.
pub fn create_element_dev(
    ty: ElementType,
    props: Props,
    key: Option<String>,
    _is_static_children: bool,
    source: Option<SourceInfo>,
    _owner: Option<Value>,
) -> Element {
    Element {
        source,
        ..Element::new(ty, props, key)
    }
}
