//! Component registry for resolving component names in markup.

use std::collections::HashMap;

use crate::element::{ComponentRef, Element, ElementType, Node};

/// A registry of components by name.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, ComponentRef>,
}

impl ComponentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under its own name, replacing any previous entry.
    pub fn register(&mut self, component: ComponentRef) -> Result<(), RegistryError> {
        let name = component.name();
        if !is_component_name(name) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        self.components.insert(name.to_string(), component);
        Ok(())
    }

    /// Register a component that renders as an intrinsic tag with its own props.
    pub fn register_alias(&mut self, name: &str, tag: &str) -> Result<(), RegistryError> {
        if !tag.starts_with(|c: char| c.is_ascii_lowercase())
            || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(RegistryError::InvalidTag(tag.to_string()));
        }

        let tag = tag.to_string();
        self.register(ComponentRef::new(name, move |props| {
            Node::Element(Element::new(ElementType::intrinsic(tag.as_str()), props.clone(), None))
        }))
    }

    /// Look up a component by name (case-sensitive).
    pub fn get(&self, name: &str) -> Option<&ComponentRef> {
        self.components.get(name)
    }

    /// Look up a component, failing if it is not registered.
    pub fn require(&self, name: &str) -> Result<&ComponentRef, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::ComponentNotFound(name.to_string()))
    }

    /// Check if a component exists.
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Get all registered component names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Component names start with an uppercase letter and never shadow the markers.
fn is_component_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        && name != "Slot"
        && name != "Slottable"
}

/// Errors that can occur with the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Invalid component name: {0}")]
    InvalidName(String),

    #[error("Invalid intrinsic tag: {0}")]
    InvalidTag(String),
}
