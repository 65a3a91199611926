//! Reference composition.
//!
//! Slotting merges props, not handles: when both the wrapper and the host hold a
//! reference to the rendered node, the wrapper composes them into one ref.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle passed to refs when an intrinsic element is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mounted {
    /// Tag name of the rendered element
    pub tag: String,

    /// Position of the element in document order
    pub index: usize,
}

/// A reference to a rendered node.
pub enum NodeRef<T> {
    /// Called with `Some` on attach and `None` on detach
    Callback(Rc<dyn Fn(Option<&T>)>),
    /// Shared cell holding the current value
    Object(Rc<RefCell<Option<T>>>),
}

impl<T> NodeRef<T> {
    pub fn callback(f: impl Fn(Option<&T>) + 'static) -> Self {
        Self::Callback(Rc::new(f))
    }

    pub fn object() -> Self {
        Self::Object(Rc::new(RefCell::new(None)))
    }
}

impl<T: Clone> NodeRef<T> {
    /// Attach (`Some`) or detach (`None`) a value.
    pub fn set(&self, value: Option<&T>) {
        match self {
            Self::Callback(f) => f(value),
            Self::Object(cell) => *cell.borrow_mut() = value.cloned(),
        }
    }

    /// Current value of an object ref. Callback refs hold nothing.
    pub fn current(&self) -> Option<T> {
        match self {
            Self::Callback(_) => None,
            Self::Object(cell) => cell.borrow().clone(),
        }
    }
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Callback(f) => Self::Callback(Rc::clone(f)),
            Self::Object(cell) => Self::Object(Rc::clone(cell)),
        }
    }
}

impl<T> PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Callback(a), Self::Callback(b)) => Rc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("NodeRef::Callback(..)"),
            Self::Object(_) => f.write_str("NodeRef::Object(..)"),
        }
    }
}

/// Compose refs into one callback ref that forwards every attach and detach
/// to each underlying ref, in order.
pub fn compose_refs<T: Clone + 'static>(refs: impl IntoIterator<Item = NodeRef<T>>) -> NodeRef<T> {
    let refs: Vec<NodeRef<T>> = refs.into_iter().collect();
    NodeRef::callback(move |value| {
        for r in &refs {
            r.set(value);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted(tag: &str) -> Mounted {
        Mounted {
            tag: tag.to_string(),
            index: 0,
        }
    }

    #[test]
    fn object_ref_holds_current_value() {
        let r = NodeRef::object();
        r.set(Some(&mounted("a")));

        assert_eq!(r.current(), Some(mounted("a")));

        r.set(None);
        assert_eq!(r.current(), None);
    }

    #[test]
    fn composed_ref_forwards_attach_and_detach() {
        let outer = NodeRef::object();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let host = {
            let seen = Rc::clone(&seen);
            NodeRef::callback(move |value: Option<&Mounted>| {
                seen.borrow_mut().push(value.map(|m| m.tag.clone()));
            })
        };

        let composed = compose_refs([outer.clone(), host]);
        composed.set(Some(&mounted("a")));

        assert_eq!(outer.current(), Some(mounted("a")));
        assert_eq!(*seen.borrow(), vec![Some("a".to_string())]);

        composed.set(None);

        assert_eq!(outer.current(), None);
        assert_eq!(*seen.borrow(), vec![Some("a".to_string()), None]);
    }

    #[test]
    fn refs_compare_by_identity() {
        let a: NodeRef<Mounted> = NodeRef::object();
        let b: NodeRef<Mounted> = NodeRef::object();

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
