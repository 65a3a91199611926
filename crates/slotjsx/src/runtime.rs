//! Element-creation interceptors.
//!
//! [`with_slot`] wraps a creation primitive so that `Slot` invocations are
//! rewritten into a single element of the host's type:
//!
//! - If the slot has a single child that is not a `Slottable`, it slots directly onto it
//! - Otherwise:
//!   1. Finds the `Slottable` in the children tree
//!   2. Extracts the host element from within the `Slottable`
//!   3. Replaces the `Slottable` with the host element's children
//!   4. Merges props from the slot and the host element
//!   5. Creates a new element with the host's type and merged props
//! - If slotting fails, the error is reported and the `Slot` is created unchanged
//!
//! For all other types the base primitive is called directly.

use crate::element::{ElementType, Props, Value};
use crate::merge::{DefaultMerge, MergeProps};
use crate::report::{ErrorReporter, TracingReporter};
use crate::resolve::resolve_host;
use crate::traits::{CreateElement, CreateElementDev, SlotError, SourceInfo};

/// Configuration shared by both interceptor variants.
#[derive(Debug, Clone, Default)]
pub struct SlotOptions<M = DefaultMerge, R = TracingReporter> {
    merge: M,
    reporter: R,
}

impl SlotOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M, R> SlotOptions<M, R> {
    /// Replace the merge strategy.
    pub fn with_merge<M2: MergeProps>(self, merge: M2) -> SlotOptions<M2, R> {
        SlotOptions {
            merge,
            reporter: self.reporter,
        }
    }

    /// Replace the error reporter.
    pub fn with_reporter<R2: ErrorReporter>(self, reporter: R2) -> SlotOptions<M, R2> {
        SlotOptions {
            merge: self.merge,
            reporter,
        }
    }

    pub fn merge(&self) -> &M {
        &self.merge
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}

/// A successful slot transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct Slotted {
    pub ty: ElementType,
    pub props: Props,
}

/// Rewrite the props of a `Slot` invocation onto its host.
pub fn transform_slot(props: &Props, merge: &impl MergeProps) -> Result<Slotted, SlotError> {
    let resolution = resolve_host(props.children())?;
    tracing::debug!(
        host = resolution.host_type.name(),
        path = ?resolution.path,
        "Slotting onto host"
    );

    let merged = merge.merge_props(props.values().clone(), resolution.host_props);

    Ok(Slotted {
        ty: resolution.host_type,
        props: Props::from_parts(merged, resolution.children),
    })
}

fn perform_slot_transformation<M: MergeProps, R: ErrorReporter>(
    props: &Props,
    options: &SlotOptions<M, R>,
) -> Option<Slotted> {
    match transform_slot(props, &options.merge) {
        Ok(slotted) => Some(slotted),
        Err(error) => {
            options.reporter.report(&error);
            None
        }
    }
}

/// Production primitive wrapped with slotting.
#[derive(Debug, Clone)]
pub struct WithSlot<F, M = DefaultMerge, R = TracingReporter> {
    base: F,
    options: SlotOptions<M, R>,
}

impl<F, M, R> WithSlot<F, M, R> {
    pub fn options(&self) -> &SlotOptions<M, R> {
        &self.options
    }
}

impl<F, M, R> CreateElement for WithSlot<F, M, R>
where
    F: CreateElement,
    M: MergeProps,
    R: ErrorReporter,
{
    type Output = F::Output;

    fn create(&self, ty: ElementType, props: Props, key: Option<String>) -> F::Output {
        if !ty.is_slot() {
            return self.base.create(ty, props, key);
        }

        match perform_slot_transformation(&props, &self.options) {
            Some(slotted) => self.base.create(slotted.ty, slotted.props, key),
            None => self.base.create(ty, props, key),
        }
    }
}

/// Wrap a production primitive (`jsx`) with default options.
pub fn with_slot<F: CreateElement>(base: F) -> WithSlot<F> {
    with_slot_with(base, SlotOptions::new())
}

/// Wrap a production primitive (`jsx`) with custom options.
pub fn with_slot_with<F, M, R>(base: F, options: SlotOptions<M, R>) -> WithSlot<F, M, R>
where
    F: CreateElement,
    M: MergeProps,
    R: ErrorReporter,
{
    WithSlot { base, options }
}

/// Wrap the static-children primitive (`jsxs`). Same transformation as [`with_slot`].
pub fn with_slot_jsxs<F: CreateElement>(base: F) -> WithSlot<F> {
    with_slot(base)
}

/// Diagnostics primitive wrapped with slotting.
#[derive(Debug, Clone)]
pub struct WithSlotDev<F, M = DefaultMerge, R = TracingReporter> {
    base: F,
    options: SlotOptions<M, R>,
}

impl<F, M, R> CreateElementDev for WithSlotDev<F, M, R>
where
    F: CreateElementDev,
    M: MergeProps,
    R: ErrorReporter,
{
    type Output = F::Output;

    fn create_dev(
        &self,
        ty: ElementType,
        props: Props,
        key: Option<String>,
        is_static_children: bool,
        source: Option<SourceInfo>,
        owner: Option<Value>,
    ) -> F::Output {
        if !ty.is_slot() {
            return self
                .base
                .create_dev(ty, props, key, is_static_children, source, owner);
        }

        match perform_slot_transformation(&props, &self.options) {
            Some(slotted) => self.base.create_dev(
                slotted.ty,
                slotted.props,
                key,
                is_static_children,
                source,
                owner,
            ),
            None => self
                .base
                .create_dev(ty, props, key, is_static_children, source, owner),
        }
    }
}

/// Wrap a diagnostics primitive (`jsxDEV`) with default options.
pub fn with_slot_dev<F: CreateElementDev>(base: F) -> WithSlotDev<F> {
    with_slot_dev_with(base, SlotOptions::new())
}

/// Wrap a diagnostics primitive (`jsxDEV`) with custom options.
pub fn with_slot_dev_with<F, M, R>(base: F, options: SlotOptions<M, R>) -> WithSlotDev<F, M, R>
where
    F: CreateElementDev,
    M: MergeProps,
    R: ErrorReporter,
{
    WithSlotDev { base, options }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{create_element, create_element_dev, Element, Node, PropMap, StyleMap};
    use crate::markers::slottable;
    use crate::merge::ShallowMerge;
    use crate::report::CollectingReporter;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn anchor(props: Props) -> Element {
        create_element(ElementType::intrinsic("a"), props, None)
    }

    fn span(text: &str) -> Node {
        Node::Element(create_element(
            ElementType::intrinsic("span"),
            Props::new().with_child(text),
            None,
        ))
    }

    fn collecting() -> (Rc<CollectingReporter>, SlotOptions<DefaultMerge, Rc<CollectingReporter>>) {
        let reporter = Rc::new(CollectingReporter::new());
        let options = SlotOptions::new().with_reporter(Rc::clone(&reporter));
        (reporter, options)
    }

    #[test]
    fn passes_through_other_types() {
        let jsx = with_slot(create_element);
        let props = Props::new().with("type", "submit").with_child("Save");

        let intercepted = jsx.create(
            ElementType::intrinsic("button"),
            props.clone(),
            Some("k".to_string()),
        );
        let direct = create_element(ElementType::intrinsic("button"), props, Some("k".to_string()));

        assert_eq!(intercepted, direct);
    }

    #[test]
    fn slots_directly_onto_single_child() {
        let jsx = with_slot(create_element);
        let host = anchor(
            Props::new()
                .with("href", "https://example.com")
                .with("className", "host")
                .with_child("Docs"),
        );

        let element = jsx.create(
            ElementType::Slot,
            Props::new()
                .with("className", "outer")
                .with("target", "_blank")
                .with_child(host),
            Some("k".to_string()),
        );

        assert_eq!(element.ty, ElementType::intrinsic("a"));
        assert_eq!(element.key.as_deref(), Some("k"));
        assert_eq!(element.props.get("className"), Some(&Value::from("outer host")));
        assert_eq!(element.props.get("href"), Some(&Value::from("https://example.com")));
        assert_eq!(element.props.get("target"), Some(&Value::from("_blank")));
        assert_eq!(element.children(), &[Node::text("Docs")]);
    }

    #[test]
    fn slots_through_slottable() {
        let jsx = with_slot(create_element);
        let host = anchor(Props::new().with("href", "/").with_child("Docs"));

        let element = jsx.create(
            ElementType::Slot,
            Props::new()
                .with("className", "btn")
                .with_child(span("left"))
                .with_child(slottable(host))
                .with_child(span("right")),
            None,
        );

        assert_eq!(element.ty, ElementType::intrinsic("a"));
        assert_eq!(element.props.get("className"), Some(&Value::from("btn")));
        assert_eq!(element.props.get("href"), Some(&Value::from("/")));
        assert_eq!(
            element.children(),
            &[span("left"), Node::text("Docs"), span("right")]
        );
    }

    #[test]
    fn falls_back_when_host_is_missing() {
        let (reporter, options) = collecting();
        let jsx = with_slot_with(create_element, options);
        let props = Props::new().with("className", "btn");

        let element = jsx.create(ElementType::Slot, props.clone(), None);

        assert_eq!(reporter.errors(), vec![SlotError::MissingHostChild]);
        assert_eq!(element, create_element(ElementType::Slot, props, None));
    }

    #[test]
    fn falls_back_on_multiple_candidates() {
        let (reporter, options) = collecting();
        let jsx = with_slot_with(create_element, options);
        let props = Props::new()
            .with_child(anchor(Props::new().with_child("one")))
            .with_child(anchor(Props::new().with_child("two")));

        let element = jsx.create(ElementType::Slot, props.clone(), None);

        assert_eq!(reporter.errors(), vec![SlotError::HostNotFound]);
        assert_eq!(element.ty, ElementType::Slot);
        assert_eq!(element.props, props);
    }

    #[test]
    fn falls_back_on_ambiguous_slottable() {
        let (reporter, options) = collecting();
        let jsx = with_slot_with(create_element, options);
        let slottable = Element::new(
            ElementType::Slottable,
            Props::new()
                .with_child(anchor(Props::new()))
                .with_child(anchor(Props::new())),
            None,
        );

        let element = jsx.create(
            ElementType::Slot,
            Props::new().with_child(span("left")).with_child(slottable),
            None,
        );

        assert_eq!(reporter.errors(), vec![SlotError::AmbiguousHost { count: 2 }]);
        assert!(element.ty.is_slot());
    }

    #[test]
    fn merged_handlers_fire_host_then_outer() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let handler = |label: &'static str| {
            let calls = Rc::clone(&calls);
            Value::handler(move |_| calls.borrow_mut().push(label))
        };
        let jsx = with_slot(create_element);

        let element = jsx.create(
            ElementType::Slot,
            Props::new()
                .with("onClick", handler("outer"))
                .with_child(anchor(Props::new().with("onClick", handler("host")))),
            None,
        );
        element.props.get("onClick").and_then(Value::as_handler).unwrap()(&[]);

        assert_eq!(*calls.borrow(), vec!["host", "outer"]);
    }

    #[test]
    fn merges_styles_onto_host() {
        let style = |entries: &[(&str, &str)]| {
            Value::Style(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<StyleMap>(),
            )
        };
        let jsx = with_slot(create_element);

        let element = jsx.create(
            ElementType::Slot,
            Props::new()
                .with("style", style(&[("color", "red"), ("padding", "10px")]))
                .with_child(anchor(
                    Props::new().with("style", style(&[("backgroundColor", "blue"), ("padding", "20px")])),
                )),
            None,
        );

        assert_eq!(
            element.props.get("style"),
            Some(&style(&[
                ("backgroundColor", "blue"),
                ("color", "red"),
                ("padding", "20px")
            ]))
        );
    }

    #[test]
    fn nested_slots_compose() {
        let jsx = with_slot(create_element);

        let inner = jsx.create(
            ElementType::Slot,
            Props::new()
                .with("className", "link")
                .with_child(anchor(Props::new().with("href", "/").with_child("Go"))),
            None,
        );
        let outer = jsx.create(
            ElementType::Slot,
            Props::new().with("className", "button").with_child(inner),
            None,
        );

        assert_eq!(outer.ty, ElementType::intrinsic("a"));
        assert_eq!(outer.props.get("className"), Some(&Value::from("button link")));
        assert_eq!(outer.children(), &[Node::text("Go")]);
    }

    #[test]
    fn uses_custom_merge_strategy() {
        let options = SlotOptions::new().with_merge(ShallowMerge);
        let jsx = with_slot_with(create_element, options);

        let element = jsx.create(
            ElementType::Slot,
            Props::new()
                .with("className", "outer")
                .with_child(anchor(Props::new().with("className", "host"))),
            None,
        );

        assert_eq!(element.props.get("className"), Some(&Value::from("host")));
    }

    #[test]
    fn closure_merge_strategy_applies_to_both_variants() {
        let force = |outer: PropMap, host: PropMap| {
            let mut merged = outer;
            merged.extend(host);
            merged.insert("className".to_string(), Value::from("forced"));
            merged
        };
        let jsx = with_slot_with(create_element, SlotOptions::new().with_merge(force));
        let jsx_dev = with_slot_dev_with(create_element_dev, SlotOptions::new().with_merge(force));
        let props = Props::new().with_child(anchor(Props::new().with("className", "host")));

        let prod = jsx.create(ElementType::Slot, props.clone(), None);
        let dev = jsx_dev.create_dev(ElementType::Slot, props, None, false, None, None);

        assert_eq!(prod.props.get("className"), Some(&Value::from("forced")));
        assert_eq!(dev.props.get("className"), Some(&Value::from("forced")));
    }

    #[test]
    fn dev_variant_forwards_diagnostics() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let base = {
            let seen = Rc::clone(&seen);
            move |ty: ElementType,
                  props: Props,
                  key: Option<String>,
                  is_static: bool,
                  source: Option<SourceInfo>,
                  owner: Option<Value>| {
                seen.borrow_mut()
                    .push((ty.name().to_string(), is_static, source.clone(), owner));
                create_element_dev(ty, props, key, is_static, source, None)
            }
        };
        let jsx_dev = with_slot_dev(base);
        let source = SourceInfo {
            file_name: "app.jsx".to_string(),
            line_number: 3,
            column_number: 5,
        };

        let element = jsx_dev.create_dev(
            ElementType::Slot,
            Props::new().with_child(anchor(Props::new())),
            None,
            true,
            Some(source.clone()),
            Some(Value::from("self")),
        );

        assert_eq!(element.ty, ElementType::intrinsic("a"));
        assert_eq!(element.source, Some(source.clone()));
        assert_eq!(
            *seen.borrow(),
            vec![("a".to_string(), true, Some(source), Some(Value::from("self")))]
        );
    }

    #[test]
    fn dev_variant_falls_back() {
        let reporter = Rc::new(CollectingReporter::new());
        let jsx_dev = with_slot_dev_with(
            create_element_dev,
            SlotOptions::new().with_reporter(Rc::clone(&reporter)),
        );

        let element = jsx_dev.create_dev(ElementType::Slot, Props::new(), None, false, None, None);

        assert!(element.ty.is_slot());
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn jsxs_behaves_like_jsx() {
        let jsxs = with_slot_jsxs(create_element);

        let element = jsxs.create(
            ElementType::Slot,
            Props::new().with_child(anchor(Props::new().with("href", "/"))),
            None,
        );

        assert_eq!(element.ty, ElementType::intrinsic("a"));
    }
}
