//! Property merging between the slot invocation and the host element.
//!
//! Host values take precedence, except for three key classes that combine:
//!
//! | key | rule |
//! |---|---|
//! | `className` | `outer + " " + host` when both are non-empty strings |
//! | `style` | shallow merge, host entries override outer entries |
//! | `on*` handlers | a new handler calling the host handler, then the outer one |
//!
//! `ref` is an ordinary key: the host's ref replaces the outer ref. Use
//! [`compose_refs`](crate::refs::compose_refs) to forward to both.

use std::rc::Rc;

use crate::element::{Callback, PropMap, Value};

/// Key carrying the space-separated class list.
pub const CLASS_NAME: &str = "className";

/// Key carrying the inline style mapping.
pub const STYLE: &str = "style";

/// Prefix of event handler keys.
const HANDLER_PREFIX: &str = "on";

/// Strategy combining the slot's own props with the host's props.
pub trait MergeProps {
    fn merge_props(&self, outer: PropMap, host: PropMap) -> PropMap;
}

impl<F> MergeProps for F
where
    F: Fn(PropMap, PropMap) -> PropMap,
{
    fn merge_props(&self, outer: PropMap, host: PropMap) -> PropMap {
        self(outer, host)
    }
}

/// The default merge policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMerge;

impl MergeProps for DefaultMerge {
    fn merge_props(&self, outer: PropMap, host: PropMap) -> PropMap {
        merge_props(outer, host)
    }
}

/// Plain override: every host value replaces the outer value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShallowMerge;

impl MergeProps for ShallowMerge {
    fn merge_props(&self, mut outer: PropMap, host: PropMap) -> PropMap {
        outer.extend(host);
        outer
    }
}

/// Merge outer props with host props using the default policy.
pub fn merge_props(outer: PropMap, host: PropMap) -> PropMap {
    let mut merged = outer;

    for (key, host_value) in host {
        let value = match merged.remove(&key) {
            Some(outer_value) => combine(&key, outer_value, host_value),
            None => host_value,
        };
        merged.insert(key, value);
    }

    merged
}

fn combine(key: &str, outer: Value, host: Value) -> Value {
    match (key, outer, host) {
        (CLASS_NAME, Value::String(outer), Value::String(host))
            if !outer.is_empty() && !host.is_empty() =>
        {
            Value::String(format!("{outer} {host}"))
        }
        (CLASS_NAME, outer, Value::Null) => outer,
        (STYLE, Value::Style(mut outer), Value::Style(host)) => {
            outer.extend(host);
            Value::Style(outer)
        }
        (key, Value::Handler(outer), Value::Handler(host)) if is_handler_key(key) => {
            Value::Handler(chain_handlers(host, outer))
        }
        (_, _, host) => host,
    }
}

fn is_handler_key(key: &str) -> bool {
    key.starts_with(HANDLER_PREFIX)
}

/// Invoke `first` then `second` with the same arguments.
fn chain_handlers(first: Callback, second: Callback) -> Callback {
    Rc::new(move |args: &[Value]| {
        first(args);
        second(args);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::StyleMap;
    use crate::refs::NodeRef;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn props<const N: usize>(entries: [(&str, Value); N]) -> PropMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn style<const N: usize>(entries: [(&str, &str); N]) -> Value {
        Value::Style(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<StyleMap>(),
        )
    }

    #[test]
    fn concatenates_class_names() {
        let merged = merge_props(
            props([(CLASS_NAME, "a".into())]),
            props([(CLASS_NAME, "b".into())]),
        );

        assert_eq!(merged, props([(CLASS_NAME, "a b".into())]));
    }

    #[test]
    fn keeps_single_class_name() {
        let outer_only = merge_props(props([(CLASS_NAME, "a".into())]), PropMap::new());
        let host_only = merge_props(PropMap::new(), props([(CLASS_NAME, "b".into())]));
        let host_null = merge_props(
            props([(CLASS_NAME, "a".into())]),
            props([(CLASS_NAME, Value::Null)]),
        );

        assert_eq!(outer_only, props([(CLASS_NAME, "a".into())]));
        assert_eq!(host_only, props([(CLASS_NAME, "b".into())]));
        assert_eq!(host_null, props([(CLASS_NAME, "a".into())]));
    }

    #[test]
    fn merges_styles_with_host_precedence() {
        let merged = merge_props(
            props([(STYLE, style([("color", "red"), ("padding", "10px")]))]),
            props([(
                STYLE,
                style([("backgroundColor", "blue"), ("padding", "20px")]),
            )]),
        );

        assert_eq!(
            merged,
            props([(
                STYLE,
                style([
                    ("color", "red"),
                    ("backgroundColor", "blue"),
                    ("padding", "20px")
                ])
            )])
        );
    }

    #[test]
    fn host_style_wins_when_outer_is_not_a_mapping() {
        let merged = merge_props(
            props([(STYLE, "color: red".into())]),
            props([(STYLE, style([("color", "blue")]))]),
        );

        assert_eq!(merged, props([(STYLE, style([("color", "blue")]))]));
    }

    #[test]
    fn chains_event_handlers_host_first() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let outer = {
            let calls = Rc::clone(&calls);
            Value::handler(move |_| calls.borrow_mut().push("outer"))
        };
        let host = {
            let calls = Rc::clone(&calls);
            Value::handler(move |_| calls.borrow_mut().push("host"))
        };

        let merged = merge_props(props([("onClick", outer)]), props([("onClick", host)]));
        let on_click = merged["onClick"].as_handler().unwrap();

        on_click(&[]);
        assert_eq!(*calls.borrow(), vec!["host", "outer"]);

        on_click(&[]);
        assert_eq!(*calls.borrow(), vec!["host", "outer", "host", "outer"]);
    }

    #[test]
    fn handler_arguments_reach_both_handlers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = |label: &'static str| {
            let seen = Rc::clone(&seen);
            Value::handler(move |args| {
                seen.borrow_mut().push((label, args.to_vec()));
            })
        };

        let merged = merge_props(
            props([("onKeyDown", record("outer"))]),
            props([("onKeyDown", record("host"))]),
        );
        merged["onKeyDown"].as_handler().unwrap()(&[Value::from("Enter")]);

        assert_eq!(
            *seen.borrow(),
            vec![
                ("host", vec![Value::from("Enter")]),
                ("outer", vec![Value::from("Enter")])
            ]
        );
    }

    #[test]
    fn on_prefixed_non_handlers_are_overridden() {
        let merged = merge_props(
            props([("one", "outer".into())]),
            props([("one", "host".into())]),
        );

        assert_eq!(merged, props([("one", "host".into())]));
    }

    #[test]
    fn host_overrides_other_props() {
        let merged = merge_props(
            props([
                ("data-outer", "outer-value".into()),
                ("data-shared", "outer".into()),
            ]),
            props([
                ("data-host", "host-value".into()),
                ("data-shared", "host".into()),
            ]),
        );

        assert_eq!(
            merged,
            props([
                ("data-host", "host-value".into()),
                ("data-outer", "outer-value".into()),
                ("data-shared", "host".into()),
            ])
        );
    }

    #[test]
    fn refs_are_ordinary_props() {
        let outer = NodeRef::object();
        let host = NodeRef::object();

        let merged = merge_props(
            props([("ref", Value::Ref(outer))]),
            props([("ref", Value::Ref(host.clone()))]),
        );

        assert_eq!(merged["ref"], Value::Ref(host));
    }

    #[test]
    fn shallow_merge_replaces_everything() {
        let merged = ShallowMerge.merge_props(
            props([(CLASS_NAME, "a".into()), ("id", "outer".into())]),
            props([(CLASS_NAME, "b".into())]),
        );

        assert_eq!(
            merged,
            props([(CLASS_NAME, "b".into()), ("id", "outer".into())])
        );
    }

    #[test]
    fn closures_are_merge_strategies() {
        let strategy = |_: PropMap, host: PropMap| host;

        let merged = strategy.merge_props(props([("id", "outer".into())]), PropMap::new());

        assert!(merged.is_empty());
    }
}
