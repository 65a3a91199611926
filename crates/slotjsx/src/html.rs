//! HTML renderer standing in for the host framework.
//!
//! Markers render their children transparently, components are expanded through
//! their render function and refs on intrinsic elements are attached to a
//! [`Mounted`] handle in document order.

use crate::element::{Element, ElementType, Node, Props, StyleMap, Value};
use crate::markers::render_marker;
use crate::refs::Mounted;

/// Elements rendered without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

/// Render nodes to an HTML string.
pub fn render_html(nodes: &[Node]) -> String {
    let mut renderer = HtmlRenderer::default();
    renderer.nodes(nodes);
    renderer.out
}

#[derive(Default)]
struct HtmlRenderer {
    out: String,
    mounted: usize,
}

impl HtmlRenderer {
    fn nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.node(node);
        }
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::Element(element) => self.element(element),
            Node::Text(text) => self.out.push_str(&html_escape(text)),
            Node::Number(n) => self.out.push_str(&format_number(*n)),
            Node::Empty => {}
            Node::List(nodes) => self.nodes(nodes),
        }
    }

    fn element(&mut self, element: &Element) {
        match &element.ty {
            ElementType::Intrinsic(tag) => self.intrinsic(tag, &element.props),
            ElementType::Component(component) => {
                let rendered = component.render(&element.props);
                self.node(&rendered);
            }
            ElementType::Slot | ElementType::Slottable => {
                self.nodes(render_marker(&element.props));
            }
        }
    }

    fn intrinsic(&mut self, tag: &str, props: &Props) {
        let mounted = Mounted {
            tag: tag.to_string(),
            index: self.mounted,
        };
        self.mounted += 1;

        self.out.push('<');
        self.out.push_str(tag);
        for (key, value) in props.values() {
            if let Some(attr) = render_attribute(key, value) {
                self.out.push(' ');
                self.out.push_str(&attr);
            }
        }
        self.out.push('>');

        if let Some(Value::Ref(r)) = props.get("ref") {
            r.set(Some(&mounted));
        }

        if VOID_ELEMENTS.contains(&tag) {
            return;
        }

        self.nodes(props.children());
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }
}

/// Render one attribute, or `None` if it has no HTML form.
fn render_attribute(key: &str, value: &Value) -> Option<String> {
    let name = match key {
        "className" => "class",
        "htmlFor" => "for",
        "ref" => return None,
        other => other,
    };

    match value {
        Value::String(s) => Some(format!(r#"{}="{}""#, name, html_escape(s))),
        Value::Number(n) => Some(format!(r#"{}="{}""#, name, format_number(*n))),
        Value::Bool(true) => Some(name.to_string()),
        Value::Style(style) => Some(format!(r#"{}="{}""#, name, html_escape(&style_text(style)))),
        Value::Bool(false) | Value::Null | Value::Handler(_) | Value::Ref(_) => None,
    }
}

/// Serialize a style mapping: `backgroundColor` becomes `background-color`.
fn style_text(style: &StyleMap) -> String {
    style
        .iter()
        .map(|(k, v)| format!("{}:{};", kebab_case(k), v))
        .collect()
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Escape HTML special characters including single quotes for XSS prevention.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
