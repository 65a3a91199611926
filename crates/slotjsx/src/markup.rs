//! Markup front-end.
//!
//! Parses JSX-like markup such as `<Slot className="btn"><a href="/">Docs</a></Slot>`
//! into a [`Markup`] tree, then builds it through a creation primitive innermost
//! element first, the way a compiled JSX expression evaluates.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::element::{Element, ElementType, Node, Props, StyleMap, Value};
use crate::refs::{Mounted, NodeRef};
use crate::registry::ComponentRegistry;
use crate::traits::{CreateElement, CreateElementDev, SourceInfo};

/// A parsed markup node.
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(MarkupElement),
    Text(String),
    Number(f64),
    /// `{null}`, `{true}` or `{false}` in child position
    Empty,
}

/// A parsed markup element.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    /// Tag or component name as written
    pub name: String,

    /// Attributes in source order
    pub attrs: Vec<(String, AttrValue)>,

    pub children: Vec<Markup>,

    /// 1-based position of the opening `<`
    pub line: u32,
    pub column: u32,
}

/// An attribute value from markup.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// String literal: href="/"
    String(String),
    /// Boolean (presence or literal): disabled, hidden={false}
    Boolean(bool),
    /// Number literal: tabIndex={0}
    Number(f64),
    /// `{null}`
    Null,
    /// Object literal: style={{ color: "red" }}
    Style(StyleMap),
    /// Bare identifier: onClick={handleClick}
    Identifier(String),
}

/// Errors that can occur while parsing or building markup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarkupError {
    #[error("Unexpected end of input at {line}:{column}")]
    UnexpectedEof { line: u32, column: u32 },

    #[error("Expected {expected} at {line}:{column}")]
    Expected {
        expected: &'static str,
        line: u32,
        column: u32,
    },

    #[error("Mismatched closing tag at {line}:{column}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        expected: String,
        found: String,
        line: u32,
        column: u32,
    },

    #[error("Invalid expression: {{{0}}}")]
    InvalidExpression(String),

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Unbound identifier `{name}` for prop `{prop}`")]
    UnboundIdentifier { name: String, prop: String },
}

static TAG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.]*").expect("Invalid tag name regex"));

static ATTR_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_:\-]*").expect("Invalid attribute name regex")
});

static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("Invalid identifier regex")
});

static STYLE_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Match: key: "value", 'key': 'value' or key: 10
    Regex::new(r#"^\s*['"]?([A-Za-z][A-Za-z0-9\-]*)['"]?\s*:\s*(?:"([^"]*)"|'([^']*)'|(-?[0-9.]+))\s*$"#)
        .expect("Invalid style entry regex")
});

/// Parse markup source into a list of top-level nodes.
pub fn parse_markup(source: &str) -> Result<Vec<Markup>, MarkupError> {
    let mut parser = Parser { src: source, pos: 0 };
    let nodes = parser.nodes(None)?;
    Ok(nodes)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// 1-based line and column of the cursor.
    fn location(&self) -> (u32, u32) {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed.chars().count(), |nl| consumed[nl + 1..].chars().count())
            + 1;
        (line as u32, column as u32)
    }

    fn eof(&self) -> MarkupError {
        let (line, column) = self.location();
        MarkupError::UnexpectedEof { line, column }
    }

    fn expected(&self, expected: &'static str) -> MarkupError {
        if self.rest().is_empty() {
            return self.eof();
        }
        let (line, column) = self.location();
        MarkupError::Expected {
            expected,
            line,
            column,
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str, expected: &'static str) -> Result<(), MarkupError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.expected(expected))
        }
    }

    fn take(&mut self, re: &Regex, expected: &'static str) -> Result<&'a str, MarkupError> {
        let Some(m) = re.find(self.rest()) else {
            return Err(self.expected(expected));
        };
        let start = self.pos;
        self.pos += m.end();
        Ok(&self.src[start..self.pos])
    }

    /// Parse nodes until end of input, or until a closing tag when inside an element.
    fn nodes(&mut self, parent: Option<&str>) -> Result<Vec<Markup>, MarkupError> {
        let mut nodes = Vec::new();

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return match parent {
                    Some(_) => Err(self.eof()),
                    None => Ok(nodes),
                };
            }

            if rest.starts_with("</") {
                return match parent {
                    Some(_) => Ok(nodes),
                    None => Err(self.expected("an opening tag")),
                };
            }

            if rest.starts_with('<') {
                nodes.push(Markup::Element(self.element()?));
            } else if rest.starts_with('{') {
                let expr = self.braced()?;
                match parse_expression(expr)? {
                    AttrValue::String(s) => nodes.push(Markup::Text(s)),
                    AttrValue::Number(n) => nodes.push(Markup::Number(n)),
                    AttrValue::Null | AttrValue::Boolean(_) => nodes.push(Markup::Empty),
                    AttrValue::Style(_) | AttrValue::Identifier(_) => {
                        return Err(MarkupError::InvalidExpression(expr.to_string()));
                    }
                }
            } else {
                let end = rest.find(['<', '{']).unwrap_or(rest.len());
                self.pos += end;
                if let Some(text) = jsx_text(&rest[..end]) {
                    nodes.push(Markup::Text(text));
                }
            }
        }
    }

    fn element(&mut self) -> Result<MarkupElement, MarkupError> {
        let (line, column) = self.location();
        self.expect("<", "`<`")?;
        let name = self.take(&TAG_NAME_RE, "a tag name")?.to_string();
        let mut attrs = Vec::new();

        loop {
            self.skip_whitespace();

            if self.eat("/>") {
                return Ok(MarkupElement {
                    name,
                    attrs,
                    children: Vec::new(),
                    line,
                    column,
                });
            }

            if self.eat(">") {
                break;
            }

            let attr = self.take(&ATTR_NAME_RE, "an attribute, `>` or `/>`")?.to_string();
            self.skip_whitespace();
            let value = if self.eat("=") {
                self.skip_whitespace();
                self.attr_value()?
            } else {
                AttrValue::Boolean(true)
            };
            attrs.push((attr, value));
        }

        let children = self.nodes(Some(&name))?;

        let (close_line, close_column) = self.location();
        self.expect("</", "a closing tag")?;
        let found = self.take(&TAG_NAME_RE, "a tag name")?;
        if found != name {
            return Err(MarkupError::MismatchedTag {
                expected: name,
                found: found.to_string(),
                line: close_line,
                column: close_column,
            });
        }
        self.skip_whitespace();
        self.expect(">", "`>`")?;

        Ok(MarkupElement {
            name,
            attrs,
            children,
            line,
            column,
        })
    }

    fn attr_value(&mut self) -> Result<AttrValue, MarkupError> {
        let rest = self.rest();
        if let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
            let Some(len) = rest[1..].find(quote) else {
                return Err(self.eof());
            };
            self.pos += len + 2;
            return Ok(AttrValue::String(rest[1..=len].to_string()));
        }

        if rest.starts_with('{') {
            let expr = self.braced()?;
            return parse_expression(expr);
        }

        Err(self.expected("a quoted string or `{expression}`"))
    }

    /// Consume a balanced `{ ... }` group and return its trimmed inner text.
    fn braced(&mut self) -> Result<&'a str, MarkupError> {
        let rest = self.rest();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        for (i, c) in rest.char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'' | '`') => quote = Some(c),
                (None, '{') => depth += 1,
                (None, '}') => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += i + 1;
                        return Ok(rest[1..i].trim());
                    }
                }
                _ => {}
            }
        }

        self.pos = self.src.len();
        Err(self.eof())
    }
}

/// Apply JSX whitespace rules to a raw text run.
///
/// Text on a single line is kept verbatim. In multi-line text each line loses
/// the whitespace next to a line break (the first line keeps its leading
/// whitespace, the last its trailing), blank lines are dropped and the rest are
/// joined with a space.
fn jsx_text(raw: &str) -> Option<String> {
    let text = if raw.contains('\n') {
        let lines: Vec<&str> = raw.split('\n').collect();
        let last = lines.len() - 1;
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let line = line.trim_end_matches('\r');
                let line = if i == 0 { line } else { line.trim_start() };
                if i == last {
                    line
                } else {
                    line.trim_end()
                }
            })
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        raw.to_string()
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse the inside of a `{ ... }` expression.
fn parse_expression(expr: &str) -> Result<AttrValue, MarkupError> {
    let invalid = || MarkupError::InvalidExpression(expr.to_string());

    if let Some(body) = expr.strip_prefix('{').and_then(|e| e.strip_suffix('}')) {
        return parse_style(body).ok_or_else(invalid);
    }

    match expr {
        "true" => return Ok(AttrValue::Boolean(true)),
        "false" => return Ok(AttrValue::Boolean(false)),
        "null" | "undefined" => return Ok(AttrValue::Null),
        _ => {}
    }

    for quote in ['"', '\''] {
        if let Some(s) = expr.strip_prefix(quote).and_then(|e| e.strip_suffix(quote)) {
            return Ok(AttrValue::String(s.to_string()));
        }
    }

    if expr.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') {
        return expr.parse().map(AttrValue::Number).map_err(|_| invalid());
    }

    if IDENT_RE.is_match(expr) {
        return Ok(AttrValue::Identifier(expr.to_string()));
    }

    Err(invalid())
}

/// Parse the body of a style object literal.
fn parse_style(body: &str) -> Option<AttrValue> {
    let mut style = StyleMap::new();

    for entry in split_entries(body).into_iter().filter(|e| !e.trim().is_empty()) {
        let caps = STYLE_ENTRY_RE.captures(entry)?;
        let key = caps.get(1)?.as_str().to_string();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))?
            .as_str()
            .to_string();
        style.insert(key, value);
    }

    Some(AttrValue::Style(style))
}

/// Split an object literal body on commas outside quotes.
fn split_entries(body: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ',') => {
                entries.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&body[start..]);

    entries
}

/// Values bound to identifiers used in markup expressions.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    values: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style binding.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(name, value);
        self
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// Builds markup into element trees through a creation primitive.
#[derive(Debug)]
pub struct Builder<'a> {
    registry: &'a ComponentRegistry,
    scope: &'a Scope,
    file_name: String,
}

impl<'a> Builder<'a> {
    pub fn new(registry: &'a ComponentRegistry, scope: &'a Scope) -> Self {
        Self {
            registry,
            scope,
            file_name: "<markup>".to_string(),
        }
    }

    /// File name recorded in source info for the diagnostics primitive.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Build through a production primitive.
    pub fn build<F>(&self, nodes: &[Markup], jsx: &F) -> Result<Vec<Node>, MarkupError>
    where
        F: CreateElement<Output = Element>,
    {
        self.build_nodes(nodes, &Production(jsx))
    }

    /// Build through a diagnostics primitive, forwarding source locations.
    pub fn build_dev<F>(&self, nodes: &[Markup], jsx_dev: &F) -> Result<Vec<Node>, MarkupError>
    where
        F: CreateElementDev<Output = Element>,
    {
        self.build_nodes(nodes, &Development(jsx_dev))
    }

    fn build_nodes(&self, nodes: &[Markup], emit: &dyn Emit) -> Result<Vec<Node>, MarkupError> {
        nodes
            .iter()
            .map(|node| match node {
                Markup::Element(element) => self.build_element(element, emit).map(Node::Element),
                Markup::Text(text) => Ok(Node::Text(text.clone())),
                Markup::Number(n) => Ok(Node::Number(*n)),
                Markup::Empty => Ok(Node::Empty),
            })
            .collect()
    }

    fn build_element(&self, element: &MarkupElement, emit: &dyn Emit) -> Result<Element, MarkupError> {
        let ty = self.resolve_type(&element.name)?;
        let mut props = Props::new();
        let mut key = None;

        for (name, value) in &element.attrs {
            if name == "key" {
                key = match value {
                    AttrValue::String(s) => Some(s.clone()),
                    AttrValue::Number(n) => Some(n.to_string()),
                    _ => None,
                };
                continue;
            }
            props.insert(name.clone(), self.resolve_value(name, value)?);
        }

        props.set_children(self.build_nodes(&element.children, emit)?);

        let source = SourceInfo {
            file_name: self.file_name.clone(),
            line_number: element.line,
            column_number: element.column,
        };
        let is_static_children = element.children.len() > 1;

        Ok(emit.emit(ty, props, key, is_static_children, source))
    }

    fn resolve_type(&self, name: &str) -> Result<ElementType, MarkupError> {
        match name {
            "Slot" => Ok(ElementType::Slot),
            "Slottable" => Ok(ElementType::Slottable),
            _ => {
                if let Some(component) = self.registry.get(name) {
                    Ok(ElementType::Component(component.clone()))
                } else if name.starts_with(|c: char| c.is_ascii_lowercase()) {
                    Ok(ElementType::intrinsic(name))
                } else {
                    Err(MarkupError::UnknownComponent(name.to_string()))
                }
            }
        }
    }

    fn resolve_value(&self, prop: &str, value: &AttrValue) -> Result<Value, MarkupError> {
        Ok(match value {
            AttrValue::String(s) => Value::String(s.clone()),
            AttrValue::Boolean(b) => Value::Bool(*b),
            AttrValue::Number(n) => Value::Number(*n),
            AttrValue::Null => Value::Null,
            AttrValue::Style(style) => Value::Style(style.clone()),
            AttrValue::Identifier(name) => {
                if let Some(bound) = self.scope.get(name) {
                    bound.clone()
                } else if prop.starts_with("on") {
                    logging_handler(name)
                } else if prop == "ref" {
                    logging_ref(name)
                } else {
                    return Err(MarkupError::UnboundIdentifier {
                        name: name.clone(),
                        prop: prop.to_string(),
                    });
                }
            }
        })
    }
}

/// Handler for an unbound identifier: logs each invocation.
fn logging_handler(name: &str) -> Value {
    let name = name.to_string();
    Value::handler(move |_| tracing::info!("{} fired", name))
}

/// Ref for an unbound identifier: logs each attach.
fn logging_ref(name: &str) -> Value {
    let name = name.to_string();
    Value::Ref(NodeRef::callback(move |mounted: Option<&Mounted>| {
        if let Some(mounted) = mounted {
            tracing::info!("{} received <{}>", name, mounted.tag);
        }
    }))
}

/// Uniform view over the two primitive shapes.
trait Emit {
    fn emit(
        &self,
        ty: ElementType,
        props: Props,
        key: Option<String>,
        is_static_children: bool,
        source: SourceInfo,
    ) -> Element;
}

struct Production<'f, F>(&'f F);

impl<F: CreateElement<Output = Element>> Emit for Production<'_, F> {
    fn emit(
        &self,
        ty: ElementType,
        props: Props,
        key: Option<String>,
        _is_static_children: bool,
        _source: SourceInfo,
    ) -> Element {
        self.0.create(ty, props, key)
    }
}

struct Development<'f, F>(&'f F);

impl<F: CreateElementDev<Output = Element>> Emit for Development<'_, F> {
    fn emit(
        &self,
        ty: ElementType,
        props: Props,
        key: Option<String>,
        is_static_children: bool,
        source: SourceInfo,
    ) -> Element {
        self.0
            .create_dev(ty, props, key, is_static_children, Some(source), None)
    }
}
