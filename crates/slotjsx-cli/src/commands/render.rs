//! Render a markup file through the slot runtime.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::{json, Map};
use slotjsx::{
    create_element, create_element_dev, parse_markup, render_html, with_slot_dev_with,
    with_slot_with, Builder, Node, Scope, SlotOptions, Value,
};

use super::config::ConfigFile;

/// Output format for rendered markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// HTML with markers rendered transparently
    Html,
    /// Element tree as JSON
    Json,
}

/// Run the render command.
pub fn run(config: &ConfigFile, file: &Path, format: OutputFormat, dev: bool) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let output = render_source(config, &source, &file.display().to_string(), format, dev)?;
    println!("{}", output);

    Ok(())
}

/// Parse, build and serialize a markup source.
pub fn render_source(
    config: &ConfigFile,
    source: &str,
    file_name: &str,
    format: OutputFormat,
    dev: bool,
) -> Result<String> {
    let markup =
        parse_markup(source).with_context(|| format!("Failed to parse {}", file_name))?;
    let registry = config.registry()?;
    let scope = Scope::new();
    let builder = Builder::new(&registry, &scope).file_name(file_name);
    let options = SlotOptions::new().with_merge(config.merge.strategy);

    let nodes = if dev {
        tracing::debug!("Building {} with the development runtime", file_name);
        builder.build_dev(&markup, &with_slot_dev_with(create_element_dev, options))
    } else {
        builder.build(&markup, &with_slot_with(create_element, options))
    }
    .with_context(|| format!("Failed to build {}", file_name))?;

    render_output(&nodes, format)
}

/// Serialize built nodes in the requested format.
pub fn render_output(nodes: &[Node], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(render_html(nodes)),
        OutputFormat::Json => {
            let tree: Vec<serde_json::Value> = nodes.iter().map(node_to_json).collect();
            serde_json::to_string_pretty(&tree).context("Failed to serialize element tree")
        }
    }
}

fn node_to_json(node: &Node) -> serde_json::Value {
    match node {
        Node::Element(element) => {
            let props: Map<String, serde_json::Value> = element
                .props
                .values()
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect();
            let children: Vec<serde_json::Value> =
                element.children().iter().map(node_to_json).collect();

            let mut out = json!({
                "type": element.ty.name(),
                "props": props,
                "children": children,
            });
            if let Some(key) = &element.key {
                out["key"] = json!(key);
            }
            if let Some(source) = &element.source {
                out["source"] = json!({
                    "fileName": source.file_name,
                    "lineNumber": source.line_number,
                    "columnNumber": source.column_number,
                });
            }
            out
        }
        Node::Text(text) => json!(text),
        Node::Number(n) => json!(n),
        Node::Empty => serde_json::Value::Null,
        Node::List(nodes) => serde_json::Value::Array(nodes.iter().map(node_to_json).collect()),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        Value::Number(n) => json!(n),
        Value::String(s) => json!(s),
        Value::Style(style) => json!(style),
        Value::Handler(_) => json!("[handler]"),
        Value::Ref(_) => json!("[ref]"),
    }
}
