//! Initialize a slotjsx project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command. The demo file is written next to the config.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing slotjsx...");

    let demo_path = config_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("demo.jsx");

    write_unless_exists(config_path, DEFAULT_CONFIG, yes)?;
    write_unless_exists(&demo_path, DEFAULT_DEMO, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'slotjsx render {}' to see it rendered.", demo_path.display());

    Ok(())
}

fn write_unless_exists(path: &Path, content: &str, yes: bool) -> Result<()> {
    if path.exists() && !yes {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# slotjsx configuration

[merge]
# "default" concatenates className, merges style and chains handlers.
# "shallow" lets host props replace outer props.
strategy = "default"

[components]
# Component name = intrinsic tag it renders as
Link = "a"
Button = "button"

[check]
# File extensions scanned by `slotjsx check`
extensions = ["jsx", "slot"]
"#;

const DEFAULT_DEMO: &str = r#"<div>
  <Slot className="btn" onClick={track}>
    <Link href="/docs" className="primary">Read the docs</Link>
  </Slot>
  <Slot className="btn" style={{ color: "white" }}>
    <img src="/icon.svg" />
    <Slottable>
      <Button type="submit" style={{ background: "blue" }}>Save</Button>
    </Slottable>
  </Slot>
</div>
"#;
