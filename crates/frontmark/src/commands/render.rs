//! Single file render command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ConfigFile;
use crate::document::{DocumentRenderer, RenderSettings};

/// Run the render command.
pub async fn run(
    config: &ConfigFile,
    input: &Path,
    output: Option<PathBuf>,
    settings: RenderSettings,
) -> Result<()> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let renderer = DocumentRenderer::new(config, settings)?;
    let doc = renderer.render(&source)?;

    if doc.report.failed > 0 {
        tracing::warn!(
            "{} frontmatter block(s) in {} left unrendered",
            doc.report.failed,
            input.display()
        );
    }

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, &doc.html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", doc.html),
    }

    Ok(())
}
