//! Directory build command.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use frontmark_dom::UpgradeReport;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::ConfigFile;
use crate::document::{DocumentRenderer, RenderSettings};

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written
    pub pages: usize,

    /// Frontmatter blocks rendered
    pub frontmatter: usize,

    /// Frontmatter blocks left raw
    pub failed: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// A markdown file to render.
#[derive(Debug)]
struct PageInfo {
    source_path: PathBuf,
    output_path: PathBuf,
}

/// Run the build command.
pub async fn run(
    config: ConfigFile,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    settings: RenderSettings,
) -> Result<()> {
    tracing::info!("Building documents...");

    let input_dir = input.unwrap_or_else(|| PathBuf::from(&config.build.input));
    let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.build.output));

    let result = tokio::task::spawn_blocking(move || {
        build_dir(&config, settings, &input_dir, &output_dir)
    })
    .await
    .context("Build task panicked")??;

    tracing::info!(
        "Built {} pages with {} frontmatter blocks in {}ms",
        result.pages,
        result.frontmatter,
        result.duration_ms
    );
    if result.failed > 0 {
        tracing::warn!("{} frontmatter blocks left unrendered", result.failed);
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

/// Render every markdown file under `input_dir` into `output_dir`.
pub fn build_dir(
    config: &ConfigFile,
    settings: RenderSettings,
    input_dir: &Path,
    output_dir: &Path,
) -> Result<BuildResult> {
    let start = Instant::now();

    if !input_dir.exists() {
        anyhow::bail!("Input directory not found: {}", input_dir.display());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let pages = discover_pages(input_dir, output_dir);
    check_output_collisions(&pages)?;
    let renderer = DocumentRenderer::new(config, settings)?;

    let reports = pages
        .par_iter()
        .map(|page| -> Result<UpgradeReport> {
            let source = fs::read_to_string(&page.source_path)
                .with_context(|| format!("Failed to read {}", page.source_path.display()))?;

            let doc = renderer.render(&source)?;
            if doc.report.failed > 0 {
                tracing::warn!(
                    "Frontmatter left unrendered in {}",
                    page.source_path.display()
                );
            }

            if let Some(parent) = page.output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&page.output_path, doc.html)
                .with_context(|| format!("Failed to write {}", page.output_path.display()))?;

            Ok(doc.report)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BuildResult {
        pages: reports.len(),
        frontmatter: reports.iter().map(|r| r.rendered).sum(),
        failed: reports.iter().map(|r| r.failed).sum(),
        duration_ms: start.elapsed().as_millis() as u64,
        output_dir: output_dir.to_path_buf(),
    })
}

/// Find markdown files and where their HTML goes.
fn discover_pages(input_dir: &Path, output_dir: &Path) -> Vec<PageInfo> {
    WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let ext = entry.path().extension().and_then(|e| e.to_str()).unwrap_or("");
            ext == "md" || ext == "markdown"
        })
        .map(|entry| {
            let path = entry.path();
            let relative = path.strip_prefix(input_dir).unwrap_or(path);

            PageInfo {
                source_path: path.to_path_buf(),
                output_path: output_dir.join(relative).with_extension("html"),
            }
        })
        .collect()
}

/// Fail when two sources would be written to the same HTML file.
fn check_output_collisions(pages: &[PageInfo]) -> Result<()> {
    let mut targets: HashMap<&Path, &Path> = HashMap::new();

    for page in pages {
        if let Some(previous) = targets.insert(&page.output_path, &page.source_path) {
            anyhow::bail!(
                "{} and {} both render to {}",
                previous.display(),
                page.source_path.display(),
                page.output_path.display()
            );
        }
    }

    Ok(())
}
