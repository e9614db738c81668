//! Configuration file (frontmark.toml).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use frontmark_dom::TableRenderer;
use frontmark_md::PipelineOptions;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

/// Markdown syntax extensions.
#[derive(Debug, Deserialize, PartialEq)]
pub struct MarkdownConfig {
    #[serde(default = "default_true")]
    pub tables: bool,
    #[serde(default = "default_true")]
    pub footnotes: bool,
    #[serde(default = "default_true")]
    pub strikethrough: bool,
    #[serde(default = "default_true")]
    pub tasklists: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RenderConfig {
    /// Replace frontmatter placeholders with their structured rendering
    #[serde(default = "default_true")]
    pub upgrade: bool,
    /// Wrap output in a complete HTML page
    #[serde(default)]
    pub standalone: bool,
    /// Page title when the frontmatter has none
    #[serde(default = "default_title")]
    pub title: String,
    /// Nesting limit for rendered frontmatter
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct BuildSettings {
    #[serde(default = "default_input")]
    pub input: String,
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_true() -> bool {
    true
}
fn default_title() -> String {
    "Document".to_string()
}
fn default_max_depth() -> usize {
    TableRenderer::DEFAULT_MAX_DEPTH
}
fn default_input() -> String {
    "docs".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            upgrade: true,
            standalone: false,
            title: default_title(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
        }
    }
}

impl MarkdownConfig {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            tables: self.tables,
            footnotes: self.footnotes,
            strikethrough: self.strikethrough,
            tasklists: self.tasklists,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
