//! Single-document rendering shared by the commands.

use anyhow::{Context, Result};
use frontmark_dom::{upgrade_frontmatter_blocks, HtmlTree, TableRenderer, UpgradeReport};
use frontmark_md::{parse_frontmatter, FrontmatterExtension, MarkdownPipeline, Token};

use crate::config::ConfigFile;
use crate::page::PageShell;

/// Output settings for rendered documents.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub upgrade: bool,
    pub standalone: bool,
    pub title: String,
    pub max_depth: usize,
}

impl RenderSettings {
    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            upgrade: config.render.upgrade,
            standalone: config.render.standalone,
            title: config.render.title.clone(),
            max_depth: config.render.max_depth,
        }
    }
}

/// A rendered document.
#[derive(Debug)]
pub struct RenderedDocument {
    pub html: String,
    pub report: UpgradeReport,
}

/// Markdown to HTML, with frontmatter upgrade and optional page shell.
pub struct DocumentRenderer {
    pipeline: MarkdownPipeline,
    table: TableRenderer,
    shell: Option<PageShell>,
    settings: RenderSettings,
}

impl DocumentRenderer {
    pub fn new(config: &ConfigFile, settings: RenderSettings) -> Result<Self> {
        let shell = if settings.standalone {
            Some(PageShell::new().context("Failed to load page template")?)
        } else {
            None
        };

        Ok(Self {
            pipeline: MarkdownPipeline::with_frontmatter(config.markdown.pipeline_options()),
            table: TableRenderer::with_max_depth(settings.max_depth),
            shell,
            settings,
        })
    }

    pub fn render(&self, source: &str) -> Result<RenderedDocument> {
        let tokens = self.pipeline.tokenize(source);
        let mut html = self.pipeline.render(&tokens);
        let mut report = UpgradeReport::default();

        if self.settings.upgrade {
            let mut tree = HtmlTree::parse(&html);
            report = upgrade_frontmatter_blocks(&mut tree, &self.table);
            html = tree
                .to_html()
                .context("Failed to serialize upgraded document")?;
        }

        if let Some(shell) = &self.shell {
            let title = frontmatter_title(&tokens).unwrap_or_else(|| self.settings.title.clone());
            html = shell
                .render(&title, &html)
                .context("Failed to render page template")?;
        }

        Ok(RenderedDocument { html, report })
    }
}

/// The `title` string of the document's frontmatter, if it parses.
fn frontmatter_title(tokens: &[Token]) -> Option<String> {
    let block = tokens.iter().find_map(|token| match token {
        Token::Block(block) if block.kind == FrontmatterExtension::NAME => Some(block),
        _ => None,
    })?;

    let data = parse_frontmatter(&block.text).ok()?;
    data.get("title")?.as_str().map(str::to_string)
}
