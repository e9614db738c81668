//! Frontmatter placeholder upgrade.

use frontmark_md::{parse_frontmatter, ParseError, FRONTMATTER_RAW_CLASS};

use crate::render::{JsonRenderer, RenderError};
use crate::tree::{DisplayTree, TreeError};

/// CSS class wrapping the final frontmatter rendering.
pub const FRONTMATTER_CONTAINER_CLASS: &str = "frontmatter-container";

/// Errors that can occur when upgrading a single placeholder.
#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to render frontmatter: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to replace placeholder: {0}")]
    Tree(#[from] TreeError),
}

/// Outcome of an upgrade pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradeReport {
    /// Placeholders replaced by their rendering
    pub rendered: usize,

    /// Empty placeholders left as-is
    pub skipped: usize,

    /// Placeholders left raw because parsing or rendering failed
    pub failed: usize,
}

impl UpgradeReport {
    /// Number of placeholders found.
    pub fn total(&self) -> usize {
        self.rendered + self.skipped + self.failed
    }
}

/// Parse raw frontmatter and wrap its rendering in the container element.
pub fn render_frontmatter<R>(raw: &str, renderer: &R) -> Result<String, UpgradeError>
where
    R: JsonRenderer + ?Sized,
{
    let data = parse_frontmatter(raw)?;
    let html = renderer.render(&data)?;

    Ok(format!(
        "<div class=\"{}\">{}</div>",
        FRONTMATTER_CONTAINER_CLASS, html
    ))
}

/// Replace every frontmatter placeholder in `tree` with its rendering.
///
/// Call this once the pipeline's HTML is attached to the tree. A placeholder
/// that fails to parse or render is logged and left untouched; the remaining
/// placeholders are still processed.
pub fn upgrade_frontmatter_blocks<T, R>(tree: &mut T, renderer: &R) -> UpgradeReport
where
    T: DisplayTree + ?Sized,
    R: JsonRenderer + ?Sized,
{
    let mut report = UpgradeReport::default();

    for node in tree.query_class(FRONTMATTER_RAW_CLASS) {
        let content = tree.text_content(&node);
        if content.trim().is_empty() {
            tracing::debug!("Skipping empty frontmatter placeholder");
            report.skipped += 1;
            continue;
        }

        let result = render_frontmatter(&content, renderer)
            .and_then(|markup| Ok(tree.replace_outer_html(&node, &markup)?));

        match result {
            Ok(()) => report.rendered += 1,
            Err(e) => {
                tracing::warn!("Failed to render frontmatter: {}", e);
                report.failed += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TableRenderer;
    use crate::tree::HtmlTree;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn placeholder(text: &str) -> String {
        format!("<div class=\"frontmatter-raw\">{}</div>\n", text)
    }

    #[test]
    fn replaces_placeholder_with_container() {
        let mut tree = HtmlTree::parse(&format!("{}<p>Body</p>", placeholder("a: 1")));

        let report = upgrade_frontmatter_blocks(&mut tree, &TableRenderer::new());

        assert_eq!(report, UpgradeReport { rendered: 1, skipped: 0, failed: 0 });
        let html = tree.to_html().unwrap();
        assert!(html.starts_with("<div class=\"frontmatter-container\"><table"));
        assert!(html.ends_with("\n<p>Body</p>"));
    }

    #[test]
    fn skips_whitespace_only_placeholder() {
        let source = format!("{}<p>Body</p>", placeholder("  \n  "));
        let mut tree = HtmlTree::parse(&source);

        let report = upgrade_frontmatter_blocks(&mut tree, &TableRenderer::new());

        assert_eq!(report.skipped, 1);
        assert_eq!(tree.to_html().unwrap(), source);
    }

    #[test]
    fn failure_leaves_placeholder_and_continues() {
        let source = format!(
            "{}{}",
            placeholder("bad: [unterminated"),
            placeholder("{\"ok\": true}")
        );
        let mut tree = HtmlTree::parse(&source);

        let report = upgrade_frontmatter_blocks(&mut tree, &TableRenderer::new());

        assert_eq!(report, UpgradeReport { rendered: 1, skipped: 0, failed: 1 });
        assert_eq!(report.total(), 2);
        assert_eq!(tree.query_class("frontmatter-raw").len(), 1);
        assert_eq!(tree.query_class(FRONTMATTER_CONTAINER_CLASS).len(), 1);
    }

    #[test]
    fn renderer_failure_is_isolated() {
        let failing = |_: &Value| -> Result<String, RenderError> {
            Err(RenderError::Custom("nope".to_string()))
        };
        let source = placeholder("a: 1");
        let mut tree = HtmlTree::parse(&source);

        let report = upgrade_frontmatter_blocks(&mut tree, &failing);

        assert_eq!(report.failed, 1);
        assert_eq!(tree.to_html().unwrap(), source);
    }

    #[test]
    fn second_pass_changes_nothing() {
        let mut tree = HtmlTree::parse(&placeholder("title: Hi"));
        let renderer = TableRenderer::new();

        upgrade_frontmatter_blocks(&mut tree, &renderer);
        let first = tree.to_html().unwrap();
        let report = upgrade_frontmatter_blocks(&mut tree, &renderer);

        assert_eq!(report, UpgradeReport::default());
        assert_eq!(tree.to_html().unwrap(), first);
    }

    #[test]
    fn render_frontmatter_propagates_parse_errors() {
        let result = render_frontmatter("{\"a\": }", &TableRenderer::new());

        assert!(matches!(result, Err(UpgradeError::Parse(ParseError::Json(_)))));
    }

    #[test]
    fn render_frontmatter_wraps_rendering() {
        let renderer = |v: &Value| -> Result<String, RenderError> { Ok(v.to_string()) };

        let html = render_frontmatter("{\"a\": 1}", &renderer).unwrap();

        assert_eq!(html, "<div class=\"frontmatter-container\">{\"a\":1}</div>");
    }
}
