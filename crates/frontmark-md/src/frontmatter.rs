//! Frontmatter block extraction.
//!
//! A frontmatter block is only recognized as the very first block of a
//! document:
//!
//! ```text
//! ---
//! title: Button
//! ---
//! ```
//!
//! The block is rendered as a placeholder holding the escaped raw text. The
//! structured rendering happens later, once the document is in a tree.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extension::{BlockExtension, BlockToken, TokenizeContext};

/// CSS class carried by the placeholder element.
pub const FRONTMATTER_RAW_CLASS: &str = "frontmatter-raw";

const DELIMITER: &str = "---";

// First closing delimiter wins; both LF and CRLF line endings are accepted.
static FRONTMATTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---(?:\r?\n|\z)").expect("valid frontmatter regex")
});

/// Block extension claiming a leading `---` delimited block.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontmatterExtension;

impl FrontmatterExtension {
    pub const NAME: &'static str = "frontmatter";

    pub fn new() -> Self {
        Self
    }
}

impl BlockExtension for FrontmatterExtension {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn start(&self, src: &str) -> Option<usize> {
        src.starts_with(DELIMITER).then_some(0)
    }

    fn tokenize(&self, src: &str, cx: &TokenizeContext) -> Option<BlockToken> {
        // Later `---` blocks are body content (rules, setext headings).
        if !cx.at_document_start() {
            return None;
        }

        let caps = FRONTMATTER_RE.captures(src)?;
        let raw = caps.get(0)?.as_str();
        let text = caps.get(1).map_or("", |m| m.as_str());

        tracing::debug!(
            "Extracted frontmatter block ({} bytes, {} lines)",
            raw.len(),
            text.lines().count()
        );

        Some(BlockToken::new(Self::NAME, raw, text))
    }

    fn render(&self, token: &BlockToken) -> String {
        format!(
            "<div class=\"{}\">{}</div>\n",
            FRONTMATTER_RAW_CLASS,
            escape_html(&token.text)
        )
    }
}

/// Escape `&`, `<` and `>` for use as HTML text content.
///
/// `&` is replaced first so entities produced by the other replacements are
/// not escaped twice.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
