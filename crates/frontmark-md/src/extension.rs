//! Block extension protocol for the markdown pipeline.

/// A block recognized by an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockToken {
    /// Name of the extension that produced this token
    pub kind: &'static str,

    /// Exact consumed source, used to advance the cursor
    pub raw: String,

    /// Inner content of the block
    pub text: String,
}

impl BlockToken {
    /// Create a new block token.
    pub fn new(kind: &'static str, raw: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
            text: text.into(),
        }
    }
}

/// What an extension may know about the pipeline state at the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizeContext {
    preceding_tokens: usize,
}

impl TokenizeContext {
    /// Context for a cursor preceded by `preceding_tokens` tokens.
    pub fn new(preceding_tokens: usize) -> Self {
        Self { preceding_tokens }
    }

    /// Whether the cursor sits at the start of the document.
    pub fn at_document_start(&self) -> bool {
        self.preceding_tokens == 0
    }
}

/// A block-level rule plugged into [`MarkdownPipeline`](crate::MarkdownPipeline).
///
/// Extensions are tried in registration order at the cursor before the
/// remaining source is handed to the markdown parser.
pub trait BlockExtension: Send + Sync {
    /// Name used to dispatch tokens back to this extension's renderer.
    fn name(&self) -> &'static str;

    /// Offset in `src` where a block of this kind could begin.
    ///
    /// This is a cheap pre-filter; `None` means no opinion.
    fn start(&self, src: &str) -> Option<usize>;

    /// Authoritative match at the start of `src`.
    fn tokenize(&self, src: &str, cx: &TokenizeContext) -> Option<BlockToken>;

    /// Render a token produced by [`tokenize`](Self::tokenize) to HTML.
    fn render(&self, token: &BlockToken) -> String;
}
