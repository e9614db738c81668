//! Markdown document pipeline.

use pulldown_cmark::{html, Options, Parser};

use crate::extension::{BlockExtension, BlockToken, TokenizeContext};
use crate::frontmatter::FrontmatterExtension;

/// A token produced by the pipeline's forward pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A block claimed by an extension
    Block(BlockToken),

    /// Markdown source handed to pulldown-cmark
    Markdown(String),
}

/// Markdown syntax extensions enabled on the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
        }
    }
}

impl PipelineOptions {
    /// The pulldown-cmark options these settings map to.
    pub fn to_cmark(self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options
    }
}

/// Markdown pipeline with block extensions in front of pulldown-cmark.
///
/// At the cursor, registered extensions are tried in registration order.
/// Once none of them claims the cursor, the remaining source is parsed by
/// pulldown-cmark in one piece, so markdown constructs are never split
/// across parser runs.
pub struct MarkdownPipeline {
    extensions: Vec<Box<dyn BlockExtension>>,
    options: PipelineOptions,
}

impl MarkdownPipeline {
    /// Create a pipeline without extensions.
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            extensions: Vec::new(),
            options,
        }
    }

    /// Create a pipeline with the frontmatter extension registered.
    pub fn with_frontmatter(options: PipelineOptions) -> Self {
        let mut pipeline = Self::new(options);
        pipeline.register(FrontmatterExtension::new());
        pipeline
    }

    /// Register an extension after the already registered ones.
    pub fn register<E: BlockExtension + 'static>(&mut self, extension: E) -> &mut Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Names of the registered extensions, in priority order.
    pub fn extension_names(&self) -> Vec<&'static str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    /// Split a document into tokens.
    pub fn tokenize(&self, source: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut cursor = 0;

        while cursor < source.len() {
            let rest = &source[cursor..];

            if let Some(token) = self.claim(rest, &TokenizeContext::new(tokens.len())) {
                cursor += token.raw.len();
                tokens.push(Token::Block(token));
                continue;
            }

            tokens.push(Token::Markdown(rest.to_string()));
            break;
        }

        tokens
    }

    /// Offer the cursor to each extension whose pre-filter accepts it.
    fn claim(&self, rest: &str, cx: &TokenizeContext) -> Option<BlockToken> {
        self.extensions
            .iter()
            .filter(|ext| ext.start(rest) == Some(0))
            .find_map(|ext| ext.tokenize(rest, cx))
            // An empty match would never advance the cursor.
            .filter(|token| !token.raw.is_empty() && rest.starts_with(token.raw.as_str()))
    }

    /// Render tokens to HTML.
    pub fn render(&self, tokens: &[Token]) -> String {
        let mut html_output = String::new();

        for token in tokens {
            match token {
                Token::Markdown(content) => {
                    let parser = Parser::new_ext(content, self.options.to_cmark());
                    html::push_html(&mut html_output, parser);
                }
                Token::Block(block) => {
                    match self.extensions.iter().find(|ext| ext.name() == block.kind) {
                        Some(ext) => html_output.push_str(&ext.render(block)),
                        None => {
                            tracing::warn!("No renderer registered for block '{}'", block.kind)
                        }
                    }
                }
            }
        }

        html_output
    }

    /// Tokenize and render a document.
    pub fn to_html(&self, source: &str) -> String {
        self.render(&self.tokenize(source))
    }
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::with_frontmatter(PipelineOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain_html(source: &str) -> String {
        let mut out = String::new();
        html::push_html(
            &mut out,
            Parser::new_ext(source, PipelineOptions::default().to_cmark()),
        );
        out
    }

    fn frontmatter_tokens(tokens: &[Token]) -> usize {
        tokens
            .iter()
            .filter(|t| matches!(t, Token::Block(b) if b.kind == "frontmatter"))
            .count()
    }

    #[test]
    fn extracts_leading_frontmatter() {
        let pipeline = MarkdownPipeline::default();

        let tokens = pipeline.tokenize("---\ntitle: Hi\n---\n# Body");

        assert_eq!(
            tokens,
            vec![
                Token::Block(BlockToken::new("frontmatter", "---\ntitle: Hi\n---\n", "title: Hi")),
                Token::Markdown("# Body".to_string()),
            ]
        );
    }

    #[test]
    fn renders_placeholder_then_body() {
        let html = MarkdownPipeline::default().to_html("---\ntitle: Hi\n---\n# Body");

        assert_eq!(
            html,
            "<div class=\"frontmatter-raw\">title: Hi</div>\n<h1>Body</h1>\n"
        );
    }

    #[test]
    fn frontmatter_only_document() {
        let pipeline = MarkdownPipeline::default();

        let tokens = pipeline.tokenize("---\n{\"a\": 1}\n---\n");

        assert_eq!(tokens.len(), 1);
        assert_eq!(frontmatter_tokens(&tokens), 1);
    }

    #[test]
    fn documents_without_delimiter_render_like_plain_markdown() {
        let pipeline = MarkdownPipeline::default();
        let docs = [
            "Some text\n---\nnot frontmatter\n---",
            "# Title\n\n---\n\nAfter a rule",
            "",
            "  ---\nindented\n---\n",
            "| a | b |\n|---|---|\n| 1 | 2 |\n",
        ];

        for doc in docs {
            let tokens = pipeline.tokenize(doc);
            assert_eq!(frontmatter_tokens(&tokens), 0, "doc: {doc:?}");
            assert_eq!(pipeline.to_html(doc), plain_html(doc), "doc: {doc:?}");
        }
    }

    #[test]
    fn unclosed_block_falls_through_to_markdown() {
        let pipeline = MarkdownPipeline::default();
        let doc = "---\ntitle: Test\n# No closing";

        let tokens = pipeline.tokenize(doc);

        assert_eq!(tokens, vec![Token::Markdown(doc.to_string())]);
        assert_eq!(pipeline.to_html(doc), plain_html(doc));
    }

    #[test]
    fn trailing_space_on_closing_delimiter_leaves_body_text() {
        let pipeline = MarkdownPipeline::default();
        let doc = "---\na: 1\n---   \nbody";

        let tokens = pipeline.tokenize(doc);

        assert_eq!(tokens, vec![Token::Markdown(doc.to_string())]);
    }

    #[test]
    fn second_block_is_body_content() {
        let pipeline = MarkdownPipeline::default();
        let doc = "---\na: 1\n---\n---\nb: 2\n---\n";

        let tokens = pipeline.tokenize(doc);

        assert_eq!(frontmatter_tokens(&tokens), 1);
        assert_eq!(tokens[1], Token::Markdown("---\nb: 2\n---\n".to_string()));
        assert!(!pipeline.render(&tokens[1..]).contains("frontmatter-raw"));
    }

    #[test]
    fn pipeline_without_extensions_is_plain_markdown() {
        let pipeline = MarkdownPipeline::new(PipelineOptions::default());
        let doc = "---\ntitle: Hi\n---\n# Body";

        assert!(pipeline.extension_names().is_empty());
        assert_eq!(pipeline.to_html(doc), plain_html(doc));
    }

    #[test]
    fn extensions_are_tried_in_registration_order() {
        struct Banner;

        impl BlockExtension for Banner {
            fn name(&self) -> &'static str {
                "banner"
            }
            fn start(&self, src: &str) -> Option<usize> {
                src.starts_with("---").then_some(0)
            }
            fn tokenize(&self, src: &str, _cx: &TokenizeContext) -> Option<BlockToken> {
                let line = src.split_inclusive('\n').next()?;
                Some(BlockToken::new("banner", line, line.trim()))
            }
            fn render(&self, token: &BlockToken) -> String {
                format!("<hr class=\"{}\">\n", token.text)
            }
        }

        let mut pipeline = MarkdownPipeline::new(PipelineOptions::default());
        pipeline.register(Banner).register(FrontmatterExtension);

        assert_eq!(pipeline.extension_names(), vec!["banner", "frontmatter"]);

        let tokens = pipeline.tokenize("---\ntitle: Hi\n---\n");
        assert!(matches!(&tokens[0], Token::Block(b) if b.kind == "banner"));
        assert_eq!(frontmatter_tokens(&tokens), 0);
    }

    #[test]
    fn options_map_to_cmark() {
        let options = PipelineOptions {
            tables: false,
            ..Default::default()
        };

        let cmark = options.to_cmark();

        assert!(!cmark.contains(Options::ENABLE_TABLES));
        assert!(cmark.contains(Options::ENABLE_FOOTNOTES));
    }
}
