//! Markdown pipeline with frontmatter extraction.
//!
//! This crate hosts `pulldown-cmark` behind a small block-extension protocol,
//! claims a leading YAML/JSON frontmatter block before the markdown parser
//! sees it, and parses the extracted text into a JSON value.

pub mod dispatch;
pub mod extension;
pub mod frontmatter;
pub mod pipeline;

pub use dispatch::{parse_frontmatter, FrontmatterFormat, ParseError};
pub use extension::{BlockExtension, BlockToken, TokenizeContext};
pub use frontmatter::{escape_html, FrontmatterExtension, FRONTMATTER_RAW_CLASS};
pub use pipeline::{MarkdownPipeline, PipelineOptions, Token};
