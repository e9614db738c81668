//! JSON to HTML rendering.

use frontmark_md::escape_html;
use serde_json::Value;

/// Errors that can occur when rendering a frontmatter value.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Frontmatter nests deeper than {max_depth} levels")]
    TooDeep { max_depth: usize },

    #[error("{0}")]
    Custom(String),
}

/// Turns a parsed frontmatter value into HTML.
pub trait JsonRenderer {
    fn render(&self, value: &Value) -> Result<String, RenderError>;
}

impl<F> JsonRenderer for F
where
    F: Fn(&Value) -> Result<String, RenderError>,
{
    fn render(&self, value: &Value) -> Result<String, RenderError> {
        self(value)
    }
}

/// Renders mappings as two-column tables and sequences as lists.
///
/// Scalars are wrapped in a `span` whose class names their type, e.g.
/// `frontmatter-string`.
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer {
    max_depth: usize,
}

impl TableRenderer {
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how deep mappings and sequences may nest.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn render_value(
        &self,
        value: &Value,
        depth: usize,
        out: &mut String,
    ) -> Result<(), RenderError> {
        match value {
            Value::Null => out.push_str("<span class=\"frontmatter-null\">null</span>"),
            Value::Bool(b) => scalar(out, "bool", &b.to_string()),
            Value::Number(n) => scalar(out, "number", &n.to_string()),
            Value::String(s) => scalar(out, "string", s),
            Value::Array(items) => {
                self.check_depth(depth)?;
                out.push_str("<ul class=\"frontmatter-list\">");
                for item in items {
                    out.push_str("<li>");
                    self.render_value(item, depth + 1, out)?;
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            Value::Object(map) => {
                self.check_depth(depth)?;
                out.push_str("<table class=\"frontmatter-table\"><tbody>");
                for (key, item) in map {
                    out.push_str("<tr><th>");
                    out.push_str(&escape_html(key));
                    out.push_str("</th><td>");
                    self.render_value(item, depth + 1, out)?;
                    out.push_str("</td></tr>");
                }
                out.push_str("</tbody></table>");
            }
        }

        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<(), RenderError> {
        if depth >= self.max_depth {
            return Err(RenderError::TooDeep {
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonRenderer for TableRenderer {
    fn render(&self, value: &Value) -> Result<String, RenderError> {
        let mut out = String::new();
        self.render_value(value, 0, &mut out)?;
        Ok(out)
    }
}

fn scalar(out: &mut String, kind: &str, text: &str) {
    out.push_str("<span class=\"frontmatter-");
    out.push_str(kind);
    out.push_str("\">");
    out.push_str(&escape_html(text));
    out.push_str("</span>");
}
