//! Standalone page shell.

use minijinja::{context, Environment};

/// Wraps rendered document HTML in a complete page.
pub struct PageShell {
    env: Environment<'static>,
}

impl PageShell {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("page.html", PAGE_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, title: &str, content: &str) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("page.html")?;

        tmpl.render(context! {
            title => title,
            content => content,
        })
    }
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <style>
    .frontmatter-raw { white-space: pre-wrap; font-family: monospace; }
    .frontmatter-container { margin-bottom: 2rem; }
    .frontmatter-table { border-collapse: collapse; }
    .frontmatter-table th, .frontmatter-table td {
      border: 1px solid #ddd; padding: 0.25rem 0.5rem; text-align: left; vertical-align: top;
    }
    .frontmatter-list { margin: 0; padding-left: 1.25rem; }
    .frontmatter-null { color: #888; }
  </style>
</head>
<body>
  <article>
{{ content | safe }}
  </article>
</body>
</html>
"##;
