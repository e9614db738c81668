//! Frontmatter payload parsing.

use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

/// Syntax a frontmatter payload is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    Json,
    Yaml,
}

impl FrontmatterFormat {
    /// Pick the format for a raw payload.
    ///
    /// A payload whose trimmed text starts with `{` is JSON; everything else
    /// is YAML. YAML flow mappings starting with `{` therefore go to the JSON
    /// parser.
    pub fn detect(raw: &str) -> Self {
        if raw.trim().starts_with('{') {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid JSON in frontmatter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML in frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parse raw frontmatter text into a JSON value.
pub fn parse_frontmatter(raw: &str) -> Result<Value, ParseError> {
    let trimmed = raw.trim();

    match FrontmatterFormat::detect(trimmed) {
        FrontmatterFormat::Json => Ok(serde_json::from_str(trimmed)?),
        FrontmatterFormat::Yaml if trimmed.is_empty() => Ok(Value::Null),
        FrontmatterFormat::Yaml => {
            let yaml: YamlValue = serde_yaml::from_str(trimmed)?;
            Ok(yaml_to_json(yaml))
        }
    }
}

fn yaml_to_json(value: YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                // NaN and infinities have no JSON form
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

/// Render a YAML mapping key as a JSON object key.
fn yaml_key(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Null => "null".to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Number(n) => n.to_string(),
        other => serde_json::to_string(&yaml_to_json(other)).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn detects_format_by_leading_brace() {
        assert_eq!(FrontmatterFormat::detect("  {\"a\": 1}"), FrontmatterFormat::Json);
        assert_eq!(FrontmatterFormat::detect("title: Hi"), FrontmatterFormat::Yaml);
        assert_eq!(FrontmatterFormat::detect("[1, 2]"), FrontmatterFormat::Yaml);
    }

    #[test]
    fn parses_json_object() {
        let value = parse_frontmatter("{\"a\": 1}").unwrap();

        assert_eq!(value, json!({ "a": 1 }));
    }

    #[test]
    fn parses_yaml_mapping() {
        let value = parse_frontmatter("title: Hi\ntags:\n  - a\n  - b\ndraft: false\n").unwrap();

        assert_eq!(
            value,
            json!({ "title": "Hi", "tags": ["a", "b"], "draft": false })
        );
    }

    #[test]
    fn preserves_key_order() {
        let value = parse_frontmatter("zeta: 1\nalpha: 2\nmid: 3").unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let value = parse_frontmatter("\n\n   {\"a\": [1, 2]}   \n").unwrap();

        assert_eq!(value, json!({ "a": [1, 2] }));
    }

    #[test]
    fn stringifies_non_string_keys() {
        let value = parse_frontmatter("1: one\ntrue: yes\n").unwrap();

        assert_eq!(value, json!({ "1": "one", "true": "yes" }));
    }

    #[test]
    fn yaml_floats_and_tags() {
        let value = parse_frontmatter("ratio: 0.5\nbad: .nan\nwhen: !date 2024-01-01").unwrap();

        assert_eq!(
            value,
            json!({ "ratio": 0.5, "bad": null, "when": "2024-01-01" })
        );
    }

    #[test]
    fn empty_yaml_is_null() {
        assert_eq!(parse_frontmatter("   \n").unwrap(), Value::Null);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result = parse_frontmatter("{\"a\": }");

        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = parse_frontmatter("bad: [unterminated");

        assert!(matches!(result, Err(ParseError::Yaml(_))));
    }

    #[test]
    fn yaml_flow_mapping_goes_to_json_parser() {
        assert!(matches!(
            parse_frontmatter("{a: 1}"),
            Err(ParseError::Json(_))
        ));
        assert_eq!(
            parse_frontmatter("{\"a\": 1}").unwrap(),
            json!({ "a": 1 })
        );
    }
}
