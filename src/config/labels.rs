//! Issue label input.
//!
//! Labels arrive either as a JSON array (strings, `{ "name": ... }`
//! objects, or other scalars) or as a comma-separated list. The input is
//! classified once at configuration time and normalized into plain names.

use serde::Deserialize;
use serde_json::Value;

/// One entry of a JSON label array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LabelEntry {
    Name(String),
    Object { name: String },
    Other(Value),
}

impl LabelEntry {
    fn into_name(self) -> String {
        match self {
            LabelEntry::Name(name) | LabelEntry::Object { name } => name,
            LabelEntry::Other(Value::String(s)) => s,
            LabelEntry::Other(other) => other.to_string(),
        }
    }
}

/// Label input after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelSpec {
    Json(Vec<LabelEntry>),
    Csv(Vec<String>),
}

impl LabelSpec {
    /// Classify raw label text. Returns `None` for blank input.
    ///
    /// Text that looks like a JSON array but fails to parse falls back to
    /// comma-separated parsing with a warning.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            match serde_json::from_str::<Vec<LabelEntry>>(trimmed) {
                Ok(entries) => return Some(LabelSpec::Json(entries)),
                Err(e) => {
                    log::warn!(
                        "Could not parse labels input as JSON array, falling back to CSV. Error: {}",
                        e
                    );
                }
            }
        }

        Some(LabelSpec::Csv(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        ))
    }

    /// Build from already-structured values (e.g. a YAML list).
    pub fn from_values(values: Vec<Value>) -> Self {
        LabelSpec::Json(
            values
                .into_iter()
                .map(|v| serde_json::from_value(v.clone()).unwrap_or(LabelEntry::Other(v)))
                .collect(),
        )
    }

    /// Plain label names in input order.
    pub fn into_names(self) -> Vec<String> {
        match self {
            LabelSpec::Json(entries) => entries.into_iter().map(LabelEntry::into_name).collect(),
            LabelSpec::Csv(names) => names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_input() {
        assert_eq!(LabelSpec::parse(""), None);
        assert_eq!(LabelSpec::parse("   "), None);
    }

    #[test]
    fn test_csv_labels() {
        let spec = LabelSpec::parse(" bug, triage ,,needs-info ").unwrap();
        assert!(matches!(spec, LabelSpec::Csv(_)));
        assert_eq!(spec.into_names(), vec!["bug", "triage", "needs-info"]);
    }

    #[test]
    fn test_json_string_labels() {
        let spec = LabelSpec::parse(r#"["bug", "from-sheet"]"#).unwrap();
        assert!(matches!(spec, LabelSpec::Json(_)));
        assert_eq!(spec.into_names(), vec!["bug", "from-sheet"]);
    }

    #[test]
    fn test_json_mixed_labels() {
        let spec = LabelSpec::parse(r#"[{"name": "bug", "color": "f00"}, "p1", 3]"#).unwrap();
        assert_eq!(spec.into_names(), vec!["bug", "p1", "3"]);
    }

    #[test]
    fn test_invalid_json_falls_back_to_csv() {
        let spec = LabelSpec::parse("[bug, p1]").unwrap();
        assert!(matches!(spec, LabelSpec::Csv(_)));
        assert_eq!(spec.into_names(), vec!["[bug", "p1]"]);
    }

    #[test]
    fn test_from_values() {
        let spec = LabelSpec::from_values(vec![json!("a"), json!({"name": "b"}), json!(true)]);
        assert_eq!(spec.into_names(), vec!["a", "b", "true"]);
    }
}
