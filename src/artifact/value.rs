//! Tagged-variant configuration value tree.
//!
//! Runtime configuration documents are nested JSON, but the harness never
//! traverses them dynamically: parsed documents become a [`ConfigValue`]
//! tree, and path lookup returns an explicit found / missing / wrong-shape
//! result instead of panicking or defaulting on absence.

use std::collections::BTreeMap;

/// A value in a parsed configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// JSON null
    Null,
    /// Boolean leaf
    Bool(bool),
    /// Numeric leaf (JSON numbers are lossy-converted to f64)
    Number(f64),
    /// String leaf
    String(String),
    /// Ordered array
    Array(Vec<ConfigValue>),
    /// Nested mapping, keyed by string
    Object(BTreeMap<String, ConfigValue>),
}

/// Result of navigating a segment path through a [`ConfigValue`] tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PathLookup<'a> {
    /// Every segment resolved; the value at the end of the path
    Found(&'a ConfigValue),
    /// A segment was absent from its enclosing object
    Missing { segment: String },
    /// Traversal reached a non-object value before the path was exhausted
    NotAnObject { segment: String },
}

impl ConfigValue {
    /// Navigate a path of key segments through nested objects.
    ///
    /// Segments are taken literally: a key like
    /// `Microsoft.AspNetCore.EnsureJsonTrimmability` is ONE segment even
    /// though it contains dots. An empty path yields the value itself.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> PathLookup<'_> {
        let mut current = self;
        for segment in path {
            let segment = segment.as_ref();
            match current {
                ConfigValue::Object(map) => match map.get(segment) {
                    Some(next) => current = next,
                    None => return PathLookup::Missing { segment: segment.to_string() },
                },
                _ => return PathLookup::NotAnObject { segment: segment.to_string() },
            }
        }
        PathLookup::Found(current)
    }

    /// Short type name used in diagnostics ("boolean", "object", ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Number(_) => "number",
            ConfigValue::String(_) => "string",
            ConfigValue::Array(_) => "array",
            ConfigValue::Object(_) => "object",
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::String(s) => write!(f, "\"{}\"", s),
            ConfigValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ConfigValue::Object(map) => write!(f, "{{{} entries}}", map.len()),
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ConfigValue::Null,
            serde_json::Value::Bool(b) => ConfigValue::Bool(b),
            serde_json::Value::Number(n) => ConfigValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => ConfigValue::String(s),
            serde_json::Value::Array(items) => {
                ConfigValue::Array(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_json::Value::Object(map) => ConfigValue::Object(
                map.into_iter().map(|(k, v)| (k, ConfigValue::from(v))).collect(),
            ),
        }
    }
}

/// Split a dotted path string into segments.
///
/// Convenience for paths whose keys contain no literal dots; the scenario
/// matrix builds its paths from explicit segment vectors instead.
pub fn parse_path(dotted: &str) -> Vec<String> {
    dotted.split('.').filter(|s| !s.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConfigValue {
        let json: serde_json::Value = serde_json::from_str(
            r#"{
                "runtimeOptions": {
                    "tfm": "net8.0",
                    "configProperties": {
                        "Microsoft.AspNetCore.EnsureJsonTrimmability": true,
                        "System.GC.Server": false,
                        "Depth": 3
                    }
                }
            }"#,
        )
        .unwrap();
        ConfigValue::from(json)
    }

    #[test]
    fn test_lookup_found_bool() {
        let doc = sample();
        let path = ["runtimeOptions", "configProperties", "Microsoft.AspNetCore.EnsureJsonTrimmability"];
        assert_eq!(doc.lookup(&path), PathLookup::Found(&ConfigValue::Bool(true)));
    }

    #[test]
    fn test_lookup_missing_names_first_absent_segment() {
        let doc = sample();
        let path = ["runtimeOptions", "missingGroup", "leaf"];
        assert_eq!(
            doc.lookup(&path),
            PathLookup::Missing { segment: "missingGroup".to_string() }
        );
    }

    #[test]
    fn test_lookup_through_leaf_reports_not_an_object() {
        let doc = sample();
        let path = ["runtimeOptions", "tfm", "deeper"];
        assert_eq!(doc.lookup(&path), PathLookup::NotAnObject { segment: "deeper".to_string() });
    }

    #[test]
    fn test_lookup_empty_path_is_identity() {
        let doc = sample();
        assert_eq!(doc.lookup::<&str>(&[]), PathLookup::Found(&doc));
    }

    #[test]
    fn test_dotted_key_is_single_segment() {
        let doc = sample();
        // Splitting the dotted key would descend into nonexistent objects.
        let split = parse_path("runtimeOptions.configProperties.Microsoft.AspNetCore.EnsureJsonTrimmability");
        assert!(matches!(doc.lookup(&split), PathLookup::Missing { .. }));
    }

    #[test]
    fn test_number_conversion() {
        let doc = sample();
        let path = ["runtimeOptions", "configProperties", "Depth"];
        assert_eq!(doc.lookup(&path), PathLookup::Found(&ConfigValue::Number(3.0)));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(ConfigValue::Bool(true).type_name(), "boolean");
        assert_eq!(ConfigValue::String("x".to_string()).type_name(), "string");
        assert_eq!(ConfigValue::Object(BTreeMap::new()).type_name(), "object");
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(parse_path("a.b.c"), vec!["a", "b", "c"]);
        assert_eq!(parse_path(""), Vec::<String>::new());
    }
}
