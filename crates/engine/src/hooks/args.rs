//! Hook arguments forwarded to commands

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One positional argument passed along with a hook firing
///
/// Text is forwarded as-is. Anything structured (objects, arrays, numbers,
/// the resolved build configuration) is forwarded as compact JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookArg {
    /// Plain string argument
    Text(String),
    /// Structured value, encoded as JSON
    Structured(Value),
}

impl HookArg {
    /// Encode the argument as a single command-line token
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }

    /// Interpret a raw command-line value
    ///
    /// JSON objects and arrays become [`HookArg::Structured`]; everything else,
    /// including bare numbers, stays text since it is forwarded unchanged.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        if (trimmed.starts_with('{') || trimmed.starts_with('['))
            && let Ok(value) = serde_json::from_str::<Value>(raw)
        {
            return Self::Structured(value);
        }
        Self::Text(raw.to_string())
    }
}

impl fmt::Display for HookArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<&str> for HookArg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for HookArg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for HookArg {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_passes_through() {
        let arg = HookArg::from("hello world \"quoted\"");
        assert_eq!(arg.encode(), "hello world \"quoted\"");
    }

    #[test]
    fn test_structured_is_compact_json() {
        let arg = HookArg::from(json!({ "build": { "outDir": "dist", "minify": false } }));
        let encoded = arg.encode();

        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('\n'));
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, json!({ "build": { "outDir": "dist", "minify": false } }));
    }

    #[test]
    fn test_non_string_scalars_are_json() {
        assert_eq!(HookArg::from(json!(42)).encode(), "42");
        assert_eq!(HookArg::from(json!(true)).encode(), "true");
        assert_eq!(HookArg::from(json!(null)).encode(), "null");
        assert_eq!(HookArg::from(json!([1, "a"])).encode(), r#"[1,"a"]"#);
    }

    #[test]
    fn test_json_string_value_becomes_text() {
        let arg = HookArg::from(json!("chunk.js"));
        assert_eq!(arg, HookArg::Text("chunk.js".to_string()));
        assert_eq!(arg.encode(), "chunk.js");
    }

    #[test]
    fn test_parse_cli_values() {
        assert_eq!(
            HookArg::parse(r#"{"a": 1}"#),
            HookArg::Structured(json!({ "a": 1 }))
        );
        assert_eq!(HookArg::parse("[1,2]"), HookArg::Structured(json!([1, 2])));
        assert_eq!(HookArg::parse("42"), HookArg::Text("42".to_string()));
        assert_eq!(HookArg::parse("{not json"), HookArg::Text("{not json".to_string()));
        assert_eq!(HookArg::parse("plain"), HookArg::Text("plain".to_string()));
    }

    #[test]
    fn test_display_matches_encode() {
        let arg = HookArg::from(json!({ "k": [1] }));
        assert_eq!(arg.to_string(), arg.encode());
    }
}
