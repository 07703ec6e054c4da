use std::collections::BTreeMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FRAGMENT_RESULT_KEY: &str = "tgAuthResult";

/// Flat key/value payload sent back by the Telegram login widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetAuthPayload(BTreeMap<String, String>);

impl WidgetAuthPayload {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Parses a redirect query string such as `id=1&first_name=A&auth_date=..&hash=..`.
    pub fn from_query(raw: &str) -> Result<Self, PayloadError> {
        let raw = raw.trim_start_matches('?');
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
            .map_err(|err| PayloadError::Malformed(err.to_string()))?;
        if pairs.is_empty() {
            return Err(PayloadError::Empty);
        }
        Ok(Self::from_pairs(pairs))
    }

    /// Parses the `#tgAuthResult=<base64 JSON>` fragment of Telegram's OAuth
    /// redirect. A fragment holding plain key/value pairs is accepted as well.
    pub fn from_fragment(raw: &str) -> Result<Self, PayloadError> {
        let raw = raw.trim_start_matches('#');
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
            .map_err(|err| PayloadError::Malformed(err.to_string()))?;

        let encoded = pairs
            .iter()
            .find(|(key, _)| key == FRAGMENT_RESULT_KEY)
            .map(|(_, value)| value.clone());
        let Some(encoded) = encoded else {
            if pairs.is_empty() {
                return Err(PayloadError::Empty);
            }
            return Ok(Self::from_pairs(pairs));
        };

        let normalized: String = encoded
            .trim()
            .trim_end_matches('=')
            .chars()
            .map(|ch| match ch {
                // form decoding turns an unescaped '+' into a space
                '+' | ' ' => '-',
                '/' => '_',
                other => other,
            })
            .collect();
        let decoded = URL_SAFE_NO_PAD
            .decode(normalized.as_bytes())
            .map_err(|err| PayloadError::Malformed(format!("invalid base64: {err}")))?;
        let value: Value = serde_json::from_slice(&decoded)
            .map_err(|err| PayloadError::Malformed(format!("invalid json: {err}")))?;
        Self::from_json(&value)
    }

    /// Flattens a widget JSON object; numbers and booleans are stringified as
    /// Telegram does when it signs the payload.
    pub fn from_json(value: &Value) -> Result<Self, PayloadError> {
        let Value::Object(object) = value else {
            return Err(PayloadError::Malformed("expected a JSON object".to_string()));
        };

        let mut fields = BTreeMap::new();
        for (key, value) in object {
            let rendered = match value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null => continue,
                Value::Array(_) | Value::Object(_) => {
                    return Err(PayloadError::Malformed(format!(
                        "field {key} must be a scalar"
                    )))
                }
            };
            fields.insert(key.clone(), rendered);
        }

        if fields.is_empty() {
            return Err(PayloadError::Empty);
        }
        Ok(Self(fields))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn hash(&self) -> Option<&str> {
        self.get("hash")
    }

    /// Every field except `hash`, sorted by key, joined as `key=value` lines.
    pub fn data_check_string(&self) -> String {
        self.0
            .iter()
            .filter(|(key, _)| key.as_str() != "hash")
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("login payload is empty")]
    Empty,
    #[error("malformed login payload: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    #[test]
    fn data_check_string_sorts_and_skips_hash() {
        let payload = WidgetAuthPayload::from_pairs([
            ("username", "aziz"),
            ("hash", "abc"),
            ("auth_date", "1700000000"),
            ("id", "555"),
        ]);

        assert_eq!(
            payload.data_check_string(),
            "auth_date=1700000000\nid=555\nusername=aziz"
        );
    }

    #[test]
    fn parses_query_string_with_percent_encoding() {
        let payload =
            WidgetAuthPayload::from_query("?id=555&first_name=Aziz%20K&auth_date=1&hash=ff")
                .expect("query parses");
        assert_eq!(payload.get("first_name"), Some("Aziz K"));
        assert_eq!(payload.hash(), Some("ff"));
    }

    #[test]
    fn parses_tg_auth_result_fragment() {
        let json = r#"{"id":555,"first_name":"Aziz","auth_date":1700000000,"hash":"ff"}"#;
        let fragment = format!("#tgAuthResult={}", STANDARD.encode(json));

        let payload = WidgetAuthPayload::from_fragment(&fragment).expect("fragment parses");
        assert_eq!(payload.get("id"), Some("555"));
        assert_eq!(payload.get("auth_date"), Some("1700000000"));
        assert_eq!(payload.get("first_name"), Some("Aziz"));
    }

    #[test]
    fn rejects_nested_json_values() {
        let value = serde_json::json!({ "id": 1, "extra": { "nested": true } });
        assert!(matches!(
            WidgetAuthPayload::from_json(&value),
            Err(PayloadError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_empty_query() {
        assert_eq!(WidgetAuthPayload::from_query(""), Err(PayloadError::Empty));
    }
}
