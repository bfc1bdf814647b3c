use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Class-level configuration blocks (`moduleConfig`, `shardingConfig`, ...).
///
/// Keys are kept sorted so that rendering a document is reproducible.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// One value of a class configuration map.
///
/// This is the JSON data model without `null`: booleans, numbers, strings,
/// arrays and nested objects.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<ConfigValue>),
    Object(ConfigMap),
}

impl ConfigValue {
    /// Returns the inner string, or `None` for other value kinds.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the inner map, or `None` for other value kinds.
    pub fn as_object(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ConfigValue::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ConfigValue::Number(value) => Some(value),
            _ => None,
        }
    }
}

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Bool(value) => serializer.serialize_bool(*value),
            // Integral numbers render as `64`, not `64.0`.
            ConfigValue::Number(value)
                if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER =>
            {
                serializer.serialize_i64(*value as i64)
            }
            ConfigValue::Number(value) => serializer.serialize_f64(*value),
            ConfigValue::String(value) => serializer.serialize_str(value),
            ConfigValue::Array(items) => items.serialize(serializer),
            ConfigValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        ConfigValue::Array(value)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(value: ConfigMap) -> Self {
        ConfigValue::Object(value)
    }
}

/// Error returned when a JSON value holds something a [`ConfigValue`] cannot.
#[derive(Debug, Clone, PartialEq)]
pub struct UnrepresentableValue(pub &'static str);

impl fmt::Display for UnrepresentableValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "JSON {} cannot be used as a config value", self.0)
    }
}

impl std::error::Error for UnrepresentableValue {}

impl TryFrom<serde_json::Value> for ConfigValue {
    type Error = UnrepresentableValue;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Bool(b) => Ok(ConfigValue::Bool(b)),
            Value::Number(n) => n
                .as_f64()
                .map(ConfigValue::Number)
                .ok_or(UnrepresentableValue("number")),
            Value::String(s) => Ok(ConfigValue::String(s)),
            Value::Object(entries) => {
                let mut map = ConfigMap::new();
                for (key, entry) in entries {
                    map.insert(key, ConfigValue::try_from(entry)?);
                }
                Ok(ConfigValue::Object(map))
            }
            Value::Array(items) => items
                .into_iter()
                .map(ConfigValue::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(ConfigValue::Array),
            Value::Null => Err(UnrepresentableValue("null")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integral_numbers_render_without_fraction() {
        let mut map = ConfigMap::new();
        map.insert("efConstruction".into(), ConfigValue::Number(128.0));
        map.insert("distance".into(), ConfigValue::Number(0.5));
        let text = serde_json::to_string(&ConfigValue::Object(map)).unwrap();
        assert_eq!(text, r#"{"distance":0.5,"efConstruction":128}"#);
    }

    #[test]
    fn nested_objects_convert_from_json() {
        let value = ConfigValue::try_from(json!({"a": {"b": true, "c": "x"}})).unwrap();
        let inner = value.as_object().unwrap()["a"].as_object().unwrap();
        assert_eq!(inner["b"], ConfigValue::Bool(true));
        assert_eq!(inner["c"].as_str(), Some("x"));
    }

    #[test]
    fn nested_arrays_convert_and_render() {
        let value = ConfigValue::try_from(json!({"stopwords": {"additions": ["a", "the"], "weights": [1, 2.5]}})).unwrap();
        let stopwords = value.as_object().unwrap()["stopwords"].as_object().unwrap();
        let additions = stopwords["additions"].as_array().unwrap();
        assert_eq!(additions, &[ConfigValue::from("a"), ConfigValue::from("the")]);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"stopwords":{"additions":["a","the"],"weights":[1,2.5]}}"#
        );
    }

    #[test]
    fn null_is_rejected() {
        assert_eq!(
            ConfigValue::try_from(json!(null)),
            Err(UnrepresentableValue("null"))
        );
        assert_eq!(
            ConfigValue::try_from(json!({"a": [1, null]})),
            Err(UnrepresentableValue("null"))
        );
    }
}
