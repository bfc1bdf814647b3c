//! Directives carried by doc comments and struct tags.
//!
//! Classes opt in with a `// +weave` comment and may add
//! `// +weave:desc: <text>` and `// +weave:config: key=value;key=value`.
//! Fields are configured through the `json` and `weave` struct tags:
//!
//! ```text
//! Tags []string `json:"tags" weave:"indexSearchable=true,tokenization=word"`
//! ```

use std::collections::BTreeMap;
use weave_schema::{ConfigMap, ConfigValue};
use crate::{error::WeaveError, tags, types::TypeDeclaration};

pub const TAG_NAMESPACE: &str = "weave";
pub const NAME_TAG: &str = "json";

pub const INCLUSION_MARKER: &str = "+weave";
pub const DESCRIPTION_MARKER: &str = "+weave:desc:";
pub const CONFIG_MARKER: &str = "+weave:config:";

/// Property name that drops a field from the class.
pub const EXCLUDE_NAME: &str = "-";

pub fn has_marker(doc: &[String]) -> bool {
    doc.iter().any(|line| line.contains(INCLUSION_MARKER))
}

/// Text after the first description marker, trimmed. Empty text counts as absent.
pub fn extract_description(doc: &[String]) -> Option<String> {
    doc.iter()
        .find_map(|line| line.split_once(DESCRIPTION_MARKER))
        .map(|(_, rest)| rest.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Collect `key=value` pairs from every config marker line in `doc`.
pub fn extract_class_config(doc: &[String]) -> ConfigMap {
    let mut config = ConfigMap::new();

    for line in doc {
        let Some((_, rest)) = line.split_once(CONFIG_MARKER) else {
            continue;
        };
        for part in rest.trim().split(';') {
            if part.is_empty() {
                continue;
            }
            if let Some((key, value)) = part.split_once('=') {
                config.insert(key.trim().to_string(), coerce_config_value(value.trim()));
            }
        }
    }

    config
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Finite floats in Go's `ParseFloat` syntax: decimal or `0x` hexadecimal with a
/// `p` exponent, with `_` allowed between digits.
fn parse_number(raw: &str) -> Option<f64> {
    let (sign, body) = match raw.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if body.starts_with(|c: char| c == '+' || c == '-') {
        return None;
    }

    let value = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex) => parse_hex_float(hex)?,
        None => {
            if !underscores_ok(body, false, false) {
                return None;
            }
            body.replace('_', "").parse::<f64>().ok()?
        }
    };
    Some(sign * value).filter(|n| n.is_finite())
}

fn parse_hex_float(digits: &str) -> Option<f64> {
    if !underscores_ok(digits, true, true) {
        return None;
    }
    let digits = digits.replace('_', "");
    let (mantissa, exponent) = digits.split_once(|c: char| c == 'p' || c == 'P')?;
    let exponent: i32 = exponent.parse().ok()?;
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut value = 0f64;
    for c in int_part.chars().chain(frac_part.chars()) {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }
    let shift = i32::try_from(frac_part.len()).ok()?.checked_mul(4)?;
    Some(value * 2f64.powi(exponent.saturating_sub(shift)))
}

/// Every `_` sits between two digits, or between a base prefix and a digit.
fn underscores_ok(text: &str, after_prefix: bool, hex: bool) -> bool {
    let mut prev = if after_prefix { '0' } else { '^' };
    for c in text.chars() {
        if c.is_ascii_digit() || (hex && c.is_ascii_hexdigit()) {
            prev = '0';
        } else if c == '_' {
            if prev != '0' {
                return false;
            }
            prev = '_';
        } else {
            if prev == '_' {
                return false;
            }
            prev = '!';
        }
    }
    prev != '_'
}

fn parse_object(raw: &str) -> Option<ConfigValue> {
    if !(raw.starts_with('{') && raw.ends_with('}')) {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    ConfigValue::try_from(value).ok()
}

/// Coerce a raw config value, trying boolean, then number, then a JSON object,
/// and keeping the raw string when none of them apply.
pub fn coerce_config_value(raw: &str) -> ConfigValue {
    if let Some(b) = parse_bool(raw) {
        ConfigValue::Bool(b)
    } else if let Some(n) = parse_number(raw) {
        ConfigValue::Number(n)
    } else if let Some(object) = parse_object(raw) {
        object
    } else {
        ConfigValue::String(raw.to_string())
    }
}

/// Class-level directives of one declaration, resolved across its two doc sites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMetadata {
    pub included:    bool,
    pub description: Option<String>,
    pub config:      ConfigMap,
}

impl ClassMetadata {
    /// The group doc (on `type`) is consulted first, the spec doc only when the
    /// group doc yields nothing. The two sites are never merged.
    pub fn from_declaration(decl: &TypeDeclaration) -> ClassMetadata {
        let included = has_marker(&decl.group_doc) || has_marker(&decl.spec_doc);
        let description =
            extract_description(&decl.group_doc).or_else(|| extract_description(&decl.spec_doc));

        let mut config = extract_class_config(&decl.group_doc);
        if config.is_empty() {
            config = extract_class_config(&decl.spec_doc);
        }

        ClassMetadata {
            included,
            description,
            config,
        }
    }
}

/// Field directives read from a struct tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTag {
    /// First segment of the `json` tag, when non-empty.
    pub name:             Option<String>,
    pub type_override:    Option<String>,
    pub description:      Option<String>,
    pub tokenization:     Option<String>,
    pub index_filterable: bool,
    pub index_searchable: bool,
    pub index_inverted:   bool,
}

impl FieldTag {
    /// Parse a raw tag literal, quotes included.
    pub fn parse(raw_tag: &str) -> Result<FieldTag, WeaveError> {
        let tag = tags::unquote(raw_tag)?;

        let name = tags::lookup(&tag, NAME_TAG)
            .and_then(|value| value.split(',').next().map(str::to_string))
            .filter(|name| !name.is_empty());

        let mut config = field_config(&tag);
        let flag = |config: &BTreeMap<String, String>, key: &str| {
            config.get(key).map_or(false, |v| v == "true")
        };

        Ok(FieldTag {
            name,
            index_filterable: flag(&config, "indexFilterable"),
            index_searchable: flag(&config, "indexSearchable"),
            index_inverted:   flag(&config, "indexInverted"),
            type_override:    config.remove("type"),
            description:      config.remove("description"),
            tokenization:     config.remove("tokenization"),
        })
    }

    pub fn is_excluded(&self) -> bool {
        self.name.as_deref() == Some(EXCLUDE_NAME)
    }
}

/// `weave:"k=v,k=v"`; segments that are not exactly one `key=value` are skipped.
fn field_config(tag: &str) -> BTreeMap<String, String> {
    let mut config = BTreeMap::new();
    let Some(value) = tags::lookup(tag, TAG_NAMESPACE) else {
        return config;
    };

    for part in value.split(',') {
        let pieces: Vec<&str> = part.split('=').collect();
        if let [key, value] = pieces.as_slice() {
            config.insert(key.to_string(), value.to_string());
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeExpr;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn decl(group_doc: &[&str], spec_doc: &[&str]) -> TypeDeclaration {
        TypeDeclaration {
            package:   "news".into(),
            name:      "Article".into(),
            line:      1,
            column:    1,
            group_doc: doc(group_doc),
            spec_doc:  doc(spec_doc),
            type_:     TypeExpr::Struct(vec![]),
        }
    }

    #[test]
    fn marker_detection() {
        assert!(has_marker(&doc(&["// Article is a story.", "// +weave"])));
        assert!(has_marker(&doc(&["/* +weave */"])));
        assert!(has_marker(&doc(&["// +weave:desc: implies inclusion"])));
        assert!(!has_marker(&doc(&["// weave"])));
        assert!(!has_marker(&[]));
    }

    #[test]
    fn description_uses_first_marker_line() {
        let lines = doc(&["// +weave", "// +weave:desc:   A news article  ", "// +weave:desc: other"]);
        assert_eq!(extract_description(&lines).as_deref(), Some("A news article"));
        assert_eq!(extract_description(&doc(&["// +weave:desc:   "])), None);
        assert_eq!(extract_description(&doc(&["// +weave"])), None);
    }

    #[test]
    fn coercion_order() {
        assert_eq!(coerce_config_value("true"), ConfigValue::Bool(true));
        assert_eq!(coerce_config_value("F"), ConfigValue::Bool(false));
        assert_eq!(coerce_config_value("1"), ConfigValue::Bool(true));
        assert_eq!(coerce_config_value("64"), ConfigValue::Number(64.0));
        assert_eq!(coerce_config_value("-0.25"), ConfigValue::Number(-0.25));
        assert_eq!(coerce_config_value("1e3"), ConfigValue::Number(1000.0));
        assert_eq!(coerce_config_value("NaN"), ConfigValue::String("NaN".into()));
        assert_eq!(coerce_config_value("hnsw"), ConfigValue::String("hnsw".into()));

        let object = coerce_config_value(r#"{"distance":"cosine","ef":64}"#);
        let map = object.as_object().expect("object");
        assert_eq!(map["distance"].as_str(), Some("cosine"));
        assert_eq!(map["ef"].as_f64(), Some(64.0));

        assert_eq!(coerce_config_value("{not json}"), ConfigValue::String("{not json}".into()));
        assert_eq!(coerce_config_value(r#"{"a":null}"#), ConfigValue::String(r#"{"a":null}"#.into()));

        let stopwords = coerce_config_value(r#"{"stopwords":{"additions":["a","the"]}}"#);
        let additions = stopwords.as_object().unwrap()["stopwords"].as_object().unwrap()["additions"]
            .as_array()
            .unwrap();
        assert_eq!(additions, &[ConfigValue::from("a"), ConfigValue::from("the")]);
    }

    #[test]
    fn go_float_syntax() {
        assert_eq!(coerce_config_value("0x1p4"), ConfigValue::Number(16.0));
        assert_eq!(coerce_config_value("0x1.8p1"), ConfigValue::Number(3.0));
        assert_eq!(coerce_config_value("-0x_1p-1"), ConfigValue::Number(-0.5));
        assert_eq!(coerce_config_value("1_000"), ConfigValue::Number(1000.0));
        assert_eq!(coerce_config_value("1_000.5e1_0"), ConfigValue::Number(1000.5e10));

        for raw in ["0x10", "1__0", "_1", "1_", "1_.5", "-+1", "0xp1"] {
            assert_eq!(coerce_config_value(raw), ConfigValue::String(raw.into()), "{}", raw);
        }
    }

    #[test]
    fn class_config_pairs() {
        let lines = doc(&[
            "// +weave",
            r#"// +weave:config: vectorizer=none; vectorIndexConfig={"ef":100};;broken;efConstruction=128"#,
        ]);
        let config = extract_class_config(&lines);
        assert_eq!(config.len(), 3);
        assert_eq!(config["vectorizer"].as_str(), Some("none"));
        assert_eq!(config["vectorIndexConfig"].as_object().unwrap()["ef"].as_f64(), Some(100.0));
        assert_eq!(config["efConstruction"].as_f64(), Some(128.0));
    }

    #[test]
    fn class_metadata_prefers_group_doc() {
        let meta = ClassMetadata::from_declaration(&decl(
            &["// +weave", "// +weave:desc: group", "// +weave:config: vectorizer=a"],
            &["// +weave:desc: spec", "// +weave:config: vectorizer=b;vectorIndexType=flat"],
        ));
        assert!(meta.included);
        assert_eq!(meta.description.as_deref(), Some("group"));
        assert_eq!(meta.config.len(), 1);
        assert_eq!(meta.config["vectorizer"].as_str(), Some("a"));
    }

    #[test]
    fn class_metadata_falls_back_to_spec_doc() {
        let meta = ClassMetadata::from_declaration(&decl(
            &["// Group comment"],
            &["// +weave", "// +weave:desc: spec", "// +weave:config: vectorIndexType=flat"],
        ));
        assert!(meta.included);
        assert_eq!(meta.description.as_deref(), Some("spec"));
        assert_eq!(meta.config["vectorIndexType"].as_str(), Some("flat"));

        let unmarked = ClassMetadata::from_declaration(&decl(&["// plain"], &[]));
        assert!(!unmarked.included);
    }

    #[test]
    fn field_tag_name_and_config() {
        let tag = FieldTag::parse(
            r#"`json:"tags,omitempty" weave:"indexSearchable=true,indexFilterable=yes,tokenization=word,type=text,description=Story tags"`"#,
        )
        .unwrap();
        assert_eq!(tag.name.as_deref(), Some("tags"));
        assert!(tag.index_searchable);
        assert!(!tag.index_filterable);
        assert!(!tag.index_inverted);
        assert_eq!(tag.tokenization.as_deref(), Some("word"));
        assert_eq!(tag.type_override.as_deref(), Some("text"));
        assert_eq!(tag.description.as_deref(), Some("Story tags"));
        assert!(!tag.is_excluded());
    }

    #[test]
    fn field_tag_edge_cases() {
        assert!(FieldTag::parse(r#"`json:"-"`"#).unwrap().is_excluded());
        assert!(FieldTag::parse(r#"`json:"-,omitempty"`"#).unwrap().is_excluded());
        assert_eq!(FieldTag::parse(r#"`json:",omitempty"`"#).unwrap().name, None);

        let tag = FieldTag::parse(r#"`weave:"tags,indexSearchable=true,a=b=c"`"#).unwrap();
        assert_eq!(tag.name, None);
        assert!(tag.index_searchable);

        let err = FieldTag::parse(r#""weave:\"type=text\"\q""#).unwrap_err();
        assert!(matches!(err, WeaveError::TagFormat { .. }));
    }
}
