use crate::{value::ConfigMap, DEFAULT_VECTORIZER, DEFAULT_VECTOR_INDEX_TYPE};
use serde::Serialize;

/// Root artifact: every class compiled from one source directory, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaDocument {
    pub classes: Vec<ClassDefinition>,
}

impl SchemaDocument {
    /// Render the document as JSON, indented by two spaces when `pretty` is set.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassDefinition> {
        self.classes.iter().find(|c| c.class == name)
    }
}

/// One Weaviate class, built from one marked struct declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    /// Go package the struct was declared in. Not part of the rendered schema.
    #[serde(skip)]
    pub package: String,

    pub class: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub vector_index_type: String,

    #[serde(skip_serializing_if = "ConfigMap::is_empty")]
    pub vector_index_config: ConfigMap,

    pub properties: Vec<PropertyDefinition>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub vectorizer: String,

    #[serde(skip_serializing_if = "ConfigMap::is_empty")]
    pub module_config: ConfigMap,

    #[serde(skip_serializing_if = "ConfigMap::is_empty")]
    pub sharding_config: ConfigMap,

    #[serde(skip_serializing_if = "ConfigMap::is_empty")]
    pub replication_config: ConfigMap,

    #[serde(skip_serializing_if = "ConfigMap::is_empty")]
    pub inverted_index_config: ConfigMap,
}

impl ClassDefinition {
    /// A class with no properties and the store defaults for index type and vectorizer.
    pub fn new(package: &str, class: &str) -> ClassDefinition {
        ClassDefinition {
            package: package.to_owned(),
            class: class.to_owned(),
            description: None,
            vector_index_type: DEFAULT_VECTOR_INDEX_TYPE.to_owned(),
            vector_index_config: ConfigMap::new(),
            properties: Vec::new(),
            vectorizer: DEFAULT_VECTORIZER.to_owned(),
            module_config: ConfigMap::new(),
            sharding_config: ConfigMap::new(),
            replication_config: ConfigMap::new(),
            inverted_index_config: ConfigMap::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One property of a class.
///
/// `data_type` holds a single token, except for references to other classes,
/// where it lists the referenced class names directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    pub name: String,

    pub data_type: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenization: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub index_filterable: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub index_searchable: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub index_inverted: bool,
}

impl PropertyDefinition {
    pub fn new(name: &str, data_type: Vec<String>) -> PropertyDefinition {
        PropertyDefinition {
            name: name.to_owned(),
            data_type,
            ..PropertyDefinition::default()
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
