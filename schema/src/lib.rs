//! The Weaviate schema document produced by the Weave compiler.
//!
//! A [`SchemaDocument`] is a list of [`ClassDefinition`]s, each holding its
//! [`PropertyDefinition`]s in declaration order. Rendering follows the
//! Weaviate REST shape, leaving out every field that still has its empty value.
//!
//! ```
//! use weave_schema::*;
//!
//! let mut class = ClassDefinition::new("news", "Article");
//! class.properties.push(PropertyDefinition::new("title", vec![DATA_TYPE_TEXT.to_owned()]));
//!
//! let doc = SchemaDocument { classes: vec![class] };
//! assert_eq!(
//!     doc.to_json(false).unwrap(),
//!     r#"{"classes":[{"class":"Article","vectorIndexType":"hnsw","properties":[{"name":"title","dataType":["text"]}],"vectorizer":"text2vec-contextionary"}]}"#
//! );
//! ```

pub mod schema;
pub mod value;

pub use schema::*;
pub use value::*;

pub const DATA_TYPE_TEXT: &str = "text";
pub const DATA_TYPE_INT: &str = "int";
pub const DATA_TYPE_NUMBER: &str = "number";
pub const DATA_TYPE_BOOLEAN: &str = "boolean";
pub const DATA_TYPE_DATE: &str = "date";
pub const DATA_TYPE_UUID: &str = "uuid";
pub const DATA_TYPE_OBJECT: &str = "object";
pub const DATA_TYPE_OBJECT_ARRAY: &str = "object[]";

/// Data types that have a native `[]` array form in Weaviate.
pub const ARRAY_COMPATIBLE_TYPES: [&str; 7] = [
    DATA_TYPE_TEXT,
    DATA_TYPE_BOOLEAN,
    DATA_TYPE_INT,
    DATA_TYPE_NUMBER,
    DATA_TYPE_DATE,
    DATA_TYPE_UUID,
    DATA_TYPE_OBJECT,
];

pub const DEFAULT_VECTOR_INDEX_TYPE: &str = "hnsw";
pub const DEFAULT_VECTORIZER: &str = "text2vec-contextionary";
