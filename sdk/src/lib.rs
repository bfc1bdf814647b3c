//! weave
//!
//! Generate Weaviate class schemas from annotated Go structs.
//!
//! - `generate_schema` / `generate_schema_json` for a whole source directory
//! - The schema model and compiler re-exported for finer control

use std::path::Path;

pub use weave_compiler::{CompilerOptions, WeaveConfig, WeaveError};
pub use weave_schema::{ClassDefinition, ConfigMap, ConfigValue, PropertyDefinition, SchemaDocument};

/// Compile every `+weave` struct in `dir` into a schema document.
pub fn generate_schema(dir: &Path) -> Result<SchemaDocument, WeaveError> {
    weave_compiler::compile_directory(dir)
}

/// Compile `dir` and render the schema as JSON.
pub fn generate_schema_json(dir: &Path, pretty: bool) -> Result<String, WeaveError> {
    let schema = generate_schema(dir)?;
    Ok(schema.to_json(pretty)?)
}

/// Compile `dir` with explicit settings, verifying class names when `output.strict` is set.
pub fn generate_schema_with(dir: &Path, config: &WeaveConfig) -> Result<SchemaDocument, WeaveError> {
    let schema = weave_compiler::compile_directory_with(dir, &config.compiler)?;
    if config.output.strict {
        weave_compiler::verify_schema(&schema)?;
    } else {
        weave_compiler::verifier::warn_duplicates(&schema);
    }
    Ok(schema)
}

pub mod compiler {
    pub use weave_compiler::*;
}

pub mod schema {
    pub use weave_schema::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn json_for_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("user.go"),
            "package app\n\n// +weave\ntype User struct {\n\tEmail string `json:\"email\"`\n}\n",
        )
        .unwrap();

        let json = generate_schema_json(dir.path(), false).unwrap();
        assert_eq!(
            json,
            r#"{"classes":[{"class":"User","vectorIndexType":"hnsw","properties":[{"name":"email","dataType":["text"]}],"vectorizer":"text2vec-contextionary"}]}"#
        );
    }

    #[test]
    fn strict_mode_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.go"), "package app\n\n// +weave\ntype User struct{}\n").unwrap();
        fs::write(dir.path().join("b.go"), "package app\n\n// +weave\ntype User struct{}\n").unwrap();

        let mut config = WeaveConfig::default();
        assert_eq!(generate_schema_with(dir.path(), &config).unwrap().classes.len(), 2);

        config.output.strict = true;
        assert!(matches!(
            generate_schema_with(dir.path(), &config),
            Err(WeaveError::VerifierError(_))
        ));
    }
}
