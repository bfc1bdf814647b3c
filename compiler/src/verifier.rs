use std::collections::HashMap;
use tracing::warn;
use weave_schema::SchemaDocument;
use crate::{error::WeaveError, utils::quote};

/// Class names declared more than once, in order of first appearance.
pub fn duplicate_class_names(schema: &SchemaDocument) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for class in &schema.classes {
        let seen = counts.entry(class.class.as_str()).or_insert(0);
        *seen += 1;
        if *seen == 2 {
            duplicates.push(class.class.clone());
        }
    }
    duplicates
}

/// Returns `Ok(())` if every class name is unique, or `Err(WeaveError::VerifierError(_))` otherwise.
pub fn verify_schema(schema: &SchemaDocument) -> Result<(), WeaveError> {
    match duplicate_class_names(schema).first() {
        Some(name) => {
            let packages: Vec<&str> = schema
                .classes
                .iter()
                .filter(|c| &c.class == name)
                .map(|c| c.package.as_str())
                .collect();
            Err(WeaveError::VerifierError(format!(
                "The class {} is defined twice (packages: {})",
                quote(name),
                packages.join(", ")
            )))
        }
        None => Ok(()),
    }
}

/// Log every duplicated class name without rejecting the document.
pub fn warn_duplicates(schema: &SchemaDocument) {
    for name in duplicate_class_names(schema) {
        warn!(class = %name, "class is defined more than once");
    }
}
