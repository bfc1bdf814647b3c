use tracing::{debug, trace};
use weave_schema::{ClassDefinition, ConfigMap, PropertyDefinition};
use crate::{
    config::CompilerOptions,
    error::WeaveError,
    mapper::map_type,
    metadata::{ClassMetadata, FieldTag},
    types::{FieldDeclaration, TypeDeclaration},
    utils::lower_first,
};

/// Turns marked struct declarations into class definitions.
///
/// Whether a declaration is marked is decided by the caller; the builder
/// compiles whatever it is given.
#[derive(Debug, Clone, Default)]
pub struct ClassBuilder {
    options: CompilerOptions,
}

impl ClassBuilder {
    pub fn new(options: CompilerOptions) -> ClassBuilder {
        ClassBuilder { options }
    }

    pub fn build(&self, decl: &TypeDeclaration) -> Result<ClassDefinition, WeaveError> {
        let fields = decl.fields().ok_or_else(|| {
            WeaveError::build(&decl.name, WeaveError::UnsupportedType(decl.type_.shape()))
        })?;

        let mut class = ClassDefinition::new(&decl.package, &decl.name);
        class.vector_index_type = self.options.vector_index_type.clone();
        class.vectorizer = self.options.vectorizer.clone();

        for field in fields {
            if let Some(property) = build_property(field).map_err(|e| WeaveError::build(&decl.name, e))? {
                class.properties.push(property);
            }
        }

        let meta = ClassMetadata::from_declaration(decl);
        if let Some(description) = meta.description {
            class.description = Some(description);
        }
        apply_class_config(&mut class, &meta.config);

        debug!(
            class = %class.class,
            package = %class.package,
            properties = class.properties.len(),
            "built class"
        );
        Ok(class)
    }
}

/// Build a class with the default options.
pub fn build_class(decl: &TypeDeclaration) -> Result<ClassDefinition, WeaveError> {
    ClassBuilder::default().build(decl)
}

/// `Ok(None)` for fields that do not become properties.
fn build_property(field: &FieldDeclaration) -> Result<Option<PropertyDefinition>, WeaveError> {
    let Some(field_name) = field.name.as_deref() else {
        trace!(line = field.line, "skipping embedded field");
        return Ok(None);
    };
    if !field.exported {
        trace!(field = field_name, "skipping unexported field");
        return Ok(None);
    }

    let tag = match &field.raw_tag {
        Some(raw) => FieldTag::parse(raw)?,
        None => FieldTag::default(),
    };
    if tag.is_excluded() {
        trace!(field = field_name, "skipping excluded field");
        return Ok(None);
    }

    let name = tag.name.clone().unwrap_or_else(|| lower_first(field_name));
    let data_type = match &tag.type_override {
        Some(type_) => vec![type_.clone()],
        None => map_type(&field.type_).map_err(|e| WeaveError::field(field_name, e))?,
    };

    Ok(Some(PropertyDefinition {
        name,
        data_type,
        description:      tag.description.filter(|d| !d.is_empty()),
        tokenization:     tag.tokenization.filter(|t| !t.is_empty()),
        index_filterable: tag.index_filterable,
        index_searchable: tag.index_searchable,
        index_inverted:   tag.index_inverted,
    }))
}

/// Copy recognised keys onto the class. Values of the wrong kind are ignored.
pub fn apply_class_config(class: &mut ClassDefinition, config: &ConfigMap) {
    for (key, value) in config {
        match key.as_str() {
            "vectorIndexType" => {
                if let Some(s) = value.as_str() {
                    class.vector_index_type = s.to_string();
                }
            }
            "vectorizer" => {
                if let Some(s) = value.as_str() {
                    class.vectorizer = s.to_string();
                }
            }
            "vectorIndexConfig" => set_map(&mut class.vector_index_config, value.as_object()),
            "moduleConfig" => set_map(&mut class.module_config, value.as_object()),
            "shardingConfig" => set_map(&mut class.sharding_config, value.as_object()),
            "replicationConfig" => set_map(&mut class.replication_config, value.as_object()),
            "invertedIndexConfig" => set_map(&mut class.inverted_index_config, value.as_object()),
            other => trace!(key = other, "ignoring unknown class config key"),
        }
    }
}

fn set_map(target: &mut ConfigMap, value: Option<&ConfigMap>) {
    if let Some(map) = value {
        *target = map.clone();
    }
}
