use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use weave_schema::{ClassDefinition, SchemaDocument};
use crate::{
    builder::ClassBuilder,
    config::CompilerOptions,
    error::WeaveError,
    metadata::ClassMetadata,
    parser::parse_source,
    tokenizer::tokenize_source,
    types::{SourceFile, TypeDeclaration},
};

/// Tokenize and parse the text of one Go source file.
pub fn parse_go_source(text: &str) -> Result<SourceFile, WeaveError> {
    let tokens = tokenize_source(text)?;
    parse_source(tokens)
}

/// Source files directly inside `dir` with the given extension, in path order.
pub fn source_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, WeaveError> {
    let metadata = fs::metadata(dir).map_err(|e| WeaveError::scan(dir, e.into()))?;
    if !metadata.is_dir() {
        let err = std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory");
        return Err(WeaveError::scan(dir, err.into()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            WeaveError::scan(path, std::io::Error::from(e).into())
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().map_or(false, |ext| ext == extension) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Read and parse every source file in `dir`, returning all type declarations
/// in file order, then declaration order.
///
/// The first file that cannot be read or parsed aborts the scan.
pub fn scan_directory(dir: &Path, options: &CompilerOptions) -> Result<Vec<TypeDeclaration>, WeaveError> {
    let mut declarations = Vec::new();

    for path in source_files(dir, &options.file_extension)? {
        let text = fs::read_to_string(&path).map_err(|e| WeaveError::scan(&path, e.into()))?;
        let file = parse_go_source(&text).map_err(|e| WeaveError::scan(&path, e))?;
        debug!(
            path = %path.display(),
            package = %file.package,
            declarations = file.declarations.len(),
            "scanned source file"
        );
        declarations.extend(file.declarations);
    }

    Ok(declarations)
}

/// Build a class for every marked struct declaration, failing on the first error.
pub fn compile_declarations(
    declarations: &[TypeDeclaration],
    options: &CompilerOptions,
) -> Result<Vec<ClassDefinition>, WeaveError> {
    let builder = ClassBuilder::new(options.clone());

    declarations
        .iter()
        .filter(|decl| decl.is_record_type() && ClassMetadata::from_declaration(decl).included)
        .map(|decl| builder.build(decl))
        .collect()
}

/// Fold classes into a document, keeping their order and any duplicates.
pub fn assemble(classes: Vec<ClassDefinition>) -> SchemaDocument {
    SchemaDocument { classes }
}

/// Compile every marked struct in `dir` with the default options.
pub fn compile_directory(dir: &Path) -> Result<SchemaDocument, WeaveError> {
    compile_directory_with(dir, &CompilerOptions::default())
}

pub fn compile_directory_with(dir: &Path, options: &CompilerOptions) -> Result<SchemaDocument, WeaveError> {
    let declarations = scan_directory(dir, options)?;
    let classes = compile_declarations(&declarations, options)?;
    debug!(dir = %dir.display(), classes = classes.len(), "compiled schema");
    Ok(assemble(classes))
}

/// Compile a single source text, as if it were the only file in a directory.
pub fn compile_source(text: &str, options: &CompilerOptions) -> Result<SchemaDocument, WeaveError> {
    let file = parse_go_source(text)?;
    let classes = compile_declarations(&file.declarations, options)?;
    Ok(assemble(classes))
}
