//! weave-compiler
//!
//! This crate implements:
//!  1) A tokenizer + parser for the type declarations of Go source files,
//!  2) Doc-comment and struct-tag directive extraction (`+weave`, `weave:"..."`),
//!  3) Mapping of Go type expressions to Weaviate data types,
//!  4) Class building and schema assembly (`compile_directory` → `SchemaDocument`),
//!  5) An opt-in verifier for duplicate class names,
//!  6) Error types (`WeaveError`) and run configuration (`WeaveConfig`).

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod tags;
pub mod metadata;
pub mod mapper;
pub mod builder;
pub mod verifier;
pub mod compiler;
pub mod config;

pub use builder::{build_class, ClassBuilder};
pub use compiler::{
    assemble, compile_declarations, compile_directory, compile_directory_with, compile_source,
    parse_go_source, scan_directory,
};
pub use config::{CompilerOptions, WeaveConfig};
pub use error::{Result, WeaveError};
pub use mapper::map_type;
pub use verifier::verify_schema;
