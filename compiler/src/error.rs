use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeaveError>;

#[derive(Debug, Error)]
pub enum WeaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("error parsing file {}: {source}", .path.display())]
    Scan {
        path:   PathBuf,
        #[source]
        source: Box<WeaveError>,
    },

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("error unquoting struct tag {tag}: {msg}")]
    TagFormat {
        tag: String,
        msg: String,
    },

    #[error("error determining data type for field {field}: {source}")]
    Field {
        field:  String,
        #[source]
        source: Box<WeaveError>,
    },

    #[error("error processing struct {class}: {source}")]
    Build {
        class:  String,
        #[source]
        source: Box<WeaveError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Verifier error: {0}")]
    VerifierError(String),
}

impl WeaveError {
    pub(crate) fn scan(path: impl Into<PathBuf>, source: WeaveError) -> WeaveError {
        WeaveError::Scan {
            path:   path.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn field(field: &str, source: WeaveError) -> WeaveError {
        WeaveError::Field {
            field:  field.to_owned(),
            source: Box::new(source),
        }
    }

    pub(crate) fn build(class: &str, source: WeaveError) -> WeaveError {
        WeaveError::Build {
            class:  class.to_owned(),
            source: Box::new(source),
        }
    }
}
