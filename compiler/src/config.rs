//! Settings for a compilation run, optionally read from a `weave.toml`:
//!
//! ```toml
//! [compiler]
//! vector_index_type = "hnsw"
//! vectorizer = "text2vec-contextionary"
//! file_extension = "go"
//!
//! [output]
//! pretty = true
//! strict = false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use weave_schema::{DEFAULT_VECTORIZER, DEFAULT_VECTOR_INDEX_TYPE};
use crate::error::WeaveError;

pub const DEFAULT_CONFIG_FILE: &str = "weave.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaveConfig {
    #[serde(default)]
    pub compiler: CompilerOptions,

    #[serde(default)]
    pub output: OutputOptions,
}

/// Defaults applied to every class, and which files a scan picks up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    pub vector_index_type: String,
    pub vectorizer:        String,
    /// Extension of the source files read from the input directory, without the dot.
    pub file_extension:    String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            vector_index_type: DEFAULT_VECTOR_INDEX_TYPE.to_string(),
            vectorizer:        DEFAULT_VECTORIZER.to_string(),
            file_extension:    "go".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub pretty: bool,
    /// Reject documents that declare the same class name twice.
    pub strict: bool,
}

impl WeaveConfig {
    pub fn from_toml_str(text: &str) -> Result<WeaveConfig, WeaveError> {
        toml::from_str(text).map_err(|e| WeaveError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<WeaveConfig, WeaveError> {
        let text = fs::read_to_string(path).map_err(|e| {
            WeaveError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        WeaveConfig::from_toml_str(&text)
    }

    /// Load `path` when given, else `weave.toml` in `dir` when present, else defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<WeaveConfig, WeaveError> {
        if let Some(path) = path {
            return WeaveConfig::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            WeaveConfig::load(&candidate)
        } else {
            Ok(WeaveConfig::default())
        }
    }
}
