use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::NormalizeError;
use crate::parse;

/// Source of raw documents for the normalizer.
///
/// The normalizer never touches the filesystem itself; everything it reads goes
/// through a loader so callers can substitute in-memory sources.
pub trait DocumentLoader {
    fn load(&self, location: &Path) -> Result<Value, NormalizeError>;
}

/// Reads documents from disk. `.json` files are parsed as JSON, everything else as YAML.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl DocumentLoader for FsLoader {
    fn load(&self, location: &Path) -> Result<Value, NormalizeError> {
        let content = fs::read_to_string(location).map_err(|source| NormalizeError::Io {
            path: location.to_path_buf(),
            source,
        })?;
        log::debug!("loaded {}", location.display());
        parse_by_extension(location, &content)
    }
}

/// Serves documents from memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.documents.insert(path.into(), content.into());
        self
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, location: &Path) -> Result<Value, NormalizeError> {
        let content = self
            .documents
            .get(location)
            .ok_or_else(|| NormalizeError::Io {
                path: location.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
            })?;
        parse_by_extension(location, content)
    }
}

fn parse_by_extension(location: &Path, content: &str) -> Result<Value, NormalizeError> {
    let parsed = match location.extension().and_then(|e| e.to_str()) {
        Some("json") => parse::value_from_json(content),
        _ => parse::value_from_yaml(content),
    };
    parsed.map_err(|source| NormalizeError::Parse {
        path: location.to_path_buf(),
        source,
    })
}
