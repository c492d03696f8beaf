//! Project configuration loaded from `.oak.yaml`.
//!
//! Every section is optional; missing keys take their defaults:
//!
//! ```yaml
//! input: openapi.yaml
//! output: src/generated
//! targets: { types: false, api_client: false, mock_data: false, react_query: false }
//! files: { type_definitions: typeDefinitions.ts, api_client: apiClient.ts, ... }
//! mock: { cycle_limit: 100, seed: 42 }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::emit::ImportPaths;
use crate::error::ConfigError;
use crate::mock::DEFAULT_CYCLE_LIMIT;

/// Top-level project configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OakConfig {
    pub input: String,
    pub output: String,
    pub targets: TargetSelection,
    pub files: FileNames,
    pub mock: MockConfig,
}

impl Default for OakConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "src/generated".to_string(),
            targets: TargetSelection::default(),
            files: FileNames::default(),
            mock: MockConfig::default(),
        }
    }
}

/// Which artifacts to generate, as requested by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TargetSelection {
    pub types: bool,
    pub api_client: bool,
    pub mock_data: bool,
    pub react_query: bool,
}

impl TargetSelection {
    pub const ALL: TargetSelection = TargetSelection {
        types: true,
        api_client: true,
        mock_data: true,
        react_query: true,
    };

    /// Apply the dependencies between artifacts. Nothing selected means everything;
    /// every other artifact imports the type definitions; hooks wrap the API client.
    pub fn resolve(self) -> TargetSelection {
        if self == TargetSelection::default() {
            return TargetSelection::ALL;
        }
        let api_client = self.api_client || self.react_query;
        TargetSelection {
            types: self.types || api_client || self.mock_data,
            api_client,
            mock_data: self.mock_data,
            react_query: self.react_query,
        }
    }
}

/// Output file names, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub type_definitions: String,
    pub api_client: String,
    pub mock_data: String,
    pub react_query: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            type_definitions: "typeDefinitions.ts".to_string(),
            api_client: "apiClient.ts".to_string(),
            mock_data: "mockData.ts".to_string(),
            react_query: "reactQuery.tsx".to_string(),
        }
    }
}

impl FileNames {
    /// Relative module specifiers for the artifacts other artifacts import.
    pub fn import_paths(&self) -> ImportPaths {
        ImportPaths {
            type_definitions: module_specifier(&self.type_definitions),
            api_client: module_specifier(&self.api_client),
        }
    }
}

/// Mock synthesis options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub cycle_limit: usize,
    /// Fixed seed for reproducible fixtures; unset draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            cycle_limit: DEFAULT_CYCLE_LIMIT,
            seed: None,
        }
    }
}

/// `typeDefinitions.ts` → `./typeDefinitions`, `nested/api.tsx` → `./nested/api`.
fn module_specifier(file_name: &str) -> String {
    let stem = [".d.ts", ".tsx", ".ts", ".mts", ".jsx", ".js"]
        .iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name);
    if stem.starts_with("./") || stem.starts_with("../") {
        stem.to_string()
    } else {
        format!("./{stem}")
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oak.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OakConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: OakConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oak configuration
input: openapi.yaml
output: src/generated

# Leave every target off to generate all of them. Selecting the API client,
# mock data or hooks also generates the type definitions; hooks also pull in
# the API client.
targets:
  types: false
  api_client: false
  mock_data: false
  react_query: false

files:
  type_definitions: typeDefinitions.ts
  api_client: apiClient.ts
  mock_data: mockData.ts
  react_query: reactQuery.tsx

mock:
  cycle_limit: 100
  # seed: 42            # fixed seed for reproducible fixtures
"#
}
