//! Chain manifest loading.
//!
//! # Responsibility
//! - Read the chain metadata that names a nucleus type and its source code.
//!
//! # Invariants
//! - Exactly one of `code` / `code_file` is set in a valid manifest.
//! - `code_file` is resolved relative to the manifest directory.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Chain metadata consumed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainManifest {
    pub name: String,
    pub nucleus: NucleusSection,
}

/// Nucleus declaration inside a chain manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NucleusSection {
    /// Registered nucleus type name, e.g. `static`.
    #[serde(rename = "type")]
    pub nucleus_type: String,
    /// Inline source code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Path to source code, relative to the manifest directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_file: Option<PathBuf>,
}

impl ChainManifest {
    /// Validates declaration-level manifest invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("chain name must not be empty".to_string()));
        }
        if self.nucleus.nucleus_type.is_empty() {
            return Err(ConfigError::Invalid(
                "nucleus type must not be empty".to_string(),
            ));
        }
        match (&self.nucleus.code, &self.nucleus.code_file) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            (Some(_), Some(_)) => Err(ConfigError::Invalid(
                "nucleus declares both `code` and `code_file`".to_string(),
            )),
            (None, None) => Err(ConfigError::Invalid(
                "nucleus declares neither `code` nor `code_file`".to_string(),
            )),
        }
    }

    /// Returns nucleus source code, reading `code_file` relative to `base_dir`.
    pub fn source_code(&self, base_dir: &Path) -> Result<String, ConfigError> {
        if let Some(code) = &self.nucleus.code {
            return Ok(code.clone());
        }
        let Some(relative) = &self.nucleus.code_file else {
            return Err(ConfigError::Invalid(
                "nucleus declares neither `code` nor `code_file`".to_string(),
            ));
        };
        let path = base_dir.join(relative);
        std::fs::read_to_string(&path).map_err(|err| ConfigError::Io {
            path,
            message: err.to_string(),
        })
    }
}

/// Reads and validates a chain manifest from a JSON file.
pub fn load_chain_manifest(path: impl AsRef<Path>) -> Result<ChainManifest, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let manifest: ChainManifest =
        serde_json::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
    manifest.validate()?;
    Ok(manifest)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Parse(String),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "failed to read `{}`: {message}", path.display())
            }
            Self::Parse(message) => write!(f, "invalid chain manifest: {message}"),
            Self::Invalid(message) => write!(f, "chain manifest is invalid: {message}"),
        }
    }
}

impl Error for ConfigError {}
