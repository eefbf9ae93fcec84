use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CompilerError, CompilerResult};

pub const MANIFEST_FILE_NAME: &str = "yang-model.toml";
pub const MANIFEST_FORMAT_VERSION: u32 = 1;

/// Index of the snapshots written by one compilation.
///
/// ```toml
/// format_version = 1
/// model_id = "org.example.interfaces"
///
/// [[modules]]
/// name = "example-interfaces"
/// revision = "2024-03-01"
/// source = "yang/example-interfaces.yang"
/// blob = "example-interfaces@2024-03-01.ysnp"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub format_version: u32,
    pub model_id: String,
    #[serde(default)]
    pub modules: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    #[serde(default)]
    pub revision: Option<String>,
    /// Schema file the module was compiled from
    pub source: PathBuf,
    /// Snapshot file, relative to the manifest
    pub blob: PathBuf,
}

impl ModelManifest {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            format_version: MANIFEST_FORMAT_VERSION,
            model_id: model_id.into(),
            modules: vec![],
        }
    }

    pub fn load(path: &Path) -> CompilerResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CompilerError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let manifest: Self = toml::from_str(&text).map_err(|e| CompilerError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if manifest.format_version != MANIFEST_FORMAT_VERSION {
            return Err(CompilerError::Manifest {
                path: path.to_path_buf(),
                reason: format!(
                    "format version {} is not supported, expected {}",
                    manifest.format_version, MANIFEST_FORMAT_VERSION
                ),
            });
        }
        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> CompilerResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| CompilerError::output(path, e))?;
        std::fs::write(path, text).map_err(|e| CompilerError::output(path, e))
    }
}
