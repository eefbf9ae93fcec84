use std::path::{Path, PathBuf};

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::file::discover_yang_files;

pub const CONFIG_FILE_NAME: &str = "yang.toml";

/// Contents of a `yang.toml` project file.
///
/// ```toml
/// [compiler]
/// model_id = "org.example.interfaces"
///
/// [sources]
/// directories = ["yang"]
///
/// [dependencies]
/// types = "../types/target/metadata/yang-model.toml"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Output and identity settings
    #[serde(default)]
    pub compiler: CompilerSection,

    /// Which files make up this compilation
    #[serde(default)]
    pub sources: SourcesSection,

    /// Previously compiled schema sets this one imports from
    #[serde(default)]
    pub dependencies: FxHashMap<String, Dependency>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompilerSection {
    /// Identifier written into the model manifest
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Directory handed to the code emitter
    #[serde(default = "default_code_gen_dir")]
    pub code_gen_dir: PathBuf,

    /// Directory receiving module snapshots and the model manifest
    #[serde(default = "default_metadata_gen_dir")]
    pub metadata_gen_dir: PathBuf,
}

impl Default for CompilerSection {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            code_gen_dir: default_code_gen_dir(),
            metadata_gen_dir: default_metadata_gen_dir(),
        }
    }
}

pub fn default_model_id() -> String {
    "yang.model".to_string()
}

pub fn default_code_gen_dir() -> PathBuf {
    PathBuf::from("target/generated")
}

pub fn default_metadata_gen_dir() -> PathBuf {
    PathBuf::from("target/metadata")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourcesSection {
    /// Individual schema files
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Directories searched recursively for `.yang` files
    #[serde(default = "default_source_dirs")]
    pub directories: Vec<PathBuf>,
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            files: vec![],
            directories: default_source_dirs(),
        }
    }
}

pub fn default_source_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("yang")]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Dependency {
    /// Path to the dependency's model manifest
    Simple(PathBuf),

    /// Dependency written as a table
    Detailed(DependencyDetails),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyDetails {
    /// Path to the dependency's model manifest
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Root of another yangc project; its configured metadata directory is used
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl CompilerConfig {
    /// Loads `yang.toml` from a project root.
    pub fn load(root: &Path) -> Result<Self, SourceError> {
        let config_path = root.join(CONFIG_FILE_NAME);
        if !config_path.is_file() {
            return Err(SourceError::ConfigNotFound(root.to_path_buf()));
        }
        let text = std::fs::read_to_string(&config_path)?;
        let config = Self::parse(&text)?;
        log::debug!("loaded configuration from {}", config_path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, SourceError> {
        Ok(toml::from_str(text)?)
    }

    /// All schema files of the compilation, relative paths joined onto `root`.
    ///
    /// Configured source directories that do not exist are skipped when
    /// explicit files are listed; with no explicit files they are an error.
    pub fn source_files(&self, root: &Path) -> Result<Vec<PathBuf>, SourceError> {
        let mut files: Vec<PathBuf> = self.sources.files.iter().map(|f| root.join(f)).collect();
        for file in &files {
            if !file.is_file() {
                return Err(SourceError::PathNotFound(file.clone()));
            }
        }

        for dir in &self.sources.directories {
            let dir = root.join(dir);
            if !dir.exists() && !self.sources.files.is_empty() {
                continue;
            }
            files.extend(discover_yang_files(&dir)?);
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Manifest paths of every dependency, sorted by dependency name.
    pub fn dependency_manifests(
        &self,
        root: &Path,
        manifest_name: &str,
    ) -> Result<Vec<PathBuf>, SourceError> {
        let mut names: Vec<&String> = self.dependencies.keys().collect();
        names.sort();

        let mut manifests = Vec::with_capacity(names.len());
        for name in names {
            let manifest = match &self.dependencies[name] {
                Dependency::Simple(path) => root.join(path),
                Dependency::Detailed(DependencyDetails {
                    manifest: Some(path), ..
                }) => root.join(path),
                Dependency::Detailed(DependencyDetails {
                    manifest: None,
                    path: Some(project),
                }) => {
                    let project = root.join(project);
                    let nested = match Self::load(&project) {
                        Ok(config) => config,
                        Err(SourceError::ConfigNotFound(_)) => Self::default(),
                        Err(e) => return Err(e),
                    };
                    project
                        .join(&nested.compiler.metadata_gen_dir)
                        .join(manifest_name)
                }
                Dependency::Detailed(DependencyDetails {
                    manifest: None,
                    path: None,
                }) => {
                    return Err(SourceError::DependencyResolutionError {
                        name: name.clone(),
                        reason: "neither `manifest` nor `path` is set".to_string(),
                    })
                }
            };
            manifests.push(manifest);
        }
        Ok(manifests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_empty_config() {
        let config = CompilerConfig::parse("").unwrap();
        assert_eq!(config.compiler, CompilerSection::default());
        assert_eq!(config.sources.directories, vec![PathBuf::from("yang")]);
        assert!(config.dependencies.is_empty());
    }

    #[test]
    fn test_parses_simple_and_detailed_dependencies() {
        let config = CompilerConfig::parse(
            r#"
            [compiler]
            model_id = "org.example.ifaces"

            [dependencies]
            types = "../types/target/metadata/yang-model.toml"
            base = { path = "../base" }
            "#,
        )
        .unwrap();
        assert_eq!(config.compiler.model_id, "org.example.ifaces");
        assert!(matches!(config.dependencies["types"], Dependency::Simple(_)));
        assert!(matches!(
            config.dependencies["base"],
            Dependency::Detailed(DependencyDetails { path: Some(_), .. })
        ));
    }

    #[test]
    fn test_malformed_config_is_a_parse_error() {
        let err = CompilerConfig::parse("[compiler\nmodel_id = 3").unwrap_err();
        assert!(matches!(err, SourceError::ConfigParseError(_)));
    }

    #[test]
    fn test_dependency_without_location_is_rejected() {
        let config = CompilerConfig::parse("[dependencies]\nbroken = {}\n").unwrap();
        let err = config
            .dependency_manifests(Path::new("."), "yang-model.toml")
            .unwrap_err();
        assert!(matches!(err, SourceError::DependencyResolutionError { .. }));
    }

    #[test]
    fn test_project_dependency_uses_its_metadata_dir() {
        let dir = tempfile::tempdir().unwrap();
        let dep = dir.path().join("dep");
        std::fs::create_dir_all(&dep).unwrap();
        std::fs::write(
            dep.join(CONFIG_FILE_NAME),
            "[compiler]\nmetadata_gen_dir = \"meta\"\n",
        )
        .unwrap();

        let config = CompilerConfig::parse("[dependencies]\ndep = { path = \"dep\" }\n").unwrap();
        let manifests = config
            .dependency_manifests(dir.path(), "yang-model.toml")
            .unwrap();
        assert_eq!(manifests, vec![dep.join("meta").join("yang-model.toml")]);
    }

    #[test]
    fn test_source_files_merge_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("yang")).unwrap();
        std::fs::write(dir.path().join("yang/a.yang"), "").unwrap();
        std::fs::write(dir.path().join("extra.yang"), "").unwrap();

        let config = CompilerConfig::parse("[sources]\nfiles = [\"extra.yang\"]\n").unwrap();
        let files = config.source_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }
}
