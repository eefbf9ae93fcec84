use std::path::{Path, PathBuf};

use fxhash::FxHashMap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use yang_link::{emission_order, LinkError, LinkReport, Linker};
use yang_parse::parse_file;
use yang_schema::{NodeId, SchemaGraph};
use yang_source::{CompilerConfig, Report, SourceFile, YangError};

use crate::emitter::CodeEmitter;
use crate::error::{CompilerError, CompilerResult};
use crate::manifest::{ManifestEntry, ModelManifest, MANIFEST_FILE_NAME};
use crate::snapshot::{read_snapshot, snapshot_file_name, write_snapshot, SnapshotError};

/// One compilation at a time per process.
static COMPILE_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Drives a compilation: dependency snapshots are loaded, every schema file
/// is parsed and self-linked as it is read, then all files are cross-linked
/// together. `compile` additionally writes snapshots, the model manifest and
/// hands each module to a [`CodeEmitter`].
#[derive(Debug, Clone)]
pub struct Compiler {
    root: PathBuf,
    config: CompilerConfig,
}

/// A linked schema graph.
#[derive(Debug)]
pub struct Compilation {
    pub graph: SchemaGraph,
    pub report: LinkReport,
    /// Translated roots with the file each was parsed from
    pub sources: Vec<(NodeId, PathBuf)>,
    /// Roots loaded from dependency snapshots
    pub dependencies: Vec<NodeId>,
}

impl Compilation {
    /// Translated roots, imports and includes first.
    pub fn emission_order(&self) -> Vec<NodeId> {
        emission_order(&self.graph)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSummary {
    pub modules: usize,
    pub report: LinkReport,
    pub manifest: PathBuf,
}

impl Compiler {
    /// A compiler for the project whose `yang.toml` lives in `root`.
    pub fn new(root: impl Into<PathBuf>) -> CompilerResult<Self> {
        let root = root.into();
        let config = CompilerConfig::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn with_config(root: impl Into<PathBuf>, config: CompilerConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CompilerConfig {
        &mut self.config
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(&self.config.compiler.metadata_gen_dir)
    }

    pub fn code_gen_dir(&self) -> PathBuf {
        self.root.join(&self.config.compiler.code_gen_dir)
    }

    /// Parses and links without writing anything.
    pub fn check(&self) -> CompilerResult<Compilation> {
        let _guard = COMPILE_LOCK.lock();
        self.link()
    }

    /// Full pipeline. Nothing is written unless linking succeeded.
    pub fn compile<E: CodeEmitter>(&self, emitter: &mut E) -> CompilerResult<CompileSummary> {
        let _guard = COMPILE_LOCK.lock();
        let compilation = self.link()?;
        let order = compilation.emission_order();

        let manifest = self.write_metadata(&compilation, &order)?;
        for root in &order {
            emitter.emit_module(&compilation.graph, *root)?;
        }

        log::info!(
            "compiled {} modules of {} into {}",
            order.len(),
            self.config.compiler.model_id,
            manifest.display()
        );
        Ok(CompileSummary {
            modules: order.len(),
            report: compilation.report,
            manifest,
        })
    }

    fn link(&self) -> CompilerResult<Compilation> {
        let files = self.config.source_files(&self.root)?;
        if files.is_empty() {
            return Err(CompilerError::NoSources(self.root.clone()));
        }

        let mut graph = SchemaGraph::new();
        let dependencies = self.load_dependencies(&mut graph)?;

        let mut sources = Vec::with_capacity(files.len());
        let mut loaded: FxHashMap<String, SourceFile> = FxHashMap::default();
        let mut diagnostics = Vec::new();
        let mut linker = Linker::new(&mut graph);

        for path in files {
            let file = SourceFile::load(&path)?;
            match parse_file(linker.graph_mut(), &file) {
                Ok(root) => {
                    if let Err(errors) = linker.resolve_self_file_linking(root) {
                        diagnostics.extend(errors.into_iter().map(|err| err.report(&file)));
                    }
                    sources.push((root, path));
                }
                Err(err) => diagnostics.push(err.report(&file)),
            }
            loaded.insert(file.location.clone(), file);
        }
        if !diagnostics.is_empty() {
            return Err(CompilerError::diagnostics(diagnostics));
        }

        let report = linker
            .resolve_dependencies()
            .map_err(|errors| CompilerError::diagnostics(link_reports(errors, &loaded)))?;
        drop(linker);

        log::debug!(
            "linked {} files against {} dependency modules",
            sources.len(),
            dependencies.len()
        );
        Ok(Compilation {
            graph,
            report,
            sources,
            dependencies,
        })
    }

    /// Imports every module listed by the dependency manifests as a
    /// read-only root.
    fn load_dependencies(&self, graph: &mut SchemaGraph) -> CompilerResult<Vec<NodeId>> {
        let manifests = self.config.dependency_manifests(&self.root, MANIFEST_FILE_NAME)?;
        let mut seen: IndexMap<String, PathBuf> = IndexMap::new();
        let mut imported = Vec::new();

        for manifest_path in manifests {
            let manifest = ModelManifest::load(&manifest_path)?;
            let dir = manifest_path.parent().unwrap_or(Path::new("."));
            for entry in &manifest.modules {
                let key = snapshot_file_name(&entry.name, entry.revision.as_deref());
                if let Some(first) = seen.get(&key) {
                    if *first == manifest_path {
                        continue;
                    }
                    return Err(CompilerError::DuplicateModule {
                        name: entry.name.clone(),
                        first: first.clone(),
                        second: manifest_path.clone(),
                    });
                }

                let blob = dir.join(&entry.blob);
                let snapshot = read_snapshot(&blob)?;
                if snapshot.name != entry.name {
                    return Err(SnapshotError::ModuleMismatch {
                        path: blob,
                        found: snapshot.name,
                        expected: entry.name.clone(),
                    }
                    .into());
                }
                if let Some(root) = graph.import_module(snapshot) {
                    imported.push(root);
                }
                seen.insert(key, manifest_path.clone());
            }
            log::debug!(
                "loaded {} modules of {} from {}",
                manifest.modules.len(),
                manifest.model_id,
                manifest_path.display()
            );
        }

        rebind_snapshot_links(graph, &imported);
        Ok(imported)
    }

    fn write_metadata(&self, compilation: &Compilation, order: &[NodeId]) -> CompilerResult<PathBuf> {
        let dir = self.metadata_dir();
        std::fs::create_dir_all(&dir).map_err(|e| CompilerError::output(&dir, e))?;

        let mut manifest = ModelManifest::new(&self.config.compiler.model_id);
        for root in order {
            let snapshot = compilation.graph.extract_module(*root);
            let blob = snapshot_file_name(&snapshot.name, snapshot.revision.as_deref());
            write_snapshot(&snapshot, &dir.join(&blob))?;

            let source = compilation
                .sources
                .iter()
                .find(|(id, _)| id == root)
                .map(|(_, path)| path.strip_prefix(&self.root).unwrap_or(path).to_path_buf())
                .unwrap_or_default();
            manifest.modules.push(ManifestEntry {
                name: snapshot.name,
                revision: snapshot.revision,
                source,
                blob: PathBuf::from(blob),
            });
        }

        let path = dir.join(MANIFEST_FILE_NAME);
        manifest.save(&path)?;
        Ok(path)
    }
}

/// Snapshots are written one module at a time, so includes and belongs-to
/// between modules of the same dependency lose their binding. They are bound
/// again by name among the imported roots.
fn rebind_snapshot_links(graph: &mut SchemaGraph, imported: &[NodeId]) {
    for root in imported {
        let Some(info) = graph.node(*root).module_info() else {
            continue;
        };
        let includes: Vec<Option<NodeId>> = info
            .includes
            .iter()
            .map(|link| link.resolved.or_else(|| find_imported(graph, imported, &link.name)))
            .collect();
        let belongs_to = info
            .belongs_to
            .as_ref()
            .and_then(|link| link.resolved.or_else(|| find_imported(graph, imported, &link.name)));

        if let Some(info) = graph.node_mut(*root).module_info_mut() {
            for (link, resolved) in info.includes.iter_mut().zip(includes) {
                link.resolved = resolved;
            }
            if let Some(link) = &mut info.belongs_to {
                link.resolved = belongs_to;
            }
        }
    }
}

fn find_imported(graph: &SchemaGraph, imported: &[NodeId], name: &str) -> Option<NodeId> {
    imported
        .iter()
        .copied()
        .find(|root| graph.node(*root).name == name)
}

/// Attaches each link error to the text of the file it points into.
fn link_reports(errors: Vec<LinkError>, files: &FxHashMap<String, SourceFile>) -> Vec<Report> {
    errors
        .into_iter()
        .map(|err| {
            let file = files
                .get(&err.location().file)
                .cloned()
                .unwrap_or_else(|| SourceFile::new(err.location().file.clone(), ""));
            err.report(&file)
        })
        .collect()
}
