//! Orchestration of the linking phases over a set of parsed files.
//!
//! ```text
//! PARSED ──self-file linking──▶ SELF_LINKED ──(all files)──▶ CROSS_LINKED
//! ```
//!
//! Self-file linking runs per file as soon as it is parsed. Cross-file
//! linking waits until every file is self-linked, binds imports, includes
//! and belongs-to, then repeats passes over every unresolved site until a
//! pass makes no progress. Whatever is still unresolved is reported.

use fxhash::FxHashSet;
use yang_schema::{
    DataType, DeferredKind, NodeId, NodeKind, NodeType, SchemaGraph, TypeBody, YangType,
};

use crate::error::{LinkError, ReferenceKind};
use crate::finalize::finalize_schema;
use crate::resolver::{LinkMode, Resolvable, Site};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilePhase {
    Parsed,
    SelfLinked,
    CrossLinked,
}

/// Outcome of a linking run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Passes that made progress
    pub passes: usize,
    /// Sites that became resolved
    pub resolved: usize,
}

pub struct Linker<'g> {
    graph: &'g mut SchemaGraph,
    files: Vec<(NodeId, FilePhase)>,
}

impl<'g> Linker<'g> {
    /// Registers every root of `graph` that is to be translated. Roots
    /// loaded from snapshots are only ever looked up.
    pub fn new(graph: &'g mut SchemaGraph) -> Self {
        let files = graph
            .roots()
            .iter()
            .copied()
            .filter(|root| is_translated(graph, *root))
            .map(|root| (root, FilePhase::Parsed))
            .collect();
        Self { graph, files }
    }

    /// Registers a file parsed after the linker was created.
    pub fn add_file(&mut self, root: NodeId) {
        self.graph.add_root(root);
        if !self.files.iter().any(|(id, _)| *id == root) {
            self.files.push((root, FilePhase::Parsed));
        }
    }

    pub fn phase(&self, root: NodeId) -> Option<FilePhase> {
        self.files
            .iter()
            .find(|(id, _)| *id == root)
            .map(|(_, phase)| *phase)
    }

    pub fn graph(&self) -> &SchemaGraph {
        self.graph
    }

    /// For building further files into the graph between self-links.
    pub fn graph_mut(&mut self) -> &mut SchemaGraph {
        self.graph
    }

    fn set_phase(&mut self, root: NodeId, phase: FilePhase) {
        if let Some(entry) = self.files.iter_mut().find(|(id, _)| *id == root) {
            entry.1 = phase;
        }
    }

    fn roots_in(&self, phase: FilePhase) -> Vec<NodeId> {
        self.files
            .iter()
            .filter(|(_, p)| *p == phase)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Links what `root` can resolve on its own. References through foreign
    /// prefixes stay unresolved for the cross-file phase; only hard errors
    /// (collisions, malformed paths) are reported.
    pub fn resolve_self_file_linking(&mut self, root: NodeId) -> Result<usize, Vec<LinkError>> {
        self.add_file(root);
        if self.phase(root) != Some(FilePhase::Parsed) {
            return Ok(0);
        }
        let Outcome { report, errors, .. } = fixed_point(self.graph, &[root], LinkMode::SelfFile);
        if !errors.is_empty() {
            return Err(errors);
        }
        log::debug!(
            "self-linked \"{}\": {} sites resolved in {} passes",
            self.graph.node(root).name,
            report.resolved,
            report.passes
        );
        self.set_phase(root, FilePhase::SelfLinked);
        Ok(report.resolved)
    }

    /// Cross-file linking of every registered file, followed by schema
    /// finalization. All errors found are returned together.
    pub fn resolve_dependencies(&mut self) -> Result<LinkReport, Vec<LinkError>> {
        let mut errors = Vec::new();
        let mut resolved = 0;
        for root in self.roots_in(FilePhase::Parsed) {
            match self.resolve_self_file_linking(root) {
                Ok(count) => resolved += count,
                Err(errs) => errors.extend(errs),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let roots = self.roots_in(FilePhase::SelfLinked);
        for root in &roots {
            errors.extend(bind_module_links(self.graph, *root));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let Outcome {
            mut report,
            mut errors,
            failed,
        } = fixed_point(self.graph, &roots, LinkMode::CrossFile);
        report.resolved += resolved;
        for site in collect_sites(self.graph, &roots) {
            if !failed.contains(&site) {
                errors.push(leftover_error(self.graph, site));
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        for root in &roots {
            finalize_schema(self.graph, *root)?;
            self.set_phase(*root, FilePhase::CrossLinked);
        }
        log::info!(
            "linked {} files: {} sites resolved in {} passes",
            roots.len(),
            report.resolved,
            report.passes
        );
        Ok(report)
    }
}

/// Self-links and cross-links every translated root of `graph`.
pub fn link(graph: &mut SchemaGraph) -> Result<LinkReport, Vec<LinkError>> {
    Linker::new(graph).resolve_dependencies()
}

fn is_translated(graph: &SchemaGraph, root: NodeId) -> bool {
    graph
        .node(root)
        .module_info()
        .is_some_and(|info| info.to_translate)
}

fn bind_module_links(graph: &mut SchemaGraph, root: NodeId) -> Vec<LinkError> {
    let Some(info) = graph.node(root).module_info() else {
        return vec![];
    };
    let mut errors = Vec::new();
    let mut bind = |link: &yang_schema::ModuleLink, kind: ReferenceKind| {
        let found = graph.find_root(&link.name, link.revision.as_deref());
        if found.is_none() {
            errors.push(LinkError::not_found(kind, &link.name, &link.location));
        }
        found
    };
    let imports: Vec<_> = info
        .imports
        .iter()
        .map(|link| bind(link, ReferenceKind::Module))
        .collect();
    let includes: Vec<_> = info
        .includes
        .iter()
        .map(|link| bind(link, ReferenceKind::Submodule))
        .collect();
    let belongs_to = info
        .belongs_to
        .as_ref()
        .map(|link| bind(link, ReferenceKind::Module));

    if let Some(info) = graph.node_mut(root).module_info_mut() {
        for (link, found) in info.imports.iter_mut().zip(imports) {
            link.resolved = found;
        }
        for (link, found) in info.includes.iter_mut().zip(includes) {
            link.resolved = found;
        }
        if let (Some(link), Some(found)) = (info.belongs_to.as_mut(), belongs_to) {
            link.resolved = found;
        }
    }
    errors
}

/// Every site under `roots` that is not resolved yet, in visiting order.
fn collect_sites(graph: &SchemaGraph, roots: &[NodeId]) -> Vec<Site> {
    let mut sites = Vec::new();
    for root in roots {
        for id in std::iter::once(*root).chain(graph.walk(*root)) {
            let node = graph.node(id);
            match node.kind {
                NodeKind::Typedef(_) => sites.push(Site::TypedefType(id)),
                NodeKind::Identity(_) => sites.push(Site::IdentityBase(id)),
                NodeKind::Uses(_) => sites.push(Site::Uses(id)),
                NodeKind::Augment(_) => sites.push(Site::Augment(id)),
                _ => {}
            }
            let template = graph.is_within_grouping(id);
            for leaf in graph.all_leaves(id) {
                sites.push(Site::LeafType(leaf));
                if !template && graph.leaf(leaf).ty.leafref().is_some() {
                    sites.push(Site::Leafref(leaf));
                }
            }
        }
    }
    sites.retain(|site| !site.status(graph).is_resolved());
    sites.sort();
    sites.dedup();
    sites
}

struct Outcome {
    report: LinkReport,
    errors: Vec<LinkError>,
    /// Sites that failed hard; they are not retried or reported again
    failed: FxHashSet<Site>,
}

/// Repeats passes over the unresolved sites of `roots` until one makes no
/// progress.
fn fixed_point(graph: &mut SchemaGraph, roots: &[NodeId], mode: LinkMode) -> Outcome {
    let mut report = LinkReport::default();
    let mut errors = Vec::new();
    let mut failed: FxHashSet<Site> = FxHashSet::default();
    loop {
        let mut progress = false;
        for site in collect_sites(graph, roots) {
            if failed.contains(&site) {
                continue;
            }
            match site.resolve(graph, mode) {
                Ok(changed) => {
                    progress |= changed;
                    if changed && site.status(graph).is_resolved() {
                        report.resolved += 1;
                    }
                }
                Err(err) => {
                    log::debug!("{site:?} failed: {err}");
                    failed.insert(site);
                    errors.push(err);
                }
            }
        }
        let drained = drain_deferred_entities(graph, roots, mode);
        report.resolved += drained.bound;
        progress |= drained.changed();
        if !progress {
            break;
        }
        report.passes += 1;
        log::trace!("{mode:?} pass {} done", report.passes);
    }
    Outcome {
        report,
        errors,
        failed,
    }
}

/// What one drain of the post-clone lists changed.
#[derive(Debug, Default, PartialEq, Eq)]
struct Drained {
    /// Copies re-pointed at their final holder
    fixed: usize,
    /// Copies whose type got bound
    bound: usize,
}

impl Drained {
    fn changed(&self) -> bool {
        self.fixed + self.bound > 0
    }
}

/// Works off the post-clone lists of every expanded uses.
///
/// Owner fix-ups are applied and dropped. Type references are bound right
/// away, so copies made earlier in the pass do not wait for the next one;
/// an entry stays until its copy's type is resolved.
fn drain_deferred_entities(graph: &mut SchemaGraph, roots: &[NodeId], mode: LinkMode) -> Drained {
    let view: &SchemaGraph = graph;
    let uses: Vec<NodeId> = roots
        .iter()
        .flat_map(|root| view.walk(*root))
        .filter(|id| {
            view.node(*id)
                .uses_info()
                .is_some_and(|info| !info.entities_to_resolve.is_empty())
        })
        .collect();

    let mut drained = Drained::default();
    for id in uses {
        let entities = graph
            .node(id)
            .uses_info()
            .map(|info| info.entities_to_resolve.clone())
            .unwrap_or_default();
        let mut remaining = Vec::with_capacity(entities.len());
        for entity in entities {
            match entity.kind {
                DeferredKind::OwnerFixup => {
                    graph.leaf_mut(entity.leaf).ty.set_owner(entity.holder);
                    drained.fixed += 1;
                }
                DeferredKind::TypeReferences => {
                    let site = Site::LeafType(entity.leaf);
                    match site.resolve(graph, mode) {
                        Ok(true) => drained.bound += 1,
                        Ok(false) => {}
                        Err(err) => log::debug!("{site:?} failed: {err}"),
                    }
                    if !site.status(graph).is_resolved() {
                        remaining.push(entity);
                    }
                }
            }
        }
        if let Some(info) = graph.node_mut(id).uses_info_mut() {
            info.entities_to_resolve = remaining;
        }
    }
    drained
}

fn leftover_error(graph: &SchemaGraph, site: Site) -> LinkError {
    match site {
        Site::TypedefType(id) => {
            let node = graph.node(id);
            match node.typedef_info() {
                Some(info) => type_error(&info.ty),
                None => LinkError::not_found(ReferenceKind::Typedef, &node.name, &node.location),
            }
        }
        Site::LeafType(id) => type_error(&graph.leaf(id).ty),
        Site::IdentityBase(id) => {
            let node = graph.node(id);
            match &node.kind {
                NodeKind::Identity(info) => match &info.base {
                    Some(base) => LinkError::not_found(
                        ReferenceKind::Identity,
                        base.target.to_string(),
                        &base.location,
                    ),
                    None => LinkError::not_found(ReferenceKind::Identity, &node.name, &node.location),
                },
                _ => LinkError::not_found(ReferenceKind::Identity, &node.name, &node.location),
            }
        }
        Site::Uses(id) => uses_error(graph, id),
        Site::Augment(id) => {
            let node = graph.node(id);
            LinkError::not_found(ReferenceKind::AugmentTarget, &node.name, &node.location)
        }
        Site::Leafref(id) => {
            let ty = &graph.leaf(id).ty;
            let path = ty.leafref().map(|(path, _, _)| path).unwrap_or_default();
            LinkError::not_found(ReferenceKind::LeafrefTarget, path, &ty.location)
        }
    }
}

/// Error for the first member of `ty` that never resolved.
fn type_error(ty: &YangType) -> LinkError {
    for path in ty.unresolved_paths() {
        let Some(member) = ty.member(&path) else {
            continue;
        };
        match (&member.data_type, &member.body) {
            (DataType::Derived, _) if member.typedef.is_none() => {
                return LinkError::not_found(
                    ReferenceKind::Typedef,
                    member.name.to_string(),
                    &member.location,
                )
            }
            (DataType::Derived, _) => {
                return LinkError::unresolved_dependency(
                    ReferenceKind::Typedef,
                    member.name.to_string(),
                    &member.location,
                )
            }
            (DataType::Identityref, TypeBody::Identityref { base: Some(base) }) => {
                return LinkError::not_found(
                    ReferenceKind::Identity,
                    base.target.to_string(),
                    &base.location,
                )
            }
            _ => {}
        }
    }
    LinkError::unresolved_dependency(ReferenceKind::Typedef, ty.name.to_string(), &ty.location)
}

fn uses_error(graph: &SchemaGraph, id: NodeId) -> LinkError {
    let node = graph.node(id);
    let Some(info) = node.uses_info() else {
        return LinkError::not_found(ReferenceKind::Grouping, &node.name, &node.location);
    };
    if info.grouping.resolved.is_none() {
        return LinkError::not_found(
            ReferenceKind::Grouping,
            info.grouping.target.to_string(),
            &node.location,
        );
    }
    if on_grouping_cycle(graph, id) {
        return LinkError::GroupingCycle {
            name: node.name.clone(),
            location: node.location.clone(),
            span: node.location.span(),
        };
    }
    LinkError::UnresolvedGrouping {
        name: node.name.clone(),
        location: node.location.clone(),
        span: node.location.span(),
    }
}

/// Whether expanding `uses` would eventually require expanding itself:
/// its grouping reaches, through the uses it contains, either itself or a
/// grouping that encloses `uses`.
fn on_grouping_cycle(graph: &SchemaGraph, uses: NodeId) -> bool {
    let Some(start) = graph.node(uses).uses_info().and_then(|i| i.grouping.resolved) else {
        return false;
    };
    let enclosing: Vec<NodeId> = graph
        .ancestors(uses)
        .filter(|id| graph.node(*id).node_type() == NodeType::Grouping)
        .collect();

    let mut visited = FxHashSet::default();
    visited.insert(start);
    let mut pending = vec![start];
    while let Some(grouping) = pending.pop() {
        if enclosing.contains(&grouping) {
            return true;
        }
        for id in graph.walk(grouping) {
            let Some(next) = graph.node(id).uses_info().and_then(|i| i.grouping.resolved) else {
                continue;
            };
            if next == start {
                return true;
            }
            if visited.insert(next) {
                pending.push(next);
            }
        }
    }
    false
}
