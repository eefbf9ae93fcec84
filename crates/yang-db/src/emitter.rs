use std::path::PathBuf;

use yang_schema::{NodeId, NodeKind, NodeType, SchemaGraph};

use crate::error::{CompilerError, CompilerResult};

/// Backend receiving the resolved schema, one module or submodule at a
/// time, in dependency order.
pub trait CodeEmitter {
    fn emit_module(&mut self, graph: &SchemaGraph, root: NodeId) -> CompilerResult<()>;
}

/// Writes `<module>.tree` files with the plain data tree of each module.
#[derive(Debug, Clone)]
pub struct TreeWriter {
    out_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl TreeWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            written: vec![],
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl CodeEmitter for TreeWriter {
    fn emit_module(&mut self, graph: &SchemaGraph, root: NodeId) -> CompilerResult<()> {
        std::fs::create_dir_all(&self.out_dir)
            .map_err(|e| CompilerError::output(&self.out_dir, e))?;
        let path = self.out_dir.join(format!("{}.tree", graph.node(root).name));
        std::fs::write(&path, render_tree(graph, root))
            .map_err(|e| CompilerError::output(&path, e))?;
        log::debug!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Keeps the emission order in memory; used where only the order matters.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmitter {
    pub modules: Vec<String>,
}

impl CodeEmitter for RecordingEmitter {
    fn emit_module(&mut self, graph: &SchemaGraph, root: NodeId) -> CompilerResult<()> {
        self.modules.push(graph.node(root).name.clone());
        Ok(())
    }
}

/// Renders the instantiated data tree below `root`.
///
/// Groupings, typedefs and identities are definitions, not data, and are
/// left out; `uses` statements are invisible since their copies sit next to
/// them. Augments are listed after the module's own data with their target.
pub fn render_tree(graph: &SchemaGraph, root: NodeId) -> String {
    let node = graph.node(root);
    let mut out = match (&node.kind, node.module_info()) {
        (NodeKind::Submodule(_), Some(info)) => match &info.belongs_to {
            Some(parent) => format!("submodule: {} (belongs-to {})\n", node.name, parent.name),
            None => format!("submodule: {}\n", node.name),
        },
        _ => format!("module: {}\n", node.name),
    };

    write_body(graph, root, 1, &mut out);
    for child in graph.children(root) {
        if let NodeKind::Augment(info) = &graph.node(child).kind {
            out.push_str(&format!("  augment {}\n", info.target_path));
            write_body(graph, child, 2, &mut out);
        }
    }
    out
}

fn write_body(graph: &SchemaGraph, id: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for leaf in graph.all_leaves(id) {
        let leaf = graph.leaf(leaf);
        out.push_str(&format!("{indent}{} {}: {}", leaf.construct(), leaf.name, leaf.ty.name));
        if leaf.mandatory {
            out.push_str(" (mandatory)");
        }
        if let Some(default) = &leaf.default {
            out.push_str(&format!(" = {default}"));
        }
        out.push('\n');
    }

    for child in graph.children(id) {
        let node = graph.node(child);
        match node.node_type() {
            NodeType::Uses
            | NodeType::Grouping
            | NodeType::Typedef
            | NodeType::Identity
            | NodeType::Augment => continue,
            _ => {}
        }
        out.push_str(&format!("{indent}{} {}", node.construct(), node.name));
        match &node.kind {
            NodeKind::List(info) if !info.keys.is_empty() => {
                out.push_str(&format!(" [{}]", info.keys.join(" ")));
            }
            NodeKind::Choice(info) if info.mandatory => out.push_str(" (mandatory)"),
            _ => {}
        }
        out.push('\n');
        write_body(graph, child, depth + 1, out);
    }
}
