//! Compilation pipeline of the yangc schema compiler.
//!
//! [`Compiler`] ties the other crates together: it reads `yang.toml`,
//! imports the snapshots of dependency models, parses and links every schema
//! file, then writes one snapshot per module plus a `yang-model.toml`
//! manifest and drives a [`CodeEmitter`] over the modules in dependency
//! order. Compilations are serialized process-wide.

pub mod compiler;
pub mod emitter;
pub mod error;
pub mod manifest;
pub mod snapshot;

pub use compiler::{Compilation, CompileSummary, Compiler};
pub use emitter::{render_tree, CodeEmitter, RecordingEmitter, TreeWriter};
pub use error::{CompilerError, CompilerResult};
pub use manifest::{ManifestEntry, ModelManifest, MANIFEST_FILE_NAME, MANIFEST_FORMAT_VERSION};
pub use snapshot::{
    read_snapshot, snapshot_file_name, write_snapshot, SnapshotError, SNAPSHOT_FORMAT_VERSION,
    SNAPSHOT_MAGIC,
};
