//! Binary module snapshots.
//!
//! A snapshot file is the four magic bytes `YSNP`, a little-endian `u16`
//! format version, then the bincode encoding of a [`ModuleSnapshot`].

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;
use yang_schema::ModuleSnapshot;

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"YSNP";
pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;
pub const SNAPSHOT_EXTENSION: &str = "ysnp";

const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + 2;

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("{path} is not a module snapshot")]
    #[diagnostic(code("SNAP-001"))]
    BadMagic { path: PathBuf },

    #[error("{path} uses snapshot format {found}, expected {expected}")]
    #[diagnostic(
        code("SNAP-002"),
        help("Recompile the dependency with this version of yangc")
    )]
    UnsupportedVersion {
        path: PathBuf,
        found: u16,
        expected: u16,
    },

    #[error("Corrupt snapshot {path}: {reason}")]
    #[diagnostic(code("SNAP-003"))]
    Corrupt { path: PathBuf, reason: String },

    #[error("Error accessing snapshot {path}: {reason}")]
    #[diagnostic(code("SNAP-004"))]
    Io { path: PathBuf, reason: String },

    #[error("Snapshot {path} holds module {found}, manifest expects {expected}")]
    #[diagnostic(code("SNAP-005"))]
    ModuleMismatch {
        path: PathBuf,
        found: String,
        expected: String,
    },
}

/// File name of the snapshot of module `name`, e.g. `ietf-types@2013-07-15.ysnp`.
pub fn snapshot_file_name(name: &str, revision: Option<&str>) -> String {
    match revision {
        Some(revision) => format!("{name}@{revision}.{SNAPSHOT_EXTENSION}"),
        None => format!("{name}.{SNAPSHOT_EXTENSION}"),
    }
}

pub fn encode(snapshot: &ModuleSnapshot, path: &Path) -> Result<Vec<u8>, SnapshotError> {
    let payload = bincode::serialize(snapshot).map_err(|e| SnapshotError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&SNAPSHOT_MAGIC);
    bytes.extend_from_slice(&SNAPSHOT_FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// `path` only labels errors.
pub fn decode(bytes: &[u8], path: &Path) -> Result<ModuleSnapshot, SnapshotError> {
    if bytes.len() < HEADER_LEN || bytes[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
        return Err(SnapshotError::BadMagic {
            path: path.to_path_buf(),
        });
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != SNAPSHOT_FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: version,
            expected: SNAPSHOT_FORMAT_VERSION,
        });
    }
    bincode::deserialize(&bytes[HEADER_LEN..]).map_err(|e| SnapshotError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

pub fn write_snapshot(snapshot: &ModuleSnapshot, path: &Path) -> Result<(), SnapshotError> {
    let bytes = encode(snapshot, path)?;
    std::fs::write(path, bytes).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    log::trace!("wrote snapshot of {} to {}", snapshot.name, path.display());
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<ModuleSnapshot, SnapshotError> {
    let bytes = std::fs::read(path).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    decode(&bytes, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(name: &str) -> ModuleSnapshot {
        ModuleSnapshot {
            name: name.into(),
            revision: Some("2024-03-01".into()),
            nodes: vec![],
            leaves: vec![],
        }
    }

    #[test]
    fn test_file_names_carry_the_revision() {
        assert_eq!(snapshot_file_name("types", Some("2024-03-01")), "types@2024-03-01.ysnp");
        assert_eq!(snapshot_file_name("types", None), "types.ysnp");
    }

    #[test]
    fn test_header_is_magic_then_version() {
        let bytes = encode(&empty("m"), Path::new("m.ysnp")).unwrap();
        assert_eq!(&bytes[..4], b"YSNP");
        assert_eq!(&bytes[4..6], &[1, 0]);
        assert_eq!(decode(&bytes, Path::new("m.ysnp")).unwrap(), empty("m"));
    }

    #[test]
    fn test_rejects_foreign_files() {
        let err = decode(b"PK\x03\x04 not a snapshot", Path::new("x.ysnp")).unwrap_err();
        assert!(matches!(err, SnapshotError::BadMagic { .. }));
        let err = decode(b"YS", Path::new("x.ysnp")).unwrap_err();
        assert!(matches!(err, SnapshotError::BadMagic { .. }));
    }

    #[test]
    fn test_rejects_newer_format() {
        let mut bytes = encode(&empty("m"), Path::new("m.ysnp")).unwrap();
        bytes[4] = 9;
        let err = decode(&bytes, Path::new("m.ysnp")).unwrap_err();
        assert_eq!(
            err,
            SnapshotError::UnsupportedVersion {
                path: PathBuf::from("m.ysnp"),
                found: 9,
                expected: 1,
            }
        );
    }

    #[test]
    fn test_truncated_payload_is_corrupt() {
        let bytes = encode(&empty("module-with-a-name"), Path::new("m.ysnp")).unwrap();
        let err = decode(&bytes[..10], Path::new("m.ysnp")).unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupt { .. }));
    }
}
