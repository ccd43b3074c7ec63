//! Error types for PLY mesh loading.

use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a load failure, used by tooling to report a precise diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file could not be opened or read.
    File,
    /// The header or record stream does not follow the PLY format.
    Format,
    /// The records are well-formed but describe an inconsistent mesh.
    Consistency,
}

/// Errors that abort a PLY load. No partial mesh is produced when one is returned.
#[derive(Debug, Error)]
pub enum PlyLoadError {
    #[error("Failed to open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PLY header error: {0}")]
    Header(String),

    #[error("PLY record error: {0}")]
    RecordRead(String),

    #[error("Face {face} has {count} indices (only triangles and quads are supported)")]
    FaceShape { face: usize, count: usize },

    #[error("Face {face} references vertex {index} but only {vertex_count} vertices exist")]
    Referential {
        face: usize,
        index: i64,
        vertex_count: usize,
    },
}

impl PlyLoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlyLoadError::FileOpen { .. } | PlyLoadError::Io(_) => ErrorKind::File,
            PlyLoadError::Header(_) | PlyLoadError::RecordRead(_) => ErrorKind::Format,
            PlyLoadError::FaceShape { .. } | PlyLoadError::Referential { .. } => {
                ErrorKind::Consistency
            }
        }
    }
}
