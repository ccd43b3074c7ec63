//! Plymesh Data Crate
//!
//! Loads PLY meshes into flat vertex attribute arrays and triangle/quad index
//! lists, with an optional planar offset and rotation applied to positions.
//! This crate is GPU-agnostic; [`Mesh::interleaved_vertices`] gives a
//! `bytemuck`-castable layout for upload.

pub mod error;
pub mod mesh;
pub mod normals;
pub mod options;
pub mod ply;
pub mod transform;

pub use error::{ErrorKind, PlyLoadError};
pub use mesh::{Mesh, MeshSummary, MeshVertex, PrimitiveMode, PrimitiveSet};
pub use options::{LoadOptions, OptionsError};
pub use ply::{ColorChannel, VertexData, VertexFields, load_mesh_from_ply, read_ply_file};
pub use transform::Transformation;
