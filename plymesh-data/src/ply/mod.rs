//! PLY file loading and parsing

mod fields;
mod header;
mod loader;

pub use fields::{ColorChannel, ColorLayout, VertexFields, VertexLayout};
pub use header::{ElementDef, PlyFormat, PlyHeader, PropertyDef, PropertyKind, ScalarType};
pub use loader::{VertexData, load_mesh_from_ply, read_ply_file};
