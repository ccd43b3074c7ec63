//! PLY mesh loading.

use super::fields::{ColorChannel, ColorLayout, VertexFields, VertexLayout};
use super::header::{PlyHeader, PropertyKind};
use crate::error::PlyLoadError;
use crate::mesh::Mesh;
use crate::normals::smooth_normals;
use crate::options::LoadOptions;
use glam::{Vec2, Vec3, Vec4};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Seek};
use std::path::Path;
use tracing::{debug, info, warn};

const FACE_INDEX_NAMES: [&str; 2] = ["vertex_indices", "vertex_index"];

type PlyRow = HashMap<String, JsonValue>;

// Every element is decoded as rows of maps so elements other than vertex and
// face can be read and dropped
type PlyBody = HashMap<String, Vec<PlyRow>>;

// Face structure for PLY files
#[derive(Debug)]
struct PlyFace {
    vertex_indices: Vec<i64>,
}

impl PlyFace {
    fn from_row(row: &PlyRow, index: usize) -> Result<Self, PlyLoadError> {
        let list = FACE_INDEX_NAMES
            .iter()
            .find_map(|name| row.get(*name))
            .and_then(JsonValue::as_array)
            .ok_or_else(|| {
                PlyLoadError::RecordRead(format!("Missing vertex index list at face {}", index))
            })?;

        let vertex_indices = list
            .iter()
            .map(JsonValue::as_i64)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                PlyLoadError::RecordRead(format!("Non-integer vertex index at face {}", index))
            })?;

        Ok(Self { vertex_indices })
    }
}

/// Accumulates the flat vertex and face arrays of a single PLY load.
///
/// A `VertexData` is consumed by [`VertexData::read_ply_file`], so every load
/// starts from a fresh instance.
#[derive(Debug, Default)]
pub struct VertexData {
    options: LoadOptions,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: [Vec<Vec4>; 5],
    texcoords: Vec<Vec2>,
    triangles: Vec<u32>,
    quads: Vec<u32>,
}

impl VertexData {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Reverse the winding of every face read from now on.
    pub fn use_inverted_faces(&mut self) {
        self.options.invert_faces = true;
    }

    /// Take transform settings from a parsed option set, leaving face and color settings alone.
    pub fn set_transformation(&mut self, options: &LoadOptions) {
        self.options.transform = options.transform;
        self.options.offset_x = options.offset_x;
        self.options.offset_y = options.offset_y;
        self.options.rotation = options.rotation;
    }

    /// Load `path` into a mesh.
    ///
    /// Returns `Ok(None)` when the file declares no vertices. Any failure aborts
    /// the whole load; no partial mesh is returned.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn read_ply_file(
        mut self,
        path: impl AsRef<Path>,
        ignore_colors: bool,
    ) -> Result<Option<Mesh>, PlyLoadError> {
        let path = path.as_ref();
        let ignore_colors = ignore_colors || self.options.ignore_colors;
        debug!("Loading PLY mesh from: {}", path.display());

        let file = File::open(path).map_err(|source| PlyLoadError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = BufReader::new(file);

        let header = PlyHeader::read(&mut reader).inspect_err(|e| {
            warn!("Failed to parse PLY header: {}", e);
        })?;

        let vertex_element = header
            .element("vertex")
            .ok_or_else(|| PlyLoadError::Header("no vertex element declared".to_string()))?;
        let layout = VertexLayout::from_element(vertex_element, ignore_colors)?;
        let vertex_count = vertex_element.count;

        let face_count = match header.element("face") {
            Some(face) if face.count > 0 => {
                match face.list_property(&FACE_INDEX_NAMES).map(|p| p.kind) {
                    Some(PropertyKind::List { count, item })
                        if !count.is_float() && !item.is_float() => {}
                    Some(_) => {
                        return Err(PlyLoadError::Header(
                            "face vertex index list must use integer types".to_string(),
                        ));
                    }
                    None => {
                        return Err(PlyLoadError::Header(
                            "face element has no vertex_indices list".to_string(),
                        ));
                    }
                }
                face.count
            }
            _ => 0,
        };

        for comment in &header.comments {
            debug!("PLY comment: {}", comment);
        }
        info!(
            "PLY header parsed ({}): {} vertices, {} faces, fields {:?}",
            header.format.as_str(),
            vertex_count,
            face_count,
            layout.fields
        );

        if vertex_count == 0 {
            info!("PLY file declares no vertices, nothing to build");
            return Ok(None);
        }

        reader.rewind()?;
        let mut body: PlyBody = serde_ply::from_reader(reader).map_err(|e| {
            warn!("Failed to parse PLY records: {}", e);
            PlyLoadError::RecordRead(e.to_string())
        })?;

        let vertices = body.remove("vertex").unwrap_or_default();
        let face_rows = body.remove("face").unwrap_or_default();
        for (name, rows) in &body {
            debug!("Ignoring element '{}' ({} rows)", name, rows.len());
        }

        if vertices.len() != vertex_count {
            return Err(PlyLoadError::RecordRead(format!(
                "header announced {} vertices but {} were read",
                vertex_count,
                vertices.len()
            )));
        }
        if face_rows.len() != face_count {
            return Err(PlyLoadError::RecordRead(format!(
                "header announced {} faces but {} were read",
                face_count,
                face_rows.len()
            )));
        }

        self.read_vertices(&vertices, &layout)?;
        debug!("Read {} vertices", self.positions.len());

        let faces = face_rows
            .iter()
            .enumerate()
            .map(|(i, row)| PlyFace::from_row(row, i))
            .collect::<Result<Vec<_>, _>>()?;
        self.read_faces(&faces)?;
        debug!(
            "Read {} triangles and {} quads",
            self.triangles.len() / 3,
            self.quads.len() / 4
        );

        match self.options.transformation() {
            Some(transformation) => {
                transformation.apply_all(&mut self.positions);
                debug!(
                    "Applied transform: offset ({}, {}), rotation {}",
                    transformation.offset_x(),
                    transformation.offset_y(),
                    transformation.alpha()
                );
            }
            None => debug!("Transform skipped"),
        }

        let mesh = self.assemble();
        info!(
            "PLY mesh assembled: {} vertices, {} triangles, {} quads",
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.quad_count()
        );
        Ok(Some(mesh))
    }

    fn read_vertices(
        &mut self,
        vertices: &[PlyRow],
        layout: &VertexLayout,
    ) -> Result<(), PlyLoadError> {
        self.positions.reserve(vertices.len());

        for (i, vertex) in vertices.iter().enumerate() {
            let [x, y, z] = VertexLayout::POSITION.map(|name| get_f32(vertex, name, i));
            self.positions.push(Vec3::new(x?, y?, z?));

            if layout.has(VertexFields::NORMALS) {
                let [nx, ny, nz] = VertexLayout::NORMALS.map(|name| get_f32(vertex, name, i));
                self.normals.push(Vec3::new(nx?, ny?, nz?));
            }

            for color in &layout.colors {
                let value = read_color(vertex, color, i)?;
                self.colors[color.channel.index()].push(value);
            }

            if let Some([s, t]) = layout.texcoord {
                self.texcoords
                    .push(Vec2::new(get_f32(vertex, s, i)?, get_f32(vertex, t, i)?));
            }
        }

        Ok(())
    }

    fn read_faces(&mut self, faces: &[PlyFace]) -> Result<(), PlyLoadError> {
        let vertex_count = self.positions.len();

        for (face_index, face) in faces.iter().enumerate() {
            let count = face.vertex_indices.len();
            if count != 3 && count != 4 {
                return Err(PlyLoadError::FaceShape {
                    face: face_index,
                    count,
                });
            }

            let mut indices = [0u32; 4];
            for (slot, &index) in indices.iter_mut().zip(&face.vertex_indices) {
                *slot = u32::try_from(index)
                    .ok()
                    .filter(|&i| (i as usize) < vertex_count)
                    .ok_or(PlyLoadError::Referential {
                        face: face_index,
                        index,
                        vertex_count,
                    })?;
            }

            let indices = &mut indices[..count];
            if self.options.invert_faces {
                indices.reverse();
            }

            if count == 3 {
                self.triangles.extend_from_slice(indices);
            } else {
                self.quads.extend_from_slice(indices);
            }
        }

        Ok(())
    }

    /// Move the accumulated arrays into a mesh, choosing one color channel.
    fn assemble(self) -> Mesh {
        let VertexData {
            options,
            positions,
            normals,
            mut colors,
            texcoords,
            triangles,
            quads,
        } = self;

        let color_channel = ColorChannel::PRECEDENCE
            .into_iter()
            .find(|channel| !colors[channel.index()].is_empty());
        let colors = color_channel.map(|channel| std::mem::take(&mut colors[channel.index()]));

        let normals = if !normals.is_empty() {
            Some(normals)
        } else if options.generate_normals && !(triangles.is_empty() && quads.is_empty()) {
            debug!("Generating smooth vertex normals");
            Some(smooth_normals(&positions, &triangles, &quads))
        } else {
            None
        };

        Mesh {
            positions,
            normals,
            colors,
            color_channel,
            texcoords: (!texcoords.is_empty()).then_some(texcoords),
            triangles,
            quads,
        }
    }
}

/// Load a PLY mesh with default options.
pub fn read_ply_file(
    path: impl AsRef<Path>,
    ignore_colors: bool,
) -> Result<Option<Mesh>, PlyLoadError> {
    VertexData::default().read_ply_file(path, ignore_colors)
}

/// Load a PLY mesh with the given options.
pub fn load_mesh_from_ply(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<Option<Mesh>, PlyLoadError> {
    VertexData::new(options.clone()).read_ply_file(path, options.ignore_colors)
}

fn get_f32(vertex: &PlyRow, name: &str, index: usize) -> Result<f32, PlyLoadError> {
    let value = match vertex.get(name) {
        Some(JsonValue::Number(n)) => n.as_f64().map(|f| f as f32),
        _ => None,
    };
    value.ok_or_else(|| PlyLoadError::RecordRead(format!("Missing '{}' at vertex {}", name, index)))
}

fn read_color(
    vertex: &PlyRow,
    layout: &ColorLayout,
    index: usize,
) -> Result<Vec4, PlyLoadError> {
    let [r, g, b] = &layout.components;
    let [r_scale, g_scale, b_scale] = layout.scales;
    let alpha = match &layout.alpha {
        Some((name, scale)) => get_f32(vertex, name, index)? * scale,
        None => 1.0,
    };
    Ok(Vec4::new(
        get_f32(vertex, r, index)? * r_scale,
        get_f32(vertex, g, index)? * g_scale,
        get_f32(vertex, b, index)? * b_scale,
        alpha,
    ))
}
