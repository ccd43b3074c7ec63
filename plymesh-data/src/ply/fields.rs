//! Mapping from declared vertex properties to per-vertex attributes.

use super::header::ElementDef;
use crate::error::PlyLoadError;

bitflags::bitflags! {
    /// Per-vertex attributes present in a PLY vertex element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VertexFields: u8 {
        const XYZ = 1;
        const NORMALS = 2;
        const RGB = 4;
        const AMBIENT = 8;
        const DIFFUSE = 16;
        const SPECULAR = 32;
        const RGBA = 64;
        const TEXCOORD = 128;
    }
}

/// One of the color channels a vertex may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChannel {
    Rgb,
    Ambient,
    Diffuse,
    Specular,
    Rgba,
}

impl ColorChannel {
    pub const ALL: [ColorChannel; 5] = [
        ColorChannel::Rgb,
        ColorChannel::Ambient,
        ColorChannel::Diffuse,
        ColorChannel::Specular,
        ColorChannel::Rgba,
    ];

    /// Order in which a single channel is chosen for the assembled mesh.
    pub const PRECEDENCE: [ColorChannel; 5] = [
        ColorChannel::Rgba,
        ColorChannel::Rgb,
        ColorChannel::Diffuse,
        ColorChannel::Ambient,
        ColorChannel::Specular,
    ];

    pub fn field(&self) -> VertexFields {
        match self {
            ColorChannel::Rgb => VertexFields::RGB,
            ColorChannel::Ambient => VertexFields::AMBIENT,
            ColorChannel::Diffuse => VertexFields::DIFFUSE,
            ColorChannel::Specular => VertexFields::SPECULAR,
            ColorChannel::Rgba => VertexFields::RGBA,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ColorChannel::Rgb => 0,
            ColorChannel::Ambient => 1,
            ColorChannel::Diffuse => 2,
            ColorChannel::Specular => 3,
            ColorChannel::Rgba => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorChannel::Rgb => "rgb",
            ColorChannel::Ambient => "ambient",
            ColorChannel::Diffuse => "diffuse",
            ColorChannel::Specular => "specular",
            ColorChannel::Rgba => "rgba",
        }
    }

    /// Property names as (red, green, blue, optional alpha).
    fn property_names(&self) -> [String; 4] {
        match self {
            ColorChannel::Rgb => ["red", "green", "blue", "alpha"].map(String::from),
            ColorChannel::Rgba => ["r", "g", "b", "a"].map(String::from),
            ColorChannel::Ambient | ColorChannel::Diffuse | ColorChannel::Specular => {
                let prefix = self.as_str();
                ["red", "green", "blue", "alpha"].map(|c| format!("{prefix}_{c}"))
            }
        }
    }

    /// Whether the alpha component must be declared for the channel to count as present.
    fn requires_alpha(&self) -> bool {
        matches!(self, ColorChannel::Rgba)
    }
}

/// Property names and scaling used to read one color channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorLayout {
    pub channel: ColorChannel,
    pub components: [String; 3],
    /// Integer components are stored as 0-255 and divided down to 0-1.
    pub scales: [f32; 3],
    pub alpha: Option<(String, f32)>,
}

fn component_scale(vertex: &ElementDef, name: &str) -> f32 {
    if vertex.scalar_type(name).is_some_and(|ty| ty.is_float()) {
        1.0
    } else {
        1.0 / 255.0
    }
}

const NORMAL_NAMES: [&str; 3] = ["nx", "ny", "nz"];
const TEXCOORD_NAMES: [[&str; 2]; 3] = [["s", "t"], ["u", "v"], ["texture_u", "texture_v"]];

/// Resolved per-vertex read plan for one PLY vertex element.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLayout {
    pub fields: VertexFields,
    pub colors: Vec<ColorLayout>,
    pub texcoord: Option<[&'static str; 2]>,
}

impl VertexLayout {
    pub const POSITION: [&'static str; 3] = ["x", "y", "z"];
    pub const NORMALS: [&'static str; 3] = NORMAL_NAMES;

    /// Build the read plan from the declared vertex properties. Unknown properties are ignored.
    pub fn from_element(vertex: &ElementDef, ignore_colors: bool) -> Result<Self, PlyLoadError> {
        if !Self::POSITION.iter().all(|name| vertex.has_scalar(name)) {
            return Err(PlyLoadError::Header(
                "vertex element must declare scalar x, y and z properties".to_string(),
            ));
        }

        let mut fields = VertexFields::XYZ;

        if NORMAL_NAMES.iter().all(|name| vertex.has_scalar(name)) {
            fields |= VertexFields::NORMALS;
        }

        let mut colors = Vec::new();
        if !ignore_colors {
            for channel in ColorChannel::ALL {
                let [r, g, b, a] = channel.property_names();
                if ![&r, &g, &b].iter().all(|name| vertex.has_scalar(name)) {
                    continue;
                }
                let has_alpha = vertex.has_scalar(&a);
                if channel.requires_alpha() && !has_alpha {
                    continue;
                }

                let scales = [&r, &g, &b].map(|name| component_scale(vertex, name));
                let alpha = has_alpha.then(|| {
                    let scale = component_scale(vertex, &a);
                    (a, scale)
                });
                fields |= channel.field();
                colors.push(ColorLayout {
                    channel,
                    components: [r, g, b],
                    scales,
                    alpha,
                });
            }
        }

        let texcoord = TEXCOORD_NAMES
            .into_iter()
            .find(|names| names.iter().all(|name| vertex.has_scalar(name)));
        if texcoord.is_some() {
            fields |= VertexFields::TEXCOORD;
        }

        Ok(Self {
            fields,
            colors,
            texcoord,
        })
    }

    pub fn has(&self, fields: VertexFields) -> bool {
        self.fields.contains(fields)
    }
}
