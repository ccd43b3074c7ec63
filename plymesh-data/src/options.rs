//! Load options and the host-style option string parser.

use crate::transform::Transformation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Empty option key in '{0}'")]
    EmptyKey(String),

    #[error("Invalid option value: {0}")]
    InvalidValue(#[from] serde_json::Error),
}

/// Options controlling one PLY load. Set before parsing and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadOptions {
    /// Reverse the index order of every face.
    pub invert_faces: bool,
    /// Skip all color channels even when the file declares them.
    pub ignore_colors: bool,
    /// Compute smooth vertex normals when the file has none.
    pub generate_normals: bool,
    /// Apply the offset/rotation transform to positions.
    pub transform: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Rotation angle in radians.
    #[serde(alias = "alpha")]
    pub rotation: f64,
}

const KNOWN_KEYS: [&str; 8] = [
    "invertFaces",
    "ignoreColors",
    "generateNormals",
    "transform",
    "offsetX",
    "offsetY",
    "rotation",
    "alpha",
];

impl LoadOptions {
    /// Parse an option string such as `"invertFaces transform offsetX=5 rotation=1.57"`.
    ///
    /// Tokens are separated by whitespace or commas. A bare key sets a boolean
    /// option; `key=value` sets any option. Unknown keys are ignored.
    pub fn from_option_string(options: &str) -> Result<Self, OptionsError> {
        let mut map = Map::new();

        for token in options
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key.trim(), parse_value(value.trim())),
                None => (token, JsonValue::Bool(true)),
            };

            if key.is_empty() {
                return Err(OptionsError::EmptyKey(token.to_string()));
            }
            if !KNOWN_KEYS.contains(&key) {
                warn!("Ignoring unknown PLY option '{}'", key);
                continue;
            }
            map.insert(key.to_string(), value);
        }

        Ok(serde_json::from_value(JsonValue::Object(map))?)
    }

    /// The transform to apply, if enabled.
    pub fn transformation(&self) -> Option<Transformation> {
        self.transform
            .then(|| Transformation::new(self.offset_x, self.offset_y, self.rotation))
    }
}

fn parse_value(value: &str) -> JsonValue {
    match value {
        "true" | "on" | "yes" => JsonValue::Bool(true),
        "false" | "off" | "no" => JsonValue::Bool(false),
        _ => value
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(value.to_string())),
    }
}
