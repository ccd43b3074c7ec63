//! PLY header scanning.
//!
//! Reads the ASCII header that precedes both ASCII and binary PLY bodies and
//! records the declared elements with their property layouts. The record
//! stream after `end_header` is left to the body decoder.

use crate::error::PlyLoadError;
use std::io::BufRead;

/// Encoding of the record stream following the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl PlyFormat {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "ascii" => Some(Self::Ascii),
            "binary_little_endian" => Some(Self::BinaryLittleEndian),
            "binary_big_endian" => Some(Self::BinaryBigEndian),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlyFormat::Ascii => "ascii",
            PlyFormat::BinaryLittleEndian => "binary_little_endian",
            PlyFormat::BinaryBigEndian => "binary_big_endian",
        }
    }
}

/// Scalar storage type of a property or list component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "char" | "int8" => Some(Self::Char),
            "uchar" | "uint8" => Some(Self::UChar),
            "short" | "int16" => Some(Self::Short),
            "ushort" | "uint16" => Some(Self::UShort),
            "int" | "int32" => Some(Self::Int),
            "uint" | "uint32" => Some(Self::UInt),
            "float" | "float32" => Some(Self::Float),
            "double" | "float64" => Some(Self::Double),
            _ => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ScalarType::Float | ScalarType::Double)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Scalar(ScalarType),
    List { count: ScalarType, item: ScalarType },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDef {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PropertyDef>,
}

impl ElementDef {
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn has_scalar(&self, name: &str) -> bool {
        matches!(
            self.property(name),
            Some(PropertyDef {
                kind: PropertyKind::Scalar(_),
                ..
            })
        )
    }

    /// Storage type of a scalar property, if declared.
    pub fn scalar_type(&self, name: &str) -> Option<ScalarType> {
        match self.property(name)?.kind {
            PropertyKind::Scalar(ty) => Some(ty),
            PropertyKind::List { .. } => None,
        }
    }

    /// First list property among `names`, in the given order.
    pub fn list_property(&self, names: &[&str]) -> Option<&PropertyDef> {
        names.iter().find_map(|name| {
            self.property(name)
                .filter(|p| matches!(p.kind, PropertyKind::List { .. }))
        })
    }
}

/// Parsed PLY header.
#[derive(Debug, Clone)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub comments: Vec<String>,
    pub elements: Vec<ElementDef>,
}

impl PlyHeader {
    /// Read the header from the start of `reader`, consuming `end_header`.
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Self, PlyLoadError> {
        let mut line = String::new();
        let mut line_number = 1usize;

        if !next_line(reader, &mut line)? || line.trim_end() != "ply" {
            return Err(PlyLoadError::Header("missing 'ply' magic".to_string()));
        }

        let mut format = None;
        let mut comments = Vec::new();
        let mut elements: Vec<ElementDef> = Vec::new();
        let mut terminated = false;

        while next_line(reader, &mut line)? {
            line_number += 1;
            let mut tokens = line.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };

            match keyword {
                "format" => {
                    let encoding = tokens.next().and_then(PlyFormat::parse).ok_or_else(|| {
                        PlyLoadError::Header(format!("unsupported format line: {}", line.trim()))
                    })?;
                    match tokens.next() {
                        Some("1.0") => {}
                        other => {
                            return Err(PlyLoadError::Header(format!(
                                "unsupported PLY version: {}",
                                other.unwrap_or("<missing>")
                            )));
                        }
                    }
                    format = Some(encoding);
                }
                "comment" | "obj_info" => {
                    let text = line.trim()[keyword.len()..].trim().to_string();
                    comments.push(text);
                }
                "element" => {
                    let (Some(name), Some(count), None) =
                        (tokens.next(), tokens.next(), tokens.next())
                    else {
                        return Err(PlyLoadError::Header(format!(
                            "malformed element declaration: {}",
                            line.trim()
                        )));
                    };
                    let count = count.parse::<usize>().map_err(|_| {
                        PlyLoadError::Header(format!("invalid count for element '{}'", name))
                    })?;
                    elements.push(ElementDef {
                        name: name.to_string(),
                        count,
                        properties: Vec::new(),
                    });
                }
                "property" => {
                    let element = elements.last_mut().ok_or_else(|| {
                        PlyLoadError::Header("property declared before any element".to_string())
                    })?;
                    let property = parse_property(tokens.collect()).ok_or_else(|| {
                        PlyLoadError::Header(format!(
                            "malformed property declaration: {}",
                            line.trim()
                        ))
                    })?;
                    if element.property(&property.name).is_some() {
                        return Err(PlyLoadError::Header(format!(
                            "duplicate property '{}' in element '{}'",
                            property.name, element.name
                        )));
                    }
                    element.properties.push(property);
                }
                "end_header" => {
                    terminated = true;
                    break;
                }
                other => {
                    return Err(PlyLoadError::Header(format!(
                        "unexpected header keyword '{}' on line {}",
                        other, line_number
                    )));
                }
            }
        }

        if !terminated {
            return Err(PlyLoadError::Header("missing 'end_header'".to_string()));
        }
        let format =
            format.ok_or_else(|| PlyLoadError::Header("missing 'format' line".to_string()))?;

        Ok(Self {
            format,
            comments,
            elements,
        })
    }

    pub fn element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }
}

fn next_line<R: BufRead>(reader: &mut R, line: &mut String) -> Result<bool, PlyLoadError> {
    line.clear();
    Ok(reader.read_line(line)? > 0)
}

fn parse_property(tokens: Vec<&str>) -> Option<PropertyDef> {
    match tokens.as_slice() {
        ["list", count, item, name] => Some(PropertyDef {
            name: name.to_string(),
            kind: PropertyKind::List {
                count: ScalarType::parse(count)?,
                item: ScalarType::parse(item)?,
            },
        }),
        [ty, name] => Some(PropertyDef {
            name: name.to_string(),
            kind: PropertyKind::Scalar(ScalarType::parse(ty)?),
        }),
        _ => None,
    }
}
