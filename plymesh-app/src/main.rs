//! Plymesh
//!
//! Loads a PLY mesh with host-style options and reports what was built:
//! vertex and face counts, present attributes, chosen color channel and bounds.

mod app;

use clap::Parser;
use std::path::PathBuf;

/// Plymesh - PLY mesh loader and inspector
#[derive(Parser, Debug)]
#[command(name = "plymesh")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to PLY file to load
    pub file: PathBuf,

    /// Host-style option string, e.g. "invertFaces transform offsetX=5"
    #[arg(short, long, default_value = "")]
    pub options: String,

    /// Reverse face winding order
    #[arg(long)]
    pub invert_faces: bool,

    /// Do not read any vertex color channel
    #[arg(long)]
    pub ignore_colors: bool,

    /// Compute smooth normals when the file has none
    #[arg(long)]
    pub generate_normals: bool,

    /// Apply the offset/rotation transform to positions
    #[arg(long)]
    pub transform: bool,

    /// X translation applied with --transform
    #[arg(long, allow_negative_numbers = true)]
    pub offset_x: Option<f64>,

    /// Y translation applied with --transform
    #[arg(long, allow_negative_numbers = true)]
    pub offset_y: Option<f64>,

    /// Rotation angle in radians applied with --transform
    #[arg(long, alias = "alpha", allow_negative_numbers = true)]
    pub rotation: Option<f64>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = app::run(args) {
        eprintln!("Application error: {}", e);
        std::process::exit(e.exit_code());
    }
}
