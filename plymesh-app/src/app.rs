//! Option resolution, logging setup and the load/report run.

use crate::Args;
use plymesh_data::{ErrorKind, LoadOptions, OptionsError, PlyLoadError, load_mesh_from_ply};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Options(#[from] OptionsError),

    #[error("{0}")]
    Load(#[from] PlyLoadError),

    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit code: 1 file, 2 format, 3 consistency, 4 options.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Load(e) => match e.kind() {
                ErrorKind::File => 1,
                ErrorKind::Format => 2,
                ErrorKind::Consistency => 3,
            },
            AppError::Options(_) => 4,
            AppError::Serialize(_) => 1,
        }
    }
}

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    fn init(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.level)),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge the option string with explicit flags; flags win.
pub fn resolve_options(args: &Args) -> Result<LoadOptions, OptionsError> {
    let mut options = LoadOptions::from_option_string(&args.options)?;
    options.invert_faces |= args.invert_faces;
    options.ignore_colors |= args.ignore_colors;
    options.generate_normals |= args.generate_normals;
    options.transform |= args.transform;
    if let Some(offset_x) = args.offset_x {
        options.offset_x = offset_x;
    }
    if let Some(offset_y) = args.offset_y {
        options.offset_y = offset_y;
    }
    if let Some(rotation) = args.rotation {
        options.rotation = rotation;
    }
    Ok(options)
}

pub fn run(args: Args) -> Result<(), AppError> {
    LoggingConfig {
        level: args.log_level.clone(),
    }
    .init();

    let options = resolve_options(&args)?;
    info!("Loading {} with {:?}", args.file.display(), options);

    let Some(mesh) = load_mesh_from_ply(&args.file, &options)? else {
        if args.json {
            println!("null");
        } else {
            println!("{}: no vertices", args.file.display());
        }
        return Ok(());
    };

    let summary = mesh.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", args.file.display());
    println!("  vertices:  {}", summary.vertices);
    println!("  triangles: {}", summary.triangles);
    println!("  quads:     {}", summary.quads);
    println!("  normals:   {}", if summary.has_normals { "yes" } else { "no" });
    println!(
        "  colors:    {}",
        summary.color_channel.map_or("none", |c| c.as_str())
    );
    println!("  texcoords: {}", if summary.has_texcoords { "yes" } else { "no" });
    if let Some((min, max)) = mesh.bounds() {
        println!("  bounds:    {} .. {}", min, max);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_option_string() {
        let args = Args::parse_from([
            "plymesh",
            "mesh.ply",
            "--options",
            "transform offsetX=5 offsetY=1",
            "--offset-x",
            "-2.5",
            "--invert-faces",
        ]);
        let options = resolve_options(&args).unwrap();
        assert!(options.transform);
        assert!(options.invert_faces);
        assert_eq!(options.offset_x, -2.5);
        assert_eq!(options.offset_y, 1.0);
    }

    #[test]
    fn test_bad_option_string_exit_code() {
        let args = Args::parse_from(["plymesh", "mesh.ply", "--options", "offsetY=up"]);
        let err = AppError::from(resolve_options(&args).unwrap_err());
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_load_error_exit_codes() {
        let err = AppError::from(PlyLoadError::FaceShape { face: 2, count: 6 });
        assert_eq!(err.exit_code(), 3);
        let err = AppError::from(PlyLoadError::Header("bad".to_string()));
        assert_eq!(err.exit_code(), 2);
    }
}
