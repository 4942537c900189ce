//! sdfgen - generate signed distance fields from triangle meshes.
//!
//! Two grid sizing modes, chosen by the input extension:
//!
//! - OBJ: `sdfgen mesh.obj <dx> [padding]` - cell size drives the grid
//! - STL: `sdfgen mesh.stl <Nx> [Ny Nz] [padding]` - grid dimensions
//!   drive the cell size; with only `Nx`, the other axes follow the mesh
//!   aspect ratio
//!
//! Exit codes: 0 on success, 1 on argument/load errors, -1 (255) on
//! write failure.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;

use mesh_io::{load_mesh, write_sdf, SdfFile};
use mesh_repair::{analyze, repair, weld_vertices};
use mesh_sdf::{is_gpu_available, make_level_set, Backend, GridSpec, LevelSetParams};
use mesh_types::Mesh;

/// Welding tolerance applied to every loaded mesh; STL files duplicate
/// every shared vertex.
const WELD_TOLERANCE: f32 = 1e-5;

/// In STL mode, a second positional below this value is read as padding
/// rather than Ny (backward compatibility: `sdfgen mesh.stl 256 2`).
const PADDING_COMPAT_LIMIT: f32 = 20.0;

#[derive(Parser, Debug)]
#[command(name = "sdfgen")]
#[command(about = "Generate signed distance fields from triangle meshes")]
#[command(after_help = "\
Grid dimensions:
  OBJ: <dx> [padding]          cell size and padding cells
  STL: <Nx> [Ny Nz] [padding]  grid size (proportional or manual)

An STL second positional below 20 is treated as padding, for backward
compatibility with `sdfgen mesh.stl 256 2`.")]
struct Cli {
    /// Input mesh file (.obj or .stl)
    input: PathBuf,

    /// Grid dimensions (see below)
    #[arg(value_name = "DIMS", num_args = 1..=4, required = true)]
    dimensions: Vec<f32>,

    /// Force the CPU backend (skip GPU)
    #[arg(long)]
    cpu: bool,

    /// Repair non-watertight meshes (fill holes) before gridding
    #[arg(long)]
    fix: bool,

    /// CPU thread count (0 = auto)
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,

    /// Padding cells around the mesh bounding box
    #[arg(short = 'p', long, default_value_t = 1)]
    padding: usize,
}

/// A failure with the process exit code it maps to.
struct Failure {
    code: i32,
    error: anyhow::Error,
}

trait ExitCode<T> {
    fn or_exit(self, code: i32) -> Result<T, Failure>;
}

impl<T, E: Into<anyhow::Error>> ExitCode<T> for Result<T, E> {
    fn or_exit(self, code: i32) -> Result<T, Failure> {
        self.map_err(|e| Failure {
            code,
            error: e.into(),
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(failure) = run(&cli) {
        eprintln!("Error: {:#}", failure.error);
        std::process::exit(failure.code);
    }
}

fn run(cli: &Cli) -> Result<(), Failure> {
    let is_stl = cli
        .input
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase() == "stl")
        .unwrap_or(false);

    println!("sdfgen - SDF generation tool");
    println!("Input: {}", cli.input.display());

    let mut mesh = load_mesh(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))
        .or_exit(1)?;

    let welded = weld_vertices(&mut mesh, WELD_TOLERANCE);
    if welded > 0 {
        println!(
            "Welded {welded} duplicate vertices; mesh now has {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.face_count()
        );
    }

    let analysis = analyze(&mesh);
    println!("\n{analysis}\n");
    if !analysis.is_watertight && !cli.fix {
        println!("WARNING: mesh is not watertight; SDF signs may be incorrect.");
        println!("         Use --fix to attempt automatic hole filling.\n");
    }

    if cli.fix && !analysis.is_watertight {
        println!("Attempting mesh repair (--fix)...");
        // Already welded above
        let report = repair(&mut mesh, 0.0).or_exit(1)?;
        println!("{report}\n");
    }

    let (spec, stl_mode) = build_grid_spec(cli, &mesh, is_stl).or_exit(1)?;

    println!("Computing signed distance field...");
    println!(
        "  Grid: {} x {} x {} cells, dx = {}",
        spec.nx, spec.ny, spec.nz, spec.dx
    );
    println!("  Total cells: {}", spec.cell_count());

    let backend = if cli.cpu {
        println!("  Hardware: CPU forced (--cpu)");
        Backend::Cpu
    } else if is_gpu_available() {
        println!("  Hardware: GPU");
        Backend::Auto
    } else {
        println!("  Hardware: CPU (no GPU available)");
        Backend::Auto
    };

    let params = LevelSetParams {
        exact_band: 1,
        num_threads: cli.threads,
        backend,
    };
    let phi = make_level_set(&mesh, &spec, &params).or_exit(1)?;

    println!("SDF computation complete.\n");

    let outname = output_name(&cli.input, &spec, stl_mode);

    let values = phi.into_values();
    let inside_count = values.iter().filter(|&&d| d < 0.0).count();
    let total_count = values.len();

    let sdf = SdfFile {
        nx: spec.nx as i32,
        ny: spec.ny as i32,
        nz: spec.nz as i32,
        origin: [spec.origin.x, spec.origin.y, spec.origin.z],
        dx: spec.dx,
        values,
    };

    println!("Writing binary SDF to: {}", outname.display());
    write_sdf(&outname, &sdf)
        .with_context(|| format!("failed to write {}", outname.display()))
        .or_exit(-1)?;

    let file_size_mb = (36 + total_count * 4) as f64 / (1024.0 * 1024.0);
    println!("\nOutput summary");
    println!("  File: {}", outname.display());
    println!("  Dimensions: {} x {} x {}", spec.nx, spec.ny, spec.nz);
    println!("  Grid spacing (dx): {}", spec.dx);
    println!(
        "  Inside cells: {inside_count} / {total_count} ({:.1}%)",
        100.0 * inside_count as f64 / total_count as f64
    );
    println!("  File size: {file_size_mb:.2} MB");

    Ok(())
}

/// Turn the positional dimensions into a grid spec.
///
/// Returns the spec and whether STL naming (dimension suffix) applies.
fn build_grid_spec(cli: &Cli, mesh: &Mesh, is_stl: bool) -> anyhow::Result<(GridSpec, bool)> {
    let bounds = mesh.bounds();
    let dims = &cli.dimensions;
    let mut padding = cli.padding.max(1);

    if is_stl {
        let spec = match dims.len() {
            1 | 2 => {
                // Proportional mode; a small second positional is padding
                if dims.len() == 2 {
                    if dims[1] < PADDING_COMPAT_LIMIT {
                        padding = (dims[1] as usize).max(1);
                    } else {
                        return Err(anyhow!(
                            "STL mode takes <Nx> or <Nx Ny Nz>; for Ny give all three dimensions"
                        ));
                    }
                }
                let nx = positive_dim(dims[0], "Nx")?;
                GridSpec::from_nx_proportional(&bounds, nx, padding)?
            }
            _ => {
                if dims.len() == 4 {
                    padding = (dims[3] as usize).max(1);
                }
                let nx = positive_dim(dims[0], "Nx")?;
                let ny = positive_dim(dims[1], "Ny")?;
                let nz = positive_dim(dims[2], "Nz")?;
                GridSpec::from_dims(&bounds, nx, ny, nz, padding)?
            }
        };
        Ok((spec, true))
    } else {
        let dx = dims[0];
        if dims.len() >= 2 {
            padding = (dims[1] as usize).max(1);
        }
        if dims.len() > 2 {
            return Err(anyhow!("OBJ mode takes <dx> [padding]"));
        }
        let spec = GridSpec::from_cell_size(&bounds, dx, padding)?;
        Ok((spec, false))
    }
}

/// Validate a positional grid dimension.
fn positive_dim(value: f32, name: &str) -> anyhow::Result<usize> {
    if !(value.is_finite() && value >= 1.0) {
        return Err(anyhow!("{name} must be a positive integer, got {value}"));
    }
    Ok(value as usize)
}

/// Output path next to the input: `<base>.sdf`, with the grid dimensions
/// appended in STL mode.
fn output_name(input: &std::path::Path, spec: &GridSpec, stl_mode: bool) -> PathBuf {
    let base = input.with_extension("");
    if stl_mode {
        PathBuf::from(format!(
            "{}_sdf_{}x{}x{}.sdf",
            base.display(),
            spec.nx,
            spec.ny,
            spec.nz
        ))
    } else {
        PathBuf::from(format!("{}.sdf", base.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    fn cli_with(dims: &[f32], padding: usize) -> Cli {
        Cli {
            input: PathBuf::from("mesh.stl"),
            dimensions: dims.to_vec(),
            cpu: false,
            fix: false,
            threads: 0,
            padding,
        }
    }

    #[test]
    fn stl_proportional_mode() {
        let mesh = unit_cube();
        let (spec, stl_mode) = build_grid_spec(&cli_with(&[32.0], 1), &mesh, true).unwrap();

        assert!(stl_mode);
        assert_eq!(spec.nx, 32);
    }

    #[test]
    fn stl_padding_compat_heuristic() {
        let mesh = unit_cube();
        // Second positional below 20 is padding, not Ny
        let (spec, _) = build_grid_spec(&cli_with(&[32.0, 2.0], 1), &mesh, true).unwrap();

        assert_eq!(spec.nx, 32);
        // dx fits x into 32 - 2*2 = 28 interior cells
        assert!((spec.dx - 1.0 / 28.0).abs() < 1e-6);
    }

    #[test]
    fn stl_second_positional_at_limit_is_error() {
        let mesh = unit_cube();
        assert!(build_grid_spec(&cli_with(&[32.0, 24.0], 1), &mesh, true).is_err());
    }

    #[test]
    fn stl_manual_mode_with_padding() {
        let mesh = unit_cube();
        let (spec, _) =
            build_grid_spec(&cli_with(&[20.0, 20.0, 20.0, 3.0], 1), &mesh, true).unwrap();

        assert_eq!((spec.nx, spec.ny, spec.nz), (20, 20, 20));
        // dx fits the unit cube into 20 - 2*3 = 14 interior cells
        assert!((spec.dx - 1.0 / 14.0).abs() < 1e-6);
    }

    #[test]
    fn obj_cell_size_mode() {
        let mesh = unit_cube();
        let (spec, stl_mode) = build_grid_spec(&cli_with(&[0.1, 2.0], 1), &mesh, false).unwrap();

        assert!(!stl_mode);
        assert!((spec.dx - 0.1).abs() < 1e-6);
        assert_eq!(spec.nx, 14);
    }

    #[test]
    fn obj_extra_dimensions_rejected() {
        let mesh = unit_cube();
        assert!(build_grid_spec(&cli_with(&[0.1, 2.0, 3.0], 1), &mesh, false).is_err());
    }

    #[test]
    fn output_name_modes() {
        let spec = GridSpec::new(10, 12, 14, mesh_types::Point3::origin(), 0.1).unwrap();

        let obj = output_name(std::path::Path::new("models/bunny.obj"), &spec, false);
        assert_eq!(obj, PathBuf::from("models/bunny.sdf"));

        let stl = output_name(std::path::Path::new("models/bunny.stl"), &spec, true);
        assert_eq!(stl, PathBuf::from("models/bunny_sdf_10x12x14.sdf"));
    }
}
