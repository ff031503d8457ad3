//! trisect CLI - exact Boolean operations on triangle meshes.
//!
//! Reads two closed meshes, corefines and classifies them with exact
//! arithmetic, and writes any of the standard Boolean combinations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use trisect_core::{BooleanError, BooleanOp, InputMesh};
use trisect_io::{read_soup, write_soup};
use trisect_mesh::defects::FindDefects;
use trisect_mesh::TriangleSoup;

/// Per-face payload carried through the pipeline: raw JSON from region
/// files, null for OBJ input.
type Payload = serde_json::Value;

#[derive(Parser)]
#[command(name = "trisect")]
#[command(about = "Exact Boolean operations on triangle meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a Boolean combination of two meshes
    Boolean {
        /// The two input meshes (.obj or .json)
        #[arg(long = "in", num_args = 2, value_names = ["FIRST", "SECOND"])]
        inputs: Vec<PathBuf>,
        /// Output mesh (.obj or .json)
        #[arg(long)]
        out: PathBuf,
        /// Which combination to extract
        #[arg(long, value_enum, default_value = "union")]
        op: OpArg,
        /// Worker threads (defaults to all cores)
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Find defects in the given mesh
    Defects {
        /// The input mesh
        #[arg(long = "in")]
        input: PathBuf,
    },
    /// Convert a mesh between the supported formats
    Convert {
        /// The input mesh
        #[arg(long = "in")]
        input: PathBuf,
        /// The output mesh
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OpArg {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

impl From<OpArg> for BooleanOp {
    fn from(op: OpArg) -> BooleanOp {
        match op {
            OpArg::Union => BooleanOp::Union,
            OpArg::Intersection => BooleanOp::Intersection,
            OpArg::Difference => BooleanOp::Difference,
            OpArg::SymmetricDifference => BooleanOp::SymmetricDifference,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Boolean {
            inputs,
            out,
            op,
            threads,
        } => run_boolean(&inputs, &out, op.into(), threads),
        Commands::Defects { input } => run_defects(&input),
        Commands::Convert { input, out } => run_convert(&input, &out),
    }
}

fn run_boolean(
    inputs: &[PathBuf],
    out: &PathBuf,
    op: BooleanOp,
    threads: Option<usize>,
) -> Result<()> {
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("configuring the worker pool")?;
    }

    let left = read_input(&inputs[0])?;
    let right = read_input(&inputs[1])?;
    ensure_closed_manifold(&left, InputMesh::First)?;
    ensure_closed_manifold(&right, InputMesh::Second)?;

    let (result, warnings) = trisect_core::boolean(&left, &right, op)?;
    if !warnings.is_empty() {
        log::warn!("classification warnings: {warnings}");
    }

    write_soup(&result, out).with_context(|| format!("writing {}", out.display()))?;
    println!("{} faces written to {}", result.num_faces(), out.display());
    Ok(())
}

fn run_defects(input: &PathBuf) -> Result<()> {
    let soup = read_input(input)?;
    let defects = FindDefects::new(&soup);

    let mut found = false;
    let mut report = |count: usize, what: &str| {
        if count > 0 {
            println!("{count} {what}");
            found = true;
        }
    };
    report(defects.isolated_vertices().len(), "isolated vertices");
    report(
        defects.combinatorially_degenerate_faces().len(),
        "combinatorially degenerate faces",
    );
    report(
        defects.geometrically_degenerate_faces().len(),
        "geometrically degenerate faces",
    );
    report(defects.duplicate_faces().len(), "duplicate faces");
    report(defects.open_edges().len(), "open edges");
    report(defects.non_manifold_edges().len(), "non-manifold edges");
    if !found {
        println!("no defects found");
    }
    Ok(())
}

fn run_convert(input: &PathBuf, out: &PathBuf) -> Result<()> {
    let soup = read_input(input)?;
    write_soup(&soup, out).with_context(|| format!("writing {}", out.display()))?;
    println!(
        "{} vertices, {} faces written to {}",
        soup.num_vertices(),
        soup.num_faces(),
        out.display()
    );
    Ok(())
}

fn read_input(path: &PathBuf) -> Result<TriangleSoup<Payload>> {
    read_soup(path).with_context(|| format!("reading {}", path.display()))
}

fn ensure_closed_manifold(soup: &TriangleSoup<Payload>, mesh: InputMesh) -> Result<()> {
    let defects = FindDefects::new(soup);
    if !defects.is_closed_manifold() {
        return Err(BooleanError::NotClosedManifold {
            mesh,
            details: format!(
                "{} open edges, {} non-manifold edges, {} degenerate faces, {} duplicate faces",
                defects.open_edges().len(),
                defects.non_manifold_edges().len(),
                defects.combinatorially_degenerate_faces().len()
                    + defects.geometrically_degenerate_faces().len(),
                defects.duplicate_faces().len(),
            ),
        }
        .into());
    }
    Ok(())
}
