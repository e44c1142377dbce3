//! Topopack: arc-based topology export.
//!
//! Topopack turns layered polygon and polyline data that share a pool of
//! boundary arcs into TopoJSON documents. Export quantizes coordinates to an
//! integer grid, drops arcs that collapse to a point, renumbers the arc
//! references that remain and delta-encodes the arcs.
//!
//! # Modules
//!
//! - [`ir`]: In-memory model (arcs, layers, attribute tables) and readers
//! - [`export`]: The export pipeline and split-by-layer
//! - [`topology`]: TopoJSON wire types
//! - [`error`]: Error types for topopack operations

pub mod error;
pub mod export;
pub mod ir;
pub mod topology;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub use error::TopoError;

use export::{ExportOptions, ExportedFile};

/// The topopack CLI application.
#[derive(Parser)]
#[command(name = "topopack")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug events to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Export layered arc data as TopoJSON.
    Export(ExportArgs),
}

/// Input document formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// A TopoJSON topology.
    Topojson,
    /// The topopack IR document.
    IrJson,
}

/// Report output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Input file.
    input: PathBuf,

    /// Output file, or output directory with --split-by-layer.
    #[arg(long, short)]
    output: PathBuf,

    /// Input format (detected from the file when omitted).
    #[arg(long, value_enum)]
    from: Option<InputFormat>,

    /// Quantization grid size per axis (at least 2); 0 disables quantization.
    #[arg(long, env = "TOPOPACK_RESOLUTION", value_parser = parse_resolution)]
    resolution: Option<u32>,

    /// Quantization cell size in source units.
    #[arg(long, value_parser = parse_precision)]
    precision: Option<f64>,

    /// Write absolute grid coordinates instead of deltas. TopoJSON readers
    /// (topopack included) decode quantized arcs as deltas, so only use this
    /// for consumers that expect absolute coordinates.
    #[arg(long)]
    no_delta: bool,

    /// Write one topology per layer into the output directory.
    #[arg(long)]
    split_by_layer: bool,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,
}

fn parse_resolution(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a non-negative integer", s))?;
    if value == 1 {
        Err("resolution must be 0 or at least 2".to_string())
    } else {
        Ok(value)
    }
}

fn parse_precision(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("precision must be a positive number, got {}", s))
    }
}

/// Run the topopack CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), TopoError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Export(args)) => run_export(args),
        None => {
            println!("topopack {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Arc-based topology export.");
            println!();
            println!("Run 'topopack --help' for usage information.");
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // Already installed when run() is called more than once in-process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs) -> Result<(), TopoError> {
    let format = match args.from {
        Some(format) => format,
        None => detect_format(&args.input)?,
    };
    debug!(input = %args.input.display(), ?format, "reading input");

    let dataset = match format {
        InputFormat::Topojson => ir::io_topojson::read_topojson(&args.input)?,
        InputFormat::IrJson => ir::io_json::read_ir_json(&args.input)?,
    };

    let opts = ExportOptions {
        resolution: args.resolution,
        precision: args.precision,
        split_by_layer: args.split_by_layer,
        delta_encode: !args.no_delta,
    };

    let (files, report) = export::export_files(&dataset.layers, &dataset.arcs, &opts)?;
    write_files(&args.output, &files, opts.split_by_layer)?;
    info!(files = files.len(), output = %args.output.display(), "export finished");

    match args.report {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        ReportFormat::Text => {
            println!(
                "Exported {} layer(s) to {}",
                report.layers.len(),
                args.output.display()
            );
            print!("{}", report);
        }
    }
    Ok(())
}

/// Picks an input format: `.topojson` files and JSON documents typed
/// `"Topology"` are TopoJSON, anything else is the IR document.
fn detect_format(path: &Path) -> Result<InputFormat, TopoError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("topojson") => Ok(InputFormat::Topojson),
        Some("json") | None => {
            let bytes = fs::read(path)?;
            if ir::io_topojson::is_topojson(&bytes) {
                Ok(InputFormat::Topojson)
            } else {
                Ok(InputFormat::IrJson)
            }
        }
        Some(other) => Err(TopoError::UnsupportedFormat(format!(
            "'.{}' (use --from topojson or --from ir-json)",
            other
        ))),
    }
}

fn write_files(output: &Path, files: &[ExportedFile], split: bool) -> Result<(), TopoError> {
    if !split {
        for file in files {
            ir::io_topojson::write_topojson(output, &file.topology)?;
        }
        return Ok(());
    }

    fs::create_dir_all(output)?;
    for file in files {
        let path = output.join(format!("{}.json", file_stem(&file.name)));
        debug!(path = %path.display(), "writing layer topology");
        ir::io_topojson::write_topojson(&path, &file.topology)?;
    }
    Ok(())
}

/// Layer names become file names; path separators are not allowed in them.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}
