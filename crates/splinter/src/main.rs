//! splinter: split SVG and DXF drawings into one SVG element per primitive.
//!
//! Reads a drawing, breaks every path, polyline, and shape into its
//! individual lines, arcs, and Bezier curves, drops degenerate and
//! duplicate lines, and writes the result as a flat SVG. Useful for
//! cutters and plotters that would otherwise trace shared edges twice.
//!
//! # Usage
//!
//! ```text
//! splinter [OPTIONS] <INPUT> <OUTPUT>
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG`; `-v` switches to
//! debug output.

#![allow(clippy::print_stdout)]

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use splinter_import::SourceDrawing;
use splinter_pipeline::{DecomposeConfig, Decomposition};
use tracing_subscriber::EnvFilter;

/// Split a vector drawing into one SVG element per line, arc, or curve.
///
/// Supports `.svg` and `.dxf` input (case-insensitive). Lines shorter
/// than the minimum length and lines repeating an earlier one (in
/// either direction) are dropped.
#[derive(Parser)]
#[command(name = "splinter", version)]
struct Cli {
    /// Input drawing (`.svg` or `.dxf`).
    input: PathBuf,

    /// Output SVG file.
    output: PathBuf,

    /// Decimal digits compared when detecting duplicate lines.
    #[arg(long, default_value_t = DecomposeConfig::DEFAULT_PRECISION)]
    precision: u32,

    /// Drop lines shorter than this, in source units.
    #[arg(long, default_value_t = DecomposeConfig::DEFAULT_MIN_LINE_LENGTH)]
    min_length: f64,

    /// Full decompose config as a JSON string.
    ///
    /// When provided, `--precision` and `--min-length` are ignored.
    /// Missing fields take their default values.
    #[arg(long)]
    config_json: Option<String>,

    /// Print a decomposition report to stdout.
    #[arg(long)]
    diagnostics: bool,

    /// Print the report as JSON instead of text.
    #[arg(long, requires = "diagnostics")]
    json: bool,

    /// Log at debug level (overrides `RUST_LOG`).
    #[arg(short, long)]
    verbose: bool,
}

/// Build a [`DecomposeConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<DecomposeConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(DecomposeConfig {
        precision: cli.precision,
        min_line_length: cli.min_length,
    })
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn run(cli: &Cli) -> Result<Decomposition, String> {
    let config = config_from_cli(cli)?;

    let source = splinter_import::load(&cli.input).map_err(|e| e.to_string())?;
    let result = match source {
        SourceDrawing::Svg(drawing) => splinter_pipeline::decompose_svg(&drawing, &config),
        SourceDrawing::Dxf(drawing) => splinter_pipeline::decompose_dxf(&drawing, &config),
    }
    .map_err(|e| e.to_string())?;

    let svg = splinter_export::to_svg(&result.document);
    std::fs::write(&cli.output, &svg)
        .map_err(|e| format!("Error writing {}: {e}", cli.output.display()))?;

    Ok(result)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match run(&cli) {
        Ok(result) => result,
        Err(msg) => {
            tracing::error!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        elements = result.document.len(),
        "Decomposed file written to {}",
        cli.output.display()
    );

    if cli.diagnostics {
        if cli.json {
            match serde_json::to_string_pretty(&result.diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    tracing::error!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", result.diagnostics.report());
        }
    }

    ExitCode::SUCCESS
}
