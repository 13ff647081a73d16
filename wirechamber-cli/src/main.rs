//! wirechamber-cli: Command-line interface for wirechamber.
//!
//! Reads raw event files, decodes and groups every plane of the chamber, and
//! writes the per-event plane outputs.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use wirechamber_io::{DataFileWriter, OutputFormat, RawEventReader};
use wirechamber_vdc::{Chamber, ChamberConfig};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    WirechamberIo(#[from] wirechamber_io::Error),

    #[error("Chamber error: {0}")]
    Chamber(#[from] wirechamber_vdc::Error),
}

/// Drift chamber hit decoding and wire-group formation.
#[derive(Parser)]
#[command(name = "wirechamber")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode and group the events of a raw event file
    Process {
        /// Input event file
        input: PathBuf,

        /// Chamber database (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Output file path (.csv or .jsonl)
        #[arg(short, long)]
        output: PathBuf,

        /// Write one CSV row per hit instead of per group
        #[arg(long)]
        hits: bool,

        /// Process planes one after another
        #[arg(long)]
        serial: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the planes of a chamber database
    Info {
        /// Chamber database (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            config,
            output,
            hits,
            serial,
            verbose,
        } => {
            let database = ChamberConfig::from_file(&config)?;
            let mut chamber = Chamber::new(&database)?.with_parallel(!serial);
            let plane_names: Vec<String> =
                chamber.plane_names().into_iter().map(String::from).collect();
            let plane_refs: Vec<&str> = plane_names.iter().map(String::as_str).collect();

            let format = OutputFormat::from_path(&output, hits);
            if verbose {
                eprintln!("Database: {}", config.display());
                eprintln!("Planes: {}", plane_names.join(", "));
                eprintln!("Parallel: {}", chamber.is_parallel());
                eprintln!("Writing {:?} to: {}", format, output.display());
            }

            let start = Instant::now();
            let reader = RawEventReader::open(&input, &plane_refs)?;
            let mut writer = DataFileWriter::create(&output, format)?;
            let mut num_events = 0usize;

            for event in reader {
                let event = event?;
                chamber.process_event(&event)?;
                for (plane, plane_output) in chamber.outputs() {
                    writer.write_plane(event.number, plane, &plane_output)?;
                }
                num_events += 1;
            }
            writer.flush()?;
            info!("wrote {} rows to {}", writer.rows(), output.display());

            let elapsed = start.elapsed();
            let totals = chamber.totals();

            println!(
                "Processed {} events in {:.2}s",
                num_events,
                elapsed.as_secs_f64()
            );
            println!("Channels decoded: {}", totals.channels_decoded);
            println!("Hits stored: {}", totals.hits_stored);
            println!("Hits gated out: {}", totals.hits_gated_out);
            println!("Groups kept: {}", totals.grouping.groups_kept);
            if verbose {
                let grouping = &totals.grouping;
                eprintln!("  {} runs formed", grouping.runs_formed);
                eprintln!("  {} rejected (too few hits)", grouping.rejected_min_hits);
                eprintln!("  {} rejected (span)", grouping.rejected_span);
                if totals.hits_stored > 0 {
                    eprintln!(
                        "  {:.1}% of hits grouped",
                        100.0 * grouping.hits_grouped as f64 / totals.hits_stored as f64
                    );
                }
            }
        }

        Commands::Info { config } => {
            let database = ChamberConfig::from_file(&config)?;
            let chamber = Chamber::new(&database)?;

            println!("Database: {}", config.display());
            println!("Planes: {}", chamber.planes().len());
            println!("Parallel: {}", chamber.is_parallel());
            for plane in chamber.planes() {
                let wires = plane.wires();
                let gate = plane.gate();
                let grouping = plane.grouping_config();
                println!();
                println!("Plane {}", plane.name());
                println!("  Wires: {}", plane.num_wires());
                if let (Some(first), Some(last)) = (wires.first(), wires.last()) {
                    println!("  Position range: {} - {}", first.pos, last.pos);
                }
                println!("  Wire angle: {} deg", plane.wire_angle());
                if let Some(origin) = plane.origin() {
                    println!("  Origin: {:?}", origin);
                }
                println!("  Gate: {} - {}", gate.min, gate.max);
                println!(
                    "  Grouping: min hits {}, span {} - {}, max gap {}",
                    grouping.min_hits, grouping.min_span, grouping.max_span, grouping.max_gap
                );
            }
        }
    }

    Ok(())
}
