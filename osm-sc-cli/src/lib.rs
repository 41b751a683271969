//! Command-line interface converting OSM XML extracts into silicate tables.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use log::info;

mod convert;
mod error;

use convert::{ConvertArgs, run_convert};
pub use error::CliError;

const ARG_INPUT: &str = "input";
const ARG_OUTPUT_DIR: &str = "output-dir";
const ARG_SEED: &str = "seed";
const ARG_UNIQUE_EDGE_IDS: &str = "unique-edge-ids";
const ENV_INPUT: &str = "OSM_SC_CMDS_CONVERT_INPUT";
const ENV_OUTPUT_DIR: &str = "OSM_SC_CMDS_CONVERT_OUTPUT_DIR";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, configuration, conversion or
/// output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Convert(args) => {
            let outcome = run_convert(args)?;
            for table in &outcome.written {
                info!("{}: {} rows -> {}", table.name, table.rows, table.path);
            }
            info!("Wrote {} tables to {}", outcome.written.len(), outcome.output_dir);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "osm-sc",
    about = "Convert OpenStreetMap XML into silicate (SC) tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an OSM XML extract into JSON tables.
    Convert(ConvertArgs),
}

/// Return whether `path` names a bzip2-compressed file.
fn is_bz2(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bz2"))
}

#[cfg(test)]
mod tests;
