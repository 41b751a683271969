//! Error types emitted by the `osm-sc` CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use osm_sc_data::ScError;
use thiserror::Error;

/// Errors emitted by the `osm-sc` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// A referenced path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectPath {
        /// Flag naming the path.
        field: &'static str,
        /// The path being inspected.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The output directory exists but is a file.
    #[error("output directory {path:?} is not a directory")]
    OutputDirectoryNotDirectory {
        /// The offending path.
        path: Utf8PathBuf,
    },
    /// Opening the input file failed.
    #[error("failed to open input {path:?}: {source}")]
    OpenInput {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading or decompressing the input failed.
    #[error("failed to read input {path:?}: {source}")]
    ReadInput {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The input could not be converted into silicate tables.
    #[error("failed to convert input: {0}")]
    Convert(#[from] ScError),
    /// Creating the output directory failed.
    #[error("failed to create output directory {path:?}: {source}")]
    CreateOutputDirectory {
        /// Output directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Serialising a table failed.
    #[error("failed to serialise the {table} table: {source}")]
    SerialiseTable {
        /// Table name.
        table: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// Writing a table file failed.
    #[error("failed to write {path:?}: {source}")]
    WriteTable {
        /// Destination file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
