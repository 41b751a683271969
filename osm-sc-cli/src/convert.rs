//! The `convert` subcommand.

use std::io::{BufReader, Read};

use bzip2::read::MultiBzDecoder;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use osm_sc_core::{EdgeIdGenerator, NeverInterrupt, RandomEdgeIds, ScTables, UniqueEdgeIds};
use osm_sc_data::osmdata_sc;
use osm_sc_fs::{ensure_dir, file_is_file, open_utf8_file, write_file};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_INPUT, ARG_OUTPUT_DIR, ARG_SEED, ARG_UNIQUE_EDGE_IDS, CliError, ENV_INPUT, ENV_OUTPUT_DIR,
    is_bz2,
};

/// CLI arguments for the `convert` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Convert an OSM XML (or .osm.bz2) extract into the six \
                 silicate tables, written as one JSON file per table. Paths \
                 can come from CLI flags, configuration files, or \
                 environment variables.",
    about = "Convert OSM XML into silicate tables"
)]
#[ortho_config(prefix = "OSM_SC")]
pub(crate) struct ConvertArgs {
    /// Path to the OSM XML input, optionally bzip2-compressed.
    #[arg(long = ARG_INPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Directory receiving `<table>.json` files.
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
    /// Seed for reproducible edge identifiers.
    #[arg(long = ARG_SEED, value_name = "u64")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Redraw edge identifiers until each is unique.
    #[arg(long = ARG_UNIQUE_EDGE_IDS)]
    #[serde(default)]
    pub(crate) unique_edge_ids: bool,
}

impl ConvertArgs {
    pub(crate) fn into_config(self) -> Result<ConvertConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ConvertConfig::try_from(merged)
    }
}

/// Resolved `convert` configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConvertConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) output_dir: Utf8PathBuf,
    pub(crate) seed: Option<u64>,
    pub(crate) unique_edge_ids: bool,
}

impl ConvertConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match file_is_file(&self.input) {
            Ok(true) => {}
            Ok(false) => {
                return Err(CliError::SourcePathNotFile {
                    field: ARG_INPUT,
                    path: self.input.clone(),
                });
            }
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(CliError::MissingSourceFile {
                    field: ARG_INPUT,
                    path: self.input.clone(),
                });
            }
            Err(source) => {
                return Err(CliError::InspectPath {
                    field: ARG_INPUT,
                    path: self.input.clone(),
                    source,
                });
            }
        }
        match file_is_file(&self.output_dir) {
            Ok(true) => Err(CliError::OutputDirectoryNotDirectory {
                path: self.output_dir.clone(),
            }),
            Ok(false) => Ok(()),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CliError::InspectPath {
                field: ARG_OUTPUT_DIR,
                path: self.output_dir.clone(),
                source,
            }),
        }
    }
}

impl TryFrom<ConvertArgs> for ConvertConfig {
    type Error = CliError;

    fn try_from(args: ConvertArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_INPUT,
        })?;
        let output_dir = args.output_dir.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT_DIR,
            env: ENV_OUTPUT_DIR,
        })?;
        Ok(Self {
            input,
            output_dir,
            seed: args.seed,
            unique_edge_ids: args.unique_edge_ids,
        })
    }
}

/// A table file produced by the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WrittenTable {
    pub(crate) name: &'static str,
    pub(crate) path: Utf8PathBuf,
    pub(crate) rows: usize,
}

/// Summary of a completed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConvertOutcome {
    pub(crate) output_dir: Utf8PathBuf,
    pub(crate) written: Vec<WrittenTable>,
}

pub(crate) fn run_convert(args: ConvertArgs) -> Result<ConvertOutcome, CliError> {
    let config = resolve_convert_config(args)?;
    execute_convert(&config)
}

pub(crate) fn resolve_convert_config(args: ConvertArgs) -> Result<ConvertConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_convert(config: &ConvertConfig) -> Result<ConvertOutcome, CliError> {
    let text = read_input(&config.input)?;
    debug!("Read {} bytes from {}", text.len(), config.input);
    let mut ids = config
        .seed
        .map_or_else(RandomEdgeIds::from_entropy, RandomEdgeIds::from_seed);
    let tables = if config.unique_edge_ids {
        convert_text(&text, UniqueEdgeIds::new(&mut ids))?
    } else {
        convert_text(&text, &mut ids)?
    };
    write_tables(&config.output_dir, &tables)
}

fn convert_text(text: &str, edge_ids: impl EdgeIdGenerator) -> Result<ScTables, CliError> {
    Ok(osmdata_sc(text, edge_ids, &NeverInterrupt)?)
}

/// Read the input as text, decompressing `.bz2` files.
pub(crate) fn read_input(path: &Utf8Path) -> Result<String, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    let mut text = String::new();
    let read = if is_bz2(path) {
        MultiBzDecoder::new(reader).read_to_string(&mut text)
    } else {
        reader.read_to_string(&mut text)
    };
    read.map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text)
}

/// Write every table as `<name>.json` under `output_dir`.
pub(crate) fn write_tables(
    output_dir: &Utf8Path,
    tables: &ScTables,
) -> Result<ConvertOutcome, CliError> {
    ensure_dir(output_dir).map_err(|source| CliError::CreateOutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(ScTables::NAMES.len());
    for (name, table) in tables.named() {
        let payload = serde_json::to_vec_pretty(&table)
            .map_err(|source| CliError::SerialiseTable { table: name, source })?;
        let path = output_dir.join(format!("{name}.json"));
        write_file(&path, payload).map_err(|source| CliError::WriteTable {
            path: path.clone(),
            source,
        })?;
        debug!("Wrote {} rows to {path}", table.len());
        written.push(WrittenTable {
            name,
            path,
            rows: table.len(),
        });
    }
    Ok(ConvertOutcome {
        output_dir: output_dir.to_path_buf(),
        written,
    })
}
