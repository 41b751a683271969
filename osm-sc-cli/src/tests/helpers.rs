//! Test helpers for staging OSM inputs and layered configuration.

use super::*;
use crate::convert::{ConvertArgs, ConvertConfig};
use bzip2::{Compression, write::BzEncoder};
use camino::Utf8PathBuf;
use std::{fs, io::Write};
use tempfile::TempDir;

/// Three nodes, one tagged way and a relation.
pub(super) const SAMPLE_OSM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="51.50" lon="-0.12"/>
  <node id="2" lat="51.51" lon="-0.11"><tag k="barrier" v="gate"/></node>
  <node id="3" lat="51.52" lon="-0.10"/>
  <way id="10">
    <nd ref="1"/><nd ref="2"/><nd ref="3"/>
    <tag k="highway" v="track"/>
  </way>
  <relation id="20">
    <member type="way" ref="10" role=""/>
    <tag k="type" v="route"/>
  </relation>
</osm>
"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents)
        .unwrap_or_else(|err| panic!("failed to write {path}: {err}"));
}

/// A temporary directory with UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write [`SAMPLE_OSM`] as plain XML.
    pub(super) fn write_osm(&self, name: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, SAMPLE_OSM.as_bytes());
        path
    }

    /// Write [`SAMPLE_OSM`] compressed with bzip2.
    pub(super) fn write_osm_bz2(&self, name: &str) -> Utf8PathBuf {
        let mut encoder = BzEncoder::new(Vec::new(), Compression::best());
        encoder
            .write_all(SAMPLE_OSM.as_bytes())
            .expect("compress sample");
        let compressed = encoder.finish().expect("finish bzip2 stream");
        let path = self.path(name);
        write_utf8(&path, &compressed);
        path
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct LayerOverrides {
    pub(super) input: Option<Utf8PathBuf>,
    pub(super) output_dir: Option<Utf8PathBuf>,
    pub(super) seed: Option<u64>,
}

/// Apply CLI > environment > file precedence, then resolve and validate.
pub(super) fn merge_layers(
    mut cli_args: ConvertArgs,
    file_layer: Option<LayerOverrides>,
    env_layer: Option<LayerOverrides>,
) -> Result<ConvertConfig, CliError> {
    merge_field(
        &mut cli_args.input,
        extract_field(env_layer.as_ref(), |layer| &layer.input),
        extract_field(file_layer.as_ref(), |layer| &layer.input),
    );
    merge_field(
        &mut cli_args.output_dir,
        extract_field(env_layer.as_ref(), |layer| &layer.output_dir),
        extract_field(file_layer.as_ref(), |layer| &layer.output_dir),
    );
    merge_field(
        &mut cli_args.seed,
        extract_field(env_layer.as_ref(), |layer| &layer.seed),
        extract_field(file_layer.as_ref(), |layer| &layer.seed),
    );
    let config = ConvertConfig::try_from(cli_args)?;
    config.validate_sources()?;
    Ok(config)
}

fn merge_field<T: Clone>(target: &mut Option<T>, env_value: Option<T>, file_value: Option<T>) {
    if target.is_none()
        && let Some(value) = env_value.or(file_value)
    {
        *target = Some(value);
    }
}

fn extract_field<T: Clone>(
    layer: Option<&LayerOverrides>,
    accessor: fn(&LayerOverrides) -> &Option<T>,
) -> Option<T> {
    layer.and_then(|entry| accessor(entry).clone())
}
