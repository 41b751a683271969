//! Shared helpers for `osm-sc-data` behaviour tests.

use std::{fs, path::PathBuf};

use geo::Coord;
use osm_sc_core::{Node, OsmId, Tags};

/// Directory containing the XML fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read an XML fixture by file name.
pub fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("failed to read fixture {path:?}: {err}");
    })
}

/// Build a tag map from `key=value` pairs.
pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

/// Untagged nodes with ids `1..=count` on a diagonal.
pub fn node_line(count: u32) -> Vec<Node> {
    (1..=count)
        .map(|step| {
            let location = Coord {
                x: f64::from(step),
                y: f64::from(step),
            };
            Node::with_empty_tags(OsmId::from(step), location)
        })
        .collect()
}
