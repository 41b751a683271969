//! Parsing and flattening of OpenStreetMap data into silicate (SC) tables.
//!
//! Responsibilities:
//! - Read OSM XML into elements or a whole [`osm_sc_core::OsmDocument`].
//! - Build the six SC tables from raw XML ([`osmdata_sc`]).
//! - Flatten an in-memory document table by table ([`flatten`]).
//!
//! Boundaries:
//! - Row types, identifiers and cancellation live in `osm-sc-core`.
//! - No file access except the optional `dump-input` diagnostic.
//!
//! Invariants:
//! - Every table is allocated once from a counting pass.
//! - A cancelled conversion returns no partial tables.

#![forbid(unsafe_code)]

mod assemble;
mod error;
pub mod flatten;
mod trace;
pub mod xml;

#[cfg(feature = "dump-input")]
pub use assemble::DUMP_PATH;
pub use assemble::{osmdata_sc, osmdata_sc_default};
pub use error::ScError;
pub use flatten::{
    DocumentTables, NodeTables, RelationTables, WayTables, flatten_document, flatten_nodes,
    flatten_relations, flatten_ways,
};
pub use trace::{RelationTracer, TracedRelation, WayMemberTracer};
pub use xml::{OsmElement, OsmXmlReader, XmlDataSc, XmlError, read_document};
