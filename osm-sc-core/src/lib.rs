//! Core types for converting OpenStreetMap data into silicate (SC) tables.
//!
//! The crate holds the read-only OSM model, the row types of the six SC
//! tables, and the collaborator traits the conversion depends on: edge
//! identifier generation and cooperative cancellation. Parsing and the
//! flattening passes live in `osm-sc-data`.

#![forbid(unsafe_code)]

pub mod edge_id;
pub mod interrupt;
pub mod model;
pub mod tables;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use edge_id::{
    EDGE_ID_ALPHABET, EDGE_ID_LENGTH, EdgeIdGenerator, RandomEdgeIds, UniqueEdgeIds, is_edge_id,
};
pub use interrupt::{CancellationFlag, Interrupt, Interrupted, NeverInterrupt};
pub use model::{Member, MemberKind, Node, OsmDocument, OsmId, Relation, Taggable, Tags, Way};
pub use tables::{
    Edge, Membership, ObjectLinkEdge, ObjectTag, RowBuffer, ScTable, ScTables, Vertex,
};
