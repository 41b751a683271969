//! Facade crate for the OSM to silicate conversion.
//!
//! This crate re-exports the table model from `osm-sc-core` and the XML
//! reader and flatteners from `osm-sc-data`, so callers depend on one crate.
//!
//! ```
//! use osm_sc::{NeverInterrupt, RandomEdgeIds, osmdata_sc};
//!
//! let xml = r#"<osm>
//!   <node id="1" lat="0.5" lon="1.5"/>
//!   <node id="2" lat="0.6" lon="1.6"/>
//!   <way id="3"><nd ref="1"/><nd ref="2"/></way>
//! </osm>"#;
//! let tables = osmdata_sc(xml, RandomEdgeIds::from_seed(1), &NeverInterrupt)?;
//! assert_eq!(tables.vertex.len(), 2);
//! assert_eq!(tables.edge.len(), 1);
//! # Ok::<(), osm_sc::ScError>(())
//! ```

#![forbid(unsafe_code)]

pub use osm_sc_core::{
    CancellationFlag, EDGE_ID_LENGTH, Edge, EdgeIdGenerator, Interrupt, Interrupted, Member,
    MemberKind, Membership, NeverInterrupt, Node, ObjectLinkEdge, ObjectTag, OsmDocument, OsmId,
    RandomEdgeIds, Relation, ScTable, ScTables, Taggable, Tags, UniqueEdgeIds, Vertex, Way,
    is_edge_id,
};
pub use osm_sc_data::{
    DocumentTables, NodeTables, OsmElement, OsmXmlReader, RelationTables, RelationTracer, ScError,
    TracedRelation, WayMemberTracer, WayTables, XmlDataSc, XmlError, flatten_document,
    flatten_nodes, flatten_relations, flatten_ways, osmdata_sc, osmdata_sc_default, read_document,
};

#[cfg(feature = "dump-input")]
pub use osm_sc_data::DUMP_PATH;
