//! Flattening passes over an in-memory [`OsmDocument`].
//!
//! Each pass counts its rows first, allocates every table once, then fills
//! it. Cancellation is polled through [`Interrupt`] and aborts the pass with
//! no partial output.
//!
//! These passes consume an already parsed document. The end-to-end XML path
//! is [`crate::osmdata_sc`], which builds its tables through
//! [`crate::xml::XmlDataSc`] instead.

use osm_sc_core::{
    Edge, EdgeIdGenerator, Interrupt, Interrupted, Membership, ObjectLinkEdge, ObjectTag,
    OsmDocument, Vertex,
};

use crate::trace::RelationTracer;

mod nodes;
mod relations;
mod tags;
mod ways;

pub use nodes::{NODE_CHECK_INTERVAL, flatten_nodes};
pub use relations::flatten_relations;
pub use tags::key_value_rows;
pub use ways::flatten_ways;

/// Output of [`flatten_nodes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTables {
    /// One row per node, in ascending id order.
    pub vertex: Vec<Vertex>,
    /// One row per node tag.
    pub tags: Vec<ObjectTag>,
}

/// Output of [`flatten_ways`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WayTables {
    /// One row per consecutive node pair.
    pub edge: Vec<Edge>,
    /// Links each edge to its way, row for row with `edge`.
    pub object_link_edge: Vec<ObjectLinkEdge>,
    /// One row per way tag.
    pub tags: Vec<ObjectTag>,
}

/// Output of [`flatten_relations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationTables {
    /// One row per traced member.
    pub members: Vec<Membership>,
    /// One row per traced tag.
    pub tags: Vec<ObjectTag>,
}

/// All three flattener outputs for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTables {
    /// Node tables.
    pub nodes: NodeTables,
    /// Way tables.
    pub ways: WayTables,
    /// Relation tables.
    pub relations: RelationTables,
}

/// Run the node, way and relation passes over `document` in that order.
///
/// # Errors
/// Returns [`Interrupted`] as soon as any pass observes cancellation.
///
/// # Examples
/// ```
/// use osm_sc_core::{NeverInterrupt, RandomEdgeIds};
/// use osm_sc_data::{WayMemberTracer, flatten::flatten_document, xml::read_document};
///
/// let document = read_document(
///     r#"<osm>
///          <node id="1" lon="0.0" lat="0.0"/>
///          <node id="2" lon="1.0" lat="0.0"/>
///          <way id="3"><nd ref="1"/><nd ref="2"/></way>
///        </osm>"#,
/// )?;
/// let tables = flatten_document(
///     &document,
///     RandomEdgeIds::from_seed(9),
///     &WayMemberTracer,
///     &NeverInterrupt,
/// )?;
/// assert_eq!(tables.nodes.vertex.len(), 2);
/// assert_eq!(tables.ways.edge.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn flatten_document<G, T, I>(
    document: &OsmDocument,
    edge_ids: G,
    tracer: &T,
    interrupt: &I,
) -> Result<DocumentTables, Interrupted>
where
    G: EdgeIdGenerator,
    T: RelationTracer + ?Sized,
    I: Interrupt + ?Sized,
{
    Ok(DocumentTables {
        nodes: flatten_nodes(&document.nodes, interrupt)?,
        ways: flatten_ways(&document.ways, edge_ids, interrupt)?,
        relations: flatten_relations(&document.relations, tracer, interrupt)?,
    })
}
