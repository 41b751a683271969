use std::collections::BTreeMap;

use log::debug;
use osm_sc_core::{Interrupt, Interrupted, Node, OsmId, RowBuffer, Vertex};

use super::{
    NodeTables,
    tags::{count_tag_rows, push_tag_rows},
};

/// Nodes visited between interrupt polls.
pub const NODE_CHECK_INTERVAL: usize = 1000;

/// Emit one vertex row per node and one key-value row per node tag.
///
/// Nodes are visited in ascending id and identified by their map key. The
/// interrupt is polled at node indices 0, 1000, 2000 and so on.
///
/// # Errors
/// Returns [`Interrupted`] when a poll fails.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use geo::Coord;
/// use osm_sc_core::{NeverInterrupt, Node};
/// use osm_sc_data::flatten::flatten_nodes;
///
/// let nodes = BTreeMap::from([(5, Node::with_empty_tags(5, Coord { x: 1.0, y: 2.0 }))]);
/// let tables = flatten_nodes(&nodes, &NeverInterrupt)?;
/// assert_eq!(tables.vertex[0].vertex, "5");
/// assert!(tables.tags.is_empty());
/// # Ok::<(), osm_sc_core::Interrupted>(())
/// ```
pub fn flatten_nodes<I>(
    nodes: &BTreeMap<OsmId, Node>,
    interrupt: &I,
) -> Result<NodeTables, Interrupted>
where
    I: Interrupt + ?Sized,
{
    let mut vertex = RowBuffer::with_rows(nodes.len());
    let mut tags = RowBuffer::with_rows(count_tag_rows(nodes.values()));
    for (index, (id, node)) in nodes.iter().enumerate() {
        if index.is_multiple_of(NODE_CHECK_INTERVAL) {
            interrupt.check()?;
        }
        vertex.push(Vertex {
            x: node.lon(),
            y: node.lat(),
            vertex: id.to_string(),
        });
        push_tag_rows(&mut tags, *id, node);
    }
    let tables = NodeTables {
        vertex: vertex.finish(),
        tags: tags.finish(),
    };
    debug!(
        "Flattened {} nodes with {} tags",
        tables.vertex.len(),
        tables.tags.len()
    );
    Ok(tables)
}
