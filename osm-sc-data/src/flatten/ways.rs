use std::collections::BTreeMap;

use log::debug;
use osm_sc_core::{
    Edge, EdgeIdGenerator, Interrupt, Interrupted, ObjectLinkEdge, OsmId, RowBuffer, Way,
};

use super::{
    WayTables,
    tags::{count_tag_rows, push_tag_rows},
};

/// Split every way into edges between consecutive nodes.
///
/// A way `[n0, n1, ..., nk]` yields edges `(n0, n1)` through `(nk-1, nk)`,
/// each with a fresh identifier from `edge_ids` and a linkage row pointing
/// back at the way. Ways with fewer than two nodes yield no edges. The
/// interrupt is polled once per way.
///
/// # Errors
/// Returns [`Interrupted`] when a poll fails.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
///
/// use osm_sc_core::{NeverInterrupt, RandomEdgeIds, Tags, Way};
/// use osm_sc_data::flatten::flatten_ways;
///
/// let ways = BTreeMap::from([(8, Way::new(8, vec![1, 2, 3], Tags::new()))]);
/// let tables = flatten_ways(&ways, RandomEdgeIds::from_seed(4), &NeverInterrupt)?;
/// assert_eq!(tables.edge.len(), 2);
/// assert!(tables.object_link_edge.iter().all(|link| link.object == "8"));
/// # Ok::<(), osm_sc_core::Interrupted>(())
/// ```
pub fn flatten_ways<G, I>(
    ways: &BTreeMap<OsmId, Way>,
    mut edge_ids: G,
    interrupt: &I,
) -> Result<WayTables, Interrupted>
where
    G: EdgeIdGenerator,
    I: Interrupt + ?Sized,
{
    let edge_total = ways.values().map(Way::edge_count).sum();
    let mut edges = RowBuffer::with_rows(edge_total);
    let mut links = RowBuffer::with_rows(edge_total);
    let mut tags = RowBuffer::with_rows(count_tag_rows(ways.values()));
    for (id, way) in ways {
        interrupt.check()?;
        let object = id.to_string();
        for (from, to) in way.node_pairs() {
            let edge = edge_ids.next_id();
            links.push(ObjectLinkEdge {
                edge: edge.clone(),
                object: object.clone(),
            });
            edges.push(Edge {
                vx0: from.to_string(),
                vx1: to.to_string(),
                edge,
            });
        }
        push_tag_rows(&mut tags, *id, way);
    }
    let tables = WayTables {
        edge: edges.finish(),
        object_link_edge: links.finish(),
        tags: tags.finish(),
    };
    debug!(
        "Flattened {} ways into {} edges with {} tags",
        ways.len(),
        tables.edge.len(),
        tables.tags.len()
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use osm_sc_core::{
        NeverInterrupt, Tags,
        test_support::{InterruptAfter, SequentialEdgeIds},
    };
    use rstest::rstest;

    fn ways(entries: &[(OsmId, &[OsmId])]) -> BTreeMap<OsmId, Way> {
        entries
            .iter()
            .map(|(id, nodes)| (*id, Way::new(*id, nodes.to_vec(), Tags::new())))
            .collect()
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[4], 0)]
    #[case(&[4, 5], 1)]
    #[case(&[4, 5, 6, 4], 3)]
    fn edge_count_tracks_node_pairs(#[case] nodes: &[OsmId], #[case] expected: usize) {
        let tables = flatten_ways(
            &ways(&[(1, nodes)]),
            SequentialEdgeIds::new(),
            &NeverInterrupt,
        )
        .expect("never interrupted");
        assert_eq!(tables.edge.len(), expected);
        assert_eq!(tables.object_link_edge.len(), expected);
    }

    #[rstest]
    fn edges_pair_consecutive_nodes_across_ways() {
        let tables = flatten_ways(
            &ways(&[(20, &[7, 8]), (10, &[1, 2, 3])]),
            SequentialEdgeIds::new(),
            &NeverInterrupt,
        )
        .expect("never interrupted");
        let pairs: Vec<(&str, &str, &str)> = tables
            .edge
            .iter()
            .map(|row| (row.vx0.as_str(), row.vx1.as_str(), row.edge.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1", "2", "e000000001"),
                ("2", "3", "e000000002"),
                ("7", "8", "e000000003"),
            ]
        );
        let owners: Vec<&str> = tables
            .object_link_edge
            .iter()
            .map(|row| row.object.as_str())
            .collect();
        assert_eq!(owners, vec!["10", "10", "20"]);
    }

    #[rstest]
    fn polls_once_per_way() {
        let interrupt = InterruptAfter::never();
        flatten_ways(
            &ways(&[(1, &[1, 2]), (2, &[]), (3, &[3])]),
            SequentialEdgeIds::new(),
            &interrupt,
        )
        .expect("never interrupted");
        assert_eq!(interrupt.polls(), 3);
    }

    #[rstest]
    fn cancellation_stops_before_the_next_way() {
        let interrupt = InterruptAfter::new(1);
        let result = flatten_ways(
            &ways(&[(1, &[1, 2]), (2, &[2, 3])]),
            SequentialEdgeIds::new(),
            &interrupt,
        );
        assert_eq!(result, Err(Interrupted));
    }
}
