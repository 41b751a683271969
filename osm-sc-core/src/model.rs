//! In-memory OpenStreetMap model read by the flatteners.
//!
//! The model is produced by an upstream reader and stays read-only while it is
//! reshaped into silicate tables. Coordinates are WGS84 with
//! `x = longitude` and `y = latitude`.

use std::collections::BTreeMap;

use geo::Coord;

/// OpenStreetMap element identifier.
///
/// Signed because unsaved edits in OSM XML carry negative identifiers.
pub type OsmId = i64;

/// Free-form key/value tags attached to an element.
///
/// Iteration is in ascending key order; every key-value table follows that
/// order. Inserting a repeated key keeps the last value.
pub type Tags = BTreeMap<String, String>;

/// An element that carries tags and can therefore populate a key-value table.
pub trait Taggable {
    /// Identifier written to the `object_` column.
    fn object_id(&self) -> OsmId;

    /// Tags written as one row each.
    fn tags(&self) -> &Tags;

    /// Number of key-value rows this element contributes.
    fn tag_count(&self) -> usize {
        self.tags().len()
    }
}

/// A single OSM node.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use osm_sc_core::Node;
///
/// let node = Node::with_empty_tags(5, Coord { x: 1.0, y: 2.0 });
/// assert_eq!(node.lon(), 1.0);
/// assert_eq!(node.lat(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Node identifier.
    pub id: OsmId,
    /// Position with `x = longitude` and `y = latitude`.
    pub location: Coord<f64>,
    /// Node tags.
    pub tags: Tags,
}

impl Node {
    /// Construct a node with the provided tags.
    #[must_use]
    pub const fn new(id: OsmId, location: Coord<f64>, tags: Tags) -> Self {
        Self { id, location, tags }
    }

    /// Construct an untagged node.
    #[must_use]
    pub const fn with_empty_tags(id: OsmId, location: Coord<f64>) -> Self {
        Self::new(id, location, Tags::new())
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lon(&self) -> f64 {
        self.location.x
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.location.y
    }
}

impl Taggable for Node {
    fn object_id(&self) -> OsmId {
        self.id
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// An ordered sequence of node references.
///
/// # Examples
/// ```
/// use osm_sc_core::{Tags, Way};
///
/// let way = Way::new(7, vec![1, 2, 3], Tags::new());
/// assert_eq!(way.edge_count(), 2);
/// assert_eq!(way.node_pairs().collect::<Vec<_>>(), vec![(1, 2), (2, 3)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    /// Way identifier.
    pub id: OsmId,
    /// Referenced node identifiers in drawing order.
    pub nodes: Vec<OsmId>,
    /// Way tags.
    pub tags: Tags,
}

impl Way {
    /// Construct a way.
    #[must_use]
    pub const fn new(id: OsmId, nodes: Vec<OsmId>, tags: Tags) -> Self {
        Self { id, nodes, tags }
    }

    /// Number of edges formed by consecutive node pairs.
    ///
    /// Ways with fewer than two nodes have no edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Consecutive `(from, to)` node pairs in drawing order.
    pub fn node_pairs(&self) -> impl Iterator<Item = (OsmId, OsmId)> + '_ {
        self.nodes.windows(2).filter_map(|pair| match pair {
            [from, to] => Some((*from, *to)),
            _ => None,
        })
    }
}

impl Taggable for Way {
    fn object_id(&self) -> OsmId {
        self.id
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// The kind of element a relation member refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MemberKind {
    /// A node member.
    Node,
    /// A way member.
    Way,
    /// A nested relation.
    Relation,
}

impl MemberKind {
    /// Parse the `type` attribute of an OSM `<member>` element.
    ///
    /// # Examples
    /// ```
    /// use osm_sc_core::MemberKind;
    ///
    /// assert_eq!(MemberKind::from_osm_type("way"), Some(MemberKind::Way));
    /// assert_eq!(MemberKind::from_osm_type("area"), None);
    /// ```
    #[must_use]
    pub fn from_osm_type(value: &str) -> Option<Self> {
        match value {
            "node" => Some(Self::Node),
            "way" => Some(Self::Way),
            "relation" => Some(Self::Relation),
            _ => None,
        }
    }

    /// Return the OSM spelling of the member type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

/// A relation member with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    /// Type of the referenced element.
    pub kind: MemberKind,
    /// Referenced element identifier.
    pub reference: OsmId,
    /// Role string, empty when the source omits it.
    pub role: String,
}

impl Member {
    /// Construct a member.
    pub fn new(kind: MemberKind, reference: OsmId, role: impl Into<String>) -> Self {
        Self {
            kind,
            reference,
            role: role.into(),
        }
    }
}

/// A collection of members with named roles.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relation {
    /// Relation identifier.
    pub id: OsmId,
    /// Members in document order.
    pub members: Vec<Member>,
    /// Relation tags.
    pub tags: Tags,
}

impl Relation {
    /// Construct a relation.
    #[must_use]
    pub const fn new(id: OsmId, members: Vec<Member>, tags: Tags) -> Self {
        Self { id, members, tags }
    }

    /// Members referring to ways, in document order.
    pub fn way_members(&self) -> impl Iterator<Item = &Member> + '_ {
        self.members
            .iter()
            .filter(|member| member.kind == MemberKind::Way)
    }
}

impl Taggable for Relation {
    fn object_id(&self) -> OsmId {
        self.id
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// A parsed OSM document.
///
/// Nodes and ways are keyed by identifier so traversal follows ascending id
/// order. Relations keep document order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsmDocument {
    /// Nodes keyed by identifier.
    pub nodes: BTreeMap<OsmId, Node>,
    /// Ways keyed by identifier.
    pub ways: BTreeMap<OsmId, Way>,
    /// Relations in document order.
    pub relations: Vec<Relation>,
}

impl OsmDocument {
    /// Insert a node, replacing any earlier node with the same id.
    pub fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    /// Insert a way, replacing any earlier way with the same id.
    pub fn insert_way(&mut self, way: Way) {
        self.ways.insert(way.id, way);
    }

    /// Append a relation.
    pub fn push_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    /// Return whether the document holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.ways.is_empty() && self.relations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Vec::new(), 0)]
    #[case(vec![1], 0)]
    #[case(vec![1, 2], 1)]
    #[case(vec![1, 2, 3, 4], 3)]
    fn edge_count_saturates(#[case] nodes: Vec<OsmId>, #[case] expected: usize) {
        let way = Way::new(1, nodes, Tags::new());
        assert_eq!(way.edge_count(), expected);
        assert_eq!(way.node_pairs().count(), expected);
    }

    #[rstest]
    fn way_members_skip_other_kinds() {
        let relation = Relation::new(
            9,
            vec![
                Member::new(MemberKind::Node, 1, "stop"),
                Member::new(MemberKind::Way, 2, "outer"),
                Member::new(MemberKind::Relation, 3, ""),
                Member::new(MemberKind::Way, 4, "inner"),
            ],
            Tags::new(),
        );
        let refs: Vec<OsmId> = relation
            .way_members()
            .map(|member| member.reference)
            .collect();
        assert_eq!(refs, vec![2, 4]);
    }

    #[rstest]
    fn tags_iterate_in_key_order() {
        let node = Node::new(
            1,
            Coord { x: 0.0, y: 0.0 },
            Tags::from([
                ("name".into(), "Kiosk".into()),
                ("amenity".into(), "cafe".into()),
            ]),
        );
        let keys: Vec<&str> = node.tags().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["amenity", "name"]);
        assert_eq!(node.tag_count(), 2);
    }

    #[rstest]
    fn later_nodes_replace_earlier_ones() {
        let mut document = OsmDocument::default();
        document.insert_node(Node::with_empty_tags(1, Coord { x: 0.0, y: 0.0 }));
        document.insert_node(Node::with_empty_tags(1, Coord { x: 3.0, y: 4.0 }));
        assert_eq!(document.nodes.len(), 1);
        assert_eq!(
            document.nodes.get(&1).map(Node::lon),
            Some(3.0),
            "expected the second node to win"
        );
    }
}
