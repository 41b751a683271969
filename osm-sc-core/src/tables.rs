//! Row types and table collections in the silicate (SC) layout.
//!
//! Every table is built from an exact row count computed before the fill
//! pass. [`RowBuffer`] holds that count and checks it in debug builds.

use crate::model::OsmId;

/// A vertex row: one per node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
    /// Node identifier as a decimal string.
    #[cfg_attr(feature = "serde", serde(rename = "vertex_"))]
    pub vertex: String,
}

/// An edge row joining two consecutive way nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// Source node identifier.
    #[cfg_attr(feature = "serde", serde(rename = ".vx0"))]
    pub vx0: String,
    /// Target node identifier.
    #[cfg_attr(feature = "serde", serde(rename = ".vx1"))]
    pub vx1: String,
    /// Synthetic edge identifier.
    #[cfg_attr(feature = "serde", serde(rename = "edge_"))]
    pub edge: String,
}

/// Links an edge to the way that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectLinkEdge {
    /// Synthetic edge identifier.
    #[cfg_attr(feature = "serde", serde(rename = "edge_"))]
    pub edge: String,
    /// Way identifier.
    #[cfg_attr(feature = "serde", serde(rename = "object_"))]
    pub object: String,
}

/// A single tag of a node, way or relation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectTag {
    /// Identifier of the tagged element.
    #[cfg_attr(feature = "serde", serde(rename = "object_"))]
    pub object: String,
    /// Tag key.
    pub key: String,
    /// Tag value.
    #[cfg_attr(feature = "serde", serde(rename = "val"))]
    pub value: String,
}

impl ObjectTag {
    /// Build a row for `object`.
    #[must_use]
    pub fn new(object: OsmId, key: &str, value: &str) -> Self {
        Self {
            object: object.to_string(),
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

/// A resolved relation member.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Membership {
    /// Relation identifier.
    #[cfg_attr(feature = "serde", serde(rename = "object_"))]
    pub relation: String,
    /// Member identifier.
    #[cfg_attr(feature = "serde", serde(rename = "ref"))]
    pub member: String,
    /// Member role.
    pub role: String,
}

/// Fixed-size row storage sized by a counting pre-pass.
///
/// # Examples
/// ```
/// use osm_sc_core::RowBuffer;
///
/// let mut rows = RowBuffer::with_rows(2);
/// rows.push("a");
/// rows.push("b");
/// assert_eq!(rows.finish(), vec!["a", "b"]);
/// ```
#[derive(Debug)]
pub struct RowBuffer<R> {
    rows: Vec<R>,
    expected: usize,
}

impl<R> RowBuffer<R> {
    /// Allocate storage for exactly `expected` rows.
    #[must_use]
    pub fn with_rows(expected: usize) -> Self {
        Self {
            rows: Vec::with_capacity(expected),
            expected,
        }
    }

    /// Append a row. Rows beyond the counted total are a logic error.
    pub fn push(&mut self, row: R) {
        debug_assert!(
            self.rows.len() < self.expected,
            "row count exceeds the pre-pass total of {}",
            self.expected
        );
        self.rows.push(row);
    }

    /// Number of rows written so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return whether no rows were written yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return the filled rows.
    #[must_use]
    pub fn finish(self) -> Vec<R> {
        debug_assert_eq!(
            self.rows.len(),
            self.expected,
            "filled rows differ from the pre-pass total"
        );
        self.rows
    }
}

/// Borrowed view of one table in an [`ScTables`] collection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ScTable<'a> {
    /// The `vertex` table.
    Vertex(&'a [Vertex]),
    /// The `edge` table.
    Edge(&'a [Edge]),
    /// The `object_link_edge` table.
    ObjectLinkEdge(&'a [ObjectLinkEdge]),
    /// One of the `obj_*` key-value tables.
    ObjectTag(&'a [ObjectTag]),
}

impl ScTable<'_> {
    /// Number of rows in the table.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Vertex(rows) => rows.len(),
            Self::Edge(rows) => rows.len(),
            Self::ObjectLinkEdge(rows) => rows.len(),
            Self::ObjectTag(rows) => rows.len(),
        }
    }

    /// Return whether the table has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The six silicate tables returned by the assembler, in fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScTables {
    /// One row per node.
    pub vertex: Vec<Vertex>,
    /// One row per consecutive way node pair.
    pub edge: Vec<Edge>,
    /// One row per edge linking it to its way.
    pub object_link_edge: Vec<ObjectLinkEdge>,
    /// Node tags.
    pub obj_node: Vec<ObjectTag>,
    /// Way tags.
    pub obj_way: Vec<ObjectTag>,
    /// Relation tags.
    pub obj_rel: Vec<ObjectTag>,
}

impl ScTables {
    /// Table names in output order.
    pub const NAMES: [&'static str; 6] = [
        "vertex",
        "edge",
        "object_link_edge",
        "obj_node",
        "obj_way",
        "obj_rel",
    ];

    /// Named views of every table, in [`ScTables::NAMES`] order.
    ///
    /// # Examples
    /// ```
    /// use osm_sc_core::ScTables;
    ///
    /// let tables = ScTables::default();
    /// let names: Vec<&str> = tables.named().iter().map(|(name, _)| *name).collect();
    /// assert_eq!(names, ScTables::NAMES);
    /// ```
    #[must_use]
    pub fn named(&self) -> [(&'static str, ScTable<'_>); 6] {
        let [vertex, edge, object_link_edge, obj_node, obj_way, obj_rel] = Self::NAMES;
        [
            (vertex, ScTable::Vertex(&self.vertex)),
            (edge, ScTable::Edge(&self.edge)),
            (
                object_link_edge,
                ScTable::ObjectLinkEdge(&self.object_link_edge),
            ),
            (obj_node, ScTable::ObjectTag(&self.obj_node)),
            (obj_way, ScTable::ObjectTag(&self.obj_way)),
            (obj_rel, ScTable::ObjectTag(&self.obj_rel)),
        ]
    }
}
