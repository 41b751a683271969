//! Column accumulator building silicate tables straight from XML.

use log::debug;
use osm_sc_core::{
    Edge, EdgeIdGenerator, Interrupt, Node, ObjectLinkEdge, ObjectTag, Relation, ScTables,
    Taggable, Vertex, Way,
};

use super::reader::{OsmElement, OsmXmlReader};
use crate::ScError;

/// Elements read between interrupt polls.
const ELEMENT_CHECK_INTERVAL: usize = 1000;

/// Row totals gathered by the counting pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ColumnSizes {
    vertices: usize,
    edges: usize,
    node_tags: usize,
    way_tags: usize,
    rel_tags: usize,
}

impl ColumnSizes {
    fn record(&mut self, element: &OsmElement) {
        match element {
            OsmElement::Node(node) => {
                self.vertices += 1;
                self.node_tags += node.tag_count();
            }
            OsmElement::Way(way) => {
                self.edges += way.edge_count();
                self.way_tags += way.tag_count();
            }
            OsmElement::Relation(relation) => self.rel_tags += relation.tag_count(),
        }
    }
}

/// Parallel key-value columns for one element kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct TagColumns {
    id: Vec<String>,
    key: Vec<String>,
    val: Vec<String>,
}

impl TagColumns {
    fn with_capacity(rows: usize) -> Self {
        Self {
            id: Vec::with_capacity(rows),
            key: Vec::with_capacity(rows),
            val: Vec::with_capacity(rows),
        }
    }

    fn push_tags(&mut self, element: &impl Taggable) {
        let id = element.object_id().to_string();
        for (key, value) in element.tags() {
            self.id.push(id.clone());
            self.key.push(key.clone());
            self.val.push(value.clone());
        }
    }

    const fn len(&self) -> usize {
        self.id.len()
    }

    fn into_rows(self) -> Vec<ObjectTag> {
        self.id
            .into_iter()
            .zip(self.key)
            .zip(self.val)
            .map(|((object, key), value)| ObjectTag { object, key, value })
            .collect()
    }
}

/// Silicate columns accumulated from one OSM XML document.
///
/// The text is read twice: a counting pass sizes every column, then a fill
/// pass writes into the preallocated storage. Element order is document
/// order and tags appear in key order.
///
/// # Examples
/// ```
/// use osm_sc_core::{NeverInterrupt, RandomEdgeIds};
/// use osm_sc_data::xml::XmlDataSc;
///
/// let text = r#"<osm>
///   <node id="1" lon="0.0" lat="0.0"/>
///   <node id="2" lon="1.0" lat="1.0"/>
///   <way id="7"><nd ref="1"/><nd ref="2"/><tag k="highway" v="path"/></way>
/// </osm>"#;
/// let mut ids = RandomEdgeIds::from_seed(1);
/// let data = XmlDataSc::parse(text, &mut ids, &NeverInterrupt)?;
/// assert_eq!(data.vert_id(), ["1", "2"]);
/// assert_eq!(data.vx0(), ["1"]);
/// assert_eq!(data.vx1(), ["2"]);
/// assert_eq!(data.way_key(), ["highway"]);
/// # Ok::<(), osm_sc_data::ScError>(())
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct XmlDataSc {
    vx: Vec<f64>,
    vy: Vec<f64>,
    vert_id: Vec<String>,
    vx0: Vec<String>,
    vx1: Vec<String>,
    edge: Vec<String>,
    object: Vec<String>,
    node_tags: TagColumns,
    way_tags: TagColumns,
    rel_tags: TagColumns,
}

impl XmlDataSc {
    /// Parse `text`, drawing one identifier per edge from `edge_ids`.
    ///
    /// The interrupt is polled every thousand elements in both passes.
    ///
    /// # Errors
    /// Returns [`ScError::Parse`] for malformed XML and
    /// [`ScError::Interrupted`] when cancellation is observed.
    pub fn parse<G, I>(text: &str, mut edge_ids: G, interrupt: &I) -> Result<Self, ScError>
    where
        G: EdgeIdGenerator,
        I: Interrupt + ?Sized,
    {
        let sizes = Self::count(text, interrupt)?;
        debug!(
            "Counted {} vertices, {} edges and {} tag rows",
            sizes.vertices,
            sizes.edges,
            sizes.node_tags + sizes.way_tags + sizes.rel_tags
        );
        let mut data = Self::with_sizes(sizes);
        for (index, element) in OsmXmlReader::new(text).enumerate() {
            if index.is_multiple_of(ELEMENT_CHECK_INTERVAL) {
                interrupt.check()?;
            }
            match element? {
                OsmElement::Node(node) => data.push_node(&node),
                OsmElement::Way(way) => data.push_way(&way, &mut edge_ids),
                OsmElement::Relation(relation) => data.push_relation(&relation),
            }
        }
        debug_assert_eq!(
            data.sizes(),
            sizes,
            "filled columns differ from the pre-pass totals"
        );
        Ok(data)
    }

    fn count<I: Interrupt + ?Sized>(text: &str, interrupt: &I) -> Result<ColumnSizes, ScError> {
        let mut sizes = ColumnSizes::default();
        for (index, element) in OsmXmlReader::new(text).enumerate() {
            if index.is_multiple_of(ELEMENT_CHECK_INTERVAL) {
                interrupt.check()?;
            }
            sizes.record(&element?);
        }
        Ok(sizes)
    }

    fn with_sizes(sizes: ColumnSizes) -> Self {
        Self {
            vx: Vec::with_capacity(sizes.vertices),
            vy: Vec::with_capacity(sizes.vertices),
            vert_id: Vec::with_capacity(sizes.vertices),
            vx0: Vec::with_capacity(sizes.edges),
            vx1: Vec::with_capacity(sizes.edges),
            edge: Vec::with_capacity(sizes.edges),
            object: Vec::with_capacity(sizes.edges),
            node_tags: TagColumns::with_capacity(sizes.node_tags),
            way_tags: TagColumns::with_capacity(sizes.way_tags),
            rel_tags: TagColumns::with_capacity(sizes.rel_tags),
        }
    }

    const fn sizes(&self) -> ColumnSizes {
        ColumnSizes {
            vertices: self.vert_id.len(),
            edges: self.edge.len(),
            node_tags: self.node_tags.len(),
            way_tags: self.way_tags.len(),
            rel_tags: self.rel_tags.len(),
        }
    }

    fn push_node(&mut self, node: &Node) {
        self.vx.push(node.lon());
        self.vy.push(node.lat());
        self.vert_id.push(node.id.to_string());
        self.node_tags.push_tags(node);
    }

    fn push_way(&mut self, way: &Way, edge_ids: &mut impl EdgeIdGenerator) {
        let object = way.id.to_string();
        for (from, to) in way.node_pairs() {
            self.vx0.push(from.to_string());
            self.vx1.push(to.to_string());
            self.edge.push(edge_ids.next_id());
            self.object.push(object.clone());
        }
        self.way_tags.push_tags(way);
    }

    fn push_relation(&mut self, relation: &Relation) {
        self.rel_tags.push_tags(relation);
    }

    /// Vertex longitudes.
    #[must_use]
    pub fn vx(&self) -> &[f64] {
        &self.vx
    }

    /// Vertex latitudes.
    #[must_use]
    pub fn vy(&self) -> &[f64] {
        &self.vy
    }

    /// Vertex identifiers.
    #[must_use]
    pub fn vert_id(&self) -> &[String] {
        &self.vert_id
    }

    /// Edge source vertices.
    #[must_use]
    pub fn vx0(&self) -> &[String] {
        &self.vx0
    }

    /// Edge target vertices.
    #[must_use]
    pub fn vx1(&self) -> &[String] {
        &self.vx1
    }

    /// Synthetic edge identifiers.
    #[must_use]
    pub fn edge(&self) -> &[String] {
        &self.edge
    }

    /// Way identifier owning each edge.
    #[must_use]
    pub fn object(&self) -> &[String] {
        &self.object
    }

    /// Tagged node identifiers.
    #[must_use]
    pub fn node_id(&self) -> &[String] {
        &self.node_tags.id
    }

    /// Node tag keys.
    #[must_use]
    pub fn node_key(&self) -> &[String] {
        &self.node_tags.key
    }

    /// Node tag values.
    #[must_use]
    pub fn node_val(&self) -> &[String] {
        &self.node_tags.val
    }

    /// Tagged way identifiers.
    #[must_use]
    pub fn way_id(&self) -> &[String] {
        &self.way_tags.id
    }

    /// Way tag keys.
    #[must_use]
    pub fn way_key(&self) -> &[String] {
        &self.way_tags.key
    }

    /// Way tag values.
    #[must_use]
    pub fn way_val(&self) -> &[String] {
        &self.way_tags.val
    }

    /// Tagged relation identifiers.
    #[must_use]
    pub fn rel_id(&self) -> &[String] {
        &self.rel_tags.id
    }

    /// Relation tag keys.
    #[must_use]
    pub fn rel_key(&self) -> &[String] {
        &self.rel_tags.key
    }

    /// Relation tag values.
    #[must_use]
    pub fn rel_val(&self) -> &[String] {
        &self.rel_tags.val
    }

    /// Assemble the columns into row tables.
    ///
    /// The edge identifier column feeds both `edge` and `object_link_edge`.
    #[must_use]
    pub fn into_tables(self) -> ScTables {
        let vertex = self
            .vx
            .into_iter()
            .zip(self.vy)
            .zip(self.vert_id)
            .map(|((x, y), vertex)| Vertex { x, y, vertex })
            .collect();
        let edge = self
            .vx0
            .into_iter()
            .zip(self.vx1)
            .zip(self.edge.iter().cloned())
            .map(|((vx0, vx1), edge)| Edge { vx0, vx1, edge })
            .collect();
        let object_link_edge = self
            .edge
            .into_iter()
            .zip(self.object)
            .map(|(edge, object)| ObjectLinkEdge { edge, object })
            .collect();
        ScTables {
            vertex,
            edge,
            object_link_edge,
            obj_node: self.node_tags.into_rows(),
            obj_way: self.way_tags.into_rows(),
            obj_rel: self.rel_tags.into_rows(),
        }
    }
}
