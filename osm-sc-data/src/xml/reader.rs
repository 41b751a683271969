//! Streaming reader yielding fully parsed OSM elements.

use geo::Coord;
use log::debug;
use osm_sc_core::{Member, MemberKind, Node, OsmDocument, Relation, Tags, Way};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use super::{ElementAttributes, XmlError};

/// A top-level OSM element with its children resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum OsmElement {
    /// A `<node>` element.
    Node(Node),
    /// A `<way>` element.
    Way(Way),
    /// A `<relation>` element.
    Relation(Relation),
}

/// Pulls nodes, ways and relations out of OSM XML text one at a time.
///
/// Container and metadata elements (`<osm>`, `<bounds>`, `<meta>`, `<note>`)
/// are skipped. The iterator stops after the first error.
///
/// # Examples
/// ```
/// use osm_sc_data::xml::{OsmElement, OsmXmlReader};
///
/// let text = r#"<osm><node id="5" lon="1.0" lat="2.0"/></osm>"#;
/// let elements: Vec<OsmElement> = OsmXmlReader::new(text)
///     .collect::<Result<_, _>>()
///     .expect("well-formed input");
/// assert!(matches!(&elements[..], [OsmElement::Node(node)] if node.id == 5));
/// ```
pub struct OsmXmlReader<'a> {
    reader: Reader<&'a [u8]>,
    finished: bool,
}

impl std::fmt::Debug for OsmXmlReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsmXmlReader")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<'a> OsmXmlReader<'a> {
    /// Read from `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut reader = Reader::from_str(text);
        reader.trim_text(true);
        Self {
            reader,
            finished: false,
        }
    }

    /// Return the next element, or `None` at the end of the document.
    ///
    /// # Errors
    /// Returns [`XmlError`] when the XML is malformed or an element lacks a
    /// required attribute.
    pub fn next_element(&mut self) -> Result<Option<OsmElement>, XmlError> {
        loop {
            let position = self.reader.buffer_position();
            let event = self
                .reader
                .read_event()
                .map_err(|source| XmlError::Syntax { source, position })?;
            let (start, has_children) = match event {
                Event::Eof => return Ok(None),
                Event::Start(start) => (start, true),
                Event::Empty(start) => (start, false),
                _ => continue,
            };
            let element = match start.name().as_ref() {
                b"node" => OsmElement::Node(self.read_node(&start, has_children, position)?),
                b"way" => OsmElement::Way(self.read_way(&start, has_children, position)?),
                b"relation" => {
                    OsmElement::Relation(self.read_relation(&start, has_children, position)?)
                }
                _ => continue,
            };
            return Ok(Some(element));
        }
    }

    fn read_node(
        &mut self,
        start: &BytesStart<'_>,
        has_children: bool,
        position: usize,
    ) -> Result<Node, XmlError> {
        let attributes = ElementAttributes::read("node", start, position)?;
        let id = attributes.parse("id")?;
        let location = Coord {
            x: attributes.parse("lon")?,
            y: attributes.parse("lat")?,
        };
        let mut tags = Tags::new();
        if has_children {
            self.for_each_child("node", position, |child, child_position| {
                collect_tag(child, child_position, &mut tags)
            })?;
        }
        Ok(Node::new(id, location, tags))
    }

    fn read_way(
        &mut self,
        start: &BytesStart<'_>,
        has_children: bool,
        position: usize,
    ) -> Result<Way, XmlError> {
        let attributes = ElementAttributes::read("way", start, position)?;
        let id = attributes.parse("id")?;
        let mut nodes = Vec::new();
        let mut tags = Tags::new();
        if has_children {
            self.for_each_child("way", position, |child, child_position| {
                if child.name().as_ref() == b"nd" {
                    let nd = ElementAttributes::read("nd", child, child_position)?;
                    nodes.push(nd.parse("ref")?);
                    Ok(())
                } else {
                    collect_tag(child, child_position, &mut tags)
                }
            })?;
        }
        Ok(Way::new(id, nodes, tags))
    }

    fn read_relation(
        &mut self,
        start: &BytesStart<'_>,
        has_children: bool,
        position: usize,
    ) -> Result<Relation, XmlError> {
        let attributes = ElementAttributes::read("relation", start, position)?;
        let id = attributes.parse("id")?;
        let mut members = Vec::new();
        let mut tags = Tags::new();
        if has_children {
            self.for_each_child("relation", position, |child, child_position| {
                if child.name().as_ref() == b"member" {
                    members.push(read_member(child, child_position)?);
                    Ok(())
                } else {
                    collect_tag(child, child_position, &mut tags)
                }
            })?;
        }
        Ok(Relation::new(id, members, tags))
    }

    /// Visit every child start tag until `parent` closes.
    fn for_each_child<F>(
        &mut self,
        parent: &'static str,
        opened_at: usize,
        mut visit: F,
    ) -> Result<(), XmlError>
    where
        F: FnMut(&BytesStart<'_>, usize) -> Result<(), XmlError>,
    {
        loop {
            let position = self.reader.buffer_position();
            let event = self
                .reader
                .read_event()
                .map_err(|source| XmlError::Syntax { source, position })?;
            match event {
                Event::Start(child) | Event::Empty(child) => visit(&child, position)?,
                Event::End(end) if end.name().as_ref() == parent.as_bytes() => return Ok(()),
                Event::Eof => {
                    return Err(XmlError::UnexpectedEof {
                        element: parent,
                        position: opened_at,
                    });
                }
                _ => {}
            }
        }
    }
}

impl Iterator for OsmXmlReader<'_> {
    type Item = Result<OsmElement, XmlError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let outcome = self.next_element().transpose();
        if !matches!(outcome, Some(Ok(_))) {
            self.finished = true;
        }
        outcome
    }
}

fn collect_tag(child: &BytesStart<'_>, position: usize, tags: &mut Tags) -> Result<(), XmlError> {
    if child.name().as_ref() != b"tag" {
        return Ok(());
    }
    let attributes = ElementAttributes::read("tag", child, position)?;
    let key = attributes.require("k")?.to_owned();
    let value = attributes.require("v")?.to_owned();
    tags.insert(key, value);
    Ok(())
}

fn read_member(child: &BytesStart<'_>, position: usize) -> Result<Member, XmlError> {
    let attributes = ElementAttributes::read("member", child, position)?;
    let raw_kind = attributes.require("type")?;
    let kind =
        MemberKind::from_osm_type(raw_kind).ok_or_else(|| attributes.invalid("type", raw_kind))?;
    let reference = attributes.parse("ref")?;
    let role = attributes.get("role").unwrap_or_default();
    Ok(Member::new(kind, reference, role))
}

/// Read a whole document into memory.
///
/// Later elements replace earlier nodes or ways with the same id.
///
/// # Errors
/// Returns the first [`XmlError`] encountered.
///
/// # Examples
/// ```
/// use osm_sc_data::xml::read_document;
///
/// let document = read_document(
///     r#"<osm>
///          <node id="1" lon="0.0" lat="0.0"/>
///          <node id="2" lon="1.0" lat="0.0"/>
///          <way id="10"><nd ref="1"/><nd ref="2"/></way>
///        </osm>"#,
/// )?;
/// assert_eq!(document.nodes.len(), 2);
/// assert_eq!(document.ways.get(&10).map(|way| way.nodes.len()), Some(2));
/// # Ok::<(), osm_sc_data::xml::XmlError>(())
/// ```
pub fn read_document(text: &str) -> Result<OsmDocument, XmlError> {
    let mut document = OsmDocument::default();
    for element in OsmXmlReader::new(text) {
        match element? {
            OsmElement::Node(node) => document.insert_node(node),
            OsmElement::Way(way) => document.insert_way(way),
            OsmElement::Relation(relation) => document.push_relation(relation),
        }
    }
    debug!(
        "Read {} nodes, {} ways and {} relations",
        document.nodes.len(),
        document.ways.len(),
        document.relations.len()
    );
    Ok(document)
}
