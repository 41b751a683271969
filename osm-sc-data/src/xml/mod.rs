//! Strict OSM XML reading.
//!
//! [`OsmXmlReader`] streams fully parsed nodes, ways and relations out of an
//! OSM XML or Overpass response. [`XmlDataSc`] builds the silicate columns
//! directly from that stream. Malformed input is reported, never repaired.

use std::str::FromStr;

use quick_xml::events::{BytesStart, attributes::AttrError};
use thiserror::Error;

mod reader;
mod sc;

pub use reader::{OsmElement, OsmXmlReader, read_document};
pub use sc::XmlDataSc;

/// Errors raised while reading OSM XML.
///
/// Positions are byte offsets into the input text.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The XML itself is malformed.
    #[error("malformed XML at byte {position}: {source}")]
    Syntax {
        /// Error reported by the XML tokenizer.
        #[source]
        source: quick_xml::Error,
        /// Offset where the failing event started.
        position: usize,
    },
    /// An element's attribute list is malformed.
    #[error("malformed attribute at byte {position}: {source}")]
    Attribute {
        /// Error reported by the attribute parser.
        #[source]
        source: AttrError,
        /// Offset of the element carrying the attribute.
        position: usize,
    },
    /// A required attribute is absent.
    #[error("<{element}> at byte {position} is missing the `{attribute}` attribute")]
    MissingAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
        /// Offset of the element.
        position: usize,
    },
    /// An attribute value could not be interpreted.
    #[error("<{element}> at byte {position} has invalid `{attribute}` value {value:?}")]
    InvalidValue {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
        /// The rejected value.
        value: String,
        /// Offset of the element.
        position: usize,
    },
    /// The document ended before an element was closed.
    #[error("document ended inside <{element}> opened at byte {position}")]
    UnexpectedEof {
        /// Name of the unclosed element.
        element: &'static str,
        /// Offset where the element was opened.
        position: usize,
    },
}

/// Decoded attributes of one element.
#[derive(Debug)]
struct ElementAttributes {
    element: &'static str,
    position: usize,
    values: Vec<(String, String)>,
}

impl ElementAttributes {
    fn read(
        element: &'static str,
        start: &BytesStart<'_>,
        position: usize,
    ) -> Result<Self, XmlError> {
        let mut values = Vec::new();
        for entry in start.attributes() {
            let attribute = entry.map_err(|source| XmlError::Attribute { source, position })?;
            let value = attribute
                .unescape_value()
                .map_err(|source| XmlError::Syntax { source, position })?;
            values.push((
                String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
                value.into_owned(),
            ));
        }
        Ok(Self {
            element,
            position,
            values,
        })
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn require(&self, name: &'static str) -> Result<&str, XmlError> {
        self.get(name).ok_or(XmlError::MissingAttribute {
            element: self.element,
            attribute: name,
            position: self.position,
        })
    }

    fn parse<T: FromStr>(&self, name: &'static str) -> Result<T, XmlError> {
        let raw = self.require(name)?;
        raw.trim().parse().map_err(|_| self.invalid(name, raw))
    }

    fn invalid(&self, name: &'static str, raw: &str) -> XmlError {
        XmlError::InvalidValue {
            element: self.element,
            attribute: name,
            value: raw.to_owned(),
            position: self.position,
        }
    }
}
