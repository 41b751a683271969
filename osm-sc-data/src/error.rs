//! Errors surfaced by the end-to-end conversion.

use osm_sc_core::Interrupted;
use thiserror::Error;

use crate::xml::XmlError;

/// Errors raised while converting OSM XML into silicate tables.
#[derive(Debug, Error)]
pub enum ScError {
    /// The input could not be read as OSM XML.
    #[error("failed to read OSM XML: {0}")]
    Parse(#[from] XmlError),
    /// The host requested cancellation.
    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}
