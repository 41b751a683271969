//! End-to-end conversion of OSM XML text into silicate tables.

use log::debug;
use osm_sc_core::{EdgeIdGenerator, Interrupt, NeverInterrupt, RandomEdgeIds, ScTables};

use crate::{ScError, xml::XmlDataSc};

/// File the `dump-input` feature writes the raw input to.
#[cfg(feature = "dump-input")]
pub const DUMP_PATH: &str = "osmdata-sc.xml";

/// Convert OSM XML text into the six silicate tables.
///
/// Edge identifiers are drawn from `edge_ids` and cancellation is polled
/// through `interrupt`. With the `dump-input` feature the raw text is first
/// copied to [`DUMP_PATH`]; failures to write it are ignored.
///
/// # Errors
/// Returns [`ScError::Parse`] for malformed XML and
/// [`ScError::Interrupted`] when cancelled.
///
/// # Examples
/// ```
/// use osm_sc_core::{NeverInterrupt, RandomEdgeIds, ScTables};
/// use osm_sc_data::osmdata_sc;
///
/// let text = r#"<osm>
///   <node id="1" lon="0.0" lat="0.0"/>
///   <node id="2" lon="0.5" lat="0.5"/>
///   <way id="3"><nd ref="1"/><nd ref="2"/></way>
/// </osm>"#;
/// let tables = osmdata_sc(text, RandomEdgeIds::from_seed(11), &NeverInterrupt)?;
/// let sizes: Vec<usize> = tables.named().iter().map(|(_, table)| table.len()).collect();
/// assert_eq!(sizes, vec![2, 1, 1, 0, 0, 0]);
/// # Ok::<(), osm_sc_data::ScError>(())
/// ```
pub fn osmdata_sc<G, I>(text: &str, edge_ids: G, interrupt: &I) -> Result<ScTables, ScError>
where
    G: EdgeIdGenerator,
    I: Interrupt + ?Sized,
{
    #[cfg(feature = "dump-input")]
    dump_input_to(camino::Utf8Path::new(DUMP_PATH), text);

    assemble(text, edge_ids, interrupt)
}

fn assemble<G, I>(text: &str, edge_ids: G, interrupt: &I) -> Result<ScTables, ScError>
where
    G: EdgeIdGenerator,
    I: Interrupt + ?Sized,
{
    let tables = XmlDataSc::parse(text, edge_ids, interrupt)?.into_tables();
    debug!(
        "Assembled {} vertices and {} edges",
        tables.vertex.len(),
        tables.edge.len()
    );
    Ok(tables)
}

/// [`osmdata_sc`] with entropy-seeded edge identifiers and no cancellation.
///
/// # Errors
/// Returns [`ScError::Parse`] for malformed XML.
pub fn osmdata_sc_default(text: &str) -> Result<ScTables, ScError> {
    osmdata_sc(text, RandomEdgeIds::from_entropy(), &NeverInterrupt)
}

/// Copy `text` verbatim to `path`, logging and otherwise ignoring failures.
#[cfg(feature = "dump-input")]
fn dump_input_to(path: &camino::Utf8Path, text: &str) {
    if let Err(err) = osm_sc_fs::write_file(path, text) {
        debug!("Skipping input dump to {path}: {err}");
    }
}
