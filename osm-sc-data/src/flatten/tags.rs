//! Key-value rows shared by every element kind.

use osm_sc_core::{ObjectTag, OsmId, RowBuffer, Taggable};

/// Total tag rows the given elements produce.
pub(super) fn count_tag_rows<'a, T>(elements: impl IntoIterator<Item = &'a T>) -> usize
where
    T: Taggable + 'a,
{
    elements.into_iter().map(Taggable::tag_count).sum()
}

/// Append one row per tag of `element`, attributed to `object`.
pub(super) fn push_tag_rows(
    rows: &mut RowBuffer<ObjectTag>,
    object: OsmId,
    element: &impl Taggable,
) {
    for (key, value) in element.tags() {
        rows.push(ObjectTag::new(object, key, value));
    }
}

/// Build the key-value table for `elements`, one row per tag.
///
/// Rows follow element order, then key order within each element.
///
/// # Examples
/// ```
/// use osm_sc_core::{Tags, Way};
/// use osm_sc_data::flatten::key_value_rows;
///
/// let tags = Tags::from([("highway".to_owned(), "residential".to_owned())]);
/// let ways = [Way::new(4, vec![1, 2], tags), Way::new(5, vec![2, 3], Tags::new())];
/// let rows = key_value_rows(&ways);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].object, "4");
/// ```
pub fn key_value_rows<'a, T, I>(elements: I) -> Vec<ObjectTag>
where
    T: Taggable + 'a,
    I: IntoIterator<Item = &'a T>,
    I::IntoIter: Clone,
{
    let iter = elements.into_iter();
    let mut rows = RowBuffer::with_rows(count_tag_rows(iter.clone()));
    for element in iter {
        push_tag_rows(&mut rows, element.object_id(), element);
    }
    rows.finish()
}
