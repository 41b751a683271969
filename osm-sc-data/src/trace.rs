//! Resolution of relation members into `(member id, role)` pairs.

use osm_sc_core::{OsmId, Relation, Taggable, Tags};

/// A relation after member resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracedRelation {
    /// Relation identifier.
    pub id: OsmId,
    /// Resolved members as `(member id, role)` pairs.
    pub members: Vec<(OsmId, String)>,
    /// Tags to emit for the relation.
    pub tags: Tags,
}

impl Taggable for TracedRelation {
    fn object_id(&self) -> OsmId {
        self.id
    }

    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// Resolves a relation's members for the relation flattener.
///
/// Closures taking `&Relation` and returning a [`TracedRelation`] implement
/// the trait.
pub trait RelationTracer {
    /// Trace `relation`.
    fn trace(&self, relation: &Relation) -> TracedRelation;
}

impl<F> RelationTracer for F
where
    F: Fn(&Relation) -> TracedRelation,
{
    fn trace(&self, relation: &Relation) -> TracedRelation {
        self(relation)
    }
}

/// Keeps the way members of a relation, in document order, with their roles.
///
/// Node and relation members are dropped. Tags are copied unchanged.
///
/// # Examples
/// ```
/// use osm_sc_core::{Member, MemberKind, Relation, Tags};
/// use osm_sc_data::{RelationTracer, WayMemberTracer};
///
/// let relation = Relation::new(
///     1,
///     vec![
///         Member::new(MemberKind::Way, 10, "outer"),
///         Member::new(MemberKind::Node, 20, "label"),
///     ],
///     Tags::new(),
/// );
/// let traced = WayMemberTracer.trace(&relation);
/// assert_eq!(traced.members, vec![(10, "outer".to_owned())]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct WayMemberTracer;

impl RelationTracer for WayMemberTracer {
    fn trace(&self, relation: &Relation) -> TracedRelation {
        TracedRelation {
            id: relation.id,
            members: relation
                .way_members()
                .map(|member| (member.reference, member.role.clone()))
                .collect(),
            tags: relation.tags.clone(),
        }
    }
}
