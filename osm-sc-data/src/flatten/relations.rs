use log::debug;
use osm_sc_core::{Interrupt, Interrupted, Membership, Relation, RowBuffer};

use super::{
    RelationTables,
    tags::{count_tag_rows, push_tag_rows},
};
use crate::trace::{RelationTracer, TracedRelation};

/// Emit membership and key-value rows for every relation.
///
/// Each relation is traced once up front, so the membership table is sized
/// from the traced member lists rather than the raw ones. Tag rows come from
/// the traced tags. The interrupt is polled once per relation.
///
/// # Errors
/// Returns [`Interrupted`] when a poll fails.
///
/// # Examples
/// ```
/// use osm_sc_core::{Member, MemberKind, NeverInterrupt, Relation, Tags};
/// use osm_sc_data::{WayMemberTracer, flatten::flatten_relations};
///
/// let relations = [Relation::new(
///     40,
///     vec![Member::new(MemberKind::Way, 4, "outer")],
///     Tags::from([("type".to_owned(), "boundary".to_owned())]),
/// )];
/// let tables = flatten_relations(&relations, &WayMemberTracer, &NeverInterrupt)?;
/// assert_eq!(tables.members[0].member, "4");
/// assert_eq!(tables.tags[0].value, "boundary");
/// # Ok::<(), osm_sc_core::Interrupted>(())
/// ```
pub fn flatten_relations<T, I>(
    relations: &[Relation],
    tracer: &T,
    interrupt: &I,
) -> Result<RelationTables, Interrupted>
where
    T: RelationTracer + ?Sized,
    I: Interrupt + ?Sized,
{
    let traced = relations
        .iter()
        .map(|relation| {
            interrupt.check()?;
            Ok(tracer.trace(relation))
        })
        .collect::<Result<Vec<TracedRelation>, Interrupted>>()?;
    let member_total = traced.iter().map(|relation| relation.members.len()).sum();
    let mut members = RowBuffer::with_rows(member_total);
    let mut tags = RowBuffer::with_rows(count_tag_rows(&traced));
    for relation in &traced {
        let id = relation.id.to_string();
        for (member, role) in &relation.members {
            members.push(Membership {
                relation: id.clone(),
                member: member.to_string(),
                role: role.clone(),
            });
        }
        push_tag_rows(&mut tags, relation.id, relation);
    }
    let tables = RelationTables {
        members: members.finish(),
        tags: tags.finish(),
    };
    debug!(
        "Flattened {} relations into {} members with {} tags",
        relations.len(),
        tables.members.len(),
        tables.tags.len()
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use osm_sc_core::{Member, MemberKind, Tags, test_support::InterruptAfter};
    use rstest::rstest;

    use crate::trace::WayMemberTracer;

    #[rstest]
    fn membership_rows_come_from_the_tracer() {
        let relations = [
            Relation::new(
                1,
                vec![
                    Member::new(MemberKind::Node, 5, "label"),
                    Member::new(MemberKind::Way, 6, "outer"),
                ],
                Tags::new(),
            ),
            Relation::new(2, vec![Member::new(MemberKind::Way, 7, "")], Tags::new()),
        ];
        let tables = flatten_relations(&relations, &WayMemberTracer, &InterruptAfter::never())
            .expect("never interrupted");
        let rows: Vec<(&str, &str, &str)> = tables
            .members
            .iter()
            .map(|row| (row.relation.as_str(), row.member.as_str(), row.role.as_str()))
            .collect();
        assert_eq!(rows, vec![("1", "6", "outer"), ("2", "7", "")]);
    }

    #[rstest]
    fn tags_follow_the_traced_relation() {
        let relabel = |relation: &Relation| TracedRelation {
            id: relation.id,
            members: Vec::new(),
            tags: Tags::from([("source".to_owned(), "tracer".to_owned())]),
        };
        let relations = [Relation::new(
            3,
            Vec::new(),
            Tags::from([("name".to_owned(), "ignored".to_owned())]),
        )];
        let tables = flatten_relations(&relations, &relabel, &InterruptAfter::never())
            .expect("never interrupted");
        assert!(tables.members.is_empty());
        let keys: Vec<&str> = tables.tags.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["source"]);
    }

    #[rstest]
    fn polls_once_per_relation() {
        let relations: Vec<Relation> = (1..=4)
            .map(|id| Relation::new(id, Vec::new(), Tags::new()))
            .collect();
        let interrupt = InterruptAfter::never();
        flatten_relations(&relations, &WayMemberTracer, &interrupt).expect("never interrupted");
        assert_eq!(interrupt.polls(), 4);

        let stopping = InterruptAfter::new(2);
        let result = flatten_relations(&relations, &WayMemberTracer, &stopping);
        assert_eq!(result, Err(Interrupted));
        assert_eq!(stopping.polls(), 3);
    }
}
