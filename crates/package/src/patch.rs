//! Diff graph to in-place [`Package`] update.
//!
//! After a mutation the server answers with only the triples that changed.
//! Those are applied straight onto the package the caller already holds,
//! without another round of validation. Diffs only ever add content, so
//! members are appended and never removed.

use ldpkg_graph::{Graph, Pattern, Term};
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::literal;
use crate::models::{MemberBuilder, Package, ResourceType};
use crate::vocab::Predicate;

/// What a call to [`patch`] changed, and what it had to leave out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Scalar fields overwritten plus keywords appended.
    pub fields_updated: usize,
    pub members_appended: usize,
    /// Non-fatal problems; each one was logged and skipped.
    pub skipped: Vec<ErrorKind>,
}

impl PatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, kind: ErrorKind) {
        tracing::warn!(error = %kind, "skipping diff entry");
        self.skipped.push(kind);
    }

    fn record<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.skip((*err).clone());
                None
            },
        }
    }
}

/// Applies the diff graph `diff` to `package`, reading statements about
/// `focus` (`_:label` for a blank node, otherwise an IRI).
///
/// Not idempotent: applying the same diff twice appends its members twice.
/// `created` is never touched.
#[instrument(skip(package, diff), fields(quads = diff.len(), fields_updated, members_appended, skipped))]
pub fn patch(package: &mut Package, diff: &Graph, focus: &str) -> PatchOutcome {
    let mut outcome = PatchOutcome::default();
    let subject = Term::named(Predicate::Subject.iri());
    // A keyword anywhere in the diff means the server sent the full new list.
    if diff.count(&Pattern::any().predicate(subject)) > 0 {
        package.keywords = Some(Vec::new());
    }

    let pattern = Pattern::any().subject(Term::from_id(focus));
    for quad in diff.quads(&pattern) {
        let Some(predicate) = Predicate::from_iri(quad.predicate.value()) else {
            continue;
        };
        let value = quad.object.value();
        match predicate {
            Predicate::Modified => {
                if let Some(modified) = outcome.record(literal::timestamp("modified", value)) {
                    package.modified = modified;
                    outcome.fields_updated += 1;
                }
            },
            Predicate::Description => {
                package.description = Some(value.to_string());
                outcome.fields_updated += 1;
            },
            Predicate::Subject => {
                package.keywords.get_or_insert_with(Vec::new).push(value.to_string());
                outcome.fields_updated += 1;
            },
            Predicate::WasRevisionOf => {
                if let Some(revision) = outcome.record(literal::uri(value)) {
                    package.revision_of = Some(revision);
                    outcome.fields_updated += 1;
                }
            },
            Predicate::HadMember => {
                let Some(kind) = ResourceType::classify(value) else {
                    outcome.skip(ErrorKind::UnclassifiableMember(value.to_string()));
                    continue;
                };
                let Some(member) = outcome.record(literal::uri(value)) else {
                    continue;
                };
                let builder = fill_member(MemberBuilder::new(kind, member), diff, value, &mut outcome);
                if let Some(member) = outcome.record(builder.build()) {
                    package.members.push(member);
                    outcome.members_appended += 1;
                }
            },
            _ => {},
        }
    }

    let span = tracing::Span::current();
    span.record("fields_updated", outcome.fields_updated);
    span.record("members_appended", outcome.members_appended);
    span.record("skipped", outcome.skipped.len());
    outcome
}

/// Nested pass over the statements about one new member.
#[instrument(level = "trace", skip(builder, diff, outcome), fields(kind = %builder.kind()))]
fn fill_member(mut builder: MemberBuilder, diff: &Graph, member: &str, outcome: &mut PatchOutcome) -> MemberBuilder {
    let pattern = Pattern::any().subject(Term::named(member));
    for quad in diff.quads(&pattern) {
        let value = quad.object.value();
        builder = match Predicate::from_iri(quad.predicate.value()) {
            Some(Predicate::MembershipResource) => match outcome.record(literal::uri(value)) {
                Some(resource) => builder.resource(resource),
                None => builder,
            },
            Some(Predicate::Title) => builder.title(value),
            Some(Predicate::Format) => builder.format(value),
            Some(Predicate::Extent) if builder.kind() == ResourceType::File => {
                match outcome.record(literal::extent(value)) {
                    Some(extent) => builder.extent(extent),
                    None => builder,
                }
            },
            _ => builder,
        };
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileMember, Member, Uri};
    use crate::vocab::{dcterms, ldp, prov};
    use ldpkg_graph::{Quad, parse_nquads};
    use rstest::{fixture, rstest};
    use time::macros::datetime;

    const FOCUS: &str = "_:c14n0";
    const FILE_HASH: &str = "bafkreiwyojfljooa7lqsaj2xuid5zzzzg6zdmen4khvdgajgxbenyjqwx6";
    const MESSAGE_HASH: &str = "bafkreihh7566tfjgvq6kbnxjbtfqxkwovompzom7wbbr6qmw4wxfogo6mv";

    #[fixture]
    fn package() -> Package {
        Package {
            resource: Uri::parse("http://localhost:8086/example").unwrap(),
            value: Uri::parse("dweb:/ipfs/bafkreiujzdegxdncf32epf3dhodzdocis2jhtlgmxgedn73u55xtplpft7").unwrap(),
            extent: 4096,
            name: "Example package".to_string(),
            description: None,
            keywords: None,
            created: datetime!(2019-03-01 12:00 UTC),
            modified: datetime!(2019-03-02 08:30 UTC),
            revision_of: None,
            members: Vec::new(),
        }
    }

    fn focus_quad(predicate: &str, object: Term) -> Quad {
        Quad::new(Term::from_id(FOCUS), Term::named(predicate), object)
    }

    fn member_quad(member: &str, predicate: &str, object: Term) -> Quad {
        Quad::new(Term::named(member), Term::named(predicate), object)
    }

    #[rstest]
    fn test_patch_fixture(mut package: Package) {
        let diff = parse_nquads(include_str!("../tests/fixtures/patch.nq")).unwrap();
        let outcome = patch(&mut package, &diff, FOCUS);
        assert!(outcome.is_clean());
        assert_eq!(outcome.fields_updated, 3);
        assert_eq!(outcome.members_appended, 1);
        assert_eq!(package.modified, datetime!(2019-03-04 10:00 UTC));
        assert_eq!(package.created, datetime!(2019-03-01 12:00 UTC));
        assert_eq!(package.description.as_deref(), Some("Now with \"quotes\""));
        assert!(package.revision_of.is_some());
        assert_eq!(package.keywords, None);
        assert_eq!(
            package.members,
            vec![Member::File(FileMember {
                value: Uri::parse(&format!("dweb:/ipfs/{FILE_HASH}")).unwrap(),
                format: "text/csv".to_string(),
                extent: 77,
                resource: Some(Uri::parse("http://localhost:8086/example/data.csv").unwrap()),
                title: Some("data.csv".to_string()),
            })]
        );
    }

    #[rstest]
    fn test_patch_keywords_from_none(mut package: Package) {
        let diff = Graph::from_iter([focus_quad(dcterms::SUBJECT, Term::literal("fresh"))]);
        patch(&mut package, &diff, FOCUS);
        assert_eq!(package.keywords, Some(vec!["fresh".to_string()]));
    }

    #[rstest]
    fn test_patch_keywords_replace_stale_list(mut package: Package) {
        package.keywords = Some(vec!["stale".to_string()]);
        let diff = Graph::from_iter([
            focus_quad(dcterms::SUBJECT, Term::literal("a")),
            focus_quad(dcterms::SUBJECT, Term::literal("b")),
        ]);
        patch(&mut package, &diff, FOCUS);
        assert_eq!(package.keywords, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[rstest]
    fn test_patch_keyword_on_other_subject_still_resets(mut package: Package) {
        package.keywords = Some(vec!["stale".to_string()]);
        let diff = Graph::from_iter([Quad::new(Term::blank("other"), Term::named(dcterms::SUBJECT), Term::literal("x"))]);
        patch(&mut package, &diff, FOCUS);
        assert_eq!(package.keywords, Some(Vec::new()));
    }

    #[rstest]
    fn test_patch_ignores_other_subjects(mut package: Package) {
        let diff = Graph::from_iter([Quad::new(
            Term::blank("c14n9"),
            Term::named(dcterms::DESCRIPTION),
            Term::literal("not ours"),
        )]);
        let outcome = patch(&mut package, &diff, FOCUS);
        assert_eq!(package.description, None);
        assert_eq!(outcome, PatchOutcome::default());
    }

    #[rstest]
    fn test_patch_named_focus(mut package: Package) {
        let focus = "http://localhost:8086/example";
        let diff = Graph::from_iter([Quad::new(
            Term::named(focus),
            Term::named(dcterms::DESCRIPTION),
            Term::literal("named"),
        )]);
        patch(&mut package, &diff, focus);
        assert_eq!(package.description.as_deref(), Some("named"));
    }

    #[rstest]
    fn test_patch_is_append_only(mut package: Package) {
        let message = format!("u:{MESSAGE_HASH}");
        let file = format!("dweb:/ipfs/{FILE_HASH}");
        let first = Graph::from_iter([
            focus_quad(prov::HAD_MEMBER, Term::named(&message)),
            focus_quad(dcterms::SUBJECT, Term::literal("one")),
        ]);
        let second = Graph::from_iter([
            focus_quad(prov::HAD_MEMBER, Term::named(&file)),
            member_quad(&file, dcterms::FORMAT, Term::literal("text/plain")),
            member_quad(&file, dcterms::EXTENT, Term::typed("5", "http://www.w3.org/2001/XMLSchema#integer")),
        ]);
        patch(&mut package, &first, FOCUS);
        let members_after_first = package.members.len();
        let keywords_after_first = package.keywords.clone();
        patch(&mut package, &second, FOCUS);
        assert!(package.members.len() > members_after_first);
        assert_eq!(package.members[0].resource_type(), ResourceType::Message);
        assert_eq!(package.members[1].resource_type(), ResourceType::File);
        assert_eq!(package.keywords, keywords_after_first);
        assert_eq!(package.created, datetime!(2019-03-01 12:00 UTC));
    }

    #[rstest]
    fn test_patch_is_not_idempotent(mut package: Package) {
        let message = format!("u:{MESSAGE_HASH}");
        let diff = Graph::from_iter([
            focus_quad(prov::HAD_MEMBER, Term::named(&message)),
            member_quad(&message, dcterms::TITLE, Term::literal("log")),
        ]);
        patch(&mut package, &diff, FOCUS);
        patch(&mut package, &diff, FOCUS);
        assert_eq!(package.members.len(), 2);
        assert_eq!(package.members[0], package.members[1]);
    }

    #[rstest]
    #[case::member_statements_first(true)]
    #[case::member_statements_last(false)]
    fn test_patch_classifies_files_regardless_of_order(mut package: Package, #[case] details_first: bool) {
        let file = format!("dweb:/ipfs/{FILE_HASH}");
        let details = [
            member_quad(&file, dcterms::EXTENT, Term::typed("9", "http://www.w3.org/2001/XMLSchema#integer")),
            member_quad(&file, dcterms::FORMAT, Term::literal("application/json")),
        ];
        let link = focus_quad(prov::HAD_MEMBER, Term::named(&file));
        let diff: Graph = if details_first {
            details.into_iter().chain([link]).collect()
        } else {
            [link].into_iter().chain(details).collect()
        };
        let outcome = patch(&mut package, &diff, FOCUS);
        assert!(outcome.is_clean());
        let [Member::File(member)] = package.members.as_slice() else {
            panic!("expected one file member, got {:?}", package.members);
        };
        assert_eq!((member.format.as_str(), member.extent), ("application/json", 9));
    }

    #[rstest]
    fn test_patch_skips_unclassifiable_member(mut package: Package) {
        let diff = Graph::from_iter([
            focus_quad(prov::HAD_MEMBER, Term::named("http://example.com/elsewhere")),
            focus_quad(dcterms::DESCRIPTION, Term::literal("still applied")),
        ]);
        let outcome = patch(&mut package, &diff, FOCUS);
        assert!(package.members.is_empty());
        assert_eq!(package.description.as_deref(), Some("still applied"));
        assert_eq!(outcome.skipped, vec![ErrorKind::UnclassifiableMember("http://example.com/elsewhere".to_string())]);
    }

    #[rstest]
    fn test_patch_skips_incomplete_package_member(mut package: Package) {
        let child = format!("u:{MESSAGE_HASH}#_:c14n4");
        let diff = Graph::from_iter([
            focus_quad(prov::HAD_MEMBER, Term::named(&child)),
            member_quad(&child, ldp::MEMBERSHIP_RESOURCE, Term::named("http://localhost:8086/example/child")),
        ]);
        let outcome = patch(&mut package, &diff, FOCUS);
        assert!(package.members.is_empty());
        assert_eq!(
            outcome.skipped,
            vec![ErrorKind::IncompleteMember {
                member: child,
                field: "title"
            }]
        );
    }

    #[rstest]
    fn test_patch_ignores_file_fields_on_messages(mut package: Package) {
        let message = format!("u:{MESSAGE_HASH}");
        let diff = Graph::from_iter([
            focus_quad(prov::HAD_MEMBER, Term::named(&message)),
            member_quad(&message, dcterms::FORMAT, Term::literal("text/plain")),
            member_quad(&message, dcterms::EXTENT, Term::literal("not a number")),
        ]);
        let outcome = patch(&mut package, &diff, FOCUS);
        assert!(outcome.is_clean());
        assert_eq!(package.members[0].resource_type(), ResourceType::Message);
    }

    #[rstest]
    fn test_patch_bad_timestamp_is_skipped(mut package: Package) {
        let diff = Graph::from_iter([focus_quad(dcterms::MODIFIED, Term::literal("later"))]);
        let outcome = patch(&mut package, &diff, FOCUS);
        assert_eq!(package.modified, datetime!(2019-03-02 08:30 UTC));
        assert!(matches!(outcome.skipped.as_slice(), [ErrorKind::ParseError { field: "modified", .. }]));
    }
}
