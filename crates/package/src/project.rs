//! Validation result tree to [`Package`].
//!
//! The validator has already proven that the focus node conforms to the
//! package shape; projection only reads the proof back out. Any structural
//! surprise is fatal and no partial package is returned.

use exn::{OptionExt, ResultExt};
use ldpkg_shex::{Expression, ShapeAndResults, ShapeTest, TestedTriple, TripleConstraintSolutions, ValidationResult};
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::literal;
use crate::models::{Member, MemberBuilder, Package, ResourceType, Uri};
use crate::vocab::Predicate;

/// Projects the validation result for `focus` into a [`Package`].
///
/// # Errors
///
/// - [`ValidationFailed`](ErrorKind::ValidationFailed) if the validator
///   reported a failure for the focus node.
/// - [`MalformedPackageGraph`](ErrorKind::MalformedPackageGraph) if a
///   required predicate has zero or several solutions, or a nested shape test
///   is missing.
/// - [`ParseError`](ErrorKind::ParseError) / [`InvalidUri`](ErrorKind::InvalidUri)
///   for unreadable literals and identifiers.
#[instrument(skip(result), fields(members))]
pub fn project(result: &ValidationResult, focus: &str) -> Result<Package> {
    let results = match result {
        ValidationResult::ShapeAndResults(results) => results,
        ValidationResult::ShapeAndFailure(failure) => {
            tracing::debug!(errors = failure.errors.len(), "validation failed upstream");
            exn::bail!(ErrorKind::ValidationFailed(focus.to_string()));
        },
    };
    let root = Expressions::new(find_shape_test(results, focus, "package")?);

    let (value, extent) = root.value()?;
    let mut members = Vec::new();
    for kind in ResourceType::ALL {
        for triple in root.members(kind) {
            members.push(member(kind, triple)?);
        }
    }
    tracing::Span::current().record("members", members.len());

    Ok(Package {
        resource: literal::uri(root.one(Predicate::MembershipResource)?.object.value())?,
        value,
        extent,
        name: root.one(Predicate::Title)?.object.value().to_string(),
        description: root.first(Predicate::Description).map(|triple| triple.object.value().to_string()),
        keywords: root.keywords(),
        created: literal::timestamp("created", root.one(Predicate::Created)?.object.value())?,
        modified: literal::timestamp("modified", root.one(Predicate::Modified)?.object.value())?,
        revision_of: root
            .at_most_one(Predicate::WasRevisionOf)?
            .map(|triple| literal::uri(triple.object.value()))
            .transpose()?,
        members,
    })
}

/// The shape test proving `node`, or the first shape test when the
/// validator labelled nodes differently.
fn find_shape_test<'a>(results: &'a ShapeAndResults, node: &str, field: &'static str) -> Result<&'a ShapeTest> {
    results
        .shape_test(node)
        .or_else(|| results.shape_tests().next())
        .ok_or_raise(|| ErrorKind::MalformedPackageGraph(field))
}

/// The shape test a tested triple's object was validated against.
fn referenced<'a>(triple: &'a TestedTriple, field: &'static str) -> Result<&'a ShapeTest> {
    match triple.referenced.as_deref() {
        Some(ValidationResult::ShapeAndResults(results)) => find_shape_test(results, triple.object.value(), field),
        Some(ValidationResult::ShapeAndFailure(_)) | None => exn::bail!(ErrorKind::MalformedPackageGraph(field)),
    }
}

#[instrument(level = "trace", skip(triple), fields(value = triple.object.value()))]
fn member(kind: ResourceType, triple: &TestedTriple) -> Result<Member> {
    let field = kind.as_str();
    let value = literal::uri(triple.object.value())?;
    let nested = Expressions::new(referenced(triple, field)?);
    let mut builder = MemberBuilder::new(kind, value);
    match kind {
        ResourceType::Package => {
            builder = builder
                .resource(literal::uri(nested.one(Predicate::MembershipResource)?.object.value())?)
                .title(nested.one(Predicate::Title)?.object.value());
        },
        ResourceType::Message => {
            builder = nested.attach_optional(builder)?;
        },
        ResourceType::File => {
            builder = builder
                .extent(literal::extent(nested.one(Predicate::Extent)?.object.value())?)
                .format(nested.one(Predicate::Format)?.object.value());
            // Resource and title are an optional group of their own.
            if let Some(group) = nested.group() {
                builder = group.attach_optional(builder)?;
            }
        },
    }
    builder.build().or_raise(|| ErrorKind::MalformedPackageGraph(field))
}

/// Lookup by predicate over one level of a shape test's expressions.
#[derive(Debug, Clone, Copy)]
struct Expressions<'a> {
    expressions: &'a [Expression],
}

/// Expressions Internals
impl<'a> Expressions<'a> {
    fn new(test: &'a ShapeTest) -> Self {
        Self::from_slice(test.expressions())
    }

    fn from_slice(expressions: &'a [Expression]) -> Self {
        Self { expressions }
    }

    fn constraints(&self) -> impl Iterator<Item = &'a TripleConstraintSolutions> {
        self.expressions.iter().filter_map(Expression::as_triple_constraint)
    }

    fn constraint(&self, predicate: Predicate) -> Option<&'a TripleConstraintSolutions> {
        self.constraints().find(|constraint| constraint.predicate == predicate.iri())
    }

    fn solutions(&self, predicate: Predicate) -> &'a [TestedTriple] {
        self.constraint(predicate).map(|constraint| constraint.solutions.as_slice()).unwrap_or_default()
    }
}

/// Expressions Public
impl<'a> Expressions<'a> {
    /// The single solution for `predicate`.
    fn one(&self, predicate: Predicate) -> Result<&'a TestedTriple> {
        match self.solutions(predicate) {
            [triple] => Ok(triple),
            _ => exn::bail!(ErrorKind::MalformedPackageGraph(predicate.as_str())),
        }
    }

    /// Zero or one solution for `predicate`; several is an error.
    fn at_most_one(&self, predicate: Predicate) -> Result<Option<&'a TestedTriple>> {
        match self.solutions(predicate) {
            [] => Ok(None),
            [triple] => Ok(Some(triple)),
            _ => exn::bail!(ErrorKind::MalformedPackageGraph(predicate.as_str())),
        }
    }

    /// The first solution for `predicate`, tolerating extras.
    fn first(&self, predicate: Predicate) -> Option<&'a TestedTriple> {
        self.solutions(predicate).first()
    }

    /// All keyword values in order; `None` rather than an empty list when
    /// there are none.
    fn keywords(&self) -> Option<Vec<String>> {
        let keywords: Vec<String> = self
            .solutions(Predicate::Subject)
            .iter()
            .map(|triple| triple.object.value().to_string())
            .collect();
        (!keywords.is_empty()).then_some(keywords)
    }

    /// The directory value and its extent, which lives one shape further down.
    fn value(&self) -> Result<(Uri, u64)> {
        let triple = self.one(Predicate::Value)?;
        let value = literal::uri(triple.object.value())?;
        let nested = Expressions::new(referenced(triple, "value")?);
        let extent = literal::extent(nested.one(Predicate::Extent)?.object.value())?;
        Ok((value, extent))
    }

    /// Solutions of the had-member constraint whose value expression
    /// references the shape for `kind`.
    fn members(&self, kind: ResourceType) -> impl Iterator<Item = &'a TestedTriple> {
        self.constraints()
            .filter(move |constraint| {
                constraint.predicate == Predicate::HadMember.iri() && constraint.references(kind.shape_label())
            })
            .flat_map(|constraint| constraint.solutions.iter())
    }

    /// The first nested `EachOf` group, if any.
    fn group(&self) -> Option<Expressions<'a>> {
        self.expressions
            .iter()
            .find_map(Expression::as_each_of)
            .map(|each_of| Self::from_slice(each_of.expressions()))
    }

    /// Sets resource and title from zero-or-one solutions each.
    fn attach_optional(&self, mut builder: MemberBuilder) -> Result<MemberBuilder> {
        if let Some(triple) = self.at_most_one(Predicate::MembershipResource)? {
            builder = builder.resource(literal::uri(triple.object.value())?);
        }
        if let Some(triple) = self.at_most_one(Predicate::Title)? {
            builder = builder.title(triple.object.value());
        }
        Ok(builder)
    }
}
