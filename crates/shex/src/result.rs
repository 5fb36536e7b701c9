//! ShEx validation result tree.
//!
//! Mirrors the JSON emitted by shex.js-compatible validators, with each node
//! type as an explicit enum variant so walks over the tree are exhaustive
//! matches rather than casts.

use exn::ResultExt;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Outcome of validating one focus node against a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ValidationResult {
    ShapeAndResults(ShapeAndResults),
    ShapeAndFailure(ShapeAndFailure),
}

impl ValidationResult {
    /// Parses a validator's JSON output.
    #[instrument(level = "trace", skip(json), fields(json_size = json.len()))]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).or_raise(|| ErrorKind::InvalidResult)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).or_raise(|| ErrorKind::InvalidResult)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::ShapeAndResults(_))
    }

    /// The node the result is about: that of its first solution. Failures
    /// name no node.
    pub fn focus(&self) -> Option<&str> {
        match self {
            Self::ShapeAndResults(results) => results.solutions.first().map(ShapeResult::node),
            Self::ShapeAndFailure(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeAndResults {
    pub solutions: Vec<ShapeResult>,
}

impl ShapeAndResults {
    /// The shape test for `node`, if the validator produced one.
    pub fn shape_test(&self, node: &str) -> Option<&ShapeTest> {
        self.shape_tests().find(|test| test.node == node)
    }

    pub fn shape_tests(&self) -> impl Iterator<Item = &ShapeTest> {
        self.solutions.iter().filter_map(|result| match result {
            ShapeResult::ShapeTest(test) => Some(test),
            ShapeResult::NodeTest(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeAndFailure {
    /// Validator-specific failure descriptions, kept verbatim.
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeResult {
    ShapeTest(ShapeTest),
    NodeTest(NodeTest),
}

impl ShapeResult {
    pub fn node(&self) -> &str {
        match self {
            Self::ShapeTest(test) => &test.node,
            Self::NodeTest(test) => &test.node,
        }
    }
}

/// Proof that `node` satisfies the triple expression of `shape`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeTest {
    pub node: String,
    pub shape: String,
    /// Absent for shapes without a triple expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Expression>,
}

impl ShapeTest {
    /// The top-level expressions of the solution: the first `EachOf`
    /// alternative's expressions, or the single triple constraint.
    pub fn expressions(&self) -> &[Expression] {
        match &self.solution {
            Some(expression) => expression.expressions(),
            None => &[],
        }
    }
}

/// A node constraint satisfied without a triple expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTest {
    pub node: String,
    pub shape: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    EachOfSolutions(EachOfSolutions),
    TripleConstraintSolutions(TripleConstraintSolutions),
}

impl Expression {
    /// Flattens one level: an `EachOf` yields its first solution's
    /// expressions, a triple constraint yields itself.
    pub fn expressions(&self) -> &[Expression] {
        match self {
            Self::EachOfSolutions(each_of) => each_of.expressions(),
            Self::TripleConstraintSolutions(_) => std::slice::from_ref(self),
        }
    }

    pub fn as_triple_constraint(&self) -> Option<&TripleConstraintSolutions> {
        match self {
            Self::TripleConstraintSolutions(constraint) => Some(constraint),
            Self::EachOfSolutions(_) => None,
        }
    }

    pub fn as_each_of(&self) -> Option<&EachOfSolutions> {
        match self {
            Self::EachOfSolutions(each_of) => Some(each_of),
            Self::TripleConstraintSolutions(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EachOfSolutions {
    pub solutions: Vec<EachOfSolution>,
}

impl EachOfSolutions {
    pub fn expressions(&self) -> &[Expression] {
        self.solutions.first().map(|solution| solution.expressions.as_slice()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EachOfSolution {
    pub expressions: Vec<Expression>,
}

/// All triples that matched one triple constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripleConstraintSolutions {
    pub predicate: String,
    #[serde(rename = "valueExpr", default, skip_serializing_if = "Option::is_none")]
    pub value_expr: Option<ValueExpr>,
    pub solutions: Vec<TestedTriple>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl TripleConstraintSolutions {
    /// `true` if the constraint's value expression is a reference to `label`.
    pub fn references(&self, label: &str) -> bool {
        matches!(&self.value_expr, Some(ValueExpr::Reference(reference)) if reference == label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueExpr {
    /// Reference to a shape by label, e.g. `_:p`.
    Reference(String),
    NodeConstraint(NodeConstraint),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeConstraint {
    #[serde(rename = "nodeKind", default, skip_serializing_if = "Option::is_none")]
    pub node_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// One triple that satisfied a constraint, plus the nested result when the
/// constraint's value expression references another shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestedTriple {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced: Option<Box<ValidationResult>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Object {
    /// IRI or blank node identifier.
    Iri(String),
    Literal(LiteralValue),
}

impl Object {
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            Self::Literal(literal) => Some(literal),
            Self::Iri(_) => None,
        }
    }

    /// The IRI or the literal's lexical form.
    pub fn value(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::Literal(literal) => &literal.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralValue {
    pub value: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PACKAGE_RESULT: &str = r#"{
        "type": "ShapeAndResults",
        "solutions": [
            { "type": "NodeTest", "node": "_:c14n0", "shape": "_:dc" },
            {
                "type": "ShapeTest",
                "node": "_:c14n0",
                "shape": "_:package",
                "solution": {
                    "type": "EachOfSolutions",
                    "solutions": [{
                        "type": "EachOfSolution",
                        "expressions": [
                            {
                                "type": "TripleConstraintSolutions",
                                "predicate": "http://purl.org/dc/terms/title",
                                "valueExpr": { "type": "NodeConstraint", "datatype": "http://www.w3.org/2001/XMLSchema#string" },
                                "solutions": [{
                                    "type": "TestedTriple",
                                    "subject": "_:c14n0",
                                    "predicate": "http://purl.org/dc/terms/title",
                                    "object": { "value": "Example" }
                                }],
                                "min": 1,
                                "max": 1
                            },
                            {
                                "type": "TripleConstraintSolutions",
                                "predicate": "http://www.w3.org/ns/prov#hadMember",
                                "valueExpr": "_:m",
                                "solutions": [{
                                    "type": "TestedTriple",
                                    "subject": "_:c14n0",
                                    "predicate": "http://www.w3.org/ns/prov#hadMember",
                                    "object": "u:aaaa",
                                    "referenced": {
                                        "type": "ShapeAndResults",
                                        "solutions": [{ "type": "ShapeTest", "node": "u:aaaa", "shape": "_:m" }]
                                    }
                                }],
                                "min": 0,
                                "max": -1
                            }
                        ]
                    }]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_package_result() {
        let result = ValidationResult::from_json(PACKAGE_RESULT).unwrap();
        assert!(result.is_success());
        assert_eq!(result.focus(), Some("_:c14n0"));
        let ValidationResult::ShapeAndResults(results) = result else {
            panic!("expected ShapeAndResults");
        };
        let test = results.shape_test("_:c14n0").unwrap();
        assert_eq!(test.shape, "_:package");
        let expressions = test.expressions();
        assert_eq!(expressions.len(), 2);

        let title = expressions[0].as_triple_constraint().unwrap();
        assert_eq!(title.solutions[0].object.value(), "Example");
        assert!(title.solutions[0].object.as_literal().is_some());
        assert!(matches!(title.value_expr, Some(ValueExpr::NodeConstraint(_))));

        let members = expressions[1].as_triple_constraint().unwrap();
        assert!(members.references("_:m"));
        assert!(!members.references("_:p"));
        assert_eq!(members.max, Some(-1));
        let nested = members.solutions[0].referenced.as_deref().unwrap();
        assert!(nested.is_success());
    }

    #[test]
    fn test_parse_failure() {
        let result = ValidationResult::from_json(r#"{"type":"ShapeAndFailure","errors":[{"type":"Missing"}]}"#).unwrap();
        assert!(!result.is_success());
        assert_eq!(result.focus(), None);
    }

    #[rstest]
    #[case("")]
    #[case("{}")]
    #[case(r#"{"type":"Nope"}"#)]
    #[case(r#"{"type":"ShapeAndResults"}"#)]
    fn test_parse_invalid(#[case] json: &str) {
        let err = ValidationResult::from_json(json).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidResult);
    }

    #[test]
    fn test_single_constraint_solution_flattens() {
        let json = r#"{
            "type": "ShapeTest", "node": "dweb:/ipfs/x", "shape": "_:v",
            "solution": {
                "type": "TripleConstraintSolutions",
                "predicate": "http://purl.org/dc/terms/extent",
                "solutions": []
            }
        }"#;
        let test: ShapeTest = serde_json::from_str(json).unwrap();
        assert_eq!(test.expressions().len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let result = ValidationResult::from_json(PACKAGE_RESULT).unwrap();
        let json = result.to_json().unwrap();
        assert_eq!(ValidationResult::from_json(&json).unwrap(), result);
    }
}
