use ldpkg_graph::Graph;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::result::ValidationResult;

/// Validates a focus node of a graph against a shape schema.
///
/// The schema itself is the implementor's concern; callers only see the
/// resulting proof tree.
pub trait Validator {
    fn validate(&self, graph: &Graph, focus: &str) -> Result<ValidationResult>;
}

impl<F> Validator for F
where
    F: Fn(&Graph, &str) -> Result<ValidationResult>,
{
    fn validate(&self, graph: &Graph, focus: &str) -> Result<ValidationResult> {
        self(graph, focus)
    }
}

/// A result produced ahead of time, for example by a validator that ran in
/// another process.
///
/// Only answers for the node it was recorded for. A recorded failure that
/// names no node answers for any focus.
#[derive(Debug, Clone)]
pub struct Recorded {
    focus: Option<String>,
    result: ValidationResult,
}

impl Recorded {
    pub fn new(focus: impl Into<String>, result: ValidationResult) -> Self {
        Self {
            focus: Some(focus.into()),
            result,
        }
    }

    pub fn from_json(focus: impl Into<String>, json: &str) -> Result<Self> {
        Ok(Self::new(focus, ValidationResult::from_json(json)?))
    }

    /// Recorded for whichever node `result` is about.
    pub fn from_result(result: ValidationResult) -> Self {
        Self {
            focus: result.focus().map(str::to_string),
            result,
        }
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }
}

impl Validator for Recorded {
    #[instrument(level = "trace", skip(self, _graph))]
    fn validate(&self, _graph: &Graph, focus: &str) -> Result<ValidationResult> {
        if let Some(recorded) = &self.focus
            && recorded != focus
        {
            exn::bail!(ErrorKind::UnknownFocus(focus.to_string()));
        }
        Ok(self.result.clone())
    }
}
