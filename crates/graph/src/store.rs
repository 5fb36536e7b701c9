use std::collections::HashSet;

use crate::term::{Quad, Term};

/// A quad pattern; unbound positions match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    subject: Option<Term>,
    predicate: Option<Term>,
    object: Option<Term>,
    graph: Option<Term>,
}

impl Pattern {
    /// Matches every quad.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: Term) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn predicate(mut self, predicate: Term) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn object(mut self, object: Term) -> Self {
        self.object = Some(object);
        self
    }

    pub fn graph(mut self, graph: Term) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn matches(&self, quad: &Quad) -> bool {
        fn bound(position: &Option<Term>, term: &Term) -> bool {
            position.as_ref().is_none_or(|expected| expected == term)
        }
        bound(&self.subject, &quad.subject)
            && bound(&self.predicate, &quad.predicate)
            && bound(&self.object, &quad.object)
            && bound(&self.graph, &quad.graph)
    }
}

/// In-memory, duplicate-free set of quads that remembers insertion order.
///
/// Iteration always follows insertion order so that anything derived from a
/// graph (member lists, keyword lists) is stable for equal input.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    quads: Vec<Quad>,
    seen: HashSet<Quad>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a quad, returning `false` if it was already present.
    pub fn insert(&mut self, quad: Quad) -> bool {
        if self.seen.contains(&quad) {
            return false;
        }
        self.seen.insert(quad.clone());
        self.quads.push(quad);
        true
    }

    pub fn contains(&self, quad: &Quad) -> bool {
        self.seen.contains(quad)
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quad> {
        self.quads.iter()
    }

    /// All quads matching `pattern`, in insertion order.
    pub fn quads<'a>(&'a self, pattern: &'a Pattern) -> impl Iterator<Item = &'a Quad> + 'a {
        self.quads.iter().filter(move |quad| pattern.matches(quad))
    }

    pub fn count(&self, pattern: &Pattern) -> usize {
        self.quads(pattern).count()
    }

    /// Distinct subjects, in order of first appearance.
    pub fn subjects(&self) -> Vec<&Term> {
        let mut seen = HashSet::new();
        self.quads.iter().map(|quad| &quad.subject).filter(|subject| seen.insert(*subject)).collect()
    }

    /// Serializes the graph as N-Quads, one statement per line.
    pub fn to_nquads(&self) -> String {
        self.quads.iter().map(|quad| format!("{quad}\n")).collect()
    }
}

impl PartialEq for Graph {
    /// Set equality; insertion order is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}
impl Eq for Graph {}

impl FromIterator<Quad> for Graph {
    fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}
impl Extend<Quad> for Graph {
    fn extend<I: IntoIterator<Item = Quad>>(&mut self, iter: I) {
        for quad in iter {
            self.insert(quad);
        }
    }
}
impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Quad;
    type IntoIter = std::slice::Iter<'a, Quad>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
