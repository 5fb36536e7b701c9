use std::fmt::{Display, Formatter, Result as FmtResult, Write};

pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A node or value in a quad.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// An IRI.
    NamedNode(String),
    /// A blank node, stored by its label (without the `_:` prefix).
    BlankNode(String),
    Literal(Literal),
    /// The graph position of a triple that belongs to no named graph.
    DefaultGraph,
}

/// An RDF literal: lexical form plus either a datatype or a language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    /// Datatype IRI; `rdf:langString` whenever `language` is set.
    pub datatype: String,
    pub language: Option<String>,
}

impl Term {
    pub fn named(iri: impl Into<String>) -> Self {
        Self::NamedNode(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Self::BlankNode(label.into())
    }

    /// A plain `xsd:string` literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::typed(value, XSD_STRING)
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal(Literal {
            value: value.into(),
            datatype: datatype.into(),
            language: None,
        })
    }

    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal(Literal {
            value: value.into(),
            datatype: RDF_LANG_STRING.to_string(),
            language: Some(language.into()),
        })
    }

    /// Builds a node from its identifier form: `_:label` is a blank node,
    /// anything else is taken as an IRI.
    ///
    /// ```
    /// use ldpkg_graph::Term;
    /// assert_eq!(Term::from_id("_:c14n0"), Term::blank("c14n0"));
    /// assert_eq!(Term::from_id("u:abc#_:c14n0"), Term::named("u:abc#_:c14n0"));
    /// ```
    pub fn from_id(id: &str) -> Self {
        match id.strip_prefix("_:") {
            Some(label) => Self::blank(label),
            None => Self::named(id),
        }
    }

    /// Identifier form, the inverse of [`from_id`](Self::from_id) for nodes.
    /// Literals render as their N-Quads form, the default graph as an empty string.
    pub fn id(&self) -> String {
        match self {
            Self::NamedNode(iri) => iri.clone(),
            Self::BlankNode(label) => format!("_:{label}"),
            Self::Literal(_) => self.to_string(),
            Self::DefaultGraph => String::new(),
        }
    }

    /// The lexical value: IRI, blank node label, or literal lexical form.
    pub fn value(&self) -> &str {
        match self {
            Self::NamedNode(iri) => iri,
            Self::BlankNode(label) => label,
            Self::Literal(literal) => &literal.value,
            Self::DefaultGraph => "",
        }
    }

    pub fn is_named_node(&self) -> bool {
        matches!(self, Self::NamedNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl Display for Term {
    /// N-Quads serialization of the term.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::NamedNode(iri) => write!(f, "<{iri}>"),
            Self::BlankNode(label) => write!(f, "_:{label}"),
            Self::Literal(literal) => {
                f.write_char('"')?;
                for c in literal.value.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        c => f.write_char(c)?,
                    }
                }
                f.write_char('"')?;
                match &literal.language {
                    Some(language) => write!(f, "@{language}"),
                    None if literal.datatype == XSD_STRING => Ok(()),
                    None => write!(f, "^^<{}>", literal.datatype),
                }
            },
            Self::DefaultGraph => Ok(()),
        }
    }
}

/// A subject-predicate-object statement, optionally in a named graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Term,
}

impl Quad {
    /// A quad in the default graph.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self::in_graph(subject, predicate, object, Term::DefaultGraph)
    }

    pub fn in_graph(subject: Term, predicate: Term, object: Term, graph: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }
}

impl Display for Quad {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if self.graph != Term::DefaultGraph {
            write!(f, " {}", self.graph)?;
        }
        f.write_str(" .")
    }
}
