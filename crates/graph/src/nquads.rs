//! Line-based N-Quads reader.
//!
//! Handles the subset of N-Quads 1.1 that servers actually emit: IRIs, blank
//! nodes, literals with string escapes, datatypes and language tags, an
//! optional graph label, comments and blank lines.

use exn::OptionExt;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::store::Graph;
use crate::term::{Literal, Quad, RDF_LANG_STRING, Term, XSD_STRING};

/// Parses an N-Quads document into a [`Graph`].
///
/// # Errors
///
/// Returns [`ErrorKind::Syntax`] with the line number of the first statement
/// that cannot be read.
///
/// ```
/// use ldpkg_graph::parse_nquads;
/// let graph = parse_nquads("_:c14n0 <http://purl.org/dc/terms/title> \"Hello\" .\n").unwrap();
/// assert_eq!(graph.len(), 1);
/// ```
#[instrument(skip(text), fields(text_size = text.len(), quads))]
pub fn parse_nquads(text: &str) -> Result<Graph> {
    let mut graph = Graph::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(quad) = Statement::new(index + 1, line).read()? {
            graph.insert(quad);
        }
    }
    tracing::Span::current().record("quads", graph.len());
    Ok(graph)
}

struct Statement<'a> {
    line: usize,
    rest: &'a str,
}

impl<'a> Statement<'a> {
    fn new(line: usize, text: &'a str) -> Self {
        Self { line, rest: text }
    }

    fn syntax(&self, message: &str) -> ErrorKind {
        ErrorKind::Syntax {
            line: self.line,
            message: message.to_string(),
        }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start_matches([' ', '\t']);
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            },
            None => false,
        }
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty() || self.rest.starts_with('#')
    }

    fn read(mut self) -> Result<Option<Quad>> {
        self.skip_whitespace();
        if self.at_end() {
            return Ok(None);
        }
        let subject = self.node("subject")?;
        self.skip_whitespace();
        let predicate = self.iri().ok_or_raise(|| self.syntax("predicate must be an IRI"))?;
        self.skip_whitespace();
        let object = match self.peek() {
            Some('"') => self.literal()?,
            _ => self.node("object")?,
        };
        self.skip_whitespace();
        let graph = match self.peek() {
            Some('<') | Some('_') => self.node("graph label")?,
            _ => Term::DefaultGraph,
        };
        self.skip_whitespace();
        if !self.eat('.') {
            exn::bail!(self.syntax("expected '.' at end of statement"));
        }
        self.skip_whitespace();
        if !self.at_end() {
            exn::bail!(self.syntax("unexpected content after '.'"));
        }
        Ok(Some(Quad::in_graph(subject, predicate, object, graph)))
    }

    fn node(&mut self, position: &'static str) -> Result<Term> {
        let term = match self.peek() {
            Some('<') => self.iri(),
            Some('_') => self.blank_node(),
            _ => None,
        };
        term.ok_or_raise(|| self.syntax(&format!("{position} must be an IRI or blank node")))
    }

    fn iri(&mut self) -> Option<Term> {
        let rest = self.rest;
        let rest = rest.strip_prefix('<')?;
        let end = rest.find('>')?;
        let raw = &rest[..end];
        if raw.is_empty() || raw.contains([' ', '\t', '<', '"']) {
            return None;
        }
        let iri = unescape(raw)?;
        self.rest = &rest[end + 1..];
        Some(Term::NamedNode(iri))
    }

    fn blank_node(&mut self) -> Option<Term> {
        let rest = self.rest;
        let rest = rest.strip_prefix("_:")?;
        let end = rest.find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))).unwrap_or(rest.len());
        // A label can contain '.', but never end with one.
        let label = rest[..end].trim_end_matches('.');
        if label.is_empty() {
            return None;
        }
        self.rest = &rest[label.len()..];
        Some(Term::BlankNode(label.to_string()))
    }

    fn literal(&mut self) -> Result<Term> {
        let rest = self.rest;
        let body = &rest[1..];
        let mut end = None;
        let mut escaped = false;
        for (index, c) in body.char_indices() {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => {
                    end = Some(index);
                    break;
                },
                _ => {},
            }
        }
        let end = end.ok_or_raise(|| self.syntax("unterminated literal"))?;
        let value = unescape(&body[..end]).ok_or_raise(|| self.syntax("invalid escape sequence in literal"))?;
        self.rest = &body[end + 1..];

        if self.rest.starts_with("^^") {
            self.rest = &self.rest[2..];
            let Some(Term::NamedNode(datatype)) = self.iri() else {
                exn::bail!(self.syntax("datatype must be an IRI"));
            };
            return Ok(Term::Literal(Literal {
                value,
                datatype,
                language: None,
            }));
        }
        if self.eat('@') {
            let rest = self.rest;
            let end = rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-')).unwrap_or(rest.len());
            let language = &rest[..end];
            if language.is_empty() || !language.starts_with(|c: char| c.is_ascii_alphabetic()) {
                exn::bail!(self.syntax("invalid language tag"));
            }
            self.rest = &rest[end..];
            return Ok(Term::Literal(Literal {
                value,
                datatype: RDF_LANG_STRING.to_string(),
                language: Some(language.to_string()),
            }));
        }
        Ok(Term::Literal(Literal {
            value,
            datatype: XSD_STRING.to_string(),
            language: None,
        }))
    }
}

/// Resolves N-Quads string escapes (`ECHAR` and `UCHAR`).
fn unescape(raw: &str) -> Option<String> {
    if !raw.contains('\\') {
        return Some(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\u{c}'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            'u' => out.push(hex_char(&mut chars, 4)?),
            'U' => out.push(hex_char(&mut chars, 8)?),
            _ => return None,
        }
    }
    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    char::from_u32(u32::from_str_radix(&hex, 16).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Pattern;
    use rstest::rstest;

    const DESCRIPTION: &str = "http://purl.org/dc/terms/description";

    #[test]
    fn test_parse_document() {
        let text = concat!(
            "# leading comment\n",
            "\n",
            "_:c14n0 <http://purl.org/dc/terms/title> \"Example\" .\n",
            "_:c14n0 <http://www.w3.org/ns/prov#hadMember> <u:aaaa#_:c14n1> .\n",
            "  _:c14n0 <http://purl.org/dc/terms/extent> \"12\"^^<http://www.w3.org/2001/XMLSchema#integer> . # trailing\n",
            "_:c14n0 <http://purl.org/dc/terms/subject> \"chat\"@fr <http://example.com/g> .\n",
        );
        let graph = parse_nquads(text).unwrap();
        assert_eq!(graph.len(), 4);
        let quads: Vec<_> = graph.iter().collect();
        assert_eq!(quads[0].subject, Term::blank("c14n0"));
        assert_eq!(quads[0].object, Term::literal("Example"));
        assert_eq!(quads[1].object, Term::named("u:aaaa#_:c14n1"));
        assert_eq!(quads[2].object, Term::typed("12", "http://www.w3.org/2001/XMLSchema#integer"));
        assert_eq!(quads[3].object, Term::tagged("chat", "fr"));
        assert_eq!(quads[3].graph, Term::named("http://example.com/g"));
    }

    #[rstest]
    #[case(r#""a\"b""#, "a\"b")]
    #[case(r#""line\nbreak""#, "line\nbreak")]
    #[case(r#""tab\there""#, "tab\there")]
    #[case(r#""back\\slash""#, "back\\slash")]
    #[case(r#""été""#, "été")]
    #[case(r#""\U0001F600""#, "\u{1F600}")]
    fn test_literal_escapes(#[case] literal: &str, #[case] expected: &str) {
        let text = format!("_:s <{DESCRIPTION}> {literal} .");
        let graph = parse_nquads(&text).unwrap();
        let quad = graph.iter().next().unwrap();
        assert_eq!(quad.object.value(), expected);
    }

    #[test]
    fn test_blank_node_label_before_dot() {
        let graph = parse_nquads("_:a <http://p> _:b.").unwrap();
        let quad = graph.iter().next().unwrap();
        assert_eq!(quad.object, Term::blank("b"));
    }

    #[rstest]
    #[case("_:s <http://p> \"o\"", 1)]
    #[case("\"s\" <http://p> \"o\" .", 1)]
    #[case("_:s _:p \"o\" .", 1)]
    #[case("_:s <http://p> \"unterminated .", 1)]
    #[case("_:s <http://p> \"bad \\q escape\" .", 1)]
    #[case("_:s <http://p> \"o\"^^\"x\" .", 1)]
    #[case("_:s <http://p> \"o\" . extra", 1)]
    #[case("_:s <http://p> \"ok\" .\n_:s <http://has space> \"o\" .", 2)]
    fn test_syntax_errors(#[case] text: &str, #[case] line: usize) {
        let err = parse_nquads(text).unwrap_err();
        match &*err {
            ErrorKind::Syntax { line: found, .. } => assert_eq!(*found, line),
        }
    }

    #[test]
    fn test_serialize_round_trip() {
        let text = concat!(
            "_:c14n0 <http://purl.org/dc/terms/description> \"quote \\\" and\\nnewline\" .\n",
            "_:c14n0 <http://purl.org/dc/terms/subject> \"chat\"@fr .\n",
            "<u:aaaa> <http://purl.org/dc/terms/extent> \"12\"^^<http://www.w3.org/2001/XMLSchema#integer> _:g .\n",
        );
        let graph = parse_nquads(text).unwrap();
        assert_eq!(graph.to_nquads(), text);
        assert_eq!(parse_nquads(&graph.to_nquads()).unwrap(), graph);
    }

    #[test]
    fn test_duplicates_collapse() {
        let text = "_:a <http://p> \"o\" .\n_:a <http://p> \"o\" .\n";
        let graph = parse_nquads(text).unwrap();
        assert_eq!(graph.count(&Pattern::any()), 1);
    }
}
