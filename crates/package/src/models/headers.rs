use std::fmt::{Display, Formatter, Result as FmtResult};

use exn::OptionExt;

use crate::error::{ErrorKind, Result};

/// Ordered HTTP header list with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `Name: value` lines, as printed by `curl -i` or `curl -D`.
    ///
    /// A leading `HTTP/...` status line is skipped, and parsing stops at the
    /// first blank line that follows a header.
    pub fn parse(text: &str) -> Result<Self> {
        let mut headers = Self::new();
        for line in text.lines().map(|line| line.trim_end_matches('\r')) {
            if line.is_empty() {
                if headers.is_empty() {
                    continue;
                }
                break;
            }
            if headers.is_empty() && line.starts_with("HTTP/") {
                continue;
            }
            let (name, value) = line.split_once(':').ok_or_raise(|| ErrorKind::ParseError {
                field: "header",
                value: line.to_string(),
            })?;
            headers.append(name.trim(), value.trim());
        }
        Ok(headers)
    }

    /// First value of the header `name`, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Every value of the header `name`, ignoring case, joined with `", "`
    /// as a single field value.
    pub fn get_joined(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self
            .entries
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect();
        (!values.is_empty()).then(|| values.join(", "))
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Replaces every value of `name` with `value`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries.retain(|(key, _)| !key.eq_ignore_ascii_case(&name));
        self.entries.push((name, value.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Status code from a leading `HTTP/1.1 200 OK` line, if there is one.
pub fn parse_status_line(text: &str) -> Option<u16> {
    let line = text.lines().find(|line| !line.trim().is_empty())?;
    let mut parts = line.strip_prefix("HTTP/")?.split_whitespace();
    parts.next()?;
    parts.next()?.parse().ok()
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (name, value) in self.iter() {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
