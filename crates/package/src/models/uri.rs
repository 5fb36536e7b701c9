use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use exn::{OptionExt, ResultExt};
use tracing::instrument;

use crate::consts;
use crate::error::{Error, ErrorKind, Result};

/// A URI reference split into its RFC 3986 components.
///
/// Parsing is deliberately lenient about what goes inside each component (a
/// server's identifiers are taken as given), but strict about the overall
/// structure: a scheme must look like one and a port must be a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    pub scheme: Option<String>,
    pub userinfo: Option<String>,
    /// Present whenever the reference has an authority (`//...`).
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl Uri {
    /// ```
    /// use ldpkg_package::models::Uri;
    /// let uri = Uri::parse("http://user@localhost:8086/a/b?q#frag").unwrap();
    /// assert_eq!(uri.scheme.as_deref(), Some("http"));
    /// assert_eq!(uri.port, Some(8086));
    /// assert_eq!(uri.path, "/a/b");
    /// assert_eq!(uri.to_string(), "http://user@localhost:8086/a/b?q#frag");
    /// ```
    #[instrument(level = "trace")]
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || ErrorKind::InvalidUri(input.to_string());
        if input.is_empty() || input.chars().any(|c| c.is_whitespace() || c.is_control()) {
            exn::bail!(invalid());
        }
        let captures = consts::URI_REGEX.captures(input).ok_or_raise(invalid)?;
        let component = |index: usize| captures.get(index).map(|m| m.as_str().to_string());

        let scheme = component(1);
        if let Some(scheme) = &scheme
            && !consts::SCHEME_REGEX.is_match(scheme)
        {
            exn::bail!(invalid());
        }
        let (userinfo, host, port) = match captures.get(2) {
            Some(authority) => {
                let (userinfo, host, port) = split_authority(authority.as_str()).or_raise(invalid)?;
                (userinfo, Some(host), port)
            },
            None => (None, None, None),
        };
        Ok(Self {
            scheme,
            userinfo,
            host,
            port,
            path: component(3).unwrap_or_default(),
            query: component(4),
            fragment: component(5),
        })
    }

    pub fn has_authority(&self) -> bool {
        self.host.is_some()
    }
}

type Authority = (Option<String>, String, Option<u16>);

fn split_authority(authority: &str) -> Result<Authority> {
    let (userinfo, rest) = match authority.rsplit_once('@') {
        Some((userinfo, rest)) => (Some(userinfo.to_string()), rest),
        None => (None, authority),
    };
    // Bracketed IPv6 literals contain colons of their own.
    let (host, port) = if rest.starts_with('[') {
        let end = rest.find(']').ok_or_raise(|| ErrorKind::InvalidUri(authority.to_string()))?;
        let (host, after) = rest.split_at(end + 1);
        match after.strip_prefix(':') {
            Some(port) => (host, Some(port)),
            None if after.is_empty() => (host, None),
            None => exn::bail!(ErrorKind::InvalidUri(authority.to_string())),
        }
    } else {
        match rest.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (rest, None),
        }
    };
    let port = match port.filter(|port| !port.is_empty()) {
        Some(port) => Some(port.parse::<u16>().or_raise(|| ErrorKind::ParseError {
            field: "port",
            value: port.to_string(),
        })?),
        None => None,
    };
    Ok((userinfo, host.to_string(), port))
}

impl Display for Uri {
    /// Recomposition per RFC 3986 section 5.3.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        if let Some(host) = &self.host {
            f.write_str("//")?;
            if let Some(userinfo) = &self.userinfo {
                write!(f, "{userinfo}@")?;
            }
            f.write_str(host)?;
            if let Some(port) = self.port {
                write!(f, ":{port}")?;
            }
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl FromStr for Uri {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = Error;
    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Uri {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Uri {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::parse(&text).map_err(|err| serde::de::Error::custom(&*err))
    }
}
