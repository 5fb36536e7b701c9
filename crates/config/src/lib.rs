//! Configuration loading for ldpkg.
//!
//! Sources are merged in order of increasing precedence: built-in defaults, a
//! TOML file, then `LDPKG_*` environment variables.
//!
//! ```toml
//! origin = "https://packages.example.org"
//! gateway = "https://ipfs.example.org"
//! explorer = "https://explore.example.org"
//! ```

pub mod error;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ldpkg_package::models::{Member, Uri, VersionUri, child_path};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

pub const DEFAULT_ORIGIN: &str = "http://localhost:8086";
pub const DEFAULT_GATEWAY: &str = "http://localhost:8080";
pub const DEFAULT_EXPLORER: &str = "http://localhost:8088";
pub const ENV_PREFIX: &str = "LDPKG_";

#[derive(Debug, Deserialize)]
struct Sources {
    origin: String,
    gateway: String,
    explorer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The package server.
    pub origin: Uri,
    /// IPFS gateway serving file contents by path.
    pub gateway: Uri,
    /// Graph explorer, which takes the graph path as its query.
    pub explorer: Uri,
}

impl Config {
    /// `config.toml` in the platform configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ldpkg").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The merged sources, reading `path` or else [`default_path`](Self::default_path).
    /// A TOML file that does not exist contributes nothing.
    pub fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::new()
            .merge(Serialized::default("origin", DEFAULT_ORIGIN))
            .merge(Serialized::default("gateway", DEFAULT_GATEWAY))
            .merge(Serialized::default("explorer", DEFAULT_EXPLORER));
        let figment = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(file) => figment.merge(Toml::file(file)),
            None => figment,
        };
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Loads configuration. An explicit `path` must exist.
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            exn::bail!(ErrorKind::InvalidConfig(format!("no such file: {}", path.display())));
        }
        Self::from_figment(&Self::figment(path))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let sources: Sources = figment
            .extract()
            .or_raise(|| ErrorKind::InvalidConfig("could not extract settings".to_string()))?;
        let config = Self {
            origin: origin("server", &sources.origin)?,
            gateway: origin("gateway", &sources.gateway)?,
            explorer: origin("explorer", &sources.explorer)?,
        };
        tracing::debug!(origin = %config.origin, gateway = %config.gateway, explorer = %config.explorer, "loaded configuration");
        Ok(config)
    }

    /// Where the gateway serves `path`.
    pub fn gateway_url(&self, path: &str) -> String {
        Uri {
            path: path.to_string(),
            query: None,
            fragment: None,
            ..self.gateway.clone()
        }
        .to_string()
    }

    /// Explorer view of the graph at `path`, focused on `fragment`.
    pub fn explore_url(&self, path: &str, fragment: Option<&str>) -> String {
        Uri {
            query: Some(path.to_string()),
            fragment: fragment.map(str::to_string),
            ..self.explorer.clone()
        }
        .to_string()
    }

    /// Package path on the server.
    pub fn package_url(&self, path: &str) -> String {
        Uri {
            path: path.to_string(),
            query: None,
            fragment: None,
            ..self.origin.clone()
        }
        .to_string()
    }

    pub fn version_url(&self, version: &VersionUri) -> String {
        self.explore_url(version.hash(), Some(version.fragment()))
    }

    /// Where to go from a member of the package at `parent_path`: nested
    /// packages by name on the server, messages in the explorer, and files
    /// through the gateway.
    pub fn member_link(&self, parent_path: &str, member: &Member) -> String {
        match member {
            Member::Package(package) => self.package_url(&child_path(parent_path, &package.title)),
            Member::Message(message) => self.explore_url(&message.value.path, message.value.fragment.as_deref()),
            Member::File(file) => self.gateway_url(&file.value.path),
        }
    }
}

fn origin(field: &'static str, value: &str) -> Result<Uri> {
    let invalid = || ErrorKind::InvalidOrigin {
        field,
        value: value.to_string(),
    };
    let uri = Uri::parse(value).or_raise(invalid)?;
    if uri.scheme.is_none() || !uri.has_authority() {
        exn::bail!(invalid());
    }
    Ok(uri)
}
