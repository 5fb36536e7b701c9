//! Command-line definitions.
//!
//! Every command works on responses captured from a package server: a headers
//! file (optionally starting with the `HTTP/1.1 <status>` line), the N-Quads
//! body, and the recorded shape-validation result for that body.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ldpkg", author, version, about = "Browse and edit versioned Linked-Data packages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version URI a response pins
    Version {
        #[arg(long)]
        headers: PathBuf,
    },
    /// Project a package and print it
    Show {
        #[command(flatten)]
        package: PackageArgs,
        /// Print as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Apply a mutation response onto a projected package and print the result
    Patch {
        #[command(flatten)]
        package: PackageArgs,
        /// Headers of the mutation response
        #[arg(long)]
        diff_headers: PathBuf,
        /// N-Quads body of the mutation response
        #[arg(long)]
        diff: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Print the request that replaces a package's description
    EditDescription {
        #[arg(long)]
        headers: PathBuf,
        /// Package path on the server
        #[arg(long, default_value = "/")]
        path: String,
        description: String,
    },
    /// Print the request that creates an empty package
    NewPackage {
        /// Path of the package to create it in
        #[arg(long, default_value = "/")]
        parent: String,
        slug: String,
    },
    /// Print where a package and its members can be opened
    Urls {
        #[command(flatten)]
        package: PackageArgs,
        /// Package path on the server; defaults to the path of the package resource
        #[arg(long)]
        path: Option<String>,
        /// Configuration file, instead of the platform default
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// A captured package response.
#[derive(Args, Debug)]
pub struct PackageArgs {
    #[arg(long)]
    pub headers: PathBuf,
    /// N-Quads response body
    #[arg(long)]
    pub body: Option<PathBuf>,
    /// Shape-validation result for the body, as JSON
    #[arg(long)]
    pub result: PathBuf,
}
