//! ldpkg: browse and edit versioned Linked-Data packages.

mod cli;

use std::fmt::Write as _;
use std::path::Path;

use clap::Parser;
use ldpkg_config::Config;
use ldpkg_package::models::{Headers, Package, VersionUri, parse_status_line};
use ldpkg_package::{LoadedPackage, MutationOutcome, MutationRequest, Response, apply_mutation, load_package};
use ldpkg_shex::{Recorded, ValidationResult};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, PackageArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Version { headers } => {
            let response = read_response(&headers, None)?;
            let version = ldpkg_package::try_resolve_version(&response.headers).map_err(report)?;
            println!("{version}");
        },
        Commands::Show { package, json } => {
            let LoadedPackage { version, package } = load(&package)?;
            print_package(&version, &package, json)?;
        },
        Commands::Patch {
            package,
            diff_headers,
            diff,
            json,
        } => {
            let LoadedPackage { mut version, mut package } = load(&package)?;
            let response = read_response(&diff_headers, diff.as_deref())?;
            match apply_mutation(&mut package, &response).map_err(report)? {
                MutationOutcome::Unchanged => tracing::info!("package unchanged"),
                MutationOutcome::Patched { version: next, outcome } => {
                    for skipped in &outcome.skipped {
                        eprintln!("skipped: {skipped}");
                    }
                    version = next;
                },
            }
            print_package(&version, &package, json)?;
        },
        Commands::EditDescription {
            headers,
            path,
            description,
        } => {
            let response = read_response(&headers, None)?;
            let version = ldpkg_package::try_resolve_version(&response.headers).map_err(report)?;
            let request = MutationRequest::edit_description(&path, &version, &description);
            print!("{request}");
        },
        Commands::NewPackage { parent, slug } => {
            let request = MutationRequest::new_package(&parent, &slug).map_err(report)?;
            print!("{request}");
        },
        Commands::Urls { package, path, config } => {
            let config = Config::load(config.as_deref()).map_err(report)?;
            let LoadedPackage { version, package } = load(&package)?;
            let path = path.unwrap_or_else(|| package.resource.path.clone());
            print!("{}", render_urls(&config, &path, &version, &package).into_diagnostic()?);
        },
    }
    Ok(())
}

/// Keeps the full error tree, with locations, in the diagnostic.
fn report<E>(err: exn::Exn<E>) -> miette::Report
where
    E: std::error::Error + Send + Sync + 'static,
{
    miette::miette!("{err:?}")
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("could not read {}", path.display()))
}

fn read_response(headers: &Path, body: Option<&Path>) -> Result<Response> {
    let text = read(headers)?;
    let status = parse_status_line(&text).unwrap_or(200);
    let headers = Headers::parse(&text).map_err(report)?;
    let body = body.map(read).transpose()?.unwrap_or_default();
    Ok(Response::new(status, headers, body))
}

fn load(args: &PackageArgs) -> Result<LoadedPackage> {
    let response = read_response(&args.headers, args.body.as_deref())?;
    load_recorded(&response, &read(&args.result)?)
}

/// Loads `response` against a recorded result, which must be about the
/// node the response pins.
fn load_recorded(response: &Response, recorded: &str) -> Result<LoadedPackage> {
    let result = ValidationResult::from_json(recorded).map_err(report)?;
    load_package(response, &Recorded::from_result(result))
        .map_err(report)
        .wrap_err("could not load package")
}

fn print_package(version: &VersionUri, package: &Package, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(&serde_json::json!({ "version": version, "package": package }))
            .into_diagnostic()?;
        println!("{text}");
    } else {
        print!("{}", render_package(version, package).into_diagnostic()?);
    }
    Ok(())
}

fn render_package(version: &VersionUri, package: &Package) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", package.name)?;
    writeln!(out, "  resource     {}", package.resource)?;
    writeln!(out, "  version      {version}")?;
    writeln!(out, "  contents     {} ({} bytes)", package.value, package.extent)?;
    writeln!(out, "  created      {}", package.created)?;
    writeln!(out, "  modified     {}", package.modified)?;
    if let Some(revision) = &package.revision_of {
        writeln!(out, "  revision of  {revision}")?;
    }
    writeln!(out, "  description  {}", package.description.as_deref().unwrap_or("(none)"))?;
    if !package.keywords().is_empty() {
        writeln!(out, "  keywords     {}", package.keywords().join(", "))?;
    }
    for member in &package.members {
        writeln!(out, "  - [{}] {}", member.resource_type(), member.display_name())?;
    }
    Ok(out)
}

fn render_urls(config: &Config, path: &str, version: &VersionUri, package: &Package) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "package   {}", config.package_url(path))?;
    writeln!(out, "version   {}", config.version_url(version))?;
    writeln!(out, "contents  {}", config.gateway_url(&package.value.path))?;
    if let Some(revision) = &package.revision_of {
        writeln!(out, "revision  {}", config.explore_url(&revision.path, revision.fragment.as_deref()))?;
    }
    for member in &package.members {
        let kind = member.resource_type().as_str();
        writeln!(out, "{kind:<9} {}  {}", config.member_link(path, member), member.display_name())?;
    }
    Ok(out)
}
