//! ---
//! lic_section: "05-networking-external-interfaces"
//! lic_subsection: "binary"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Control CLI for administrators working with license documents."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use r_lic_common::{extend, load_document, resolve_document_path, save_document, AppConfig};
use r_lic_core::{ExtendedLicense, FeatureKind, FeatureValue, MemoryLicense, EXPIRY_DATE};

/// License document commands.
#[derive(Debug, Subcommand)]
pub enum LicenseCommand {
    /// Print features and the outcome of the offline checks.
    Inspect(DocumentArgs),
    /// Exit with status 1 when the license is expired.
    Expired(DocumentArgs),
    /// Probe the revocation endpoint; exit with status 1 when revoked.
    Revoked(RevokedArgs),
    /// Read a feature as a typed value.
    Get(GetArgs),
    /// Store a typed feature value.
    Set(SetArgs),
    /// Generate and store a fresh license id.
    GenerateId(DocumentArgs),
    /// Store a revocation URL template (may contain `${licenseId}`).
    SetRevocationUrl(RevocationUrlArgs),
}

/// Selects the license document to operate on.
#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// License document; defaults to `[license] path` from the configuration.
    #[arg(long, short = 'l', value_name = "FILE")]
    pub license: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RevokedArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
    /// Treat an unreachable endpoint as revoked.
    #[arg(long)]
    pub fail_closed: bool,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
    /// Feature name.
    pub name: String,
    /// One of integer, date, url, uuid.
    pub kind: String,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
    /// Feature name.
    pub name: String,
    /// One of integer, date, url, uuid.
    pub kind: String,
    /// Value in the kind's text form.
    pub value: String,
}

#[derive(Debug, Args)]
pub struct RevocationUrlArgs {
    #[command(flatten)]
    pub document: DocumentArgs,
    /// URL template.
    pub template: String,
}

/// Execute the supplied license command.
pub fn run(command: LicenseCommand, config: &AppConfig) -> Result<ExitCode> {
    match command {
        LicenseCommand::Inspect(args) => {
            let (_, license) = open(config, &args)?;
            render_inspection(&license);
            Ok(ExitCode::SUCCESS)
        }
        LicenseCommand::Expired(args) => {
            let (_, license) = open(config, &args)?;
            let expired = license.is_expired();
            println!("expired: {expired}");
            Ok(verdict(expired))
        }
        LicenseCommand::Revoked(args) => {
            let (_, license) = open(config, &args.document)?;
            let default_on_unreachable =
                args.fail_closed || config.revocation.default_on_unreachable;
            let status = license
                .check_revocation(default_on_unreachable)
                .with_context(|| "unable to resolve revocation url")?;
            println!("revocation: {}", status.as_str());
            println!("revoked: {}", status.is_revoked());
            Ok(verdict(status.is_revoked()))
        }
        LicenseCommand::Get(args) => {
            let (_, license) = open(config, &args.document)?;
            let value = license.get_feature_by_kind_name(&args.name, &args.kind)?;
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        LicenseCommand::Set(args) => {
            let (path, mut license) = open(config, &args.document)?;
            let kind = args.kind.parse::<FeatureKind>()?;
            let value = FeatureValue::parse(kind, &args.value)
                .map_err(|reason| anyhow!("'{}' is not a valid {kind}: {reason}", args.value))?;
            license.set_feature_value(&args.name, &value)?;
            save(&path, license)?;
            println!("{}={value} ({})", args.name, value.kind());
            Ok(ExitCode::SUCCESS)
        }
        LicenseCommand::GenerateId(args) => {
            let (path, mut license) = open(config, &args)?;
            let id = license.generate_license_id();
            save(&path, license)?;
            println!("{id}");
            Ok(ExitCode::SUCCESS)
        }
        LicenseCommand::SetRevocationUrl(args) => {
            let (path, mut license) = open(config, &args.document)?;
            license.set_revocation_url(args.template.clone());
            save(&path, license)?;
            println!("{}", args.template);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open(config: &AppConfig, args: &DocumentArgs) -> Result<(PathBuf, ExtendedLicense<MemoryLicense>)> {
    let path = resolve_document_path(config, args.license.as_deref())?;
    let license = extend(config, load_document(&path)?)?;
    Ok((path, license))
}

fn save(path: &Path, license: ExtendedLicense<MemoryLicense>) -> Result<()> {
    save_document(path, &license.into_inner())
}

fn verdict(failed: bool) -> ExitCode {
    if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn render_inspection(license: &ExtendedLicense<MemoryLicense>) {
    println!("verified: {}", license.is_verified());
    println!("features:");
    for (name, value) in license.base().features() {
        println!("  {:<24} {}", name, value);
    }
    match license.expiry() {
        Ok(expiry) => println!("expiry: {expiry}"),
        Err(err) => println!("expiry: unreadable ({err})"),
    }
    println!("expired: {}", license.is_expired());
    match license.license_id() {
        Some(id) => println!("license id: {id}"),
        None => println!("license id: none"),
    }
    match license.revocation_url() {
        Ok(Some(url)) => println!("revocation url: {url}"),
        Ok(None) => println!("revocation url: none"),
        Err(err) => println!("revocation url: invalid ({err})"),
    }
    if license.raw_feature(EXPIRY_DATE).is_none() {
        println!("note: no {EXPIRY_DATE} feature; the license is treated as expired");
    }
}
