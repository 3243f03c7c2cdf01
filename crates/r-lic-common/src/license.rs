//! ---
//! lic_section: "01-core-functionality"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "License document loading and extension assembly."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use r_lic_core::{ExtendedLicense, HttpProbe, MemoryLicense, RevocationProbe};
use tracing::debug;

use crate::config::AppConfig;

/// Read a JSON license document.
pub fn load_document(path: impl AsRef<Path>) -> Result<MemoryLicense> {
    let path = path.as_ref();
    debug!(license_path = %path.display(), "loading license document");
    let raw = fs::read_to_string(path)
        .with_context(|| format!("unable to read license file {}", path.display()))?;
    let license = serde_json::from_str(&raw)
        .with_context(|| format!("license file {} is not a valid document", path.display()))?;
    Ok(license)
}

/// Write a license document as pretty JSON.
pub fn save_document(path: impl AsRef<Path>, license: &MemoryLicense) -> Result<()> {
    let path = path.as_ref();
    let serialised = serde_json::to_string_pretty(license)
        .with_context(|| "failed to serialise license document")?;
    fs::write(path, serialised + "\n")
        .with_context(|| format!("unable to write license file {}", path.display()))?;
    debug!(license_path = %path.display(), features = license.len(), "license document saved");
    Ok(())
}

/// Pick the document path from an explicit argument or the `[license]` section.
pub fn resolve_document_path(config: &AppConfig, explicit: Option<&Path>) -> Result<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.license.path.clone())
        .ok_or_else(|| anyhow!("no license document given and [license] path is not configured"))
}

/// Wrap `license` with the probe and calendar described by `config`.
pub fn extend(config: &AppConfig, license: MemoryLicense) -> Result<ExtendedLicense<MemoryLicense>> {
    let probe = HttpProbe::new(&config.revocation.probe_settings())
        .with_context(|| "failed to construct revocation probe")?;
    Ok(extend_with_probe(config, license, Arc::new(probe)))
}

/// Wrap `license` with an explicit probe, using the configured calendar.
pub fn extend_with_probe(
    config: &AppConfig,
    license: MemoryLicense,
    probe: Arc<dyn RevocationProbe>,
) -> ExtendedLicense<MemoryLicense> {
    ExtendedLicense::new(license, probe).with_calendar(config.license.calendar)
}

/// Load the document at `path` and wrap it per `config`.
pub fn open_extended(
    config: &AppConfig,
    path: impl AsRef<Path>,
) -> Result<ExtendedLicense<MemoryLicense>> {
    let license = load_document(path)?;
    extend(config, license)
}
