//! ---
//! lic_section: "01-core-functionality"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "TOML configuration for license checks and logging."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use r_lic_core::{ExpiryCalendar, ProbeSettings, DEFAULT_REVOKED_WHEN_UNREACHABLE};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_revocation_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    concat!("r-lic/", env!("CARGO_PKG_VERSION")).to_owned()
}

fn default_revoked_when_unreachable() -> bool {
    DEFAULT_REVOKED_WHEN_UNREACHABLE
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Primary configuration object for license tooling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub license: LicenseConfig,
    #[serde(default)]
    pub revocation: RevocationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "R_LIC_CONFIG";

    /// Load configuration from disk, respecting the `R_LIC_CONFIG` override.
    ///
    /// Without the override the first existing candidate wins.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                return Self::from_path(Path::new(&env_path));
            }
        }

        if let Some(candidate) = candidates.iter().find(|c| c.as_ref().exists()) {
            return Self::from_path(candidate.as_ref());
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    /// Like [`AppConfig::load`], falling back to defaults when nothing is found.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        let env_set = std::env::var(Self::ENV_CONFIG_PATH)
            .map(|value| !value.trim().is_empty())
            .unwrap_or(false);
        if !env_set && !candidates.iter().any(|c| c.as_ref().exists()) {
            debug!("no configuration file found; using defaults");
            return Ok(Self::default());
        }
        Self::load(candidates)
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.license
            .calendar
            .validate()
            .with_context(|| "invalid [license] calendar")?;
        self.revocation.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Where license documents live and which calendar decides expiry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub calendar: ExpiryCalendar,
}

/// Transport settings for revocation probes.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationConfig {
    #[serde(default = "default_revocation_timeout")]
    #[serde_as(as = "DurationSeconds<u64>")]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_revoked_when_unreachable")]
    pub default_on_unreachable: bool,
}

impl RevocationConfig {
    fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(anyhow!("[revocation] timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Probe client settings derived from this section.
    #[must_use]
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
        }
    }
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            timeout: default_revocation_timeout(),
            user_agent: default_user_agent(),
            default_on_unreachable: default_revoked_when_unreachable(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
    #[serde(default)]
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
            file_output: false,
        }
    }
}
