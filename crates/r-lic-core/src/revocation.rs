//! ---
//! lic_section: "14-licensing-extension"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Revocation URL templating and the network probe seam."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
//! A license may carry a `revocationUrl` feature naming an endpoint that
//! answers `200` while the license is still honoured. The template may embed
//! the literal token `${licenseId}`, substituted with the stored identifier
//! before the URL is parsed. The probe itself sits behind
//! [`RevocationProbe`] so tests and embedders can replace the transport.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::errors::{LicenseError, Result};
use crate::features::TypedFeature;

/// The only placeholder recognised inside a revocation URL template.
pub const LICENSE_ID_PLACEHOLDER: &str = "${licenseId}";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Substitute the license id into `template` and parse the result.
///
/// Every occurrence of [`LICENSE_ID_PLACEHOLDER`] is replaced. Without an id the
/// template is parsed as-is, placeholder included. The result is the normalised
/// [`Url`]: a placeholder left in the path comes back as `$%7BlicenseId%7D`,
/// while one left in the query keeps its braces.
pub fn resolve_template(template: &str, license_id: Option<Uuid>) -> Result<Url> {
    let resolved = match license_id {
        Some(id) => template.replace(LICENSE_ID_PLACEHOLDER, &id.to_feature_text()),
        None => template.to_owned(),
    };
    match Url::parse(&resolved) {
        Ok(url) => Ok(url),
        Err(source) => Err(LicenseError::MalformedUrl {
            url: resolved,
            source,
        }),
    }
}

/// What the transport could tell about the endpoint's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// HTTP-style status code.
    Http(u16),
    /// The transport produced no status code (non-HTTP scheme).
    Unclassified,
}

/// Transport failures while contacting the revocation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The endpoint could not be connected to.
    #[error("revocation endpoint unreachable: {0}")]
    Connect(String),
    /// The request did not complete within the configured timeout.
    #[error("revocation request timed out: {0}")]
    Timeout(String),
    /// Any other I/O or protocol failure.
    #[error("revocation request failed: {0}")]
    Transport(String),
    /// The HTTP client could not be constructed.
    #[error("unable to build revocation client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout(err.to_string())
        } else if err.is_connect() {
            ProbeError::Connect(err.to_string())
        } else {
            ProbeError::Transport(err.to_string())
        }
    }
}

/// Single-request capability used by the revocation check.
pub trait RevocationProbe: fmt::Debug + Send + Sync {
    /// Issue one request against `url` and report its status.
    fn probe(&self, url: &Url) -> std::result::Result<ProbeStatus, ProbeError>;
}

/// Client settings for [`HttpProbe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Overall request timeout.
    pub timeout: Duration,
    /// `User-Agent` header sent with each probe.
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("r-lic/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Blocking HTTP(S) probe backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Build a probe with the given timeout and user agent.
    pub fn new(settings: &ProbeSettings) -> std::result::Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| ProbeError::Client(err.to_string()))?;
        Ok(Self { client })
    }
}

impl RevocationProbe for HttpProbe {
    fn probe(&self, url: &Url) -> std::result::Result<ProbeStatus, ProbeError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Ok(ProbeStatus::Unclassified);
        }
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()?;
        Ok(ProbeStatus::Http(response.status().as_u16()))
    }
}

/// Probe returning a fixed answer, recording every URL it was asked about.
#[derive(Debug)]
pub struct StaticProbe {
    outcome: std::result::Result<ProbeStatus, ProbeError>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Url>>,
}

impl StaticProbe {
    /// Answer every probe with an HTTP status.
    #[must_use]
    pub fn status(code: u16) -> Self {
        Self::with_outcome(Ok(ProbeStatus::Http(code)))
    }

    /// Answer every probe with a transport failure.
    #[must_use]
    pub fn failing(error: ProbeError) -> Self {
        Self::with_outcome(Err(error))
    }

    /// Answer every probe without a status code.
    #[must_use]
    pub fn unclassified() -> Self {
        Self::with_outcome(Ok(ProbeStatus::Unclassified))
    }

    fn with_outcome(outcome: std::result::Result<ProbeStatus, ProbeError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Number of probes issued so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URLs probed so far, oldest first.
    #[must_use]
    pub fn seen(&self) -> Vec<Url> {
        self.seen.lock().clone()
    }
}

impl RevocationProbe for StaticProbe {
    fn probe(&self, url: &Url) -> std::result::Result<ProbeStatus, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(url.clone());
        self.outcome.clone()
    }
}

/// Classified outcome of a revocation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevocationStatus {
    /// No `revocationUrl` feature; nothing to check.
    NoRevocationUrl,
    /// The endpoint answered `200`.
    Granted {
        /// Endpoint that was probed.
        url: Url,
    },
    /// The endpoint answered with a status other than `200`.
    Revoked {
        /// Endpoint that was probed.
        url: Url,
        /// Status code returned.
        status: u16,
    },
    /// The transport gave no status code; treated as revoked.
    Unclassified {
        /// Endpoint that was probed.
        url: Url,
    },
    /// The endpoint could not be reached; the caller default applies.
    Unreachable {
        /// Endpoint that was probed.
        url: Url,
        /// Caller-supplied verdict for unreachable endpoints.
        assumed_revoked: bool,
        /// Transport diagnostic.
        error: ProbeError,
    },
}

impl RevocationStatus {
    /// Collapse the classification into the revoked/not-revoked verdict.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        match self {
            RevocationStatus::NoRevocationUrl | RevocationStatus::Granted { .. } => false,
            RevocationStatus::Revoked { .. } | RevocationStatus::Unclassified { .. } => true,
            RevocationStatus::Unreachable {
                assumed_revoked, ..
            } => *assumed_revoked,
        }
    }

    /// Short label used for metrics and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RevocationStatus::NoRevocationUrl => "no_url",
            RevocationStatus::Granted { .. } => "granted",
            RevocationStatus::Revoked { .. } => "revoked",
            RevocationStatus::Unclassified { .. } => "unclassified",
            RevocationStatus::Unreachable { .. } => "unreachable",
        }
    }
}
