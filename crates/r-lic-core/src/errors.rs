//! ---
//! lic_section: "14-licensing-extension"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Error taxonomy for typed license feature access."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use thiserror::Error;

use crate::features::FeatureKind;

/// Result alias used throughout the extension layer.
pub type Result<T> = std::result::Result<T, LicenseError>;

/// Failures surfaced by typed feature access and revocation URL resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LicenseError {
    /// The requested feature is not present in the base license.
    #[error("license feature '{0}' is not present")]
    NotFound(String),
    /// The stored text does not parse as the requested kind.
    #[error("license feature '{name}' value '{value}' is not a valid {kind}: {reason}")]
    Conversion {
        /// Feature name that was read.
        name: String,
        /// Kind the caller asked for.
        kind: FeatureKind,
        /// Raw text found in the store.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// A kind name outside the fixed set was requested.
    #[error("feature kind '{0}' is not handled")]
    UnsupportedKind(String),
    /// The revocation URL, after placeholder substitution, is not a URL.
    #[error("revocation url '{url}' is malformed: {source}")]
    MalformedUrl {
        /// Text that failed to parse.
        url: String,
        /// Parser diagnostic.
        #[source]
        source: url::ParseError,
    },
    /// Feature names must be non-empty.
    #[error("license feature name must not be empty")]
    EmptyFeatureName,
    /// Fixed calendar offsets must stay within a single day.
    #[error("calendar offset of {0} seconds is outside +/-24h")]
    InvalidCalendar(i32),
}
