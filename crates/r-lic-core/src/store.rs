//! ---
//! lic_section: "14-licensing-extension"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Base license seam and in-memory feature store."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{LicenseError, Result};

/// Operations the extension consumes from the underlying license.
///
/// Signing, verification and (de)serialisation of the license container stay
/// with the implementor. The extension only reads and writes feature text.
pub trait BaseLicense {
    /// Raw text of a feature, or `None` when absent.
    fn raw_feature(&self, name: &str) -> Option<String>;

    /// Store raw text under `name`, replacing any previous value.
    fn set_raw_feature(&mut self, name: &str, value: String);

    /// Whether the license signature was verified by the implementor.
    fn is_verified(&self) -> bool;
}

/// Plain feature map used for fixtures and the CLI document format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLicense {
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    features: BTreeMap<String, String>,
}

impl MemoryLicense {
    /// Create an empty, unverified license.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the license as verified (or not).
    #[must_use]
    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    /// Insert a raw feature, rejecting empty names.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(LicenseError::EmptyFeatureName);
        }
        self.features.insert(name, value.into());
        Ok(())
    }

    /// Iterate over stored features in name order.
    pub fn features(&self) -> impl Iterator<Item = (&str, &str)> {
        self.features
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of stored features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when no features are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl BaseLicense for MemoryLicense {
    fn raw_feature(&self, name: &str) -> Option<String> {
        self.features.get(name).cloned()
    }

    fn set_raw_feature(&mut self, name: &str, value: String) {
        self.features.insert(name.to_owned(), value);
    }

    fn is_verified(&self) -> bool {
        self.verified
    }
}
