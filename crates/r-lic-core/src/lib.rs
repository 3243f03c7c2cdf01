//! ---
//! lic_section: "14-licensing-extension"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Typed license extension: features, expiry, ids and revocation."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
#![warn(missing_docs)]

//! R-LIC core crate layering typed feature access, fail-closed expiry checks,
//! license identifiers and online revocation checks over a base license's
//! string feature store.

pub mod calendar;
pub mod core;
pub mod errors;
pub mod features;
pub mod logging;
pub mod revocation;
pub mod store;

pub use crate::calendar::ExpiryCalendar;
pub use crate::core::{
    ExtendedLicense, DEFAULT_REVOKED_WHEN_UNREACHABLE, EXPIRY_DATE, LICENSE_ID, REVOCATION_URL,
};
pub use crate::errors::{LicenseError, Result};
pub use crate::features::{FeatureKind, FeatureValue, TypedFeature};
pub use crate::revocation::{
    HttpProbe, ProbeError, ProbeSettings, ProbeStatus, RevocationProbe, RevocationStatus,
    StaticProbe, LICENSE_ID_PLACEHOLDER,
};
pub use crate::store::{BaseLicense, MemoryLicense};
