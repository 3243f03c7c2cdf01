//! ---
//! lic_section: "14-licensing-extension"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Telemetry for expiry, identifier and revocation checks."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use tracing::{info, warn};

use crate::revocation::RevocationStatus;

static LICENSE_EXPIRY_CHECKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "license_expiry_checks_total",
        "Total number of license expiry checks by outcome",
        &["outcome"]
    )
    .expect("metric registration to succeed")
});

static LICENSE_REVOCATION_CHECKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "license_revocation_checks_total",
        "Total number of license revocation checks by outcome",
        &["outcome"]
    )
    .expect("metric registration to succeed")
});

static LICENSE_IDS_GENERATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "license_ids_generated_total",
        "Total number of license identifiers generated"
    )
    .expect("metric registration to succeed")
});

/// Record the outcome of an expiry check.
pub fn record_expiry_check(outcome: &str) {
    LICENSE_EXPIRY_CHECKS_TOTAL
        .with_label_values(&[outcome])
        .inc();
}

/// Record a freshly generated license identifier.
pub fn record_license_id_generated() {
    LICENSE_IDS_GENERATED_TOTAL.inc();
}

/// Record and log the outcome of a revocation check.
pub fn record_revocation_check(status: &RevocationStatus) {
    LICENSE_REVOCATION_CHECKS_TOTAL
        .with_label_values(&[status.as_str()])
        .inc();
    match status {
        RevocationStatus::NoRevocationUrl => {
            info!(outcome = status.as_str(), "no revocation url; license not revoked");
        }
        RevocationStatus::Granted { url } => {
            info!(outcome = status.as_str(), url = %url, "license not revoked");
        }
        RevocationStatus::Revoked { url, status: code } => {
            info!(outcome = status.as_str(), url = %url, status = code, "license revoked");
        }
        RevocationStatus::Unclassified { url } => {
            warn!(
                outcome = status.as_str(),
                url = %url,
                "revocation endpoint returned no status; treating license as revoked"
            );
        }
        RevocationStatus::Unreachable {
            url,
            assumed_revoked,
            error,
        } => {
            warn!(
                outcome = status.as_str(),
                url = %url,
                assumed_revoked = assumed_revoked,
                error = %error,
                "revocation endpoint unreachable; applying caller default"
            );
        }
    }
}
