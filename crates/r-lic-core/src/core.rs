//! ---
//! lic_section: "14-licensing-extension"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Typed license extension wrapping a base license."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::calendar::ExpiryCalendar;
use crate::errors::{LicenseError, Result};
use crate::features::{FeatureKind, FeatureValue, TypedFeature};
use crate::logging::{record_expiry_check, record_license_id_generated, record_revocation_check};
use crate::revocation::{resolve_template, ProbeStatus, RevocationProbe, RevocationStatus};
use crate::store::BaseLicense;

/// Feature holding the last valid day of the license.
pub const EXPIRY_DATE: &str = "expiryDate";
/// Feature holding the license identifier.
pub const LICENSE_ID: &str = "licenseId";
/// Feature holding the revocation URL template.
pub const REVOCATION_URL: &str = "revocationUrl";

/// Verdict of [`ExtendedLicense::is_revoked`] when the endpoint cannot be reached.
pub const DEFAULT_REVOKED_WHEN_UNREACHABLE: bool = false;

/// Typed view over a [`BaseLicense`] adding expiry, identifier and revocation checks.
///
/// Every operation reads the base license at call time; nothing is cached.
/// The base license's own verification flag is not consulted by any check here
/// and must be checked separately through [`ExtendedLicense::is_verified`].
#[derive(Debug, Clone)]
pub struct ExtendedLicense<L> {
    base: L,
    calendar: ExpiryCalendar,
    probe: Arc<dyn RevocationProbe>,
}

impl<L: BaseLicense> ExtendedLicense<L> {
    /// Wrap `base`, probing revocation endpoints through `probe`.
    #[must_use]
    pub fn new(base: L, probe: Arc<dyn RevocationProbe>) -> Self {
        Self {
            base,
            calendar: ExpiryCalendar::default(),
            probe,
        }
    }

    /// Use `calendar` when deciding which day "today" is.
    #[must_use]
    pub fn with_calendar(mut self, calendar: ExpiryCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Calendar used for expiry checks.
    #[must_use]
    pub fn calendar(&self) -> ExpiryCalendar {
        self.calendar
    }

    /// Borrow the wrapped license.
    pub fn base(&self) -> &L {
        &self.base
    }

    /// Mutably borrow the wrapped license.
    pub fn base_mut(&mut self) -> &mut L {
        &mut self.base
    }

    /// Unwrap into the base license.
    pub fn into_inner(self) -> L {
        self.base
    }

    /// Pass-through of the base license's verification flag.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.base.is_verified()
    }

    /// Raw feature text, if present.
    pub fn raw_feature(&self, name: &str) -> Option<String> {
        self.base.raw_feature(name)
    }

    /// Read `name` and parse it as `T`.
    pub fn get_feature<T: TypedFeature>(&self, name: &str) -> Result<T> {
        let text = self.require(name)?;
        T::from_feature_text(&text)
            .map_err(|reason| conversion_error(name, T::KIND, text, reason))
    }

    /// Read `name` and parse it as `kind`.
    pub fn get_feature_as(&self, name: &str, kind: FeatureKind) -> Result<FeatureValue> {
        let text = self.require(name)?;
        FeatureValue::parse(kind, &text)
            .map_err(|reason| conversion_error(name, kind, text, reason))
    }

    /// Read `name` as the kind called `kind_name`.
    ///
    /// Unknown kind names fail with [`LicenseError::UnsupportedKind`] before the
    /// store is consulted.
    pub fn get_feature_by_kind_name(&self, name: &str, kind_name: &str) -> Result<FeatureValue> {
        let kind = kind_name.parse::<FeatureKind>()?;
        self.get_feature_as(name, kind)
    }

    /// Store `value` under `name` in canonical text form.
    pub fn set_feature<T: TypedFeature>(&mut self, name: &str, value: &T) -> Result<()> {
        self.write(name, value.to_feature_text())
    }

    /// Store a tagged value under `name`.
    pub fn set_feature_value(&mut self, name: &str, value: &FeatureValue) -> Result<()> {
        self.write(name, value.to_feature_text())
    }

    /// Store the calendar day of `instant` under `name`; time of day is dropped.
    pub fn set_feature_datetime(&mut self, name: &str, instant: DateTime<Utc>) -> Result<()> {
        let day = self.calendar.day_of(instant)?;
        self.set_feature(name, &day)
    }

    /// Last day on which the license is valid.
    pub fn expiry(&self) -> Result<NaiveDate> {
        self.get_feature(EXPIRY_DATE)
    }

    /// Set the last valid day.
    pub fn set_expiry(&mut self, date: NaiveDate) {
        self.store(EXPIRY_DATE, date.to_feature_text());
    }

    /// Set the last valid day from an instant, truncated in the configured calendar.
    pub fn set_expiry_at(&mut self, instant: DateTime<Utc>) -> Result<()> {
        self.set_feature_datetime(EXPIRY_DATE, instant)
    }

    /// True once the configured calendar has moved past the expiry day.
    ///
    /// Fails closed: a missing or unreadable expiry date counts as expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self.calendar.today() {
            Ok(today) => self.is_expired_on(today),
            Err(err) => {
                warn!(error = %err, "unable to determine current day; treating license as expired");
                record_expiry_check("unreadable");
                true
            }
        }
    }

    /// Expiry check against an explicit `today`.
    #[must_use]
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        match self.expiry() {
            Ok(expiry) => {
                let expired = today > expiry;
                debug!(%today, %expiry, expired, "license expiry evaluated");
                record_expiry_check(if expired { "expired" } else { "valid" });
                expired
            }
            Err(err) => {
                warn!(error = %err, "expiry date unreadable; treating license as expired");
                record_expiry_check("unreadable");
                true
            }
        }
    }

    /// Generate a random identifier, store it and return it.
    pub fn generate_license_id(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.set_license_id(id);
        record_license_id_generated();
        info!(license_id = %id, "license id generated");
        id
    }

    /// Stored identifier, or `None` when missing or unparsable.
    pub fn license_id(&self) -> Option<Uuid> {
        match self.get_feature::<Uuid>(LICENSE_ID) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!(error = %err, "license id unavailable");
                None
            }
        }
    }

    /// Store `id` as the license identifier.
    pub fn set_license_id(&mut self, id: Uuid) {
        self.store(LICENSE_ID, id.to_feature_text());
    }

    /// Revocation URL with the license id substituted, if a template is stored.
    pub fn revocation_url(&self) -> Result<Option<Url>> {
        let Some(template) = self.base.raw_feature(REVOCATION_URL) else {
            return Ok(None);
        };
        resolve_template(&template, self.license_id()).map(Some)
    }

    /// Store a revocation URL template verbatim; it may contain `${licenseId}`.
    pub fn set_revocation_url(&mut self, template: impl Into<String>) {
        self.store(REVOCATION_URL, template.into());
    }

    /// Store an already parsed revocation URL.
    pub fn set_revocation_url_from(&mut self, url: &Url) {
        self.set_revocation_url(url.as_str());
    }

    /// Probe the revocation endpoint once and classify the answer.
    pub fn check_revocation(&self, default_on_unreachable: bool) -> Result<RevocationStatus> {
        let status = match self.revocation_url()? {
            None => RevocationStatus::NoRevocationUrl,
            Some(url) => match self.probe.probe(&url) {
                Ok(ProbeStatus::Http(200)) => RevocationStatus::Granted { url },
                Ok(ProbeStatus::Http(status)) => RevocationStatus::Revoked { url, status },
                Ok(ProbeStatus::Unclassified) => RevocationStatus::Unclassified { url },
                Err(error) => RevocationStatus::Unreachable {
                    url,
                    assumed_revoked: default_on_unreachable,
                    error,
                },
            },
        };
        record_revocation_check(&status);
        Ok(status)
    }

    /// Revocation verdict, using `default_on_unreachable` when the endpoint is unreachable.
    pub fn is_revoked_or(&self, default_on_unreachable: bool) -> Result<bool> {
        Ok(self.check_revocation(default_on_unreachable)?.is_revoked())
    }

    /// Revocation verdict; an unreachable endpoint counts as not revoked.
    pub fn is_revoked(&self) -> Result<bool> {
        self.is_revoked_or(DEFAULT_REVOKED_WHEN_UNREACHABLE)
    }

    fn require(&self, name: &str) -> Result<String> {
        self.base
            .raw_feature(name)
            .ok_or_else(|| LicenseError::NotFound(name.to_owned()))
    }

    fn write(&mut self, name: &str, text: String) -> Result<()> {
        if name.is_empty() {
            return Err(LicenseError::EmptyFeatureName);
        }
        self.store(name, text);
        Ok(())
    }

    fn store(&mut self, name: &str, text: String) {
        debug!(feature = name, value = %text, "writing license feature");
        self.base.set_raw_feature(name, text);
    }
}

fn conversion_error(name: &str, kind: FeatureKind, value: String, reason: String) -> LicenseError {
    LicenseError::Conversion {
        name: name.to_owned(),
        kind,
        value,
        reason,
    }
}
