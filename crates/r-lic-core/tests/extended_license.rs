//! ---
//! lic_section: "14-licensing-extension"
//! lic_subsection: "test"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Behavioural tests for the typed license extension."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use r_lic_core::{
    BaseLicense, ExpiryCalendar, ExtendedLicense, FeatureKind, FeatureValue, LicenseError,
    MemoryLicense, ProbeError, StaticProbe, EXPIRY_DATE, LICENSE_ID, REVOCATION_URL,
};
use url::Url;
use uuid::Uuid;

fn extended(probe: StaticProbe) -> ExtendedLicense<MemoryLicense> {
    ExtendedLicense::new(MemoryLicense::new(), Arc::new(probe))
}

fn utc_today() -> NaiveDate {
    ExpiryCalendar::Utc.today().unwrap()
}

#[test]
fn license_expiring_today_is_not_expired() {
    let mut license = extended(StaticProbe::status(200)).with_calendar(ExpiryCalendar::Utc);
    license.set_expiry(utc_today());
    assert!(!license.is_expired());
}

#[test]
fn license_expiring_today_in_local_calendar_is_not_expired() {
    let mut license = extended(StaticProbe::status(200));
    license.set_expiry(ExpiryCalendar::Local.today().unwrap());
    assert!(!license.is_expired());
}

#[test]
fn license_that_expired_yesterday_is_expired() {
    let mut license = extended(StaticProbe::status(200)).with_calendar(ExpiryCalendar::Utc);
    license.set_expiry(utc_today() - Duration::days(1));
    assert!(license.is_expired());
}

#[test]
fn missing_or_malformed_expiry_is_expired() {
    let mut license = extended(StaticProbe::status(200));
    assert!(license.is_expired());
    license.base_mut().insert(EXPIRY_DATE, "tomorrow").unwrap();
    assert!(license.is_expired());
}

#[test]
fn generated_ids_are_distinct_and_stored() {
    let mut license = extended(StaticProbe::status(200));
    let first = license.generate_license_id();
    assert_eq!(license.license_id(), Some(first));
    let second = license.generate_license_id();
    assert_ne!(first, second);
    assert_eq!(license.license_id(), Some(second));
    assert_eq!(
        license.raw_feature(LICENSE_ID),
        Some(second.hyphenated().to_string())
    );
}

#[test]
fn set_license_id_overwrites() {
    let mut license = extended(StaticProbe::status(200));
    license.generate_license_id();
    let chosen = Uuid::parse_str("8d1f2b2e-71c4-4a3b-a8b6-0f5b7d9c1e2a").unwrap();
    license.set_license_id(chosen);
    assert_eq!(license.license_id(), Some(chosen));
}

#[test]
fn revocation_url_substitutes_the_license_id() {
    let mut license = extended(StaticProbe::status(200));
    let id = Uuid::parse_str("a6c1e2f0-3b4d-4c5e-8f90-112233445566").unwrap();
    license.set_license_id(id);
    license.set_revocation_url("https://x.example/y?id=${licenseId}");
    let url = license.revocation_url().unwrap().unwrap();
    assert_eq!(
        url.as_str(),
        "https://x.example/y?id=a6c1e2f0-3b4d-4c5e-8f90-112233445566"
    );
}

#[test]
fn revocation_url_without_id_keeps_the_placeholder() {
    let mut license = extended(StaticProbe::status(200));
    license.set_revocation_url("https://x.example/y?id=${licenseId}");
    let url = license.revocation_url().unwrap().unwrap();
    assert_eq!(url.as_str(), "https://x.example/y?id=${licenseId}");
    assert_eq!(
        license.raw_feature(REVOCATION_URL).as_deref(),
        Some("https://x.example/y?id=${licenseId}")
    );
}

#[test]
fn revocation_url_absent_when_not_configured() {
    let license = extended(StaticProbe::status(200));
    assert_eq!(license.revocation_url(), Ok(None));
}

#[test]
fn revocation_url_can_be_set_from_a_parsed_url() {
    let mut license = extended(StaticProbe::status(200));
    let url = Url::parse("https://x.example/revocations/42").unwrap();
    license.set_revocation_url_from(&url);
    assert_eq!(license.revocation_url(), Ok(Some(url)));
}

#[test]
fn status_200_is_not_revoked() {
    let mut license = extended(StaticProbe::status(200));
    license.set_revocation_url("https://x.example/y");
    assert_eq!(license.is_revoked(), Ok(false));
}

#[test]
fn status_404_is_revoked() {
    let mut license = extended(StaticProbe::status(404));
    license.set_revocation_url("https://x.example/y");
    assert_eq!(license.is_revoked(), Ok(true));
}

#[test]
fn unreachable_endpoint_uses_the_caller_default() {
    let mut license = extended(StaticProbe::failing(ProbeError::Connect(
        "connection refused".to_owned(),
    )));
    license.set_revocation_url("https://x.example/y");
    assert_eq!(license.is_revoked_or(true), Ok(true));
    assert_eq!(license.is_revoked_or(false), Ok(false));
    assert_eq!(license.is_revoked(), Ok(false));
}

#[test]
fn typed_features_round_trip() {
    let mut license = extended(StaticProbe::status(200));

    license.set_feature("seats", &250_i64).unwrap();
    assert_eq!(license.get_feature::<i64>("seats"), Ok(250));

    let date = NaiveDate::from_ymd_opt(2029, 12, 31).unwrap();
    license.set_feature("supportUntil", &date).unwrap();
    assert_eq!(license.get_feature::<NaiveDate>("supportUntil"), Ok(date));

    let url = Url::parse("https://updates.example/channel/stable").unwrap();
    license.set_feature("updateChannel", &url).unwrap();
    assert_eq!(license.get_feature::<Url>("updateChannel"), Ok(url));

    let id = Uuid::new_v4();
    license.set_feature("customerId", &id).unwrap();
    assert_eq!(license.get_feature::<Uuid>("customerId"), Ok(id));
}

#[test]
fn identifiers_compare_by_value_not_casing() {
    let mut license = extended(StaticProbe::status(200));
    license
        .base_mut()
        .insert("customerId", "A6C1E2F0-3B4D-4C5E-8F90-112233445566")
        .unwrap();
    let expected = Uuid::parse_str("a6c1e2f0-3b4d-4c5e-8f90-112233445566").unwrap();
    assert_eq!(
        license.get_feature_as("customerId", FeatureKind::UniqueId),
        Ok(FeatureValue::UniqueId(expected))
    );
}

#[test]
fn tagged_values_round_trip() {
    let mut license = extended(StaticProbe::status(200));
    let value = FeatureValue::Date(NaiveDate::from_ymd_opt(2031, 7, 4).unwrap());
    license.set_feature_value("renewal", &value).unwrap();
    assert_eq!(license.get_feature_as("renewal", FeatureKind::Date), Ok(value));
}

#[test]
fn missing_feature_is_not_found() {
    let license = extended(StaticProbe::status(200));
    assert_eq!(
        license.get_feature::<i64>("seats"),
        Err(LicenseError::NotFound("seats".to_owned()))
    );
}

#[test]
fn unparsable_feature_is_a_conversion_error() {
    let mut license = extended(StaticProbe::status(200));
    license.base_mut().insert("homepage", "not a url").unwrap();
    assert!(matches!(
        license.get_feature_as("homepage", FeatureKind::Url),
        Err(LicenseError::Conversion {
            kind: FeatureKind::Url,
            ..
        })
    ));
}

#[test]
fn unknown_kind_is_unsupported_regardless_of_content() {
    let mut license = extended(StaticProbe::status(200));
    license.set_feature("seats", &5_i64).unwrap();
    for name in ["seats", "missing"] {
        assert_eq!(
            license.get_feature_by_kind_name(name, "boolean"),
            Err(LicenseError::UnsupportedKind("boolean".to_owned()))
        );
    }
}

#[test]
fn verification_flag_is_passed_through_untouched() {
    let license = ExtendedLicense::new(
        MemoryLicense::new().with_verified(true),
        Arc::new(StaticProbe::status(200)),
    );
    assert!(license.is_verified());
    assert!(license.into_inner().is_verified());
}
