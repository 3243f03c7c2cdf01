//! ---
//! lic_section: "14-licensing-extension"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Typed conversion layer between license features and text."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use url::Url;
use uuid::Uuid;

use crate::errors::LicenseError;

/// Day-granular format used for every date feature.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closed set of semantic types a feature can be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureKind {
    /// Base-10 signed integer.
    Integer,
    /// Calendar day in `yyyy-mm-dd` form.
    Date,
    /// Absolute URL.
    Url,
    /// 128-bit identifier in hyphenated form.
    UniqueId,
}

impl FeatureKind {
    /// All supported kinds, in declaration order.
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Integer,
        FeatureKind::Date,
        FeatureKind::Url,
        FeatureKind::UniqueId,
    ];

    /// Stable identifier string used by the CLI and configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Integer => "integer",
            FeatureKind::Date => "date",
            FeatureKind::Url => "url",
            FeatureKind::UniqueId => "uuid",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = LicenseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(FeatureKind::Integer),
            "date" => Ok(FeatureKind::Date),
            "url" => Ok(FeatureKind::Url),
            "uuid" | "uniqueid" | "unique-id" => Ok(FeatureKind::UniqueId),
            _ => Err(LicenseError::UnsupportedKind(value.to_owned())),
        }
    }
}

/// A parsed feature value tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureValue {
    /// Integer feature.
    Integer(i64),
    /// Date feature.
    Date(NaiveDate),
    /// URL feature.
    Url(Url),
    /// Unique identifier feature.
    UniqueId(Uuid),
}

impl FeatureValue {
    /// Kind tag of this value.
    #[must_use]
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Integer(_) => FeatureKind::Integer,
            FeatureValue::Date(_) => FeatureKind::Date,
            FeatureValue::Url(_) => FeatureKind::Url,
            FeatureValue::UniqueId(_) => FeatureKind::UniqueId,
        }
    }

    /// Canonical text persisted in the base license.
    #[must_use]
    pub fn to_feature_text(&self) -> String {
        match self {
            FeatureValue::Integer(value) => value.to_feature_text(),
            FeatureValue::Date(value) => value.to_feature_text(),
            FeatureValue::Url(value) => value.to_feature_text(),
            FeatureValue::UniqueId(value) => value.to_feature_text(),
        }
    }

    /// Parse stored text as `kind`, returning the parser diagnostic on failure.
    pub fn parse(kind: FeatureKind, text: &str) -> Result<Self, String> {
        match kind {
            FeatureKind::Integer => i64::from_feature_text(text).map(FeatureValue::Integer),
            FeatureKind::Date => NaiveDate::from_feature_text(text).map(FeatureValue::Date),
            FeatureKind::Url => Url::from_feature_text(text).map(FeatureValue::Url),
            FeatureKind::UniqueId => Uuid::from_feature_text(text).map(FeatureValue::UniqueId),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_feature_text())
    }
}

/// Rust types that map onto one [`FeatureKind`] with a format/parse pair.
pub trait TypedFeature: Sized {
    /// Kind this type is stored as.
    const KIND: FeatureKind;

    /// Render the canonical text form.
    fn to_feature_text(&self) -> String;

    /// Parse the stored text form.
    fn from_feature_text(text: &str) -> Result<Self, String>;
}

impl TypedFeature for i64 {
    const KIND: FeatureKind = FeatureKind::Integer;

    fn to_feature_text(&self) -> String {
        self.to_string()
    }

    fn from_feature_text(text: &str) -> Result<Self, String> {
        text.parse::<i64>().map_err(|err| err.to_string())
    }
}

impl TypedFeature for NaiveDate {
    const KIND: FeatureKind = FeatureKind::Date;

    fn to_feature_text(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }

    fn from_feature_text(text: &str) -> Result<Self, String> {
        NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|err| err.to_string())
    }
}

impl TypedFeature for Url {
    const KIND: FeatureKind = FeatureKind::Url;

    fn to_feature_text(&self) -> String {
        self.as_str().to_owned()
    }

    fn from_feature_text(text: &str) -> Result<Self, String> {
        Url::parse(text).map_err(|err| err.to_string())
    }
}

impl TypedFeature for Uuid {
    const KIND: FeatureKind = FeatureKind::UniqueId;

    fn to_feature_text(&self) -> String {
        self.hyphenated().to_string()
    }

    fn from_feature_text(text: &str) -> Result<Self, String> {
        Uuid::parse_str(text).map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_parse_case_insensitively() {
        for kind in FeatureKind::ALL {
            assert_eq!(kind.as_str().parse::<FeatureKind>(), Ok(kind));
            assert_eq!(kind.as_str().to_uppercase().parse::<FeatureKind>(), Ok(kind));
        }
        assert_eq!("unique-id".parse::<FeatureKind>(), Ok(FeatureKind::UniqueId));
    }

    #[test]
    fn unknown_kind_name_is_unsupported() {
        assert_eq!(
            "boolean".parse::<FeatureKind>(),
            Err(LicenseError::UnsupportedKind("boolean".to_owned()))
        );
    }

    #[test]
    fn dates_render_at_day_granularity() {
        let date = NaiveDate::from_ymd_opt(2031, 2, 3).unwrap();
        assert_eq!(date.to_feature_text(), "2031-02-03");
        assert!(NaiveDate::from_feature_text("2031-02-03T10:00:00").is_err());
    }

    #[test]
    fn uuid_text_is_lowercase_hyphenated() {
        let id = Uuid::parse_str("6F9619FF-8B86-D011-B42D-00C04FC964FF").unwrap();
        assert_eq!(id.to_feature_text(), "6f9619ff-8b86-d011-b42d-00c04fc964ff");
    }

    #[test]
    fn tagged_parse_dispatches_on_kind() {
        assert_eq!(
            FeatureValue::parse(FeatureKind::Integer, "-42"),
            Ok(FeatureValue::Integer(-42))
        );
        assert!(FeatureValue::parse(FeatureKind::Url, "not a url").is_err());
        assert!(FeatureValue::parse(FeatureKind::Integer, " 7").is_err());
    }

    #[test]
    fn parsed_values_keep_their_kind() {
        let samples = [
            (FeatureKind::Integer, "12"),
            (FeatureKind::Date, "2030-06-30"),
            (FeatureKind::Url, "https://licenses.example/check"),
            (FeatureKind::UniqueId, "0b7e4d62-3c1f-4e53-9f0a-5a1d2c3b4e5f"),
        ];
        for (kind, text) in samples {
            let value = FeatureValue::parse(kind, text).unwrap();
            assert_eq!(value.kind(), kind);
            assert_eq!(value.to_feature_text(), text);
        }
    }
}
