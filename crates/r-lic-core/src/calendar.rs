//! ---
//! lic_section: "14-licensing-extension"
//! lic_subsection: "module"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Reference calendar used for day-granular expiry checks."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LicenseError, Result};

/// Calendar against which "today" is computed for expiry checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryCalendar {
    /// Timezone of the running process.
    #[default]
    Local,
    /// Coordinated universal time.
    Utc,
    /// Fixed offset east of UTC.
    Fixed {
        /// Offset in seconds, within +/-24h.
        offset_seconds: i32,
    },
}

impl ExpiryCalendar {
    /// Build a fixed-offset calendar, validating the offset.
    pub fn fixed(offset_seconds: i32) -> Result<Self> {
        let calendar = ExpiryCalendar::Fixed { offset_seconds };
        calendar.validate()?;
        Ok(calendar)
    }

    /// Reject offsets chrono cannot represent.
    pub fn validate(&self) -> Result<()> {
        if let ExpiryCalendar::Fixed { offset_seconds } = self {
            fixed_offset(*offset_seconds)?;
        }
        Ok(())
    }

    /// Current calendar day.
    pub fn today(&self) -> Result<NaiveDate> {
        match self {
            ExpiryCalendar::Local => Ok(Local::now().date_naive()),
            ExpiryCalendar::Utc => Ok(Utc::now().date_naive()),
            ExpiryCalendar::Fixed { .. } => self.day_of(Utc::now()),
        }
    }

    /// Calendar day an instant falls on.
    pub fn day_of(&self, instant: DateTime<Utc>) -> Result<NaiveDate> {
        match self {
            ExpiryCalendar::Local => Ok(instant.with_timezone(&Local).date_naive()),
            ExpiryCalendar::Utc => Ok(instant.date_naive()),
            ExpiryCalendar::Fixed { offset_seconds } => {
                let offset = fixed_offset(*offset_seconds)?;
                Ok(instant.with_timezone(&offset).date_naive())
            }
        }
    }
}

fn fixed_offset(offset_seconds: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(offset_seconds).ok_or(LicenseError::InvalidCalendar(offset_seconds))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SECONDS_PER_DAY: i32 = 86_400;

    #[test]
    fn fixed_offsets_beyond_a_day_are_rejected() {
        assert_eq!(
            ExpiryCalendar::fixed(SECONDS_PER_DAY),
            Err(LicenseError::InvalidCalendar(SECONDS_PER_DAY))
        );
        assert!(ExpiryCalendar::fixed(-5 * 3600).is_ok());
    }

    #[test]
    fn day_boundary_follows_the_offset() {
        let instant = Utc.with_ymd_and_hms(2030, 6, 30, 22, 30, 0).unwrap();
        let utc = ExpiryCalendar::Utc.day_of(instant).unwrap();
        let tokyo = ExpiryCalendar::fixed(9 * 3600).unwrap().day_of(instant).unwrap();
        assert_eq!(utc, NaiveDate::from_ymd_opt(2030, 6, 30).unwrap());
        assert_eq!(tokyo, NaiveDate::from_ymd_opt(2030, 7, 1).unwrap());
    }

    #[test]
    fn fixed_today_follows_the_offset() {
        let calendar = ExpiryCalendar::fixed(14 * 3600).unwrap();
        let before = calendar.day_of(Utc::now()).unwrap();
        let today = calendar.today().unwrap();
        let after = calendar.day_of(Utc::now()).unwrap();
        assert!(before <= today && today <= after);
        assert!(today >= Utc::now().date_naive());
    }

    #[test]
    fn calendar_deserialises_from_toml_style_values() {
        let local: ExpiryCalendar = serde_json::from_str(r#""local""#).unwrap();
        assert_eq!(local, ExpiryCalendar::Local);
        let fixed: ExpiryCalendar =
            serde_json::from_str(r#"{"fixed":{"offset_seconds":3600}}"#).unwrap();
        assert_eq!(fixed, ExpiryCalendar::Fixed { offset_seconds: 3600 });
    }
}
