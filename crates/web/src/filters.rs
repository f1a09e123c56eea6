//! Template helpers and custom Askama filters.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

/// Format used for every date shown to users.
const HUMAN_DATE_FORMAT: &str = "%d %b %Y at %H:%M";

/// Format a timestamp for display, e.g. `16 Sep 2025 at 11:45`.
///
/// The instant is always shown in UTC regardless of the offset it carries.
/// An unset timestamp renders as an empty string.
#[must_use]
pub fn human_date<Tz: TimeZone>(t: Option<&DateTime<Tz>>) -> String {
    t.map(|t| t.with_timezone(&Utc).format(HUMAN_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(Utc::now().year())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn test_human_date_utc() {
        let t = Utc.with_ymd_and_hms(2025, 9, 16, 11, 45, 0).unwrap();
        assert_eq!(human_date(Some(&t)), "16 Sep 2025 at 11:45");
    }

    #[test]
    fn test_human_date_unset() {
        assert_eq!(human_date::<Utc>(None), "");
    }

    #[test]
    fn test_human_date_converts_offset_to_utc() {
        let cet = FixedOffset::east_opt(60 * 60).unwrap();
        let t = cet.with_ymd_and_hms(2025, 9, 16, 11, 45, 0).unwrap();
        assert_eq!(human_date(Some(&t)), "16 Sep 2025 at 10:45");
    }

    #[test]
    fn test_human_date_pads_day() {
        let t = Utc.with_ymd_and_hms(2024, 1, 3, 7, 5, 0).unwrap();
        assert_eq!(human_date(Some(&t)), "03 Jan 2024 at 07:05");
    }
}
