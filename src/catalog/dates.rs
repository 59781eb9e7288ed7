use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Resolves a matched pattern against the current instant.
type Resolver = fn(&Captures<'_>, DateTime<Utc>) -> Option<DateTime<Utc>>;

/// One recognised date phrasing
struct DatePattern {
    regex: Regex,
    resolve: Resolver,
}

/// Relative phrasings, tried in order. New formats go here.
static RELATIVE_PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    vec![
        DatePattern {
            regex: Regex::new(r"(?i)^yesterday$").expect("Invalid yesterday regex"),
            resolve: |_, now| now.checked_sub_signed(Duration::days(1)),
        },
        DatePattern {
            regex: Regex::new(r"(?i)^(?:today|just now)$").expect("Invalid today regex"),
            resolve: |_, now| Some(now),
        },
        DatePattern {
            regex: Regex::new(r"(?i)(\d+)\s+(second|minute|hour|day|week|month|year)s?\s+ago")
                .expect("Invalid relative regex"),
            resolve: resolve_ago,
        },
    ]
});

/// Absolute calendar formats seen on catalog pages, tried after the relative table.
const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%d %B %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn resolve_ago(caps: &Captures<'_>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let amount: i64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_ascii_lowercase();

    match unit.as_str() {
        "second" => now.checked_sub_signed(Duration::try_seconds(amount)?),
        "minute" => now.checked_sub_signed(Duration::try_minutes(amount)?),
        "hour" => now.checked_sub_signed(Duration::try_hours(amount)?),
        "day" => now.checked_sub_signed(Duration::try_days(amount)?),
        "week" => now.checked_sub_signed(Duration::try_weeks(amount)?),
        "month" => now.checked_sub_months(Months::new(u32::try_from(amount).ok()?)),
        "year" => {
            let months = u32::try_from(amount).ok()?.checked_mul(12)?;
            now.checked_sub_months(Months::new(months))
        }
        _ => None,
    }
}

fn parse_calendar(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Resolve display-date text against `now`.
///
/// Never fails: blank or unrecognised text resolves to `now`.
#[must_use]
pub fn resolve_date(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let text = text.trim();
    if text.is_empty() {
        return now;
    }

    RELATIVE_PATTERNS
        .iter()
        .find_map(|pattern| {
            let caps = pattern.regex.captures(text)?;
            (pattern.resolve)(&caps, now)
        })
        .or_else(|| parse_calendar(text))
        .unwrap_or(now)
}

/// Normalize display-date text to an ISO-8601 UTC timestamp (`…T…Z`, millisecond precision).
#[must_use]
pub fn normalize_relative_date(text: &str) -> String {
    resolve_date(text, Utc::now()).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_blank_is_now() {
        assert_eq!(resolve_date("", fixed_now()), fixed_now());
        assert_eq!(resolve_date("   ", fixed_now()), fixed_now());
    }

    #[test]
    fn test_yesterday_any_case() {
        let expected = fixed_now() - Duration::days(1);
        assert_eq!(resolve_date("yesterday", fixed_now()), expected);
        assert_eq!(resolve_date("Yesterday", fixed_now()), expected);
        assert_eq!(resolve_date(" YESTERDAY ", fixed_now()), expected);
    }

    #[test]
    fn test_units_ago() {
        let now = fixed_now();
        assert_eq!(resolve_date("45 seconds ago", now), now - Duration::seconds(45));
        assert_eq!(resolve_date("1 minute ago", now), now - Duration::minutes(1));
        assert_eq!(resolve_date("3 hours ago", now), now - Duration::hours(3));
        assert_eq!(resolve_date("2 Days ago", now), now - Duration::days(2));
        assert_eq!(resolve_date("2 weeks ago", now), now - Duration::weeks(2));
        assert_eq!(
            resolve_date("1 month ago", now),
            Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap()
        );
        assert_eq!(
            resolve_date("2 years ago", now),
            Utc.with_ymd_and_hms(2022, 6, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_relative_inside_sentence() {
        let now = fixed_now();
        assert_eq!(resolve_date("Updated 5 minutes ago", now), now - Duration::minutes(5));
    }

    #[test]
    fn test_calendar_formats() {
        let now = fixed_now();
        let april = Utc.with_ymd_and_hms(2021, 4, 5, 0, 0, 0).unwrap();
        assert_eq!(resolve_date("Apr 05, 2021", now), april);
        assert_eq!(resolve_date("April 05, 2021", now), april);
        assert_eq!(resolve_date("2021-04-05", now), april);
        assert_eq!(resolve_date("2021-04-05T00:00:00Z", now), april);
        assert_eq!(resolve_date("Mon, 05 Apr 2021 00:00:00 +0000", now), april);
    }

    #[test]
    fn test_garbage_falls_back_to_now() {
        assert_eq!(resolve_date("not a date", fixed_now()), fixed_now());
        assert_eq!(
            resolve_date("99999999999999999999 days ago", fixed_now()),
            fixed_now()
        );
    }

    #[test]
    fn test_normalize_relative_date_within_a_second() {
        let before = Utc::now() - Duration::hours(3);
        let normalized = normalize_relative_date("3 hours ago");
        let after = Utc::now() - Duration::hours(3);

        let parsed = DateTime::parse_from_rfc3339(&normalized).unwrap().with_timezone(&Utc);
        assert!(parsed >= before - Duration::seconds(1));
        assert!(parsed <= after + Duration::seconds(1));
        assert!(normalized.ends_with('Z'));
    }

    #[test]
    fn test_normalize_blank_and_garbage_are_now() {
        for text in ["", "not a date"] {
            let normalized = normalize_relative_date(text);
            let parsed = DateTime::parse_from_rfc3339(&normalized).unwrap().with_timezone(&Utc);
            assert!((Utc::now() - parsed).num_milliseconds().abs() < 1000);
        }
    }
}
