use crate::catalog::{
    dates::resolve_date,
    types::{ChapterRecord, RawChapterRow},
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Number used when a row carries none; such rows are never real chapters.
const MISSING_NUMBER: &str = "0";

/// Title and timestamp text contributed by the secondary listing
#[derive(Debug, Default)]
struct SecondaryInfo<'a> {
    title: Option<&'a str>,
    time: Option<&'a str>,
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn chapter_number(row: &RawChapterRow) -> &str {
    non_blank(row.number.as_deref()).unwrap_or(MISSING_NUMBER)
}

fn parse_number(number: &str) -> Option<f64> {
    number
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
}

/// Merge two chapter listings into one, newest first.
///
/// `primary` decides which chapters exist and where they live; `secondary`
/// only contributes titles and timestamps. See [`reconcile_at`].
#[must_use]
pub fn reconcile(primary: &[RawChapterRow], secondary: &[RawChapterRow]) -> Vec<ChapterRecord> {
    reconcile_at(primary, secondary, Utc::now())
}

/// [`reconcile`] against an explicit current instant.
///
/// - rows without a URL, or whose number is missing, unparseable or not
///   positive, are dropped;
/// - the title is the secondary title, else the primary title, else
///   `"Chapter {n}"`, except that a longer primary title wins;
/// - the timestamp comes from the secondary time text, else `now`;
/// - secondary-only chapters are dropped;
/// - output is sorted by number descending with one record per number
///   (the first primary row wins).
#[must_use]
pub fn reconcile_at(
    primary: &[RawChapterRow],
    secondary: &[RawChapterRow],
    now: DateTime<Utc>,
) -> Vec<ChapterRecord> {
    let mut lookup: HashMap<&str, SecondaryInfo<'_>> = HashMap::with_capacity(secondary.len());
    for row in secondary {
        let number = chapter_number(row);
        if number == MISSING_NUMBER {
            continue;
        }
        lookup.insert(
            number,
            SecondaryInfo {
                title: non_blank(row.title.as_deref()),
                time: non_blank(row.time.as_deref()),
            },
        );
    }

    let mut chapters = Vec::with_capacity(primary.len());
    for row in primary {
        let number = chapter_number(row);
        let Some(url) = non_blank(row.url.as_deref()) else {
            continue;
        };
        if number == MISSING_NUMBER {
            continue;
        }
        let Some(chapter_number) = parse_number(number) else {
            debug!("Dropping chapter row with unusable number {:?}", number);
            continue;
        };

        let info = lookup.get(number);
        let own_title = non_blank(row.title.as_deref());
        let mut title = info
            .and_then(|i| i.title)
            .or(own_title)
            .map_or_else(|| format!("Chapter {number}"), str::to_owned);
        if let Some(own) = own_title
            && own.chars().count() > title.chars().count()
        {
            title = own.to_owned();
        }

        let published_at = info
            .and_then(|i| i.time)
            .map_or(now, |time| resolve_date(time, now));

        chapters.push(ChapterRecord {
            chapter_number,
            title,
            published_at,
            external_id: non_blank(row.external_id.as_deref()).map(str::to_owned),
            url: url.to_owned(),
        });
    }

    chapters.sort_by(|a, b| b.chapter_number.total_cmp(&a.chapter_number));
    chapters.dedup_by(|later, earlier| later.chapter_number == earlier.chapter_number);

    chapters
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_single_chapter_takes_secondary_title_and_time() {
        let primary = vec![RawChapterRow::new("10").with_url("/c10")];
        let secondary = vec![RawChapterRow::new("10").with_title("Finale").with_time("2 days ago")];

        let chapters = reconcile_at(&primary, &secondary, now());

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].chapter_number, 10.0);
        assert_eq!(chapters[0].title, "Finale");
        assert_eq!(chapters[0].published_at, now() - Duration::days(2));
        assert_eq!(chapters[0].url, "/c10");
    }

    #[test]
    fn test_missing_number_is_dropped() {
        let primary = vec![
            RawChapterRow {
                url: Some("/c0".to_string()),
                ..Default::default()
            },
            RawChapterRow::new("0").with_url("/zero"),
            RawChapterRow::new("1").with_url("/c1"),
        ];

        let chapters = reconcile_at(&primary, &[], now());

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].url, "/c1");
    }

    #[test]
    fn test_rows_without_url_or_with_bad_number_are_dropped() {
        let primary = vec![
            RawChapterRow::new("3"),
            RawChapterRow::new("3").with_url("  "),
            RawChapterRow::new("extra").with_url("/x"),
            RawChapterRow::new("-2").with_url("/neg"),
            RawChapterRow::new("2").with_url("/c2"),
        ];

        let chapters = reconcile_at(&primary, &[], now());

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].chapter_number, 2.0);
    }

    #[test]
    fn test_title_fallbacks() {
        let primary = vec![
            RawChapterRow::new("1").with_url("/c1"),
            RawChapterRow::new("2").with_url("/c2").with_title("Vol.1 Chapter 2: The Long Road"),
            RawChapterRow::new("3").with_url("/c3").with_title("Ch. 3"),
        ];
        let secondary = vec![
            RawChapterRow::new("2").with_title("The Road"),
            RawChapterRow::new("3").with_title("Chapter 3: Arrival"),
        ];

        let chapters = reconcile_at(&primary, &secondary, now());

        let titles: Vec<_> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Chapter 3: Arrival", "Vol.1 Chapter 2: The Long Road", "Chapter 1"]
        );
    }

    #[test]
    fn test_secondary_only_rows_are_dropped() {
        let primary = vec![RawChapterRow::new("1").with_url("/c1")];
        let secondary = vec![
            RawChapterRow::new("1").with_title("Start"),
            RawChapterRow::new("2").with_title("Leaked"),
        ];

        let chapters = reconcile_at(&primary, &secondary, now());

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Start");
    }

    #[test]
    fn test_sorted_descending_and_unique() {
        let primary = vec![
            RawChapterRow::new("1").with_url("/c1"),
            RawChapterRow::new("10.5").with_url("/c10-5"),
            RawChapterRow::new("2").with_url("/c2-first"),
            RawChapterRow::new("10").with_url("/c10"),
            RawChapterRow::new("2.0").with_url("/c2-second"),
        ];

        let chapters = reconcile_at(&primary, &[], now());

        let numbers: Vec<f64> = chapters.iter().map(|c| c.chapter_number).collect();
        assert_eq!(numbers, vec![10.5, 10.0, 2.0, 1.0]);
        assert!(numbers.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(chapters[2].url, "/c2-first");
    }

    #[test]
    fn test_timestamp_defaults_to_now() {
        let primary = vec![RawChapterRow::new("4").with_url("/c4").with_external_id("884120")];
        let secondary = vec![RawChapterRow::new("4").with_title("Four")];

        let chapters = reconcile_at(&primary, &secondary, now());

        assert_eq!(chapters[0].published_at, now());
        assert_eq!(chapters[0].external_id.as_deref(), Some("884120"));
    }

    #[test]
    fn test_unparseable_secondary_time_is_now() {
        let primary = vec![RawChapterRow::new("5").with_url("/c5")];
        let secondary = vec![RawChapterRow::new("5").with_time("soon™")];

        let chapters = reconcile_at(&primary, &secondary, now());

        assert_eq!(chapters[0].published_at, now());
        assert_eq!(chapters[0].title, "Chapter 5");
    }
}
