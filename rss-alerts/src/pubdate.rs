use crate::types::{AlertError, Published, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use tracing::debug;

/// Format used by trigger configuration files, e.g. `3 Oct 2016 17:00:10`.
pub const REFERENCE_TIME_FORMAT: &str = "%d %b %Y %H:%M:%S";

// RFC 822 makes the seconds optional.
const ZONED_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M %z",
];
const NAIVE_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S",
    REFERENCE_TIME_FORMAT,
    "%a, %d %b %Y %H:%M",
    "%d %b %Y %H:%M",
];

/// Offset in hours for the zone names RFC 822 allows in `pubDate`.
pub fn zone_abbreviation_offset(abbreviation: &str) -> Option<FixedOffset> {
    let hours = match abbreviation.to_ascii_uppercase().as_str() {
        "GMT" | "UT" | "UTC" | "Z" => 0,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

/// Parse a feed publication date.
///
/// Accepts RFC 3339, the RFC 2822 shape with a numeric offset, and the same
/// shape ending in a zone abbreviation (`GMT`, `EST`, ...). Weekday-less and
/// seconds-less variants are accepted too. A trailing abbreviation we do not
/// know yields a `Floating` timestamp rather than a guess.
pub fn parse_pubdate(text: &str) -> Option<Published> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Published::Zoned(dt));
    }

    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(Published::Zoned(dt));
        }
    }

    // "<date> <time> <ZONE>": split off the last word and resolve it ourselves.
    if let Some((head, zone)) = text.rsplit_once(' ') {
        if zone.chars().all(|c| c.is_ascii_alphabetic()) {
            if let Some(naive) = parse_naive(head) {
                return Some(match zone_abbreviation_offset(zone) {
                    Some(offset) => match naive.and_local_timezone(offset).single() {
                        Some(dt) => Published::Zoned(dt),
                        None => Published::Floating(naive),
                    },
                    None => {
                        debug!("Unknown zone abbreviation {:?}, keeping {} floating", zone, head);
                        Published::Floating(naive)
                    }
                });
            }
        }
    }

    parse_naive(text).map(Published::Floating)
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Parse the reference time of a BEFORE/AFTER trigger.
///
/// The configuration form `3 Oct 2016 17:00:10` carries no zone and is
/// anchored at `assume_offset`. RFC 3339 and RFC 2822 inputs keep their own
/// offset.
pub fn parse_reference_time(text: &str, assume_offset: FixedOffset) -> Result<DateTime<Utc>> {
    parse_pubdate(text)
        .map(|published| published.to_utc(assume_offset))
        .ok_or_else(|| {
            AlertError::config(format!(
                "unparseable reference time {:?} (expected e.g. \"3 Oct 2016 17:00:10\")",
                text
            ))
        })
}
