//! Timezone resolution and localization.
//!
//! Search input arrives as wall-clock date/time in the requester's zone. It is
//! localized here before being turned into UTC bounds for the store, and
//! stored timestamps are converted back for display.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Display format for timestamps on result pages
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M %Z";

/// Parse an IANA timezone name (e.g. "America/New_York")
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse().ok()
}

/// Pick the requester's timezone, falling back to `default` when the cookie is
/// absent or names an unknown zone.
pub fn resolve_timezone(cookie: Option<&str>, default: Tz) -> Tz {
    match cookie {
        None => default,
        Some(name) => parse_timezone(name).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown timezone cookie '{}', falling back to {}",
                name,
                default.name()
            );
            default
        }),
    }
}

/// Attach `tz` to a wall-clock time.
///
/// Ambiguous times (DST fall-back) resolve to standard time, the later
/// instant. Times inside a DST gap use the offset in force before the gap.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(first, second) => {
            if first <= second {
                second
            } else {
                first
            }
        }
        LocalResult::None => {
            let offset = tz
                .offset_from_local_datetime(&(naive - Duration::days(1)))
                .earliest()
                .map(|o| o.fix())
                .unwrap_or_else(|| tz.offset_from_utc_datetime(&naive).fix());
            let utc = naive - Duration::seconds(i64::from(offset.local_minus_utc()));
            tz.from_utc_datetime(&utc)
        }
    }
}

/// Localize a wall-clock time and convert it to UTC for querying
pub fn localize_utc(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    localize(naive, tz).with_timezone(&Utc)
}

/// Format a stored timestamp in the requester's zone
pub fn format_in(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format(DISPLAY_FORMAT).to_string()
}
