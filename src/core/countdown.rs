//! Remaining-time text for a deal's discount end.
//!
//! Pure function of `(now, end)`; the UI calls it again on every tick.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};

pub const EXPIRED_LABEL: &str = "할인 종료";

/// Parse the service's end-date string.  Accepts RFC 3339 and the offset-less
/// `YYYY-MM-DDTHH:MM:SS` form (interpreted as local time).
pub fn parse_end(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}

/// Render the time left until `end`.
///
/// Whole days are dropped (hours wrap at 24) and zero components are
/// omitted; under a second left reads "0초".  Anything at or past `end`
/// reads [`EXPIRED_LABEL`].
pub fn remaining<A: TimeZone, B: TimeZone>(now: &DateTime<A>, end: &DateTime<B>) -> String {
    let millis = end.clone().signed_duration_since(now.clone()).num_milliseconds();
    if millis <= 0 {
        return EXPIRED_LABEL.to_string();
    }
    let secs = millis / 1000;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}시간"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}분"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}초"));
    }
    parts.join(" ")
}

/// Convenience wrapper: `None` when the deal has no (parseable) end date.
pub fn remaining_for<Tz: TimeZone>(now: &DateTime<Tz>, raw_end: Option<&str>) -> Option<String> {
    let end = parse_end(raw_end?)?;
    Some(remaining(now, &end))
}
