//! Argument values that clap cannot parse on its own.

use atlas::Location;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub fn parse_date(text: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Invalid date {text:?} (expected YYYY-MM-DD): {e}"))
}

/// `HH:MM:SS`, or `HH:MM` with seconds set to zero.
pub fn parse_time(text: &str) -> anyhow::Result<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .map_err(|e| anyhow::anyhow!("Invalid time {text:?} (expected HH:MM:SS): {e}"))
}

/// `lat,lon` or `lat,lon,alt`. Altitude defaults to 0.
pub fn parse_location(text: &str) -> anyhow::Result<Location> {
    let parts = text
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid location {text:?}: {e}"))?;
    match parts[..] {
        [lat, lon] => Ok(Location::new(lat, lon, 0.0)),
        [lat, lon, alt] => Ok(Location::new(lat, lon, alt)),
        _ => anyhow::bail!(
            "Invalid location {text:?}: 2-3 components expected, got {}",
            parts.len()
        ),
    }
}

/// Combine the optional date and time arguments, filling gaps from `now`.
pub fn observation_time(
    date: Option<&str>,
    time: Option<&str>,
    now: DateTime<Utc>,
) -> anyhow::Result<DateTime<Utc>> {
    let date = date.map(parse_date).transpose()?.unwrap_or(now.date_naive());
    let time = time.map(parse_time).transpose()?.unwrap_or(now.time());
    Ok(date.and_time(time).and_utc())
}
