use atlas::{CelestialState, Phase, ZodiacSign};
use serde::Serialize;
use std::fmt::Write;

/// Derived values for one state; each is absent when its property was not requested.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub state: &'a CelestialState,
    pub sign: Option<ZodiacSign>,
    pub orb: Option<f64>,
    pub retrograde: Option<bool>,
    pub phase: Option<Phase>,
}

impl<'a> Report<'a> {
    pub fn new(state: &'a CelestialState) -> Self {
        Self {
            state,
            sign: state.sign().ok(),
            orb: state.orb().ok(),
            retrograde: state.retrograde().ok(),
            phase: state.phase().ok(),
        }
    }
}

pub fn full(report: &Report) -> String {
    let state = report.state;
    let mut out = format!("{} {}\n", state.glyph, state.name);
    if let (Some(sign), Some(orb)) = (report.sign, report.orb) {
        let _ = writeln!(out, "  sign:       {} {:.2}°", sign, orb);
    }
    if let Some(ecl) = state.ecliptic() {
        let _ = writeln!(
            out,
            "  ecliptic:   lon {:.4}° lat {:.4}° dist {:.6} AU",
            ecl.lon, ecl.lat, ecl.dist
        );
    }
    if let Some(eq) = state.equatorial() {
        let _ = writeln!(
            out,
            "  equatorial: ra {:.4}° dec {:.4}° dist {:.6} AU",
            eq.ra, eq.dec, eq.dist
        );
    }
    if let Some(retrograde) = report.retrograde {
        let _ = writeln!(out, "  retrograde: {}", if retrograde { "yes" } else { "no" });
    }
    if let (Some(phase), Some(pheno)) = (&report.phase, state.phenomenon()) {
        let _ = writeln!(
            out,
            "  phase:      {} ({:.1}% lit, magnitude {:.2})",
            phase,
            pheno.illuminated_fraction * 100.0,
            pheno.apparent_magnitude
        );
    }
    out
}

pub fn concise(report: &Report) -> String {
    let state = report.state;
    let mut line = format!("{} {}", state.glyph, state.name);
    if let (Some(sign), Some(orb)) = (report.sign, report.orb) {
        let _ = write!(line, " {} {:.2}°", sign.glyph(), orb);
    }
    if report.retrograde == Some(true) {
        line.push_str(" ℞");
    }
    if let Some(phase) = &report.phase {
        let _ = write!(line, " {}", phase.emoji);
    }
    line
}

pub fn json(reports: &[Report]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(reports)
        .map_err(|e| anyhow::anyhow!("Failed to serialize observations: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas::{Axis, Location};
    use chrono::{TimeZone, Utc};

    fn mars() -> CelestialState {
        let mut state = CelestialState::new(
            4,
            "♂",
            "Mars",
            Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap(),
            Location::new(0.0, 0.0, 4.0),
        );
        state
            .apply_position(&[333.25, 0.1, 2.1, -0.3, 0.0, 0.0], Axis::Ecliptic)
            .unwrap();
        state
    }

    #[test]
    fn test_concise_line() {
        let state = mars();
        assert_eq!(concise(&Report::new(&state)), "♂ Mars \u{2653}\u{FE0E} 3.25° ℞");
    }

    #[test]
    fn test_json_leaves_unrequested_fields_null() {
        let state = mars();
        let text = json(&[Report::new(&state)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["name"], "Mars");
        assert_eq!(value[0]["sign"], "pisces");
        assert_eq!(value[0]["retrograde"], true);
        assert!(value[0]["phase"].is_null());
    }
}
