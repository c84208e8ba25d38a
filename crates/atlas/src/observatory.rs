//! Stateful observation point: time, place, zodiac and house system.
//!
//! The observatory owns the ephemeris facade. Every configuration change goes
//! through it so that the engine-side settings (topocentric point, flags)
//! never drift from what the observatory reports.

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};
use log::{debug, error, info};
use std::cell::Cell;

use crate::ephemeris::{
    Ephemeris, EphemerisFacade, HouseCusps, Location, Orientation, ZodiacKind,
    PHENOMENON_VALUES,
};
use crate::error::AtlasError;

/// Time-index step for the second phenomenon sample (about 0.864 s).
pub const PROFILE_EPSILON: f64 = 1e-5;

/// Human-readable ayanamsa names to facade codes
pub const AYANAMSA_ALIASES: &[(&str, char)] = &[
    ("lahiri", 'L'),
    ("fagan", 'F'),
    ("krishna", 'K'),
    ("raman", 'R'),
    ("yukteshwar", 'Y'),
    ("deluce", 'D'),
];

/// House-system names to engine codes. Lookup ignores case, `-`, `_` and spaces.
pub const HOUSE_SYSTEM_ALIASES: &[(&str, char)] = &[
    ("placidus", 'P'),
    ("koch", 'K'),
    ("porphyry", 'O'),
    ("regiomontanus", 'R'),
    ("campanus", 'C'),
    ("equal", 'A'),
    ("whole", 'W'),
    ("wholesign", 'W'),
    ("ws", 'W'),
];

/// Phenomenon values at the current time plus the derived waxing flag.
#[derive(Debug, Clone, PartialEq)]
pub struct PhenomenonProfile {
    /// Phase angle, illuminated fraction, elongation, apparent diameter,
    /// apparent magnitude
    pub values: Vec<f64>,
    pub waxing: bool,
}

impl PhenomenonProfile {
    /// Number of fields carried, waxing flag included.
    pub fn arity(&self) -> usize {
        self.values.len() + 1
    }
}

#[derive(Debug)]
pub struct Observatory<E: Ephemeris> {
    facade: EphemerisFacade<E>,
    time: Option<DateTime<Utc>>,
    location: Option<Location>,
    house_system: char,
    zodiac: ZodiacKind,
    // (source time, time index); valid only while the source equals `time`
    time_index_cache: Cell<Option<(DateTime<Utc>, f64)>>,
}

impl<E: Ephemeris> Observatory<E> {
    pub fn new(facade: EphemerisFacade<E>) -> Self {
        info!(target: "observatory", "observatory initialized (flags={})", facade.flags());
        Self {
            facade,
            time: None,
            location: None,
            house_system: 'P',
            zodiac: ZodiacKind::Tropical,
            time_index_cache: Cell::new(None),
        }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn house_system(&self) -> char {
        self.house_system
    }

    pub fn zodiac(&self) -> ZodiacKind {
        self.zodiac
    }

    pub fn facade(&self) -> &EphemerisFacade<E> {
        &self.facade
    }

    pub fn facade_mut(&mut self) -> &mut EphemerisFacade<E> {
        &mut self.facade
    }

    /// The engine time index of the current time, computed once per time value.
    pub fn time_index(&self) -> Result<f64, AtlasError> {
        let time = self.time.ok_or(AtlasError::Precondition {
            operation: "time index",
            missing: "time",
        })?;

        if let Some((source, index)) = self.time_index_cache.get() {
            if source == time {
                return Ok(index);
            }
        }

        let hour = time.hour() as f64
            + time.minute() as f64 / 60.0
            + time.second() as f64 / 3600.0
            + time.nanosecond() as f64 / 3_600_000_000_000.0;
        let index = self
            .facade
            .convert_to_time_index(time.year(), time.month(), time.day(), hour);
        self.time_index_cache.set(Some((time, index)));
        Ok(index)
    }

    // Configuration

    /// Replace the time and/or location. Absent arguments leave state as is.
    pub fn set(&mut self, time: Option<DateTime<Utc>>, location: Option<Location>) -> &mut Self {
        if let Some(time) = time {
            self.set_time(time);
        }
        if let Some(location) = location {
            self.set_location(location);
        }
        info!(
            target: "observatory",
            "ok observatory setting (time={:?}, location={:?})", self.time, self.location
        );
        self
    }

    /// Move time and/or location relative to their current values.
    ///
    /// Both preconditions are checked before anything changes.
    pub fn shift(
        &mut self,
        time_delta: Option<TimeDelta>,
        location_delta: Option<(f64, f64, f64)>,
    ) -> Result<&mut Self, AtlasError> {
        if time_delta.is_some() && self.time.is_none() {
            error!(target: "observatory", "bad observatory time shift: time not set");
            return Err(AtlasError::Precondition {
                operation: "shift",
                missing: "time",
            });
        }
        if location_delta.is_some() && self.location.is_none() {
            error!(target: "observatory", "bad observatory location shift: location not set");
            return Err(AtlasError::Precondition {
                operation: "shift",
                missing: "location",
            });
        }

        if let (Some(delta), Some(old)) = (time_delta, self.time) {
            let new = old + delta;
            self.set_time(new);
            info!(target: "observatory", "ok observatory time shift ({} to {})", old, new);
        }
        if let (Some((dlat, dlon, dalt)), Some(old)) = (location_delta, self.location) {
            let new = old.shifted(dlat, dlon, dalt);
            self.set_location(new);
            info!(target: "observatory", "ok observatory location shift ({} to {})", old, new);
        }
        Ok(self)
    }

    /// Select the zodiac. Sidereal needs an ayanamsa name from `AYANAMSA_ALIASES`.
    pub fn align(
        &mut self,
        zodiac: ZodiacKind,
        ayanamsa: Option<&str>,
    ) -> Result<&mut Self, AtlasError> {
        match zodiac {
            ZodiacKind::Tropical => {
                self.facade.use_tropical();
            }
            ZodiacKind::Sidereal => {
                let name = ayanamsa.ok_or_else(|| {
                    error!(
                        target: "observatory",
                        "bad observatory alignment: ayanamsa not provided for sidereal zodiac"
                    );
                    AtlasError::configuration("ayanamsa", "", &alias_names(AYANAMSA_ALIASES))
                })?;
                let code = lookup_alias(AYANAMSA_ALIASES, &name.trim().to_lowercase())
                    .ok_or_else(|| {
                        error!(
                            target: "observatory",
                            "bad observatory alignment: ayanamsa alias not found (ayanamsa={})", name
                        );
                        AtlasError::configuration(
                            "ayanamsa",
                            name,
                            &alias_names(AYANAMSA_ALIASES),
                        )
                    })?;
                self.facade.use_sidereal(Some(code))?;
            }
        }
        self.zodiac = zodiac;
        debug!(
            target: "observatory",
            "ok observatory alignment (zodiac={}, flags={})", zodiac, self.facade.flags()
        );
        Ok(self)
    }

    pub fn orient(&mut self, orientation: Orientation) -> &mut Self {
        match orientation {
            Orientation::Ecliptic => self.facade.use_ecliptic(),
            Orientation::Equatorial => self.facade.use_equatorial(),
            Orientation::Topocentric => self.facade.use_topocentric(),
            Orientation::Geocentric => self.facade.use_geocentric(),
            Orientation::Heliocentric => self.facade.use_heliocentric(),
            Orientation::Barycentric => self.facade.use_barycentric(),
        };
        debug!(
            target: "observatory",
            "ok observatory frame orientation (frame={:?}, flags={})",
            orientation,
            self.facade.flags()
        );
        self
    }

    pub fn select_house_system(&mut self, name: &str) -> Result<&mut Self, AtlasError> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(*c, '-' | '_') && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        let code = lookup_alias(HOUSE_SYSTEM_ALIASES, &key).ok_or_else(|| {
            error!(target: "observatory", "bad observatory house system: not found (system={})", name);
            AtlasError::configuration("house system", name, &alias_names(HOUSE_SYSTEM_ALIASES))
        })?;
        self.house_system = code;
        debug!(target: "observatory", "ok observatory house system (system={}, hsys={})", name, code);
        Ok(self)
    }

    // Actions

    /// House cusps and angles for the current time, location and house system.
    pub fn cast(&self) -> Result<HouseCusps, AtlasError> {
        let Some(location) = self.location else {
            error!(target: "observatory", "bad observatory cast: location is not yet set");
            return Err(AtlasError::Precondition {
                operation: "cast",
                missing: "location",
            });
        };
        let time_index = self.time_index()?;
        let houses =
            self.facade
                .query_houses(time_index, location.lat, location.lon, self.house_system)?;
        info!(
            target: "observatory",
            "ok observatory cast (time={:?}, location={})", self.time, location
        );
        Ok(houses)
    }

    /// Position of `body` under the current flags. A negative engine status
    /// is an error; no partial position is ever returned.
    pub fn observe(&self, body: i32) -> Result<Vec<f64>, AtlasError> {
        let time_index = self.time_index()?;
        let reading = self.facade.query_position(body, time_index);
        if reading.status < 0 {
            error!(
                target: "observatory",
                "bad observatory observation (error-code={}, target_id={}, time={:?}, location={:?})",
                reading.status, body, self.time, self.location
            );
            return Err(AtlasError::Engine {
                code: reading.status,
                operation: "calc_ut",
                body: Some(body),
                time_index,
            });
        }
        debug!(
            target: "observatory",
            "ok observatory observation (target_id={}, time={:?})", body, self.time
        );
        Ok(reading.values)
    }

    /// Phenomena of `body`, with waxing derived from a second sample taken
    /// `PROFILE_EPSILON` earlier.
    pub fn profile(&self, body: i32) -> Result<PhenomenonProfile, AtlasError> {
        let time_index = self.time_index()?;
        let now = self.facade.query_phenomenon(body, time_index)?;
        let prev = self
            .facade
            .query_phenomenon(body, time_index - PROFILE_EPSILON)?;

        let (Some(fraction_now), Some(fraction_prev)) = (now.get(1), prev.get(1)) else {
            return Err(AtlasError::Shape {
                context: "phenomenon",
                expected: PHENOMENON_VALUES,
                found: now.len().min(prev.len()),
            });
        };
        let waxing = fraction_now >= fraction_prev;

        debug!(
            target: "observatory",
            "ok observatory profile (target_id={}, time={:?}, waxing={})", body, self.time, waxing
        );
        Ok(PhenomenonProfile {
            values: now,
            waxing,
        })
    }

    /// Ayanamsa at the current time index.
    pub fn ayanamsa(&self) -> Result<f64, AtlasError> {
        Ok(self.facade.query_ayanamsa(self.time_index()?))
    }

    fn set_time(&mut self, time: DateTime<Utc>) {
        self.time = Some(time);
        self.time_index_cache.set(None);
    }

    fn set_location(&mut self, location: Location) {
        self.facade
            .set_topography(location.lat, location.lon, location.alt);
        self.location = Some(location);
    }
}

fn lookup_alias(table: &[(&str, char)], key: &str) -> Option<char> {
    table
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, code)| *code)
}

fn alias_names(table: &[(&'static str, char)]) -> Vec<&'static str> {
    table.iter().map(|(alias, _)| *alias).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::ScriptedEphemeris;

    fn observatory() -> Observatory<ScriptedEphemeris> {
        Observatory::new(EphemerisFacade::new(ScriptedEphemeris::new(), ""))
    }

    #[test]
    fn test_house_system_aliases() {
        let mut obs = observatory();
        for (name, code) in [
            ("placidus", 'P'),
            ("Koch", 'K'),
            ("porphyry", 'O'),
            ("whole-sign", 'W'),
            ("Whole_Sign", 'W'),
            ("ws", 'W'),
            ("equal", 'A'),
        ] {
            obs.select_house_system(name).unwrap();
            assert_eq!(obs.house_system(), code, "{name}");
        }
    }

    #[test]
    fn test_unknown_house_system_keeps_previous() {
        let mut obs = observatory();
        obs.select_house_system("koch").unwrap();
        let err = obs.select_house_system("system").unwrap_err();
        assert!(matches!(err, AtlasError::Configuration { kind: "house system", .. }));
        assert_eq!(obs.house_system(), 'K');
    }

    #[test]
    fn test_time_index_requires_time() {
        let obs = observatory();
        assert_eq!(
            obs.time_index(),
            Err(AtlasError::Precondition {
                operation: "time index",
                missing: "time"
            })
        );
    }

    #[test]
    fn test_time_index_includes_fractional_hours() {
        let mut obs = observatory();
        let evening = DateTime::parse_from_rfc3339("2000-01-01T18:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        obs.set(Some(evening), None);
        assert_eq!(obs.time_index().unwrap(), 2451545.25);
    }
}
